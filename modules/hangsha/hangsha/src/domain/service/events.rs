use std::collections::HashMap;

use hangsha_sdk::{CrawledDetailSession, CrawledProgramEvent, Event, EventSyncResult};
use sea_orm::{ActiveValue, ConnectionTrait, TransactionTrait};
use time::format_description::BorrowedFormatItem;
use time::macros::{format_description, time};
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};
use tracing::{info, instrument, warn};

use super::Service;
use crate::domain::error::DomainError;
use crate::infra::storage::category_repo::CategoryRepo;
use crate::infra::storage::entity::event;
use crate::infra::storage::event_repo::EventRepo;

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
const CLOCK_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[hour]:[minute]");
const CLOCK_SECONDS_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[hour]:[minute]:[second]");
const END_OF_DAY: Time = time!(23:59:59);

/// Effective schedule of one crawled record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EventPeriod {
    pub start: Option<PrimitiveDateTime>,
    pub end: Option<PrimitiveDateTime>,
    pub location: Option<String>,
}

impl Service {
    /// Import the crawler's `events.json` from the configured path.
    #[instrument(skip(self), fields(path = %self.config.events_json_path.display()))]
    pub async fn sync_events_from_file(&self) -> Result<EventSyncResult, DomainError> {
        let path = &self.config.events_json_path;
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            DomainError::ImportSource(format!("cannot read {}: {e}", path.display()))
        })?;
        let records: Vec<CrawledProgramEvent> = serde_json::from_str(&raw).map_err(|e| {
            DomainError::ImportSource(format!("{} is not a crawled event list: {e}", path.display()))
        })?;
        self.sync_events(records).await
    }

    /// Upsert crawled records keyed by apply link.
    ///
    /// Matching rows are rewritten even when nothing changed, so every run
    /// refreshes their `updated_at`. Records without a title or with
    /// unparseable dates are skipped.
    #[instrument(skip(self, records), fields(total = records.len()))]
    pub async fn sync_events(
        &self,
        records: Vec<CrawledProgramEvent>,
    ) -> Result<EventSyncResult, DomainError> {
        let txn = self.db.begin().await?;
        let statuses = categories_by_name(&txn, &self.config.status_group_name).await?;
        let event_types = categories_by_name(&txn, &self.config.event_type_group_name).await?;

        let mut result = EventSyncResult {
            total: records.len(),
            ..EventSyncResult::default()
        };
        let now = OffsetDateTime::now_utc();
        for record in &records {
            let apply_link = format!("{}{}", self.config.apply_link_base, record.data_seq);
            let mut model = match build_event(record, &statuses, &event_types) {
                Ok(model) => model,
                Err(reason) => {
                    warn!(data_seq = %record.data_seq, %reason, "skipping crawled event");
                    result.skipped += 1;
                    continue;
                }
            };

            match EventRepo::find_by_apply_link(&txn, &apply_link).await? {
                Some(existing) => {
                    model.id = ActiveValue::Unchanged(existing.id);
                    model.created_at = ActiveValue::Unchanged(existing.created_at);
                }
                None => model.created_at = ActiveValue::Set(now),
            }
            model.apply_link = ActiveValue::Set(apply_link);
            model.updated_at = ActiveValue::Set(now);
            EventRepo::save(&txn, model).await?;
            result.upserted += 1;
        }
        txn.commit().await?;

        info!(
            total = result.total,
            upserted = result.upserted,
            skipped = result.skipped,
            "event sync finished"
        );
        Ok(result)
    }

    pub async fn list_events(&self) -> Result<Vec<Event>, DomainError> {
        let rows = EventRepo::list(&self.db).await?;
        Ok(rows.into_iter().map(Event::from).collect())
    }

    pub async fn get_event(&self, event_id: i64) -> Result<Event, DomainError> {
        EventRepo::find(&self.db, event_id)
            .await?
            .map(Event::from)
            .ok_or_else(|| DomainError::not_found("Event", event_id))
    }
}

async fn categories_by_name<C: ConnectionTrait>(
    conn: &C,
    group_name: &str,
) -> Result<HashMap<String, i64>, DomainError> {
    let group = CategoryRepo::find_group_by_name(conn, group_name)
        .await?
        .ok_or_else(|| DomainError::ImportSource(format!("missing category group: {group_name}")))?;
    Ok(CategoryRepo::list_in_group(conn, group.id)
        .await?
        .into_iter()
        .map(|c| (c.name, c.id))
        .collect())
}

fn non_blank(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

/// Map one record to an active model without `id`, `apply_link` or timestamps.
fn build_event(
    record: &CrawledProgramEvent,
    statuses: &HashMap<String, i64>,
    event_types: &HashMap<String, i64>,
) -> Result<event::ActiveModel, String> {
    let title = non_blank(record.title.as_ref()).ok_or("missing title")?;
    let organization = non_blank(record.major_types.first().and_then(Option::as_ref));
    let type_name = non_blank(record.major_types.get(1).and_then(Option::as_ref));
    let status_id = non_blank(record.status.as_ref()).and_then(|s| statuses.get(&s).copied());
    let event_type_id = type_name.and_then(|t| event_types.get(&t).copied());

    let apply_start = record
        .apply_start
        .as_deref()
        .map(|d| parse_date(d).map(|d| d.midnight()))
        .transpose()?;
    let apply_end = record
        .apply_end
        .as_deref()
        .map(|d| parse_date(d).map(|d| d.with_time(END_OF_DAY)))
        .transpose()?;
    let period = derive_period_and_location(record)?;

    Ok(event::ActiveModel {
        id: ActiveValue::NotSet,
        title: ActiveValue::Set(title),
        image_url: ActiveValue::Set(non_blank(record.image_url.as_ref())),
        operation_mode: ActiveValue::Set(non_blank(record.operation_mode.as_ref())),
        status_id: ActiveValue::Set(status_id),
        event_type_id: ActiveValue::Set(event_type_id),
        organization: ActiveValue::Set(organization),
        location: ActiveValue::Set(period.location),
        apply_start: ActiveValue::Set(apply_start),
        apply_end: ActiveValue::Set(apply_end),
        event_start: ActiveValue::Set(period.start),
        event_end: ActiveValue::Set(period.end),
        capacity: ActiveValue::Set(record.capacity.unwrap_or(0)),
        apply_count: ActiveValue::Set(record.apply_count.unwrap_or(0)),
        apply_link: ActiveValue::NotSet,
        created_at: ActiveValue::NotSet,
        updated_at: ActiveValue::NotSet,
    })
}

/// Derive start, end and location from detail sessions, falling back to the
/// date-only activity range when there are none.
///
/// With sessions: earliest start, latest end, first non-blank location. A
/// session without an end date ends on its start date; a missing start time
/// is midnight and a missing end time is 23:59:59.
pub fn derive_period_and_location(record: &CrawledProgramEvent) -> Result<EventPeriod, String> {
    let sessions = &record.detail_sessions;
    if sessions.is_empty() {
        let start = record
            .activity_start
            .as_deref()
            .map(|d| parse_date(d).map(|d| d.midnight()))
            .transpose()?;
        let end = record
            .activity_end
            .as_deref()
            .map(|d| parse_date(d).map(|d| d.with_time(END_OF_DAY)))
            .transpose()?;
        return Ok(EventPeriod {
            start,
            end,
            location: None,
        });
    }

    let mut start: Option<PrimitiveDateTime> = None;
    let mut end: Option<PrimitiveDateTime> = None;
    for session in sessions {
        if let Some(s) = session_start(session)? {
            start = Some(start.map_or(s, |cur| cur.min(s)));
        }
        if let Some(e) = session_end(session)? {
            end = Some(end.map_or(e, |cur| cur.max(e)));
        }
    }
    let location = sessions.iter().find_map(|s| non_blank(s.location.as_ref()));
    Ok(EventPeriod {
        start,
        end,
        location,
    })
}

fn session_start(s: &CrawledDetailSession) -> Result<Option<PrimitiveDateTime>, String> {
    let Some(date) = s.start_date.as_deref() else {
        return Ok(None);
    };
    let time = s.start_time.as_deref().map(parse_time).transpose()?;
    Ok(Some(parse_date(date)?.with_time(time.unwrap_or(Time::MIDNIGHT))))
}

fn session_end(s: &CrawledDetailSession) -> Result<Option<PrimitiveDateTime>, String> {
    let Some(date) = s.end_date.as_deref().or(s.start_date.as_deref()) else {
        return Ok(None);
    };
    let time = s.end_time.as_deref().map(parse_time).transpose()?;
    Ok(Some(parse_date(date)?.with_time(time.unwrap_or(END_OF_DAY))))
}

fn parse_date(raw: &str) -> Result<Date, String> {
    Date::parse(raw.trim(), DATE_FORMAT).map_err(|e| format!("bad date '{raw}': {e}"))
}

fn parse_time(raw: &str) -> Result<Time, String> {
    let raw = raw.trim();
    Time::parse(raw, CLOCK_FORMAT)
        .or_else(|_| Time::parse(raw, CLOCK_SECONDS_FORMAT))
        .map_err(|e| format!("bad time '{raw}': {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hangsha_sdk::DataSeq;
    use time::macros::datetime;

    fn record() -> CrawledProgramEvent {
        CrawledProgramEvent {
            data_seq: DataSeq::Number(1),
            title: Some("Career Fair".to_owned()),
            image_url: None,
            operation_mode: None,
            status: None,
            major_types: Vec::new(),
            apply_start: None,
            apply_end: None,
            activity_start: None,
            activity_end: None,
            capacity: None,
            apply_count: None,
            detail_sessions: Vec::new(),
        }
    }

    fn session(
        start_date: Option<&str>,
        start_time: Option<&str>,
        end_date: Option<&str>,
        end_time: Option<&str>,
        location: Option<&str>,
    ) -> CrawledDetailSession {
        CrawledDetailSession {
            start_date: start_date.map(str::to_owned),
            start_time: start_time.map(str::to_owned),
            end_date: end_date.map(str::to_owned),
            end_time: end_time.map(str::to_owned),
            location: location.map(str::to_owned),
        }
    }

    #[test]
    fn sessions_give_min_start_max_end_and_first_location() {
        let mut r = record();
        r.detail_sessions = vec![
            session(Some("2025-03-05"), Some("14:00"), None, Some("16:00"), Some("  ")),
            session(Some("2025-03-04"), Some("10:00"), Some("2025-03-04"), Some("12:00"), Some("Bldg 301")),
            session(Some("2025-03-06"), None, None, None, Some("Bldg 500")),
        ];
        let p = derive_period_and_location(&r).unwrap();
        assert_eq!(p.start, Some(datetime!(2025-03-04 10:00)));
        assert_eq!(p.end, Some(datetime!(2025-03-06 23:59:59)));
        assert_eq!(p.location.as_deref(), Some("Bldg 301"));
    }

    #[test]
    fn missing_start_time_is_midnight() {
        let mut r = record();
        r.detail_sessions = vec![session(Some("2025-05-01"), None, None, Some("09:00"), None)];
        let p = derive_period_and_location(&r).unwrap();
        assert_eq!(p.start, Some(datetime!(2025-05-01 00:00)));
        assert_eq!(p.end, Some(datetime!(2025-05-01 09:00)));
        assert_eq!(p.location, None);
    }

    #[test]
    fn activity_range_is_the_fallback() {
        let mut r = record();
        r.activity_start = Some("2025-04-01".to_owned());
        r.activity_end = Some("2025-04-03".to_owned());
        let p = derive_period_and_location(&r).unwrap();
        assert_eq!(p.start, Some(datetime!(2025-04-01 00:00)));
        assert_eq!(p.end, Some(datetime!(2025-04-03 23:59:59)));
    }

    #[test]
    fn bad_date_is_reported() {
        let mut r = record();
        r.activity_start = Some("2025/04/01".to_owned());
        assert!(derive_period_and_location(&r).is_err());
    }

    #[test]
    fn build_event_resolves_names_and_defaults_counts() {
        let mut r = record();
        r.status = Some(" 모집중 ".to_owned());
        r.major_types = vec![Some("Career Center".to_owned()), Some("특강".to_owned())];
        let statuses = HashMap::from([("모집중".to_owned(), 11)]);
        let types = HashMap::from([("특강".to_owned(), 22)]);
        let model = build_event(&r, &statuses, &types).unwrap();
        assert_eq!(model.status_id, ActiveValue::Set(Some(11)));
        assert_eq!(model.event_type_id, ActiveValue::Set(Some(22)));
        assert_eq!(
            model.organization,
            ActiveValue::Set(Some("Career Center".to_owned()))
        );
        assert_eq!(model.capacity, ActiveValue::Set(0));
    }

    #[test]
    fn unknown_category_names_leave_reference_empty() {
        let mut r = record();
        r.status = Some("unknown".to_owned());
        let model = build_event(&r, &HashMap::new(), &HashMap::new()).unwrap();
        assert_eq!(model.status_id, ActiveValue::Set(None));
    }

    #[test]
    fn blank_title_is_rejected() {
        let mut r = record();
        r.title = Some("   ".to_owned());
        assert!(build_event(&r, &HashMap::new(), &HashMap::new()).is_err());
    }
}
