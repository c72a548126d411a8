//! Public models for the hangsha module.
//!
//! These are transport-agnostic data structures that define the contract
//! between the hangsha module and its consumers. Partial updates use
//! [`FieldPatch`] so that an omitted field and an explicit `null` stay distinct.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, PrimitiveDateTime, Time};

use crate::patch::FieldPatch;

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub username: Option<String>,
    pub profile_image_url: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Partial update for the caller's profile. Both fields are nullable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserProfilePatch {
    pub username: FieldPatch<String>,
    pub profile_image_url: FieldPatch<String>,
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryGroup {
    pub id: i64,
    pub name: String,
    pub sort_order: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: i64,
    pub group_id: i64,
    pub name: String,
    pub sort_order: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryGroupWithCategories {
    pub group: CategoryGroup,
    pub categories: Vec<Category>,
}

// ---------------------------------------------------------------------------
// Memos
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memo {
    pub id: i64,
    pub user_id: i64,
    pub content: String,
    pub tags: Vec<Tag>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewMemo {
    pub content: String,
    pub tag_names: Vec<String>,
}

/// Partial update for a memo.
///
/// `content: Null` stores an empty body; `tag_names: Null` detaches every tag.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MemoPatch {
    pub content: FieldPatch<String>,
    pub tag_names: FieldPatch<Vec<String>>,
}

// ---------------------------------------------------------------------------
// Timetables
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timetable {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnrollSource {
    Custom,
    Crawled,
}

impl EnrollSource {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Custom => "CUSTOM",
            Self::Crawled => "CRAWLED",
        }
    }
}

impl FromStr for EnrollSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CUSTOM" => Ok(Self::Custom),
            "CRAWLED" => Ok(Self::Crawled),
            other => Err(format!("unknown enroll source: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DayOfWeek {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl DayOfWeek {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mon => "MON",
            Self::Tue => "TUE",
            Self::Wed => "WED",
            Self::Thu => "THU",
            Self::Fri => "FRI",
            Self::Sat => "SAT",
            Self::Sun => "SUN",
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DayOfWeek {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MON" => Ok(Self::Mon),
            "TUE" => Ok(Self::Tue),
            "WED" => Ok(Self::Wed),
            "THU" => Ok(Self::Thu),
            "FRI" => Ok(Self::Fri),
            "SAT" => Ok(Self::Sat),
            "SUN" => Ok(Self::Sun),
            other => Err(format!("unknown day of week: {other}")),
        }
    }
}

/// A validated weekly interval `[start_at, end_at)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeSlot {
    pub day_of_week: DayOfWeek,
    pub start_at: Time,
    pub end_at: Time,
}

impl TimeSlot {
    /// Half-open overlap: touching slots do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.day_of_week == other.day_of_week
            && self.start_at < other.end_at
            && other.start_at < self.end_at
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:02}:{:02}-{:02}:{:02}",
            self.day_of_week,
            self.start_at.hour(),
            self.start_at.minute(),
            self.end_at.hour(),
            self.end_at.minute()
        )
    }
}

/// Unvalidated slot as it arrives on the wire (`"HH:MM"` clock strings).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSlotDraft {
    pub day_of_week: DayOfWeek,
    pub start_at: String,
    pub end_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enroll {
    pub id: i64,
    pub timetable_id: i64,
    pub source: EnrollSource,
    pub course_title: String,
    pub course_number: Option<String>,
    pub lecture_number: Option<String>,
    pub credit: Option<i32>,
    pub instructor: Option<String>,
    pub time_slots: Vec<TimeSlot>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomEnroll {
    pub course_title: String,
    pub course_number: Option<String>,
    pub lecture_number: Option<String>,
    pub credit: Option<i32>,
    pub instructor: Option<String>,
    pub time_slots: Vec<TimeSlotDraft>,
}

/// Partial update for a custom enroll.
///
/// `course_title` and `time_slots` cannot be cleared; the remaining fields can.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnrollPatch {
    pub course_title: FieldPatch<String>,
    pub time_slots: FieldPatch<Vec<TimeSlot>>,
    pub course_number: FieldPatch<String>,
    pub lecture_number: FieldPatch<String>,
    pub credit: FieldPatch<i32>,
    pub instructor: FieldPatch<String>,
}

// ---------------------------------------------------------------------------
// Preferences
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InterestCategoryAssignment {
    pub category_id: i64,
    pub priority: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterestCategory {
    pub category: Category,
    pub priority: i32,
}

/// Replace-all of the caller's interest categories. `Null` and an empty list both clear.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InterestCategoriesPatch {
    pub items: FieldPatch<Vec<InterestCategoryAssignment>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcludedKeyword {
    pub id: i64,
    pub user_id: i64,
    pub keyword: String,
    pub created_at: OffsetDateTime,
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub image_url: Option<String>,
    pub operation_mode: Option<String>,
    pub status_id: Option<i64>,
    pub event_type_id: Option<i64>,
    pub organization: Option<String>,
    pub location: Option<String>,
    pub apply_start: Option<PrimitiveDateTime>,
    pub apply_end: Option<PrimitiveDateTime>,
    pub event_start: Option<PrimitiveDateTime>,
    pub event_end: Option<PrimitiveDateTime>,
    pub capacity: i32,
    pub apply_count: i32,
    pub apply_link: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Crawler identifiers come as either numbers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DataSeq {
    Number(i64),
    Text(String),
}

impl fmt::Display for DataSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s.trim()),
        }
    }
}

/// One record of the crawler's `events.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawledProgramEvent {
    pub data_seq: DataSeq,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub operation_mode: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub major_types: Vec<Option<String>>,
    #[serde(default)]
    pub apply_start: Option<String>,
    #[serde(default)]
    pub apply_end: Option<String>,
    #[serde(default)]
    pub activity_start: Option<String>,
    #[serde(default)]
    pub activity_end: Option<String>,
    #[serde(default)]
    pub capacity: Option<i32>,
    #[serde(default)]
    pub apply_count: Option<i32>,
    #[serde(default)]
    pub detail_sessions: Vec<CrawledDetailSession>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawledDetailSession {
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventSyncResult {
    pub total: usize,
    pub upserted: usize,
    pub skipped: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::time;

    fn slot(day: DayOfWeek, start: Time, end: Time) -> TimeSlot {
        TimeSlot {
            day_of_week: day,
            start_at: start,
            end_at: end,
        }
    }

    #[test]
    fn touching_slots_do_not_overlap() {
        let a = slot(DayOfWeek::Mon, time!(9:00), time!(10:00));
        let b = slot(DayOfWeek::Mon, time!(10:00), time!(11:00));
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn different_days_never_overlap() {
        let a = slot(DayOfWeek::Mon, time!(9:00), time!(10:00));
        let b = slot(DayOfWeek::Tue, time!(9:00), time!(10:00));
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn crawled_record_accepts_numeric_and_string_seq() {
        let n: CrawledProgramEvent =
            serde_json::from_str(r#"{"dataSeq": 42, "title": "t"}"#).unwrap();
        let s: CrawledProgramEvent =
            serde_json::from_str(r#"{"dataSeq": " 42 ", "majorTypes": ["org", null]}"#).unwrap();
        assert_eq!(n.data_seq.to_string(), "42");
        assert_eq!(s.data_seq.to_string(), "42");
        assert_eq!(s.major_types, vec![Some("org".to_owned()), None]);
        assert!(s.detail_sessions.is_empty());
    }

    #[test]
    fn day_of_week_parses_wire_names() {
        assert_eq!("WED".parse::<DayOfWeek>(), Ok(DayOfWeek::Wed));
        assert!("wed".parse::<DayOfWeek>().is_err());
        assert_eq!(
            serde_json::from_str::<DayOfWeek>(r#""SUN""#).unwrap(),
            DayOfWeek::Sun
        );
    }
}
