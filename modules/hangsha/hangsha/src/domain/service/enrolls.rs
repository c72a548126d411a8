use hangsha_sdk::{Enroll, EnrollPatch, EnrollSource, FieldPatch, NewCustomEnroll, Timetable};
use sea_orm::{ActiveValue, ConnectionTrait, TransactionTrait};
use time::OffsetDateTime;
use tracing::{debug, info, instrument};

use super::{optional_text, required_text, Service};
use crate::domain::error::DomainError;
use crate::domain::fields::{EnrollFields, ENROLL_SCHEMA};
use crate::domain::sync::CollectionSynchronizer;
use crate::domain::timeslot::{parse_time_slots, TimeSlotConflictChecker};
use crate::infra::storage::enroll_repo::{EnrollRepo, TimetableRepo};
use crate::infra::storage::entity::{enroll, timetable};
use crate::infra::storage::mapper::{enroll_with_slots, slot_from_model};

impl Service {
    #[instrument(skip(self, name))]
    pub async fn create_timetable(
        &self,
        user_id: i64,
        name: &str,
    ) -> Result<Timetable, DomainError> {
        let name = required_text("name", name, self.config.max_course_field_length)?;
        let model = TimetableRepo::insert(&self.db, user_id, name).await?;
        info!(timetable_id = model.id, "timetable created");
        Ok(model.into())
    }

    pub async fn list_timetables(&self, user_id: i64) -> Result<Vec<Timetable>, DomainError> {
        let rows = TimetableRepo::list_for_user(&self.db, user_id).await?;
        Ok(rows.into_iter().map(Timetable::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn delete_timetable(&self, user_id: i64, timetable_id: i64) -> Result<(), DomainError> {
        load_owned_timetable(&self.db, user_id, timetable_id).await?;
        TimetableRepo::delete(&self.db, timetable_id).await?;
        info!(timetable_id, "timetable deleted");
        Ok(())
    }

    pub async fn list_enrolls(
        &self,
        user_id: i64,
        timetable_id: i64,
    ) -> Result<Vec<Enroll>, DomainError> {
        load_owned_timetable(&self.db, user_id, timetable_id).await?;
        let rows = EnrollRepo::list_for_timetable(&self.db, timetable_id).await?;
        let ids: Vec<i64> = rows.iter().map(|e| e.id).collect();
        let mut slots = EnrollRepo::slots_for_enrolls(&self.db, &ids).await?;
        let mut enrolls = Vec::with_capacity(rows.len());
        for row in rows {
            let row_slots = slots.remove(&row.id).unwrap_or_default();
            enrolls.push(enroll_with_slots(row, &row_slots)?);
        }
        Ok(enrolls)
    }

    pub async fn get_enroll(
        &self,
        user_id: i64,
        timetable_id: i64,
        enroll_id: i64,
    ) -> Result<Enroll, DomainError> {
        load_owned_timetable(&self.db, user_id, timetable_id).await?;
        let row = load_enroll_in(&self.db, timetable_id, enroll_id).await?;
        let slots = EnrollRepo::slots_for_enroll(&self.db, enroll_id).await?;
        Ok(enroll_with_slots(row, &slots)?)
    }

    /// Create a CUSTOM enroll after checking its slots against the whole timetable.
    #[instrument(skip(self, new))]
    pub async fn create_custom_enroll(
        &self,
        user_id: i64,
        timetable_id: i64,
        new: NewCustomEnroll,
    ) -> Result<Enroll, DomainError> {
        let max = self.config.max_course_field_length;
        let course_title = required_text(EnrollFields::COURSE_TITLE, &new.course_title, max)?;
        let course_number = text_or_none(EnrollFields::COURSE_NUMBER, new.course_number, max)?;
        let lecture_number = text_or_none(EnrollFields::LECTURE_NUMBER, new.lecture_number, max)?;
        let instructor = text_or_none(EnrollFields::INSTRUCTOR, new.instructor, max)?;
        if let Some(credit) = new.credit {
            check_credit(credit)?;
        }
        let slots = parse_time_slots(EnrollFields::TIME_SLOTS, new.time_slots)?;
        if slots.is_empty() {
            return Err(DomainError::collection(
                EnrollFields::TIME_SLOTS,
                "at least one time slot is required",
            ));
        }

        let txn = self.db.begin().await?;
        load_owned_timetable(&txn, user_id, timetable_id).await?;
        TimeSlotConflictChecker::check_in_timetable(
            &txn,
            EnrollFields::TIME_SLOTS,
            timetable_id,
            None,
            &slots,
        )
        .await?;

        let now = OffsetDateTime::now_utc();
        let model = EnrollRepo::insert(
            &txn,
            enroll::ActiveModel {
                id: ActiveValue::NotSet,
                timetable_id: ActiveValue::Set(timetable_id),
                source: ActiveValue::Set(EnrollSource::Custom.as_str().to_owned()),
                course_title: ActiveValue::Set(course_title),
                course_number: ActiveValue::Set(course_number),
                lecture_number: ActiveValue::Set(lecture_number),
                credit: ActiveValue::Set(new.credit),
                instructor: ActiveValue::Set(instructor),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
            },
        )
        .await?;
        EnrollRepo::insert_slots(&txn, model.id, &slots).await?;
        let slot_rows = EnrollRepo::slots_for_enroll(&txn, model.id).await?;
        txn.commit().await?;

        info!(enroll_id = model.id, slots = slot_rows.len(), "custom enroll created");
        Ok(enroll_with_slots(model, &slot_rows)?)
    }

    /// Apply a patch to a CUSTOM enroll.
    ///
    /// `time_slots` is a non-empty replace-all checked against every other
    /// enroll of the timetable; on conflict nothing is written.
    #[instrument(skip(self, patch))]
    pub async fn patch_enroll(
        &self,
        user_id: i64,
        timetable_id: i64,
        enroll_id: i64,
        patch: EnrollPatch,
    ) -> Result<Enroll, DomainError> {
        let EnrollPatch {
            course_title,
            time_slots,
            course_number,
            lecture_number,
            credit,
            instructor,
        } = patch;
        if course_title.is_absent()
            && time_slots.is_absent()
            && course_number.is_absent()
            && lecture_number.is_absent()
            && credit.is_absent()
            && instructor.is_absent()
        {
            return Err(DomainError::empty_patch(&ENROLL_SCHEMA.field_names()));
        }

        let max = self.config.max_course_field_length;
        let course_title = match course_title {
            FieldPatch::Null => {
                return Err(DomainError::cannot_be_null(EnrollFields::COURSE_TITLE));
            }
            other => other.try_map(|v| required_text(EnrollFields::COURSE_TITLE, &v, max))?,
        };
        let time_slots = match time_slots {
            FieldPatch::Null => {
                return Err(DomainError::cannot_be_null(EnrollFields::TIME_SLOTS));
            }
            FieldPatch::Value(slots) if slots.is_empty() => {
                return Err(DomainError::collection(
                    EnrollFields::TIME_SLOTS,
                    "at least one time slot is required",
                ));
            }
            FieldPatch::Value(slots) => {
                for slot in &slots {
                    if slot.start_at >= slot.end_at {
                        return Err(DomainError::invalid(
                            EnrollFields::TIME_SLOTS,
                            format!("slot {slot} must start before it ends"),
                        ));
                    }
                }
                Some(CollectionSynchronizer::dedup_by_key(slots, |s| *s))
            }
            FieldPatch::Absent => None,
        };
        let course_number = optional_patch(EnrollFields::COURSE_NUMBER, course_number, max)?;
        let lecture_number = optional_patch(EnrollFields::LECTURE_NUMBER, lecture_number, max)?;
        let instructor = optional_patch(EnrollFields::INSTRUCTOR, instructor, max)?;
        if let FieldPatch::Value(c) = &credit {
            check_credit(*c)?;
        }

        let txn = self.db.begin().await?;
        load_owned_timetable(&txn, user_id, timetable_id).await?;
        let current = load_enroll_in(&txn, timetable_id, enroll_id).await?;
        if current.source != EnrollSource::Custom.as_str() {
            return Err(DomainError::EnrollNotCustom(enroll_id));
        }

        if let Some(target) = &time_slots {
            TimeSlotConflictChecker::check_in_timetable(
                &txn,
                EnrollFields::TIME_SLOTS,
                timetable_id,
                Some(enroll_id),
                target,
            )
            .await?;
        }

        let mut number = current.course_number.clone();
        let mut lecture = current.lecture_number.clone();
        let mut credits = current.credit;
        let mut lecturer = current.instructor.clone();
        let mut active: enroll::ActiveModel = current.into();
        if let FieldPatch::Value(title) = course_title {
            active.course_title = ActiveValue::Set(title);
        }
        if course_number.apply_optional(&mut number) {
            active.course_number = ActiveValue::Set(number);
        }
        if lecture_number.apply_optional(&mut lecture) {
            active.lecture_number = ActiveValue::Set(lecture);
        }
        if credit.apply_optional(&mut credits) {
            active.credit = ActiveValue::Set(credits);
        }
        if instructor.apply_optional(&mut lecturer) {
            active.instructor = ActiveValue::Set(lecturer);
        }

        if let Some(target) = time_slots {
            let existing = EnrollRepo::slots_for_enroll(&txn, enroll_id).await?;
            let existing = existing
                .into_iter()
                .map(|row| slot_from_model(&row).map(|slot| (row.id, slot)))
                .collect::<anyhow::Result<Vec<_>>>()?;
            let plan = CollectionSynchronizer::plan(existing, |(_, s)| *s, target, |s| *s);
            if plan.is_noop() {
                debug!(enroll_id, "time slots unchanged");
            } else {
                let removed: Vec<i64> = plan.to_delete.iter().map(|(id, _)| *id).collect();
                EnrollRepo::delete_slots(&txn, &removed).await?;
                EnrollRepo::insert_slots(&txn, enroll_id, &plan.to_insert).await?;
            }
        }

        active.updated_at = ActiveValue::Set(OffsetDateTime::now_utc());
        let updated = EnrollRepo::update(&txn, active).await?;
        let slot_rows = EnrollRepo::slots_for_enroll(&txn, enroll_id).await?;
        txn.commit().await?;

        info!(enroll_id, "enroll patched");
        Ok(enroll_with_slots(updated, &slot_rows)?)
    }

    #[instrument(skip(self))]
    pub async fn delete_enroll(
        &self,
        user_id: i64,
        timetable_id: i64,
        enroll_id: i64,
    ) -> Result<(), DomainError> {
        load_owned_timetable(&self.db, user_id, timetable_id).await?;
        load_enroll_in(&self.db, timetable_id, enroll_id).await?;
        EnrollRepo::delete(&self.db, enroll_id).await?;
        info!(enroll_id, "enroll deleted");
        Ok(())
    }
}

async fn load_owned_timetable<C: ConnectionTrait>(
    conn: &C,
    user_id: i64,
    timetable_id: i64,
) -> Result<timetable::Model, DomainError> {
    match TimetableRepo::find(conn, timetable_id).await? {
        None => Err(DomainError::not_found("Timetable", timetable_id)),
        Some(t) if t.user_id != user_id => Err(DomainError::not_owned("Timetable", timetable_id)),
        Some(t) => Ok(t),
    }
}

async fn load_enroll_in<C: ConnectionTrait>(
    conn: &C,
    timetable_id: i64,
    enroll_id: i64,
) -> Result<enroll::Model, DomainError> {
    match EnrollRepo::find(conn, enroll_id).await? {
        Some(e) if e.timetable_id == timetable_id => Ok(e),
        _ => Err(DomainError::not_found("Enroll", enroll_id)),
    }
}

fn text_or_none(
    field: &str,
    value: Option<String>,
    max: usize,
) -> Result<Option<String>, DomainError> {
    match value {
        Some(v) => optional_text(field, &v, max),
        None => Ok(None),
    }
}

/// Plain-optional text: `Value` is trimmed, a blank value clears like `Null`.
fn optional_patch(
    field: &str,
    patch: FieldPatch<String>,
    max: usize,
) -> Result<FieldPatch<String>, DomainError> {
    match patch {
        FieldPatch::Value(v) => Ok(optional_text(field, &v, max)?
            .map_or(FieldPatch::Null, FieldPatch::Value)),
        other => Ok(other),
    }
}

fn check_credit(credit: i32) -> Result<(), DomainError> {
    if credit < 0 {
        return Err(DomainError::invalid(EnrollFields::CREDIT, "must not be negative"));
    }
    Ok(())
}
