//! Weekly time slot validation and overlap detection.

use std::collections::HashSet;

use hangsha_sdk::{TimeSlot, TimeSlotDraft};
use sea_orm::ConnectionTrait;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::Time;

use super::error::DomainError;
use crate::infra::storage::enroll_repo::EnrollRepo;

const CLOCK_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[hour]:[minute]");

/// Parse a `"HH:MM"` clock string.
pub fn parse_clock(field: &str, raw: &str) -> Result<Time, DomainError> {
    Time::parse(raw.trim(), CLOCK_FORMAT)
        .map_err(|_| DomainError::invalid(field, format!("'{raw}' is not a HH:MM time")))
}

/// Validate wire slots and drop exact duplicates, keeping first-seen order.
pub fn parse_time_slots(
    field: &str,
    drafts: Vec<TimeSlotDraft>,
) -> Result<Vec<TimeSlot>, DomainError> {
    let mut seen = HashSet::with_capacity(drafts.len());
    let mut slots = Vec::with_capacity(drafts.len());
    for draft in drafts {
        let slot = TimeSlot {
            day_of_week: draft.day_of_week,
            start_at: parse_clock(field, &draft.start_at)?,
            end_at: parse_clock(field, &draft.end_at)?,
        };
        if slot.start_at >= slot.end_at {
            return Err(DomainError::invalid(
                field,
                format!("slot {slot} must start before it ends"),
            ));
        }
        if seen.insert(slot) {
            slots.push(slot);
        }
    }
    Ok(slots)
}

/// Detects overlaps between a candidate slot set and the rest of a timetable.
pub struct TimeSlotConflictChecker;

impl TimeSlotConflictChecker {
    /// Pure check of `candidates` against each other and against `existing`
    /// slots, given as `(enroll_id, slot)` pairs of the other enrolls.
    pub fn check(
        field: &str,
        candidates: &[TimeSlot],
        existing: &[(i64, TimeSlot)],
    ) -> Result<(), DomainError> {
        for (i, a) in candidates.iter().enumerate() {
            if let Some(b) = candidates[i + 1..].iter().find(|b| a.overlaps(b)) {
                return Err(DomainError::collection(
                    field,
                    format!("slot {a} overlaps slot {b} in the same request"),
                ));
            }
        }

        for a in candidates {
            if let Some((enroll_id, b)) = existing.iter().find(|(_, b)| a.overlaps(b)) {
                return Err(DomainError::TimeConflict {
                    candidate: a.to_string(),
                    existing: b.to_string(),
                    conflicting_enroll_id: *enroll_id,
                });
            }
        }
        Ok(())
    }

    /// Load the slots of every other enroll in `timetable_id` and check `candidates`.
    pub async fn check_in_timetable<C: ConnectionTrait>(
        conn: &C,
        field: &str,
        timetable_id: i64,
        exclude_enroll_id: Option<i64>,
        candidates: &[TimeSlot],
    ) -> Result<(), DomainError> {
        let existing = EnrollRepo::slots_in_timetable(conn, timetable_id, exclude_enroll_id).await?;
        Self::check(field, candidates, &existing)
    }
}
