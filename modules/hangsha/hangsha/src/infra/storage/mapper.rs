//! Entity to domain model mappers.

use anyhow::Context;
use hangsha_sdk::{
    Category, CategoryGroup, DayOfWeek, Enroll, EnrollSource, Event, ExcludedKeyword, Memo, Tag,
    TimeSlot, Timetable, UserProfile,
};
use time::Time;

use super::entity::{
    category, category_group, enroll, enroll_time_slot, event, memo, tag, timetable, user,
    user_excluded_keyword,
};

impl From<user::Model> for UserProfile {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            username: model.username,
            profile_image_url: model.profile_image_url,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<category_group::Model> for CategoryGroup {
    fn from(model: category_group::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            sort_order: model.sort_order,
        }
    }
}

impl From<category::Model> for Category {
    fn from(model: category::Model) -> Self {
        Self {
            id: model.id,
            group_id: model.group_id,
            name: model.name,
            sort_order: model.sort_order,
        }
    }
}

impl From<tag::Model> for Tag {
    fn from(model: tag::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
        }
    }
}

/// Convert memo entity plus its tags to the domain model.
pub fn memo_with_tags(model: memo::Model, tags: Vec<tag::Model>) -> Memo {
    Memo {
        id: model.id,
        user_id: model.user_id,
        content: model.content,
        tags: tags.into_iter().map(Tag::from).collect(),
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

impl From<timetable::Model> for Timetable {
    fn from(model: timetable::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
            created_at: model.created_at,
        }
    }
}

/// Minutes since midnight.
#[must_use]
pub fn minutes_of(t: Time) -> i32 {
    i32::from(t.hour()) * 60 + i32::from(t.minute())
}

pub fn time_from_minutes(minutes: i32) -> anyhow::Result<Time> {
    let hour = u8::try_from(minutes / 60).context("slot minute out of range")?;
    let minute = u8::try_from(minutes % 60).context("slot minute out of range")?;
    Time::from_hms(hour, minute, 0).context("slot minute out of range")
}

pub fn slot_from_model(model: &enroll_time_slot::Model) -> anyhow::Result<TimeSlot> {
    let day_of_week = model
        .day_of_week
        .parse::<DayOfWeek>()
        .map_err(anyhow::Error::msg)?;
    Ok(TimeSlot {
        day_of_week,
        start_at: time_from_minutes(model.start_minute)?,
        end_at: time_from_minutes(model.end_minute)?,
    })
}

pub fn new_slot_active_model(enroll_id: i64, slot: &TimeSlot) -> enroll_time_slot::ActiveModel {
    use sea_orm::ActiveValue::{NotSet, Set};

    enroll_time_slot::ActiveModel {
        id: NotSet,
        enroll_id: Set(enroll_id),
        day_of_week: Set(slot.day_of_week.as_str().to_owned()),
        start_minute: Set(minutes_of(slot.start_at)),
        end_minute: Set(minutes_of(slot.end_at)),
    }
}

/// Convert enroll entity plus its slot rows to the domain model.
pub fn enroll_with_slots(
    model: enroll::Model,
    slots: &[enroll_time_slot::Model],
) -> anyhow::Result<Enroll> {
    let source = model
        .source
        .parse::<EnrollSource>()
        .map_err(anyhow::Error::msg)?;
    let mut time_slots = slots
        .iter()
        .map(slot_from_model)
        .collect::<anyhow::Result<Vec<_>>>()?;
    time_slots.sort();
    Ok(Enroll {
        id: model.id,
        timetable_id: model.timetable_id,
        source,
        course_title: model.course_title,
        course_number: model.course_number,
        lecture_number: model.lecture_number,
        credit: model.credit,
        instructor: model.instructor,
        time_slots,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

impl From<user_excluded_keyword::Model> for ExcludedKeyword {
    fn from(model: user_excluded_keyword::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            keyword: model.keyword,
            created_at: model.created_at,
        }
    }
}

impl From<event::Model> for Event {
    fn from(model: event::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            image_url: model.image_url,
            operation_mode: model.operation_mode,
            status_id: model.status_id,
            event_type_id: model.event_type_id,
            organization: model.organization,
            location: model.location,
            apply_start: model.apply_start,
            apply_end: model.apply_end,
            event_start: model.event_start,
            event_end: model.event_end,
            capacity: model.capacity,
            apply_count: model.apply_count,
            apply_link: model.apply_link,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
