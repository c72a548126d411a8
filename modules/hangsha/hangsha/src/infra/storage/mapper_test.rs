use hangsha_sdk::{DayOfWeek, EnrollSource};
use time::macros::{datetime, time};

use super::entity::{enroll, enroll_time_slot};
use super::mapper::{enroll_with_slots, minutes_of, slot_from_model, time_from_minutes};

fn slot_row(id: i64, day: &str, start: i32, end: i32) -> enroll_time_slot::Model {
    enroll_time_slot::Model {
        id,
        enroll_id: 1,
        day_of_week: day.to_owned(),
        start_minute: start,
        end_minute: end,
    }
}

#[test]
fn minutes_round_trip_through_time() {
    assert_eq!(minutes_of(time!(13:45)), 825);
    assert_eq!(time_from_minutes(825).unwrap(), time!(13:45));
    assert!(time_from_minutes(24 * 60).is_err());
    assert!(time_from_minutes(-1).is_err());
}

#[test]
fn slot_row_with_unknown_day_fails() {
    assert!(slot_from_model(&slot_row(1, "XYZ", 0, 60)).is_err());
}

#[test]
fn enroll_slots_come_back_sorted() {
    let model = enroll::Model {
        id: 1,
        timetable_id: 3,
        source: "CUSTOM".to_owned(),
        course_title: "Algorithms".to_owned(),
        course_number: None,
        lecture_number: None,
        credit: Some(3),
        instructor: None,
        created_at: datetime!(2025-03-01 09:00 UTC),
        updated_at: datetime!(2025-03-01 09:00 UTC),
    };
    let rows = [
        slot_row(1, "WED", 600, 690),
        slot_row(2, "MON", 600, 690),
    ];
    let enroll = enroll_with_slots(model, &rows).unwrap();
    assert_eq!(enroll.source, EnrollSource::Custom);
    assert_eq!(enroll.time_slots[0].day_of_week, DayOfWeek::Mon);
    assert_eq!(enroll.time_slots[1].day_of_week, DayOfWeek::Wed);
    assert_eq!(enroll.time_slots[1].end_at, time!(11:30));
}
