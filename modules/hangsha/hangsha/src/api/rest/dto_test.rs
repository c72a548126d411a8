use hangsha_sdk::{
    DayOfWeek, Enroll, EnrollSource, Event, NewCustomEnroll, TimeSlot, TimeSlotDraft,
};
use serde_json::json;
use time::macros::{datetime, time};

use super::dto::{CreateCustomEnrollRequest, CreateMemoRequest, EnrollDto, EventDto};

fn sample_enroll() -> Enroll {
    Enroll {
        id: 7,
        timetable_id: 2,
        source: EnrollSource::Custom,
        course_title: "Linear Algebra".to_owned(),
        course_number: Some("M1522".to_owned()),
        lecture_number: None,
        credit: Some(3),
        instructor: None,
        time_slots: vec![TimeSlot {
            day_of_week: DayOfWeek::Tue,
            start_at: time!(9:30),
            end_at: time!(10:45),
        }],
        created_at: datetime!(2025-03-01 09:00 UTC),
        updated_at: datetime!(2025-03-02 10:00 UTC),
    }
}

#[test]
fn enroll_dto_uses_camel_case_and_clock_strings() {
    let value = serde_json::to_value(EnrollDto::from(sample_enroll())).unwrap();

    assert_eq!(value["courseTitle"], "Linear Algebra");
    assert_eq!(value["source"], "CUSTOM");
    assert_eq!(value["lectureNumber"], serde_json::Value::Null);
    assert_eq!(
        value["timeSlots"],
        json!([{ "dayOfWeek": "TUE", "startAt": "09:30", "endAt": "10:45" }])
    );
    assert_eq!(value["createdAt"], "2025-03-01T09:00:00Z");
}

#[test]
fn create_memo_request_defaults_tag_names() {
    let req: CreateMemoRequest = serde_json::from_value(json!({ "content": "hi" })).unwrap();
    assert_eq!(req.content, "hi");
    assert!(req.tag_names.is_empty());
}

#[test]
fn create_custom_enroll_request_maps_to_drafts() {
    let req: CreateCustomEnrollRequest = serde_json::from_value(json!({
        "courseTitle": "Study group",
        "credit": 1,
        "timeSlots": [{ "dayOfWeek": "FRI", "startAt": "18:00", "endAt": "20:00" }]
    }))
    .unwrap();

    let new: NewCustomEnroll = req.into();
    assert_eq!(new.course_title, "Study group");
    assert_eq!(new.credit, Some(1));
    assert_eq!(new.instructor, None);
    assert_eq!(
        new.time_slots,
        vec![TimeSlotDraft {
            day_of_week: DayOfWeek::Fri,
            start_at: "18:00".to_owned(),
            end_at: "20:00".to_owned(),
        }]
    );
}

#[test]
fn event_dto_formats_local_datetimes() {
    let event = Event {
        id: 1,
        title: "Career fair".to_owned(),
        image_url: None,
        operation_mode: Some("OFFLINE".to_owned()),
        status_id: Some(3),
        event_type_id: None,
        organization: Some("Career Center".to_owned()),
        location: Some("Building 63".to_owned()),
        apply_start: Some(datetime!(2025-05-01 00:00)),
        apply_end: Some(datetime!(2025-05-10 23:59:59)),
        event_start: None,
        event_end: None,
        capacity: 100,
        apply_count: 12,
        apply_link: "https://example.org/view?dataSeq=1".to_owned(),
        created_at: datetime!(2025-04-01 00:00 UTC),
        updated_at: datetime!(2025-04-01 00:00 UTC),
    };

    let value = serde_json::to_value(EventDto::from(event)).unwrap();
    assert_eq!(value["applyStart"], "2025-05-01T00:00:00");
    assert_eq!(value["applyEnd"], "2025-05-10T23:59:59");
    assert_eq!(value["eventStart"], serde_json::Value::Null);
    assert_eq!(value["applyCount"], 12);
}
