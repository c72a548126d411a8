//! Field names and PATCH schemas per resource.

use hangsha_sdk::{
    DayOfWeek, EnrollPatch, InterestCategoriesPatch, InterestCategoryAssignment,
    MemoPatch, TimeSlotDraft, UserProfilePatch,
};
use serde::Deserialize;
use serde_json::Value;

use super::error::DomainError;
use super::patch::{FieldPolicy, FieldSpec, PatchDecoder, PatchSchema};
use super::timeslot::parse_time_slots;

pub struct MemoFields;

impl MemoFields {
    pub const CONTENT: &'static str = "content";
    pub const TAG_NAMES: &'static str = "tagNames";
}

pub struct EnrollFields;

impl EnrollFields {
    pub const COURSE_TITLE: &'static str = "courseTitle";
    pub const TIME_SLOTS: &'static str = "timeSlots";
    pub const COURSE_NUMBER: &'static str = "courseNumber";
    pub const LECTURE_NUMBER: &'static str = "lectureNumber";
    pub const CREDIT: &'static str = "credit";
    pub const INSTRUCTOR: &'static str = "instructor";
}

pub struct ProfileFields;

impl ProfileFields {
    pub const USERNAME: &'static str = "username";
    pub const PROFILE_IMAGE_URL: &'static str = "profileImageUrl";
}

pub struct PreferenceFields;

impl PreferenceFields {
    pub const ITEMS: &'static str = "items";
    pub const KEYWORD: &'static str = "keyword";
}

pub static MEMO_SCHEMA: PatchSchema = PatchSchema {
    resource: "memo",
    fields: &[
        FieldSpec::new(MemoFields::CONTENT, "string", FieldPolicy::PlainOptional),
        FieldSpec::new(
            MemoFields::TAG_NAMES,
            "array of strings",
            FieldPolicy::CollectionReplace,
        ),
    ],
};

pub static ENROLL_SCHEMA: PatchSchema = PatchSchema {
    resource: "enroll",
    fields: &[
        FieldSpec::new(EnrollFields::COURSE_TITLE, "string", FieldPolicy::NonNullable),
        FieldSpec::new(
            EnrollFields::TIME_SLOTS,
            "array of {dayOfWeek, startAt, endAt}",
            FieldPolicy::NonNullable,
        ),
        FieldSpec::new(EnrollFields::COURSE_NUMBER, "string", FieldPolicy::PlainOptional),
        FieldSpec::new(EnrollFields::LECTURE_NUMBER, "string", FieldPolicy::PlainOptional),
        FieldSpec::new(EnrollFields::CREDIT, "integer", FieldPolicy::PlainOptional),
        FieldSpec::new(EnrollFields::INSTRUCTOR, "string", FieldPolicy::PlainOptional),
    ],
};

pub static PROFILE_SCHEMA: PatchSchema = PatchSchema {
    resource: "user",
    fields: &[
        FieldSpec::new(ProfileFields::USERNAME, "string", FieldPolicy::PlainOptional),
        FieldSpec::new(
            ProfileFields::PROFILE_IMAGE_URL,
            "string",
            FieldPolicy::PlainOptional,
        ),
    ],
};

pub static INTEREST_CATEGORIES_SCHEMA: PatchSchema = PatchSchema {
    resource: "interest categories",
    fields: &[FieldSpec::new(
        PreferenceFields::ITEMS,
        "array of {categoryId, priority}",
        FieldPolicy::CollectionReplace,
    )],
};

/// Wire shape of one weekly slot.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct TimeSlotWire {
    day_of_week: DayOfWeek,
    start_at: String,
    end_at: String,
}

impl From<TimeSlotWire> for TimeSlotDraft {
    fn from(w: TimeSlotWire) -> Self {
        Self {
            day_of_week: w.day_of_week,
            start_at: w.start_at,
            end_at: w.end_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InterestCategoryWire {
    category_id: i64,
    priority: i32,
}

pub fn decode_memo_patch(payload: &Value) -> Result<MemoPatch, DomainError> {
    let mut req = PatchDecoder::decode(&MEMO_SCHEMA, payload)?;
    Ok(MemoPatch {
        content: req.take(MemoFields::CONTENT)?,
        tag_names: req.take(MemoFields::TAG_NAMES)?,
    })
}

pub fn decode_enroll_patch(payload: &Value) -> Result<EnrollPatch, DomainError> {
    let mut req = PatchDecoder::decode(&ENROLL_SCHEMA, payload)?;
    let time_slots = req
        .take::<Vec<TimeSlotWire>>(EnrollFields::TIME_SLOTS)?
        .try_map(|wires| {
            parse_time_slots(
                EnrollFields::TIME_SLOTS,
                wires.into_iter().map(Into::into).collect(),
            )
        })?;
    Ok(EnrollPatch {
        course_title: req.take(EnrollFields::COURSE_TITLE)?,
        time_slots,
        course_number: req.take(EnrollFields::COURSE_NUMBER)?,
        lecture_number: req.take(EnrollFields::LECTURE_NUMBER)?,
        credit: req.take(EnrollFields::CREDIT)?,
        instructor: req.take(EnrollFields::INSTRUCTOR)?,
    })
}

pub fn decode_profile_patch(payload: &Value) -> Result<UserProfilePatch, DomainError> {
    let mut req = PatchDecoder::decode(&PROFILE_SCHEMA, payload)?;
    Ok(UserProfilePatch {
        username: req.take(ProfileFields::USERNAME)?,
        profile_image_url: req.take(ProfileFields::PROFILE_IMAGE_URL)?,
    })
}

pub fn decode_interest_categories(payload: &Value) -> Result<InterestCategoriesPatch, DomainError> {
    let mut req = PatchDecoder::decode(&INTEREST_CATEGORIES_SCHEMA, payload)?;
    let items = req
        .take::<Vec<InterestCategoryWire>>(PreferenceFields::ITEMS)?
        .map(|wires| {
            wires
                .into_iter()
                .map(|w| InterestCategoryAssignment {
                    category_id: w.category_id,
                    priority: w.priority,
                })
                .collect()
        });
    Ok(InterestCategoriesPatch { items })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hangsha_sdk::FieldPatch;
    use serde_json::json;
    use time::macros::time;

    #[test]
    fn memo_patch_keeps_tri_state() {
        let patch = decode_memo_patch(&json!({"content": null})).unwrap();
        assert_eq!(patch.content, FieldPatch::Null);
        assert!(patch.tag_names.is_absent());

        let patch = decode_memo_patch(&json!({"tagNames": ["a", "b"]})).unwrap();
        assert!(patch.content.is_absent());
        assert_eq!(
            patch.tag_names,
            FieldPatch::Value(vec!["a".to_owned(), "b".to_owned()])
        );
    }

    #[test]
    fn memo_patch_rejects_empty_object() {
        assert!(matches!(
            decode_memo_patch(&json!({})),
            Err(DomainError::EmptyPatch { .. })
        ));
    }

    #[test]
    fn enroll_patch_rejects_null_title_and_slots() {
        for key in ["courseTitle", "timeSlots"] {
            let mut body = serde_json::Map::new();
            body.insert(key.to_owned(), Value::Null);
            let err = decode_enroll_patch(&Value::Object(body)).unwrap_err();
            assert!(
                matches!(err, DomainError::FieldCannotBeNull { ref field } if field == key),
                "{key}: {err:?}"
            );
        }
    }

    #[test]
    fn enroll_patch_parses_time_slots() {
        let patch = decode_enroll_patch(&json!({
            "timeSlots": [{"dayOfWeek": "TUE", "startAt": "09:00", "endAt": "10:15"}],
            "credit": null
        }))
        .unwrap();
        let FieldPatch::Value(slots) = patch.time_slots else {
            panic!("time slots should be present");
        };
        assert_eq!(slots[0].day_of_week, DayOfWeek::Tue);
        assert_eq!(slots[0].end_at, time!(10:15));
        assert_eq!(patch.credit, FieldPatch::Null);
        assert!(patch.course_title.is_absent());
    }

    #[test]
    fn enroll_patch_rejects_bad_day() {
        let err = decode_enroll_patch(&json!({
            "timeSlots": [{"dayOfWeek": "MONDAY", "startAt": "09:00", "endAt": "10:00"}]
        }))
        .unwrap_err();
        assert!(matches!(err, DomainError::FieldInvalid { ref field, .. } if field == "timeSlots"));
    }

    #[test]
    fn credit_must_be_integer() {
        let err = decode_enroll_patch(&json!({"credit": "three"})).unwrap_err();
        assert!(matches!(err, DomainError::FieldInvalid { ref field, .. } if field == "credit"));
    }

    #[test]
    fn interest_categories_accept_empty_list_and_null() {
        let patch = decode_interest_categories(&json!({"items": []})).unwrap();
        assert_eq!(patch.items, FieldPatch::Value(Vec::new()));
        let patch = decode_interest_categories(&json!({"items": null})).unwrap();
        assert_eq!(patch.items, FieldPatch::Null);
    }
}
