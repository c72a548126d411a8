use hangsha_sdk::{
    Category, CategoryGroupWithCategories, DayOfWeek, Enroll, Event, EventSyncResult,
    ExcludedKeyword, InterestCategory, Memo, NewCustomEnroll, NewMemo, Tag, TimeSlot,
    TimeSlotDraft, Timetable, UserProfile,
};
use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, PrimitiveDateTime};
use utoipa::ToSchema;

time::serde::format_description!(
    local_datetime,
    PrimitiveDateTime,
    "[year]-[month]-[day]T[hour]:[minute]:[second]"
);

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDto {
    pub id: i64,
    pub group_id: i64,
    pub name: String,
    pub sort_order: i32,
}

impl From<Category> for CategoryDto {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            group_id: c.group_id,
            name: c.name,
            sort_order: c.sort_order,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryGroupDto {
    pub id: i64,
    pub name: String,
    pub sort_order: i32,
    pub categories: Vec<CategoryDto>,
}

impl From<CategoryGroupWithCategories> for CategoryGroupDto {
    fn from(g: CategoryGroupWithCategories) -> Self {
        Self {
            id: g.group.id,
            name: g.group.name,
            sort_order: g.group.sort_order,
            categories: g.categories.into_iter().map(CategoryDto::from).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Memos
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TagDto {
    pub id: i64,
    pub name: String,
}

impl From<Tag> for TagDto {
    fn from(t: Tag) -> Self {
        Self {
            id: t.id,
            name: t.name,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemoDto {
    pub id: i64,
    pub content: String,
    pub tags: Vec<TagDto>,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub updated_at: OffsetDateTime,
}

impl From<Memo> for MemoDto {
    fn from(m: Memo) -> Self {
        Self {
            id: m.id,
            content: m.content,
            tags: m.tags.into_iter().map(TagDto::from).collect(),
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMemoRequest {
    pub content: String,
    #[serde(default)]
    pub tag_names: Vec<String>,
}

impl From<CreateMemoRequest> for NewMemo {
    fn from(req: CreateMemoRequest) -> Self {
        Self {
            content: req.content,
            tag_names: req.tag_names,
        }
    }
}

/// Documentation shape of a memo patch. Every field is optional and nullable.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemoPatchRequest {
    pub content: Option<String>,
    pub tag_names: Option<Vec<String>>,
}

// ---------------------------------------------------------------------------
// Timetables
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimetableDto {
    pub id: i64,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub created_at: OffsetDateTime,
}

impl From<Timetable> for TimetableDto {
    fn from(t: Timetable) -> Self {
        Self {
            id: t.id,
            name: t.name,
            created_at: t.created_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTimetableRequest {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlotDto {
    #[schema(value_type = String, example = "MON")]
    pub day_of_week: DayOfWeek,
    #[schema(example = "09:00")]
    pub start_at: String,
    #[schema(example = "10:15")]
    pub end_at: String,
}

impl From<TimeSlot> for TimeSlotDto {
    fn from(s: TimeSlot) -> Self {
        Self {
            day_of_week: s.day_of_week,
            start_at: format!("{:02}:{:02}", s.start_at.hour(), s.start_at.minute()),
            end_at: format!("{:02}:{:02}", s.end_at.hour(), s.end_at.minute()),
        }
    }
}

impl From<TimeSlotDto> for TimeSlotDraft {
    fn from(s: TimeSlotDto) -> Self {
        Self {
            day_of_week: s.day_of_week,
            start_at: s.start_at,
            end_at: s.end_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollDto {
    pub id: i64,
    pub timetable_id: i64,
    #[schema(example = "CUSTOM")]
    pub source: String,
    pub course_title: String,
    pub course_number: Option<String>,
    pub lecture_number: Option<String>,
    pub credit: Option<i32>,
    pub instructor: Option<String>,
    pub time_slots: Vec<TimeSlotDto>,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub updated_at: OffsetDateTime,
}

impl From<Enroll> for EnrollDto {
    fn from(e: Enroll) -> Self {
        Self {
            id: e.id,
            timetable_id: e.timetable_id,
            source: e.source.as_str().to_owned(),
            course_title: e.course_title,
            course_number: e.course_number,
            lecture_number: e.lecture_number,
            credit: e.credit,
            instructor: e.instructor,
            time_slots: e.time_slots.into_iter().map(TimeSlotDto::from).collect(),
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomEnrollRequest {
    pub course_title: String,
    #[serde(default)]
    pub course_number: Option<String>,
    #[serde(default)]
    pub lecture_number: Option<String>,
    #[serde(default)]
    pub credit: Option<i32>,
    #[serde(default)]
    pub instructor: Option<String>,
    pub time_slots: Vec<TimeSlotDto>,
}

impl From<CreateCustomEnrollRequest> for NewCustomEnroll {
    fn from(req: CreateCustomEnrollRequest) -> Self {
        Self {
            course_title: req.course_title,
            course_number: req.course_number,
            lecture_number: req.lecture_number,
            credit: req.credit,
            instructor: req.instructor,
            time_slots: req.time_slots.into_iter().map(TimeSlotDraft::from).collect(),
        }
    }
}

/// Documentation shape of an enroll patch. `courseTitle` and `timeSlots`
/// may be omitted but not nulled.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollPatchRequest {
    pub course_title: Option<String>,
    pub time_slots: Option<Vec<TimeSlotDto>>,
    pub course_number: Option<String>,
    pub lecture_number: Option<String>,
    pub credit: Option<i32>,
    pub instructor: Option<String>,
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileDto {
    pub id: i64,
    pub email: String,
    pub username: Option<String>,
    pub profile_image_url: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub updated_at: OffsetDateTime,
}

impl From<UserProfile> for UserProfileDto {
    fn from(u: UserProfile) -> Self {
        Self {
            id: u.id,
            email: u.email,
            username: u.username,
            profile_image_url: u.profile_image_url,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    pub email: String,
    #[serde(default)]
    pub username: Option<String>,
}

/// Documentation shape of a profile patch.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfilePatchRequest {
    pub username: Option<String>,
    pub profile_image_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Preferences
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InterestCategoryDto {
    pub category: CategoryDto,
    pub priority: i32,
}

impl From<InterestCategory> for InterestCategoryDto {
    fn from(ic: InterestCategory) -> Self {
        Self {
            category: ic.category.into(),
            priority: ic.priority,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InterestCategoryItem {
    pub category_id: i64,
    pub priority: i32,
}

/// Documentation shape of the interest-category replace-all body.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceInterestCategoriesRequest {
    pub items: Option<Vec<InterestCategoryItem>>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExcludedKeywordDto {
    pub id: i64,
    pub keyword: String,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub created_at: OffsetDateTime,
}

impl From<ExcludedKeyword> for ExcludedKeywordDto {
    fn from(k: ExcludedKeyword) -> Self {
        Self {
            id: k.id,
            keyword: k.keyword,
            created_at: k.created_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddExcludedKeywordRequest {
    pub keyword: String,
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventDto {
    pub id: i64,
    pub title: String,
    pub image_url: Option<String>,
    pub operation_mode: Option<String>,
    pub status_id: Option<i64>,
    pub event_type_id: Option<i64>,
    pub organization: Option<String>,
    pub location: Option<String>,
    #[serde(with = "local_datetime::option")]
    #[schema(value_type = Option<String>)]
    pub apply_start: Option<PrimitiveDateTime>,
    #[serde(with = "local_datetime::option")]
    #[schema(value_type = Option<String>)]
    pub apply_end: Option<PrimitiveDateTime>,
    #[serde(with = "local_datetime::option")]
    #[schema(value_type = Option<String>)]
    pub event_start: Option<PrimitiveDateTime>,
    #[serde(with = "local_datetime::option")]
    #[schema(value_type = Option<String>)]
    pub event_end: Option<PrimitiveDateTime>,
    pub capacity: i32,
    pub apply_count: i32,
    pub apply_link: String,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub updated_at: OffsetDateTime,
}

impl From<Event> for EventDto {
    fn from(e: Event) -> Self {
        Self {
            id: e.id,
            title: e.title,
            image_url: e.image_url,
            operation_mode: e.operation_mode,
            status_id: e.status_id,
            event_type_id: e.event_type_id,
            organization: e.organization,
            location: e.location,
            apply_start: e.apply_start,
            apply_end: e.apply_end,
            event_start: e.event_start,
            event_end: e.event_end,
            capacity: e.capacity,
            apply_count: e.apply_count,
            apply_link: e.apply_link,
            updated_at: e.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventSyncResultDto {
    pub total: usize,
    pub upserted: usize,
    pub skipped: usize,
}

impl From<EventSyncResult> for EventSyncResultDto {
    fn from(r: EventSyncResult) -> Self {
        Self {
            total: r.total,
            upserted: r.upserted,
            skipped: r.skipped,
        }
    }
}
