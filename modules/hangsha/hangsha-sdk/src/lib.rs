//! Hangsha SDK
//!
//! Transport-agnostic models shared by the hangsha module and its consumers,
//! plus the tri-state [`FieldPatch`] used by every partial update.

pub mod models;
pub mod patch;

pub use models::{
    Category, CategoryGroup, CategoryGroupWithCategories, CrawledDetailSession,
    CrawledProgramEvent, DataSeq, DayOfWeek, Enroll, EnrollPatch, EnrollSource, Event, EventSyncResult,
    ExcludedKeyword, InterestCategoriesPatch, InterestCategory, InterestCategoryAssignment, Memo,
    MemoPatch, NewCustomEnroll, NewMemo, Tag, TimeSlot, TimeSlotDraft, Timetable, UserProfile,
    UserProfilePatch,
};
pub use patch::FieldPatch;
