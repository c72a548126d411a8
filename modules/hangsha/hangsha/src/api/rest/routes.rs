use std::sync::Arc;

use axum::routing::{delete, get, patch, post};
use axum::{middleware, Extension, Json, Router};
use utoipa::OpenApi;

use super::error::{problem_instance_middleware, Problem};
use super::{dto, handlers};
use crate::domain::service::Service;

/// Schema document for the REST surface.
#[derive(OpenApi)]
#[openapi(
    info(title = "Hangsha API", description = "Memos, timetables, preferences and events"),
    components(schemas(
        Problem,
        dto::CategoryDto,
        dto::CategoryGroupDto,
        dto::TagDto,
        dto::MemoDto,
        dto::CreateMemoRequest,
        dto::MemoPatchRequest,
        dto::TimetableDto,
        dto::CreateTimetableRequest,
        dto::TimeSlotDto,
        dto::EnrollDto,
        dto::CreateCustomEnrollRequest,
        dto::EnrollPatchRequest,
        dto::UserProfileDto,
        dto::RegisterUserRequest,
        dto::UserProfilePatchRequest,
        dto::InterestCategoryDto,
        dto::InterestCategoryItem,
        dto::ReplaceInterestCategoriesRequest,
        dto::ExcludedKeywordDto,
        dto::AddExcludedKeywordRequest,
        dto::EventDto,
        dto::EventSyncResultDto,
    ))
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the module router. Every route sees the service through an `Extension`.
pub fn router(service: Arc<Service>) -> Router {
    Router::new()
        .route("/api/v1/openapi.json", get(openapi_json))
        .route("/api/v1/categories", get(handlers::list_categories))
        // memos and tags
        .route(
            "/api/v1/memos",
            post(handlers::create_memo).get(handlers::list_memos),
        )
        .route("/api/v1/memos/by-tag/{tagId}", get(handlers::list_memos_by_tag))
        .route(
            "/api/v1/memos/{memoId}",
            patch(handlers::patch_memo).delete(handlers::delete_memo),
        )
        .route("/api/v1/tags", get(handlers::list_tags))
        .route("/api/v1/tags/{tagId}", delete(handlers::delete_tag))
        // timetables
        .route(
            "/api/v1/timetables",
            post(handlers::create_timetable).get(handlers::list_timetables),
        )
        .route(
            "/api/v1/timetables/{timetableId}",
            delete(handlers::delete_timetable),
        )
        .route(
            "/api/v1/timetables/{timetableId}/enrolls",
            get(handlers::list_enrolls),
        )
        .route(
            "/api/v1/timetables/{timetableId}/enrolls/custom",
            post(handlers::create_custom_enroll).fallback(handlers::custom_enroll_not_found),
        )
        .route(
            "/api/v1/timetables/{timetableId}/enrolls/{enrollId}",
            get(handlers::get_enroll)
                .patch(handlers::patch_enroll)
                .delete(handlers::delete_enroll),
        )
        // users and preferences
        .route(
            "/api/v1/users/me",
            get(handlers::get_profile).patch(handlers::patch_profile),
        )
        .route(
            "/api/v1/users/me/interest-categories",
            get(handlers::list_interest_categories).put(handlers::replace_interest_categories),
        )
        .route(
            "/api/v1/users/me/interest-categories/{categoryId}",
            delete(handlers::delete_interest_category),
        )
        .route(
            "/api/v1/users/me/excluded-keywords",
            get(handlers::list_excluded_keywords).post(handlers::add_excluded_keyword),
        )
        .route(
            "/api/v1/users/me/excluded-keywords/{keywordId}",
            delete(handlers::delete_excluded_keyword),
        )
        // events
        .route("/api/v1/events", get(handlers::list_events))
        .route("/api/v1/events/{eventId}", get(handlers::get_event))
        // admin
        .route("/admin/users", post(handlers::register_user))
        .route("/admin/events/sync", post(handlers::sync_events))
        .layer(middleware::from_fn(problem_instance_middleware))
        .layer(Extension(service))
}
