//! REST handlers for hangsha.
//!
//! Handlers are thin: extract the caller and input, call the domain service,
//! map the result to a DTO. PATCH bodies arrive as raw JSON so that an omitted
//! field and an explicit `null` stay distinguishable until decoding.

use std::sync::Arc;

use axum::extract::{Extension, FromRequest, Path};
use axum::http::{header, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::Value;
use tracing::info;

use super::auth::CurrentUser;
use super::dto::{
    AddExcludedKeywordRequest, CategoryGroupDto, CreateCustomEnrollRequest, CreateMemoRequest,
    CreateTimetableRequest, EnrollDto, EventDto, EventSyncResultDto, ExcludedKeywordDto,
    InterestCategoryDto, MemoDto, RegisterUserRequest, TagDto, TimetableDto, UserProfileDto,
};
use super::error::{ApiResult, Problem};
use crate::domain::error::DomainError;
use crate::domain::fields::{
    decode_enroll_patch, decode_interest_categories, decode_memo_patch, decode_profile_patch,
};
use crate::domain::service::Service;

/// JSON body extractor whose rejection is a problem response.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(Problem))]
pub struct ApiJson<T>(pub T);

fn created_json<T: serde::Serialize>(value: T, location: String) -> impl IntoResponse {
    (StatusCode::CREATED, [(header::LOCATION, location)], Json(value))
}

fn child_location(uri: &Uri, id: i64) -> String {
    format!("{}/{id}", uri.path().trim_end_matches('/'))
}

// === Categories ===

/// GET /api/v1/categories
pub async fn list_categories(
    Extension(svc): Extension<Arc<Service>>,
) -> ApiResult<Json<Vec<CategoryGroupDto>>> {
    let groups = svc.list_categories().await?;
    Ok(Json(groups.into_iter().map(CategoryGroupDto::from).collect()))
}

// === Memos and tags ===

/// POST /api/v1/memos
#[tracing::instrument(skip(svc, req))]
pub async fn create_memo(
    uri: Uri,
    CurrentUser(user_id): CurrentUser,
    Extension(svc): Extension<Arc<Service>>,
    ApiJson(req): ApiJson<CreateMemoRequest>,
) -> ApiResult<impl IntoResponse> {
    info!(user_id, "creating memo");
    let memo = svc.create_memo(user_id, req.into()).await?;
    let location = child_location(&uri, memo.id);
    Ok(created_json(MemoDto::from(memo), location))
}

/// GET /api/v1/memos
pub async fn list_memos(
    CurrentUser(user_id): CurrentUser,
    Extension(svc): Extension<Arc<Service>>,
) -> ApiResult<Json<Vec<MemoDto>>> {
    let memos = svc.list_memos(user_id).await?;
    Ok(Json(memos.into_iter().map(MemoDto::from).collect()))
}

/// GET /api/v1/memos/by-tag/{tagId}
pub async fn list_memos_by_tag(
    CurrentUser(user_id): CurrentUser,
    Extension(svc): Extension<Arc<Service>>,
    Path(tag_id): Path<i64>,
) -> ApiResult<Json<Vec<MemoDto>>> {
    let memos = svc.list_memos_by_tag(user_id, tag_id).await?;
    Ok(Json(memos.into_iter().map(MemoDto::from).collect()))
}

/// PATCH /api/v1/memos/{memoId}
#[tracing::instrument(skip(svc, body))]
pub async fn patch_memo(
    CurrentUser(user_id): CurrentUser,
    Extension(svc): Extension<Arc<Service>>,
    Path(memo_id): Path<i64>,
    ApiJson(body): ApiJson<Value>,
) -> ApiResult<Json<MemoDto>> {
    info!(user_id, memo_id, "patching memo");
    let patch = decode_memo_patch(&body)?;
    let memo = svc.patch_memo(user_id, memo_id, patch).await?;
    Ok(Json(memo.into()))
}

/// DELETE /api/v1/memos/{memoId}
#[tracing::instrument(skip(svc))]
pub async fn delete_memo(
    CurrentUser(user_id): CurrentUser,
    Extension(svc): Extension<Arc<Service>>,
    Path(memo_id): Path<i64>,
) -> ApiResult<StatusCode> {
    svc.delete_memo(user_id, memo_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/tags
pub async fn list_tags(
    CurrentUser(user_id): CurrentUser,
    Extension(svc): Extension<Arc<Service>>,
) -> ApiResult<Json<Vec<TagDto>>> {
    let tags = svc.list_tags(user_id).await?;
    Ok(Json(tags.into_iter().map(TagDto::from).collect()))
}

/// DELETE /api/v1/tags/{tagId}
#[tracing::instrument(skip(svc))]
pub async fn delete_tag(
    CurrentUser(user_id): CurrentUser,
    Extension(svc): Extension<Arc<Service>>,
    Path(tag_id): Path<i64>,
) -> ApiResult<StatusCode> {
    svc.delete_tag(user_id, tag_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// === Timetables and enrolls ===

/// POST /api/v1/timetables
#[tracing::instrument(skip(svc, req))]
pub async fn create_timetable(
    uri: Uri,
    CurrentUser(user_id): CurrentUser,
    Extension(svc): Extension<Arc<Service>>,
    ApiJson(req): ApiJson<CreateTimetableRequest>,
) -> ApiResult<impl IntoResponse> {
    info!(user_id, "creating timetable");
    let timetable = svc.create_timetable(user_id, &req.name).await?;
    let location = child_location(&uri, timetable.id);
    Ok(created_json(TimetableDto::from(timetable), location))
}

/// GET /api/v1/timetables
pub async fn list_timetables(
    CurrentUser(user_id): CurrentUser,
    Extension(svc): Extension<Arc<Service>>,
) -> ApiResult<Json<Vec<TimetableDto>>> {
    let timetables = svc.list_timetables(user_id).await?;
    Ok(Json(timetables.into_iter().map(TimetableDto::from).collect()))
}

/// DELETE /api/v1/timetables/{timetableId}
#[tracing::instrument(skip(svc))]
pub async fn delete_timetable(
    CurrentUser(user_id): CurrentUser,
    Extension(svc): Extension<Arc<Service>>,
    Path(timetable_id): Path<i64>,
) -> ApiResult<StatusCode> {
    svc.delete_timetable(user_id, timetable_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/timetables/{timetableId}/enrolls
pub async fn list_enrolls(
    CurrentUser(user_id): CurrentUser,
    Extension(svc): Extension<Arc<Service>>,
    Path(timetable_id): Path<i64>,
) -> ApiResult<Json<Vec<EnrollDto>>> {
    let enrolls = svc.list_enrolls(user_id, timetable_id).await?;
    Ok(Json(enrolls.into_iter().map(EnrollDto::from).collect()))
}

/// GET /api/v1/timetables/{timetableId}/enrolls/{enrollId}
pub async fn get_enroll(
    CurrentUser(user_id): CurrentUser,
    Extension(svc): Extension<Arc<Service>>,
    Path((timetable_id, enroll_id)): Path<(i64, i64)>,
) -> ApiResult<Json<EnrollDto>> {
    let enroll = svc.get_enroll(user_id, timetable_id, enroll_id).await?;
    Ok(Json(enroll.into()))
}

/// POST /api/v1/timetables/{timetableId}/enrolls/custom
#[tracing::instrument(skip(svc, req))]
pub async fn create_custom_enroll(
    CurrentUser(user_id): CurrentUser,
    Extension(svc): Extension<Arc<Service>>,
    Path(timetable_id): Path<i64>,
    ApiJson(req): ApiJson<CreateCustomEnrollRequest>,
) -> ApiResult<impl IntoResponse> {
    info!(user_id, timetable_id, "creating custom enroll");
    let enroll = svc
        .create_custom_enroll(user_id, timetable_id, req.into())
        .await?;
    let location = format!("/api/v1/timetables/{timetable_id}/enrolls/{}", enroll.id);
    Ok(created_json(EnrollDto::from(enroll), location))
}

/// Other methods on `.../enrolls/custom`. The literal segment shadows
/// `{enrollId}`, and "custom" never names an enroll.
pub async fn custom_enroll_not_found() -> Problem {
    DomainError::not_found("Enroll", "custom").into()
}

/// PATCH /api/v1/timetables/{timetableId}/enrolls/{enrollId}
#[tracing::instrument(skip(svc, body))]
pub async fn patch_enroll(
    CurrentUser(user_id): CurrentUser,
    Extension(svc): Extension<Arc<Service>>,
    Path((timetable_id, enroll_id)): Path<(i64, i64)>,
    ApiJson(body): ApiJson<Value>,
) -> ApiResult<Json<EnrollDto>> {
    info!(user_id, timetable_id, enroll_id, "patching enroll");
    let patch = decode_enroll_patch(&body)?;
    let enroll = svc
        .patch_enroll(user_id, timetable_id, enroll_id, patch)
        .await?;
    Ok(Json(enroll.into()))
}

/// DELETE /api/v1/timetables/{timetableId}/enrolls/{enrollId}
#[tracing::instrument(skip(svc))]
pub async fn delete_enroll(
    CurrentUser(user_id): CurrentUser,
    Extension(svc): Extension<Arc<Service>>,
    Path((timetable_id, enroll_id)): Path<(i64, i64)>,
) -> ApiResult<StatusCode> {
    svc.delete_enroll(user_id, timetable_id, enroll_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// === Users ===

/// GET /api/v1/users/me
pub async fn get_profile(
    CurrentUser(user_id): CurrentUser,
    Extension(svc): Extension<Arc<Service>>,
) -> ApiResult<Json<UserProfileDto>> {
    let profile = svc.get_profile(user_id).await?;
    Ok(Json(profile.into()))
}

/// PATCH /api/v1/users/me
#[tracing::instrument(skip(svc, body))]
pub async fn patch_profile(
    CurrentUser(user_id): CurrentUser,
    Extension(svc): Extension<Arc<Service>>,
    ApiJson(body): ApiJson<Value>,
) -> ApiResult<Json<UserProfileDto>> {
    info!(user_id, "patching profile");
    let patch = decode_profile_patch(&body)?;
    let profile = svc.patch_profile(user_id, patch).await?;
    Ok(Json(profile.into()))
}

// === Preferences ===

/// GET /api/v1/users/me/interest-categories
pub async fn list_interest_categories(
    CurrentUser(user_id): CurrentUser,
    Extension(svc): Extension<Arc<Service>>,
) -> ApiResult<Json<Vec<InterestCategoryDto>>> {
    let items = svc.list_interest_categories(user_id).await?;
    Ok(Json(items.into_iter().map(InterestCategoryDto::from).collect()))
}

/// PUT /api/v1/users/me/interest-categories
#[tracing::instrument(skip(svc, body))]
pub async fn replace_interest_categories(
    CurrentUser(user_id): CurrentUser,
    Extension(svc): Extension<Arc<Service>>,
    ApiJson(body): ApiJson<Value>,
) -> ApiResult<Json<Vec<InterestCategoryDto>>> {
    info!(user_id, "replacing interest categories");
    let patch = decode_interest_categories(&body)?;
    let items = svc.replace_interest_categories(user_id, patch).await?;
    Ok(Json(items.into_iter().map(InterestCategoryDto::from).collect()))
}

/// DELETE /api/v1/users/me/interest-categories/{categoryId}
#[tracing::instrument(skip(svc))]
pub async fn delete_interest_category(
    CurrentUser(user_id): CurrentUser,
    Extension(svc): Extension<Arc<Service>>,
    Path(category_id): Path<i64>,
) -> ApiResult<StatusCode> {
    svc.delete_interest_category(user_id, category_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/users/me/excluded-keywords
pub async fn list_excluded_keywords(
    CurrentUser(user_id): CurrentUser,
    Extension(svc): Extension<Arc<Service>>,
) -> ApiResult<Json<Vec<ExcludedKeywordDto>>> {
    let keywords = svc.list_excluded_keywords(user_id).await?;
    Ok(Json(keywords.into_iter().map(ExcludedKeywordDto::from).collect()))
}

/// POST /api/v1/users/me/excluded-keywords
#[tracing::instrument(skip(svc, req))]
pub async fn add_excluded_keyword(
    uri: Uri,
    CurrentUser(user_id): CurrentUser,
    Extension(svc): Extension<Arc<Service>>,
    ApiJson(req): ApiJson<AddExcludedKeywordRequest>,
) -> ApiResult<impl IntoResponse> {
    let keyword = svc.add_excluded_keyword(user_id, &req.keyword).await?;
    let location = child_location(&uri, keyword.id);
    Ok(created_json(ExcludedKeywordDto::from(keyword), location))
}

/// DELETE /api/v1/users/me/excluded-keywords/{keywordId}
#[tracing::instrument(skip(svc))]
pub async fn delete_excluded_keyword(
    CurrentUser(user_id): CurrentUser,
    Extension(svc): Extension<Arc<Service>>,
    Path(keyword_id): Path<i64>,
) -> ApiResult<StatusCode> {
    svc.delete_excluded_keyword(user_id, keyword_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// === Events ===

/// GET /api/v1/events
pub async fn list_events(
    Extension(svc): Extension<Arc<Service>>,
) -> ApiResult<Json<Vec<EventDto>>> {
    let events = svc.list_events().await?;
    Ok(Json(events.into_iter().map(EventDto::from).collect()))
}

/// GET /api/v1/events/{eventId}
pub async fn get_event(
    Extension(svc): Extension<Arc<Service>>,
    Path(event_id): Path<i64>,
) -> ApiResult<Json<EventDto>> {
    let event = svc.get_event(event_id).await?;
    Ok(Json(event.into()))
}

// === Admin ===

/// POST /admin/users
#[tracing::instrument(skip(svc, req))]
pub async fn register_user(
    Extension(svc): Extension<Arc<Service>>,
    ApiJson(req): ApiJson<RegisterUserRequest>,
) -> ApiResult<impl IntoResponse> {
    let profile = svc.register_user(&req.email, req.username).await?;
    Ok((StatusCode::CREATED, Json(UserProfileDto::from(profile))))
}

/// POST /admin/events/sync
#[tracing::instrument(skip(svc))]
pub async fn sync_events(
    Extension(svc): Extension<Arc<Service>>,
) -> ApiResult<Json<EventSyncResultDto>> {
    info!("event sync requested");
    let result = svc.sync_events_from_file().await?;
    Ok(Json(result.into()))
}
