//! RFC 9457 problem responses and the mapping from domain errors.

use axum::extract::rejection::JsonRejection;
use axum::extract::Request;
use axum::http::{header, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde::{Serialize, Serializer};
use utoipa::ToSchema;

use crate::domain::error::DomainError;

/// Content type for Problem Details as per RFC 9457.
pub const APPLICATION_PROBLEM_JSON: &str = "application/problem+json";

#[allow(clippy::trivially_copy_pass_by_ref)] // serde requires &T signature
fn serialize_status_code<S: Serializer>(status: &StatusCode, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u16(status.as_u16())
}

/// RFC 9457 Problem Details.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[schema(title = "Problem")]
#[serde(rename_all = "camelCase")]
#[must_use]
pub struct Problem {
    #[serde(rename = "type")]
    pub type_url: String,
    pub title: String,
    #[serde(serialize_with = "serialize_status_code")]
    #[schema(value_type = u16)]
    pub status: StatusCode,
    pub detail: String,
    pub instance: String,
    /// Machine-readable error code.
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    /// Offending field for validation problems.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl Problem {
    pub fn new(status: StatusCode, title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            type_url: "about:blank".to_owned(),
            title: title.into(),
            status,
            detail: detail.into(),
            instance: String::new(),
            code: String::new(),
            trace_id: None,
            field: None,
        }
    }

    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.type_url = format!("https://errors.hangsha.dev/{}", code.as_str());
        self.code = code.as_str().to_owned();
        self
    }

    pub fn with_instance(mut self, uri: impl Into<String>) -> Self {
        self.instance = uri.into();
        self
    }

    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized", detail).with_code(ErrorCode::Unauthorized)
    }
}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        let status = self.status;
        let mut resp = axum::Json(&self).into_response();
        *resp.status_mut() = status;
        resp.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(APPLICATION_PROBLEM_JSON),
        );
        resp.extensions_mut().insert(self);
        resp
    }
}

pub type ApiResult<T> = Result<T, Problem>;

/// Stable error code catalog exposed in `Problem::code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    EmptyPatch,
    FieldCannotBeNull,
    FieldInvalid,
    ReferenceNotFound,
    CollectionInvariantViolated,
    TimeConflict,
    EnrollNotCustom,
    NotFound,
    MalformedBody,
    Unauthorized,
    ImportFailed,
    Internal,
}

impl ErrorCode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EmptyPatch => "HANGSHA_EMPTY_PATCH",
            Self::FieldCannotBeNull => "HANGSHA_FIELD_CANNOT_BE_NULL",
            Self::FieldInvalid => "HANGSHA_FIELD_INVALID",
            Self::ReferenceNotFound => "HANGSHA_REFERENCE_NOT_FOUND",
            Self::CollectionInvariantViolated => "HANGSHA_COLLECTION_INVALID",
            Self::TimeConflict => "HANGSHA_TIME_CONFLICT",
            Self::EnrollNotCustom => "HANGSHA_ENROLL_NOT_CUSTOM",
            Self::NotFound => "HANGSHA_NOT_FOUND",
            Self::MalformedBody => "HANGSHA_MALFORMED_BODY",
            Self::Unauthorized => "HANGSHA_UNAUTHORIZED",
            Self::ImportFailed => "HANGSHA_IMPORT_FAILED",
            Self::Internal => "HANGSHA_INTERNAL",
        }
    }
}

/// Map a domain error to a problem for the request at `instance`.
pub fn domain_error_to_problem(e: DomainError, instance: &str) -> Problem {
    let trace_id = tracing::Span::current()
        .id()
        .map(|id| id.into_u64().to_string());

    let detail = e.to_string();
    let (status, code, title, field) = match &e {
        DomainError::EmptyPatch { .. } => (
            StatusCode::BAD_REQUEST,
            ErrorCode::EmptyPatch,
            "Empty patch",
            None,
        ),
        DomainError::FieldCannotBeNull { field } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::FieldCannotBeNull,
            "Field cannot be null",
            Some(field.clone()),
        ),
        DomainError::FieldInvalid { field, .. } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::FieldInvalid,
            "Invalid field",
            Some(field.clone()),
        ),
        DomainError::ReferenceNotFound { field, .. } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::ReferenceNotFound,
            "Referenced item not found",
            Some(field.clone()),
        ),
        DomainError::CollectionInvariantViolated { field, .. } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::CollectionInvariantViolated,
            "Collection invariant violated",
            Some(field.clone()),
        ),
        DomainError::TimeConflict { .. } => (
            StatusCode::CONFLICT,
            ErrorCode::TimeConflict,
            "Time conflict",
            Some("timeSlots".to_owned()),
        ),
        DomainError::EnrollNotCustom(_) => (
            StatusCode::CONFLICT,
            ErrorCode::EnrollNotCustom,
            "Enroll is not custom",
            None,
        ),
        // Ownership is not revealed: somebody else's resource looks missing.
        DomainError::NotFound { entity, id } | DomainError::NotOwned { entity, id } => {
            let problem = Problem::new(
                StatusCode::NOT_FOUND,
                "Not found",
                format!("{entity} {id} not found"),
            )
            .with_code(ErrorCode::NotFound)
            .with_instance(instance);
            return with_trace(problem, trace_id);
        }
        DomainError::ImportSource(_) => {
            tracing::error!(error = %e, "event import failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::ImportFailed,
                "Event import failed",
                None,
            )
        }
        DomainError::Database(_) => {
            tracing::error!(error = ?e, "Database error occurred");
            let problem = Problem::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
                "An internal error occurred",
            )
            .with_code(ErrorCode::Internal)
            .with_instance(instance);
            return with_trace(problem, trace_id);
        }
    };

    let mut problem = Problem::new(status, title, detail)
        .with_code(code)
        .with_instance(instance);
    if let Some(field) = field {
        problem = problem.with_field(field);
    }
    with_trace(problem, trace_id)
}

fn with_trace(problem: Problem, trace_id: Option<String>) -> Problem {
    match trace_id {
        Some(id) => problem.with_trace_id(id),
        None => problem,
    }
}

impl From<DomainError> for Problem {
    fn from(e: DomainError) -> Self {
        domain_error_to_problem(e, "")
    }
}

impl From<JsonRejection> for Problem {
    fn from(rejection: JsonRejection) -> Self {
        Problem::new(StatusCode::BAD_REQUEST, "Malformed body", rejection.body_text())
            .with_code(ErrorCode::MalformedBody)
    }
}

/// Fill in `instance` on problems raised without access to the request path.
pub async fn problem_instance_middleware(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    let response = next.run(request).await;
    match response.extensions().get::<Problem>() {
        Some(problem) if problem.instance.is_empty() => {
            problem.clone().with_instance(path).into_response()
        }
        _ => response,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_patch_is_bad_request() {
        let p = domain_error_to_problem(DomainError::empty_patch(&["content"]), "/api/v1/memos/1");
        assert_eq!(p.status, StatusCode::BAD_REQUEST);
        assert_eq!(p.code, "HANGSHA_EMPTY_PATCH");
        assert_eq!(p.instance, "/api/v1/memos/1");
    }

    #[test]
    fn validation_errors_are_unprocessable_and_name_the_field() {
        let p = domain_error_to_problem(DomainError::cannot_be_null("courseTitle"), "/x");
        assert_eq!(p.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(p.field.as_deref(), Some("courseTitle"));
    }

    #[test]
    fn not_owned_looks_like_not_found() {
        let owned = domain_error_to_problem(DomainError::not_owned("Memo", 5), "/x");
        let missing = domain_error_to_problem(DomainError::not_found("Memo", 5), "/x");
        assert_eq!(owned.status, StatusCode::NOT_FOUND);
        assert_eq!(owned.detail, missing.detail);
        assert_eq!(owned.code, missing.code);
    }

    #[test]
    fn time_conflict_is_conflict() {
        let p = domain_error_to_problem(
            DomainError::TimeConflict {
                candidate: "MON 09:30-10:30".to_owned(),
                existing: "MON 09:00-10:00".to_owned(),
                conflicting_enroll_id: 3,
            },
            "/x",
        );
        assert_eq!(p.status, StatusCode::CONFLICT);
        assert!(p.detail.contains("enroll 3"));
    }

    #[test]
    fn database_details_are_hidden() {
        let p = domain_error_to_problem(
            DomainError::Database(anyhow::anyhow!("connection refused")),
            "/x",
        );
        assert_eq!(p.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!p.detail.contains("refused"));
    }
}
