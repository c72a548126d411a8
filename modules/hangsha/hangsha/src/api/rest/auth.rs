//! Caller identity.
//!
//! Authentication happens in front of this service; the calling layer passes
//! the authenticated user id in the `X-User-Id` header.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tracing::debug;

use super::error::Problem;
use crate::domain::service::Service;

pub const USER_ID_HEADER: &str = "x-user-id";

/// The registered user a request acts for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub i64);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Problem;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| Problem::unauthorized("missing X-User-Id header"))?;
        let user_id = raw
            .to_str()
            .ok()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .ok_or_else(|| Problem::unauthorized("X-User-Id must be a numeric user id"))?;

        let svc = parts
            .extensions
            .get::<Arc<Service>>()
            .cloned()
            .ok_or_else(|| Problem::unauthorized("identity cannot be resolved"))?;
        if !svc.user_exists(user_id).await? {
            debug!(user_id, "unknown caller");
            return Err(Problem::unauthorized(format!("user {user_id} is not registered")));
        }
        Ok(Self(user_id))
    }
}
