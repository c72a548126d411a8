use hangsha_sdk::{UserProfile, UserProfilePatch};
use sea_orm::{ActiveValue, TransactionTrait};
use time::OffsetDateTime;
use tracing::{info, instrument};
use url::Url;

use super::{check_length, required_text, Service};
use crate::domain::error::DomainError;
use crate::domain::fields::{ProfileFields, PROFILE_SCHEMA};
use crate::infra::storage::entity::user;
use crate::infra::storage::user_repo::UserRepo;

const MAX_EMAIL_LENGTH: usize = 254;
const MAX_IMAGE_URL_LENGTH: usize = 2048;

impl Service {
    /// Register a user by e-mail, returning the existing profile when the
    /// address is already known.
    #[instrument(skip(self, username))]
    pub async fn register_user(
        &self,
        email: &str,
        username: Option<String>,
    ) -> Result<UserProfile, DomainError> {
        let email = required_text("email", email, MAX_EMAIL_LENGTH)?;
        if !email.contains('@') {
            return Err(DomainError::invalid("email", "must be an e-mail address"));
        }
        let username = username
            .map(|u| required_text(ProfileFields::USERNAME, &u, self.config.max_username_length))
            .transpose()?;
        let model = UserRepo::upsert_by_email(&self.db, &email, username).await?;
        info!(user_id = model.id, "user registered");
        Ok(model.into())
    }

    pub async fn get_profile(&self, user_id: i64) -> Result<UserProfile, DomainError> {
        UserRepo::find(&self.db, user_id)
            .await?
            .map(UserProfile::from)
            .ok_or_else(|| DomainError::not_found("User", user_id))
    }

    /// Apply a profile patch. Both fields are plain-optional: `Null` clears,
    /// a value is trimmed and validated.
    #[instrument(skip(self, patch))]
    pub async fn patch_profile(
        &self,
        user_id: i64,
        patch: UserProfilePatch,
    ) -> Result<UserProfile, DomainError> {
        if patch.username.is_absent() && patch.profile_image_url.is_absent() {
            return Err(DomainError::empty_patch(&PROFILE_SCHEMA.field_names()));
        }
        let max = self.config.max_username_length;
        let username = patch
            .username
            .try_map(|v| required_text(ProfileFields::USERNAME, &v, max))?;
        let image_url = patch.profile_image_url.try_map(|v| validate_image_url(&v))?;

        let txn = self.db.begin().await?;
        let current = UserRepo::find(&txn, user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", user_id))?;

        let mut name = current.username.clone();
        let mut image = current.profile_image_url.clone();
        let mut active: user::ActiveModel = current.into();
        if username.apply_optional(&mut name) {
            active.username = ActiveValue::Set(name);
        }
        if image_url.apply_optional(&mut image) {
            active.profile_image_url = ActiveValue::Set(image);
        }
        active.updated_at = ActiveValue::Set(OffsetDateTime::now_utc());
        let updated = UserRepo::update(&txn, active).await?;
        txn.commit().await?;

        info!(user_id, "profile patched");
        Ok(updated.into())
    }
}

/// Absolute `http`/`https` URL with a host.
fn validate_image_url(raw: &str) -> Result<String, DomainError> {
    let field = ProfileFields::PROFILE_IMAGE_URL;
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(DomainError::invalid(field, "must not be blank"));
    }
    check_length(field, raw, MAX_IMAGE_URL_LENGTH)?;
    let url = Url::parse(raw).map_err(|e| DomainError::invalid(field, format!("not a URL: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(DomainError::invalid(field, "must be an http or https URL"));
    }
    Ok(raw.to_owned())
}
