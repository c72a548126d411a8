//! Hangsha domain service.
//!
//! One [`Service`] owns the database handle and configuration; resource
//! operations live in the submodules as further `impl Service` blocks. Every
//! patch validates its whole input first, then opens one transaction for the
//! scalar writes and the collection delta and commits once.

use sea_orm::DatabaseConnection;

use super::error::DomainError;
use crate::config::ServiceConfig;
use crate::infra::storage::user_repo::UserRepo;

mod categories;
mod enrolls;
mod events;
mod memos;
mod preferences;
mod profile;

pub use events::{derive_period_and_location, EventPeriod};

pub struct Service {
    db: DatabaseConnection,
    config: ServiceConfig,
}

impl Service {
    #[must_use]
    pub fn new(db: DatabaseConnection, config: ServiceConfig) -> Self {
        Self { db, config }
    }

    #[must_use]
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Whether `user_id` names a registered user.
    pub async fn user_exists(&self, user_id: i64) -> Result<bool, DomainError> {
        Ok(UserRepo::exists(&self.db, user_id).await?)
    }
}

/// Trim a required text value and check it is non-blank and within `max` characters.
pub(crate) fn required_text(field: &str, value: &str, max: usize) -> Result<String, DomainError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DomainError::invalid(field, "must not be blank"));
    }
    check_length(field, value, max)?;
    Ok(value.to_owned())
}

/// Trim an optional text value. Blank input is stored as absent.
pub(crate) fn optional_text(
    field: &str,
    value: &str,
    max: usize,
) -> Result<Option<String>, DomainError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    check_length(field, value, max)?;
    Ok(Some(value.to_owned()))
}

pub(crate) fn check_length(field: &str, value: &str, max: usize) -> Result<(), DomainError> {
    if value.chars().count() > max {
        return Err(DomainError::invalid(
            field,
            format!("exceeds maximum length of {max}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_trims_and_rejects_blank() {
        assert_eq!(required_text("f", "  OS ", 10).unwrap(), "OS");
        assert!(matches!(
            required_text("f", "   ", 10),
            Err(DomainError::FieldInvalid { .. })
        ));
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        assert!(check_length("f", "한글이름", 4).is_ok());
        assert!(check_length("f", "한글이름임", 4).is_err());
    }

    #[test]
    fn optional_text_maps_blank_to_none() {
        assert_eq!(optional_text("f", "  ", 5).unwrap(), None);
        assert_eq!(optional_text("f", " Kim ", 5).unwrap().as_deref(), Some("Kim"));
    }
}
