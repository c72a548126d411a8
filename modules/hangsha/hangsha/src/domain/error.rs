//! Domain error types for the hangsha module.

use thiserror::Error;

/// Every failure a hangsha operation can report.
///
/// All validation variants are raised before the first write of a request, so
/// returning one of them means nothing was persisted.
#[derive(Error, Debug)]
pub enum DomainError {
    /// The patch named none of the resource's recognised fields.
    #[error("Patch must contain at least one of: {}", .fields.join(", "))]
    EmptyPatch { fields: Vec<&'static str> },

    #[error("Field '{field}' cannot be null")]
    FieldCannotBeNull { field: String },

    #[error("Invalid value for field '{field}': {message}")]
    FieldInvalid { field: String, message: String },

    #[error("{entity} {id} referenced by '{field}' does not exist")]
    ReferenceNotFound {
        field: String,
        entity: &'static str,
        id: String,
    },

    #[error("Invalid '{field}' collection: {message}")]
    CollectionInvariantViolated { field: String, message: String },

    #[error("Time slot {candidate} overlaps {existing} of enroll {conflicting_enroll_id}")]
    TimeConflict {
        candidate: String,
        existing: String,
        conflicting_enroll_id: i64,
    },

    #[error("Enroll {0} is not a custom enroll and cannot be edited")]
    EnrollNotCustom(i64),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// The resource exists but belongs to somebody else.
    #[error("{entity} {id} does not belong to the caller")]
    NotOwned { entity: &'static str, id: String },

    /// The event import source could not be read or resolved.
    #[error("Event import failed: {0}")]
    ImportSource(String),

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}

impl DomainError {
    #[must_use]
    pub fn empty_patch(fields: &[&'static str]) -> Self {
        Self::EmptyPatch {
            fields: fields.to_vec(),
        }
    }

    pub fn cannot_be_null(field: impl Into<String>) -> Self {
        Self::FieldCannotBeNull {
            field: field.into(),
        }
    }

    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FieldInvalid {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn reference_not_found(
        field: impl Into<String>,
        entity: &'static str,
        id: impl ToString,
    ) -> Self {
        Self::ReferenceNotFound {
            field: field.into(),
            entity,
            id: id.to_string(),
        }
    }

    pub fn collection(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CollectionInvariantViolated {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn not_owned(entity: &'static str, id: impl ToString) -> Self {
        Self::NotOwned {
            entity,
            id: id.to_string(),
        }
    }

    /// True for errors caused by the request content rather than by storage.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptyPatch { .. }
                | Self::FieldCannotBeNull { .. }
                | Self::FieldInvalid { .. }
                | Self::ReferenceNotFound { .. }
                | Self::CollectionInvariantViolated { .. }
                | Self::TimeConflict { .. }
        )
    }
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        Self::Database(anyhow::Error::new(e))
    }
}
