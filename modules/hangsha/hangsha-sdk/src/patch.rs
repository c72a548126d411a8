//! Tri-state field updates for PATCH requests.
//!
//! A JSON merge-style patch distinguishes three cases for every field:
//! the key is missing (leave the stored value alone), the key is present with
//! `null` (clear the value), or the key carries a value (replace it).

/// State of a single field in a partial update.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldPatch<T> {
    /// Field not mentioned in the request.
    #[default]
    Absent,
    /// Field explicitly set to `null`.
    Null,
    /// Field carries a new value.
    Value(T),
}

impl<T> FieldPatch<T> {
    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn is_present(&self) -> bool {
        !self.is_absent()
    }

    #[must_use]
    pub fn as_value(&self) -> Option<&T> {
        match self {
            Self::Value(v) => Some(v),
            Self::Absent | Self::Null => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> FieldPatch<U> {
        match self {
            Self::Absent => FieldPatch::Absent,
            Self::Null => FieldPatch::Null,
            Self::Value(v) => FieldPatch::Value(f(v)),
        }
    }

    /// Fallible variant of [`FieldPatch::map`]; `Absent` and `Null` pass through.
    pub fn try_map<U, E, F: FnOnce(T) -> Result<U, E>>(self, f: F) -> Result<FieldPatch<U>, E> {
        match self {
            Self::Absent => Ok(FieldPatch::Absent),
            Self::Null => Ok(FieldPatch::Null),
            Self::Value(v) => f(v).map(FieldPatch::Value),
        }
    }

    /// Apply onto a nullable slot. Returns `true` when the slot was touched.
    pub fn apply_optional(self, slot: &mut Option<T>) -> bool {
        match self {
            Self::Absent => false,
            Self::Null => {
                *slot = None;
                true
            }
            Self::Value(v) => {
                *slot = Some(v);
                true
            }
        }
    }

    /// Apply onto a non-nullable slot where `null` resets to `T::default()`.
    pub fn apply_or_default(self, slot: &mut T) -> bool
    where
        T: Default,
    {
        match self {
            Self::Absent => false,
            Self::Null => {
                *slot = T::default();
                true
            }
            Self::Value(v) => {
                *slot = v;
                true
            }
        }
    }

    /// Convert into `Option<Option<T>>` (outer `None` is `Absent`).
    #[allow(clippy::option_option)]
    pub fn into_option(self) -> Option<Option<T>> {
        match self {
            Self::Absent => None,
            Self::Null => Some(None),
            Self::Value(v) => Some(Some(v)),
        }
    }
}

#[allow(clippy::option_option)]
impl<T> From<Option<Option<T>>> for FieldPatch<T> {
    fn from(value: Option<Option<T>>) -> Self {
        match value {
            None => Self::Absent,
            Some(None) => Self::Null,
            Some(Some(v)) => Self::Value(v),
        }
    }
}
