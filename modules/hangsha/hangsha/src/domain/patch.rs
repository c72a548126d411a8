//! Schema-driven decoding of PATCH payloads into tri-state field values.
//!
//! Each resource declares a [`PatchSchema`] listing its recognised fields and
//! their policy. [`PatchDecoder::decode`] sorts every declared field into
//! absent / null / value, rejects nulls on non-nullable fields and rejects
//! payloads that mention none of the fields. Typed extraction then happens
//! per field through [`PatchRequest::take`].

use std::collections::HashMap;

use hangsha_sdk::FieldPatch;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::DomainError;

/// How a field reacts to each tri-state variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldPolicy {
    /// `null` clears the field.
    PlainOptional,
    /// `null` is rejected.
    NonNullable,
    /// The value replaces an owned collection; `null` empties it.
    CollectionReplace,
}

#[derive(Debug)]
pub struct FieldSpec {
    pub name: &'static str,
    /// Human-readable type used in decode errors.
    pub expected: &'static str,
    pub policy: FieldPolicy,
}

impl FieldSpec {
    #[must_use]
    pub const fn new(name: &'static str, expected: &'static str, policy: FieldPolicy) -> Self {
        Self {
            name,
            expected,
            policy,
        }
    }
}

#[derive(Debug)]
pub struct PatchSchema {
    pub resource: &'static str,
    pub fields: &'static [FieldSpec],
}

impl PatchSchema {
    #[must_use]
    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name).collect()
    }
}

/// Presence information for every field of one schema.
#[derive(Debug)]
pub struct PatchRequest {
    schema: &'static PatchSchema,
    values: HashMap<&'static str, FieldPatch<Value>>,
}

impl PatchRequest {
    #[must_use]
    pub fn schema(&self) -> &'static PatchSchema {
        self.schema
    }

    /// Raw state of a field. Unknown names read as absent.
    #[must_use]
    pub fn raw(&self, name: &str) -> &FieldPatch<Value> {
        static ABSENT: FieldPatch<Value> = FieldPatch::Absent;
        self.values.get(name).unwrap_or(&ABSENT)
    }

    /// Remove a field and decode its value into `T`.
    pub fn take<T: DeserializeOwned>(&mut self, name: &str) -> Result<FieldPatch<T>, DomainError> {
        let Some(spec) = self.schema.fields.iter().find(|f| f.name == name) else {
            return Ok(FieldPatch::Absent);
        };
        let raw = self.values.remove(name).unwrap_or_default();
        raw.try_map(|value| {
            serde_json::from_value::<T>(value).map_err(|e| {
                DomainError::invalid(spec.name, format!("expected {}: {e}", spec.expected))
            })
        })
    }
}

pub struct PatchDecoder;

impl PatchDecoder {
    /// Classify every declared field of `schema` found in `payload`.
    ///
    /// Keys not declared in the schema are ignored.
    pub fn decode(
        schema: &'static PatchSchema,
        payload: &Value,
    ) -> Result<PatchRequest, DomainError> {
        let Value::Object(object) = payload else {
            return Err(DomainError::invalid("body", "expected a JSON object"));
        };

        let mut values = HashMap::with_capacity(schema.fields.len());
        for spec in schema.fields {
            let state = match object.get(spec.name) {
                None => FieldPatch::Absent,
                Some(Value::Null) => {
                    if spec.policy == FieldPolicy::NonNullable {
                        return Err(DomainError::cannot_be_null(spec.name));
                    }
                    FieldPatch::Null
                }
                Some(value) => FieldPatch::Value(value.clone()),
            };
            values.insert(spec.name, state);
        }

        if values.values().all(FieldPatch::is_absent) {
            return Err(DomainError::empty_patch(&schema.field_names()));
        }

        Ok(PatchRequest { schema, values })
    }
}
