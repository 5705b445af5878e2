//! Payload validation for triggers.
//!
//! The engine does not parse schemas itself. It consumes anything that
//! implements [`SchemaValidator`], and forwards the *validated* value (which
//! may differ from the raw payload when the validator coerces) into the step
//! pipeline.

use crate::error::SchemaError;
use serde_json::Value as JsonValue;
use std::fmt;

/// Result of validating one payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Validation {
    /// The payload is acceptable; carries the canonical value.
    Valid(JsonValue),
    /// The payload was rejected; carries a human-readable detail.
    Invalid(String),
}

impl Validation {
    /// Converts into a `Result`, with the rejection detail as the error.
    pub fn into_result(self) -> Result<JsonValue, String> {
        match self {
            Self::Valid(value) => Ok(value),
            Self::Invalid(detail) => Err(detail),
        }
    }
}

/// A payload validator bound to a trigger.
pub trait SchemaValidator: Send + Sync {
    /// Validates `value`, returning the canonical value on success.
    fn validate(&self, value: &JsonValue) -> Validation;
}

/// Validator backed by a compiled JSON Schema document.
pub struct JsonSchemaValidator {
    document: JsonValue,
    validator: jsonschema::Validator,
}

impl JsonSchemaValidator {
    /// Compiles `document`.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::InvalidSchema` if the document is not a valid
    /// JSON Schema.
    pub fn new(document: JsonValue) -> hookflow_core::Result<Self, SchemaError> {
        let validator =
            jsonschema::validator_for(&document).map_err(|e| SchemaError::InvalidSchema {
                reason: e.to_string(),
            })?;
        Ok(Self {
            document,
            validator,
        })
    }

    /// Returns the source schema document.
    #[must_use]
    pub fn document(&self) -> &JsonValue {
        &self.document
    }
}

impl SchemaValidator for JsonSchemaValidator {
    fn validate(&self, value: &JsonValue) -> Validation {
        let errors: Vec<String> = self
            .validator
            .iter_errors(value)
            .map(|e| {
                let path = e.instance_path.to_string();
                if path.is_empty() {
                    e.to_string()
                } else {
                    format!("{path}: {e}")
                }
            })
            .collect();

        if errors.is_empty() {
            Validation::Valid(value.clone())
        } else {
            Validation::Invalid(errors.join("; "))
        }
    }
}

impl fmt::Debug for JsonSchemaValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonSchemaValidator")
            .field("document", &self.document)
            .finish_non_exhaustive()
    }
}

/// Validator built from a closure. Useful when validation also coerces.
pub struct FnValidator<F>(F);

impl<F> FnValidator<F>
where
    F: Fn(&JsonValue) -> Validation + Send + Sync,
{
    /// Wraps `f`.
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> SchemaValidator for FnValidator<F>
where
    F: Fn(&JsonValue) -> Validation + Send + Sync,
{
    fn validate(&self, value: &JsonValue) -> Validation {
        (self.0)(value)
    }
}

/// Accepts every payload unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl SchemaValidator for AcceptAll {
    fn validate(&self, value: &JsonValue) -> Validation {
        Validation::Valid(value.clone())
    }
}
