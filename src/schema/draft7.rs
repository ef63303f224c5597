//! Draft 7 JSON-Schema evaluation
//!
//! Schemas are compiled with the `jsonschema` crate pinned to Draft 7, with
//! `format` assertions switched on. Each error becomes a [`FieldViolation`]
//! whose path is the dot-joined instance location.

use jsonschema::error::ValidationErrorKind;
use jsonschema::{Draft, ValidationError};
use serde_json::Value;

use super::source::SchemaError;

/// One schema violation at a field path
#[derive(Debug, Clone, PartialEq)]
pub struct FieldViolation {
    /// Dot-joined path (`scope.0.name`), `(root)` for the document itself
    pub path: String,
    pub message: String,
    /// Offending value, when there is one
    pub instance: Option<Value>,
}

/// Evaluates a schema against a decoded document
pub trait SchemaValidator {
    /// Violations of `schema` by `document`; `Err` when the schema itself
    /// cannot be compiled
    fn validate(&self, schema: &Value, document: &Value) -> Result<Vec<FieldViolation>, SchemaError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Draft7Validator;

impl SchemaValidator for Draft7Validator {
    fn validate(&self, schema: &Value, document: &Value) -> Result<Vec<FieldViolation>, SchemaError> {
        let validator = jsonschema::options()
            .with_draft(Draft::Draft7)
            .should_validate_formats(true)
            .build(schema)
            .map_err(|e| SchemaError::Invalid(e.to_string()))?;

        Ok(validator.iter_errors(document).map(to_violation).collect())
    }
}

fn to_violation(error: ValidationError<'_>) -> FieldViolation {
    let mut segments: Vec<String> = error
        .instance_path()
        .iter()
        .map(|segment| segment.to_string())
        .collect();

    // A missing property is reported against the property, not its parent
    let instance = match error.kind() {
        ValidationErrorKind::Required { property } => {
            segments.push(property.as_str().map_or_else(|| property.to_string(), str::to_string));
            None
        }
        _ => Some(error.instance().clone().into_owned()),
    };

    FieldViolation {
        path: join_path(&segments),
        message: error.to_string(),
        instance,
    }
}

fn join_path(segments: &[String]) -> String {
    if segments.is_empty() {
        "(root)".to_string()
    } else {
        segments.join(".")
    }
}
