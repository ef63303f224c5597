//! Per-file schema validation results

use cheddar_lineage::Invariant;
use serde::{Deserialize, Serialize};

/// Linter name reported with schema validation results
pub const VALIDATE_LINTER: &str = "validate_artifact";

/// One field-level validation error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Violated invariant; `None` for input problems and untagged schema rules
    pub invariant: Option<Invariant>,
    pub field: String,
    pub message: String,
}

/// A finding that does not fail validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
}

/// Validation outcome for one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileValidation {
    pub linter: String,
    pub file: String,
    pub passed: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl FileValidation {
    pub fn new(
        file: impl Into<String>,
        errors: Vec<ValidationError>,
        warnings: Vec<ValidationWarning>,
    ) -> Self {
        Self {
            linter: VALIDATE_LINTER.to_string(),
            file: file.into(),
            passed: errors.is_empty(),
            errors,
            warnings,
        }
    }

    /// Result for a file that could not be validated at all
    pub fn input_error(file: impl Into<String>, field: &str, message: impl Into<String>) -> Self {
        Self::new(
            file,
            vec![ValidationError {
                invariant: None,
                field: field.to_string(),
                message: message.into(),
            }],
            Vec::new(),
        )
    }
}
