//! Schema validation of single artifact files
//!
//! The schema for a document is picked from its `level` (or from a
//! `documentation_log` wrapper) and resolved through a [`SchemaSource`]; the
//! rules themselves are evaluated by a [`SchemaValidator`]. Violations are
//! tagged with invariant codes and combined with the lineage rules schemas
//! cannot express.
//!
//! Every input problem (unreadable file, unknown type, missing schema) is
//! reported as a single untagged error for that file so a directory run
//! carries on.

mod draft7;
mod rules;
mod source;

pub use draft7::{Draft7Validator, FieldViolation, SchemaValidator};
pub use rules::{map_invariant, semantic_errors, tag_violations, VERSION_MARKER};
pub use source::{load_schema_file, DirectorySchemaSource, SchemaError, SchemaSource};

use cheddar_lineage::record::{artifact_level, is_documentation_log, own_hash};
use cheddar_lineage::{is_placeholder, is_well_formed_hash, ArtifactLevel};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

use crate::loader::{read_document, LoadError};
use crate::report::{FileValidation, ValidationWarning};

/// Schema for documents wrapped in `documentation_log`
pub const DOCUMENTATION_LOG_SCHEMA: &str = "documentation_log.schema.json";

/// Schema file name for an artifact level
pub fn schema_for_level(level: ArtifactLevel) -> &'static str {
    match level {
        ArtifactLevel::Mission => "mission_definition.schema.json",
        ArtifactLevel::FlowInitiative => "flow_initiative.schema.json",
        ArtifactLevel::CheddarTrack => "cheddar_track.schema.json",
        ArtifactLevel::AutomationBrief => "automation_brief.schema.json",
        ArtifactLevel::Personal => "personal_artifact.schema.json",
    }
}

/// Pick the schema for a document, `None` if its type is unrecognized
pub fn detect_schema_name(document: &Value) -> Option<&'static str> {
    if is_documentation_log(document) {
        return Some(DOCUMENTATION_LOG_SCHEMA);
    }
    artifact_level(document)
        .and_then(|level| ArtifactLevel::parse(&level))
        .map(schema_for_level)
}

/// Validates artifact files against their schemas
#[derive(Debug, Clone)]
pub struct ArtifactValidator<S, V = Draft7Validator> {
    source: S,
    validator: V,
}

impl<S: SchemaSource> ArtifactValidator<S> {
    pub fn new(source: S) -> Self {
        Self::with_validator(source, Draft7Validator)
    }
}

impl<S: SchemaSource, V: SchemaValidator> ArtifactValidator<S, V> {
    pub fn with_validator(source: S, validator: V) -> Self {
        Self { source, validator }
    }

    /// Validate one file. `schema_path` overrides type detection.
    pub fn validate_file(&self, path: &Path, schema_path: Option<&Path>) -> FileValidation {
        let file = path.display().to_string();
        debug!(file = %file, "validating artifact");

        match read_document(path) {
            Ok(document) => self.validate_document(&document, &file, schema_path),
            Err(LoadError::Yaml { source, .. }) => {
                FileValidation::input_error(file, "(file)", format!("Invalid YAML: {}", source))
            }
            Err(e) => FileValidation::input_error(file, "(file)", format!("Failed to load file: {}", e)),
        }
    }

    /// Validate every file in order
    pub fn validate_files<P: AsRef<Path>>(&self, paths: &[P], schema_path: Option<&Path>) -> Vec<FileValidation> {
        paths
            .iter()
            .map(|p| self.validate_file(p.as_ref(), schema_path))
            .collect()
    }

    /// Validate an already-decoded document reported under `file`
    pub fn validate_document(&self, document: &Value, file: &str, schema_path: Option<&Path>) -> FileValidation {
        let schema = match schema_path {
            Some(path) => load_schema_file(path),
            None => match detect_schema_name(document) {
                Some(name) => self.source.resolve(name),
                None => {
                    let level = artifact_level(document).unwrap_or_else(|| "(none)".to_string());
                    return FileValidation::input_error(
                        file,
                        "level",
                        format!("Cannot detect artifact type. Unknown level: {}", level),
                    );
                }
            },
        };
        let violations = match schema.and_then(|schema| self.validator.validate(&schema, document)) {
            Ok(violations) => violations,
            Err(e) => {
                return FileValidation::input_error(file, "(schema)", format!("Failed to load schema: {}", e))
            }
        };

        let mut errors = tag_violations(violations);
        errors.extend(semantic_errors(document));

        FileValidation::new(file, errors, hash_warnings(document))
    }
}

fn hash_warnings(document: &Value) -> Vec<ValidationWarning> {
    match own_hash(document) {
        Some(hash) if !hash.is_empty() && !is_placeholder(&hash) && !is_well_formed_hash(&hash) => {
            vec![ValidationWarning {
                field: "lineage.hash".to_string(),
                message: format!("'{}' is not of the form sha256:<64 lowercase hex>", hash),
            }]
        }
        _ => Vec::new(),
    }
}
