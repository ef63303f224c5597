//! Invariant tagging for schema violations and the rules schemas cannot express

use cheddar_lineage::record::{artifact_id, artifact_level, parent_reference};
use cheddar_lineage::{ArtifactLevel, Invariant};
use serde_json::Value;

use super::draft7::FieldViolation;
use crate::report::ValidationError;

/// Version marker every id carries (`<name>_v<number>`)
pub const VERSION_MARKER: &str = "_v";

/// Tag a schema violation with the invariant it breaks. First match wins.
pub fn map_invariant(violation: &FieldViolation) -> Option<Invariant> {
    let path = violation.path.as_str();

    if path == "id" || path.contains("id") {
        return Some(Invariant::StableId);
    }
    if violation
        .instance
        .as_ref()
        .and_then(Value::as_str)
        .is_some_and(|s| s.contains(VERSION_MARKER))
    {
        return Some(Invariant::VersionedId);
    }
    if path.contains("supports_upper_layer") {
        return Some(Invariant::UpstreamReference);
    }
    if path.contains("owner") {
        return Some(Invariant::HumanOwner);
    }
    if path.contains("cheddar_state") {
        return Some(Invariant::CheddarState);
    }
    None
}

/// Convert schema violations into tagged validation errors
pub fn tag_violations(violations: Vec<FieldViolation>) -> Vec<ValidationError> {
    violations
        .into_iter()
        .map(|v| ValidationError {
            invariant: map_invariant(&v),
            field: v.path,
            message: v.message,
        })
        .collect()
}

/// Lineage rules checked on top of the schema
pub fn semantic_errors(document: &Value) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Some(id) = artifact_id(document).filter(|id| !id.is_empty()) {
        if !id.contains(VERSION_MARKER) {
            errors.push(ValidationError {
                invariant: Some(Invariant::VersionedId),
                field: "id".to_string(),
                message: format!("ID '{}' missing version suffix (expected '_v<number>')", id),
            });
        }
    }

    let level = artifact_level(document).filter(|l| !l.is_empty());
    let is_mission = level.as_deref() == Some(ArtifactLevel::Mission.as_str());

    if level.is_some() && !is_mission && parent_reference(document).map_or(true, |p| p.is_empty()) {
        errors.push(ValidationError {
            invariant: Some(Invariant::UpstreamReference),
            field: "supports_upper_layer".to_string(),
            message: "Non-mission artifact must reference upstream artifact".to_string(),
        });
    }

    if is_mission {
        let upstream = document
            .get("lineage")
            .and_then(|lineage| lineage.get("upstream_hash"));
        if upstream.is_some_and(|h| !h.is_null()) {
            errors.push(ValidationError {
                invariant: Some(Invariant::UpstreamReference),
                field: "lineage.upstream_hash".to_string(),
                message: "Mission artifact upstream_hash must be null".to_string(),
            });
        }
    }

    errors
}
