//! Lineage chain verification
//!
//! For every artifact in a batch (documentation logs excepted where noted):
//! 1. Own hash: `lineage.hash` present and equal to the recomputed hash (INV-004).
//!    Documentation logs take part in this check only.
//! 2. Upstream reference: missions carry a null `upstream_hash`; everything else
//!    names an existing parent in `supports_upper_layer` (INV-003) and stores
//!    that parent's current hash as `upstream_hash` (INV-005).
//! 3. Cycles: walking `supports_upper_layer` from any artifact never revisits
//!    an id (INV-005).
//!
//! Content problems are returned as data in a [`ChainReport`]; nothing here
//! fails for a malformed artifact. All checks for an artifact run
//! independently, so a hash mismatch does not hide a broken parent link.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

use crate::canonical::HashScheme;
use crate::hash::{compute_hash_with, is_placeholder, is_well_formed_hash};
use crate::index::ChainIndex;
use crate::invariant::Invariant;
use crate::record::{Artifact, ArtifactRecord};

/// Linter name reported with chain results
pub const LINTER_NAME: &str = "verify_lineage";

/// One content error found during verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainError {
    /// Violated invariant; `None` for input problems that map to no rule
    pub invariant: Option<Invariant>,
    /// Artifact id, or `(unknown)`
    pub artifact: String,
    /// Source location of the artifact
    pub file: String,
    pub message: String,
}

impl ChainError {
    fn new(invariant: Invariant, artifact: &Artifact, message: impl Into<String>) -> Self {
        Self {
            invariant: Some(invariant),
            artifact: artifact.display_id().to_string(),
            file: artifact.source().to_string(),
            message: message.into(),
        }
    }

    fn untagged(artifact: &Artifact, message: impl Into<String>) -> Self {
        Self {
            invariant: None,
            artifact: artifact.display_id().to_string(),
            file: artifact.source().to_string(),
            message: message.into(),
        }
    }
}

/// Something worth surfacing that does not fail verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainWarning {
    pub artifact: String,
    pub file: String,
    pub message: String,
}

/// Outcome of verifying one batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainReport {
    pub linter: String,
    pub passed: bool,
    /// Batch size, documentation logs included
    pub artifacts_checked: usize,
    pub errors: Vec<ChainError>,
    pub warnings: Vec<ChainWarning>,
}

impl ChainReport {
    pub fn new(artifacts_checked: usize, errors: Vec<ChainError>, warnings: Vec<ChainWarning>) -> Self {
        Self {
            linter: LINTER_NAME.to_string(),
            passed: errors.is_empty(),
            artifacts_checked,
            errors,
            warnings,
        }
    }

    /// Errors tagged with the given invariant
    pub fn errors_for(&self, invariant: Invariant) -> impl Iterator<Item = &ChainError> {
        self.errors
            .iter()
            .filter(move |e| e.invariant == Some(invariant))
    }
}

/// Knobs for a verification run
#[derive(Debug, Clone, Copy, Default)]
pub struct VerifyOptions {
    /// Skip the own-hash check (batch holds placeholder hashes)
    pub skip_hash_verify: bool,
    /// Canonical form used when recomputing hashes
    pub scheme: HashScheme,
}

/// Verify the integrity of a whole batch.
///
/// Errors are listed per artifact in input order (own hash, then upstream
/// reference), followed by cycle errors.
pub fn verify_chain(artifacts: &[Artifact], options: &VerifyOptions) -> ChainReport {
    let index = ChainIndex::build(artifacts);
    debug!(indexed = index.len(), "built chain index");
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for dup in index.duplicates() {
        warnings.push(ChainWarning {
            artifact: dup.id.to_string(),
            file: dup.kept.to_string(),
            message: format!(
                "Duplicate artifact id; {} replaced by {}",
                dup.replaced, dup.kept
            ),
        });
    }

    for artifact in artifacts {
        debug!(artifact = artifact.display_id(), file = artifact.source(), "verifying artifact");

        if !options.skip_hash_verify {
            errors.extend(verify_artifact_hash(artifact, options.scheme));
            warnings.extend(hash_format_warning(artifact));
        }

        if artifact.is_documentation_log() {
            continue;
        }
        errors.extend(verify_upstream_reference(artifact, &index));
    }

    errors.extend(detect_cycles(artifacts, &index));

    debug!(
        artifacts = artifacts.len(),
        errors = errors.len(),
        warnings = warnings.len(),
        "chain verification finished"
    );
    ChainReport::new(artifacts.len(), errors, warnings)
}

/// Own-hash check for a single artifact (INV-004)
pub fn verify_artifact_hash(artifact: &Artifact, scheme: HashScheme) -> Vec<ChainError> {
    let Some(stored) = artifact.own_hash().filter(|h| !h.is_empty()) else {
        return vec![ChainError::new(
            Invariant::ContentHash,
            artifact,
            "Missing lineage.hash field",
        )];
    };

    if is_placeholder(stored) {
        return Vec::new();
    }

    match compute_hash_with(artifact.content(), scheme) {
        Ok(computed) if computed == stored => Vec::new(),
        Ok(computed) => vec![ChainError::new(
            Invariant::ContentHash,
            artifact,
            format!("Hash mismatch: stored={}, computed={}", stored, computed),
        )],
        Err(e) => vec![ChainError::untagged(
            artifact,
            format!("Failed to compute hash: {}", e),
        )],
    }
}

fn hash_format_warning(artifact: &Artifact) -> Option<ChainWarning> {
    let stored = artifact.own_hash().filter(|h| !h.is_empty())?;
    if is_placeholder(stored) || is_well_formed_hash(stored) {
        return None;
    }
    Some(ChainWarning {
        artifact: artifact.display_id().to_string(),
        file: artifact.source().to_string(),
        message: format!(
            "lineage.hash '{}' is not of the form sha256:<64 lowercase hex>",
            stored
        ),
    })
}

/// Upstream-reference check for a single artifact (INV-003, INV-005)
pub fn verify_upstream_reference(artifact: &Artifact, index: &ChainIndex<'_>) -> Vec<ChainError> {
    let ArtifactRecord::Standard(record) = artifact.record() else {
        return Vec::new();
    };
    let upstream_hash = record.lineage.upstream_hash.as_deref();

    if record.is_mission() {
        if upstream_hash.is_some() {
            return vec![ChainError::new(
                Invariant::UpstreamReference,
                artifact,
                "Mission artifact must have null upstream_hash",
            )];
        }
        return Vec::new();
    }

    let Some(parent_id) = record
        .supports_upper_layer
        .as_deref()
        .filter(|p| !p.is_empty())
    else {
        return vec![ChainError::new(
            Invariant::UpstreamReference,
            artifact,
            "Non-mission artifact missing supports_upper_layer",
        )];
    };

    let Some(parent) = index.get(parent_id) else {
        return vec![ChainError::new(
            Invariant::ChainLink,
            artifact,
            format!("Parent artifact not found: {}", parent_id),
        )];
    };

    let Some(upstream_hash) = upstream_hash.filter(|h| !h.is_empty()) else {
        return vec![ChainError::new(
            Invariant::ChainLink,
            artifact,
            "Missing upstream_hash in lineage",
        )];
    };

    let Some(parent_hash) = parent.own_hash().filter(|h| !h.is_empty()) else {
        return Vec::new();
    };
    if is_placeholder(upstream_hash) || is_placeholder(parent_hash) {
        return Vec::new();
    }
    if upstream_hash != parent_hash {
        return vec![ChainError::new(
            Invariant::ChainLink,
            artifact,
            format!(
                "upstream_hash mismatch: stored={}, parent={}",
                upstream_hash, parent_hash
            ),
        )];
    }
    Vec::new()
}

/// Walk `supports_upper_layer` from every identified artifact and report
/// walks that revisit an id.
///
/// Each walk visits at most one node per distinct indexed id before it either
/// leaves the index or repeats, so it always terminates.
pub fn detect_cycles(artifacts: &[Artifact], index: &ChainIndex<'_>) -> Vec<ChainError> {
    let mut errors = Vec::new();

    for artifact in artifacts {
        if artifact.is_documentation_log() {
            continue;
        }
        let Some(start) = artifact.id().filter(|id| !id.is_empty()) else {
            continue;
        };

        let mut visited: HashSet<&str> = HashSet::new();
        let mut current = Some(start);

        while let Some(current_id) = current {
            if !visited.insert(current_id) {
                errors.push(ChainError::new(
                    Invariant::ChainLink,
                    artifact,
                    format!("Circular reference detected involving: {}", current_id),
                ));
                break;
            }
            // Missing parents were already reported by the upstream check
            current = index
                .get(current_id)
                .and_then(Artifact::parent_ref)
                .filter(|p| !p.is_empty());
        }
    }

    errors
}
