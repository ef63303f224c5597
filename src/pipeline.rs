//! Lint orchestration
//!
//! Ties the loader, schema validation and chain verification together for
//! the four commands:
//! - hash: compute, verify or update one file's lineage hash
//! - validate: schema-check files and directories
//! - verify: verify the lineage chain across a batch
//! - check: both, merged into one report
//!
//! Content problems come back inside the reports. `LintError` is reserved
//! for conditions that stop a command (missing paths, bad config, no schema
//! directory) and carries the exit code for each.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use cheddar_lineage::record::own_hash;
use cheddar_lineage::{compute_hash_with, set_hash, verify_chain, HashError, VerifyOptions};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{ConfigError, LintConfig};
use crate::loader::{
    load_artifacts, read_document, write_document, Discovery, ExcludeError, LoadError, LoadFailure,
};
use crate::report::{
    ChainError, ChainReport, CombinedReport, ExitCode, FileValidation, HashAction, HashOutcome,
};
use crate::schema::{ArtifactValidator, DirectorySchemaSource, SchemaError};

/// Errors that stop a lint command
#[derive(Debug, Error)]
pub enum LintError {
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Not a file: {0}")]
    NotAFile(PathBuf),

    #[error("Specify paths or use --examples")]
    NoPaths,

    #[error("Examples directory not found: {0}")]
    ExamplesNotFound(PathBuf),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid exclude pattern: {0}")]
    Exclude(#[from] ExcludeError),

    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("{0}")]
    Load(#[from] LoadError),

    #[error("hash error: {0}")]
    Hash(#[from] HashError),

    #[error("serialization error: {0}")]
    Output(#[from] serde_json::Error),
}

impl LintError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            LintError::PathNotFound(_)
            | LintError::NotAFile(_)
            | LintError::NoPaths
            | LintError::ExamplesNotFound(_)
            | LintError::Exclude(_) => ExitCode::Usage,
            LintError::Config(ConfigError::NotFound(_)) => ExitCode::Usage,
            LintError::Config(_) => ExitCode::Internal,
            LintError::Load(LoadError::Yaml { .. } | LoadError::NotAMapping { .. }) => ExitCode::Usage,
            LintError::Load(_) => ExitCode::Internal,
            LintError::Schema(_) | LintError::Hash(_) | LintError::Output(_) => ExitCode::Internal,
        }
    }
}

/// Result type for lint operations
pub type LintResult<T> = Result<T, LintError>;

/// Runs lint commands under one resolved configuration
#[derive(Debug, Clone)]
pub struct Linter {
    config: LintConfig,
}

impl Linter {
    pub fn new(config: LintConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LintConfig {
        &self.config
    }

    /// Compute a file's hash and compare, verify or write it back
    pub fn hash_file(&self, path: &Path, action: HashAction) -> LintResult<HashOutcome> {
        if !path.exists() {
            return Err(LintError::PathNotFound(path.to_path_buf()));
        }
        if !path.is_file() {
            return Err(LintError::NotAFile(path.to_path_buf()));
        }

        let document = read_document(path)?;
        let computed = compute_hash_with(&document, self.config.hash_scheme)?;
        let existing = own_hash(&document);
        debug!(file = %path.display(), %computed, ?existing, %action, "hashed artifact");

        if action == HashAction::Update {
            write_document(path, &set_hash(&document, &computed))?;
            info!(file = %path.display(), hash = %computed, "updated lineage hash");
        }

        Ok(HashOutcome::new(path.display().to_string(), computed, existing, action))
    }

    /// Schema-validate files and directories.
    ///
    /// Explicitly named files are validated whatever their extension;
    /// directories contribute their discovered artifact files. An explicit
    /// `schema` applies to every file.
    pub fn validate_paths(&self, paths: &[PathBuf], schema: Option<&Path>) -> LintResult<Vec<FileValidation>> {
        require_existing(paths)?;
        let discovery = Discovery::new(&self.config, self.config.recursive)?;

        let mut files = Vec::new();
        let mut results = Vec::new();
        for path in paths {
            if path.is_file() {
                files.push(path.clone());
                continue;
            }
            let (candidates, failures) = discovery.discover(std::slice::from_ref(path));
            files.extend(candidates.into_iter().map(|c| c.path));
            results.extend(failures.iter().map(failure_to_validation));
        }

        info!(files = files.len(), "validating artifacts");
        if files.is_empty() {
            return Ok(results);
        }

        let validated = match schema {
            // Detection is bypassed, so no schema directory is needed
            Some(schema) => ArtifactValidator::new(HashMap::<String, Value>::new())
                .validate_files(files.as_slice(), Some(schema)),
            None => ArtifactValidator::new(DirectorySchemaSource::open(&self.config.schema_dir)?)
                .validate_files(files.as_slice(), None),
        };
        results.extend(validated);
        Ok(results)
    }

    /// Verify the lineage chain across every artifact found under `paths`.
    ///
    /// Files that cannot be loaded are reported as untagged errors and the
    /// rest of the batch is still verified.
    pub fn verify_paths(&self, paths: &[PathBuf], skip_hash_verify: bool) -> LintResult<ChainReport> {
        require_existing(paths)?;
        let discovery = Discovery::new(&self.config, self.config.recursive)?;

        let (candidates, mut failures) = discovery.discover(paths);
        let batch = load_artifacts(&candidates);
        failures.extend(batch.failures);

        info!(
            artifacts = batch.artifacts.len(),
            failures = failures.len(),
            skip_hash_verify,
            "verifying lineage chain"
        );
        let options = VerifyOptions {
            skip_hash_verify,
            scheme: self.config.hash_scheme,
        };
        let report = verify_chain(&batch.artifacts, &options);

        if failures.is_empty() {
            return Ok(report);
        }
        let mut errors: Vec<ChainError> = failures.iter().map(failure_to_chain_error).collect();
        errors.extend(report.errors);
        Ok(ChainReport::new(report.artifacts_checked, errors, report.warnings))
    }

    /// Schema validation followed by chain verification.
    ///
    /// The chain pass skips own-hash checks unless `verify_hashes_in_check`
    /// is set.
    pub fn check_paths(&self, paths: &[PathBuf], skip_chain: bool) -> LintResult<CombinedReport> {
        let validation = self.validate_paths(paths, None)?;
        let chain = if skip_chain {
            None
        } else {
            Some(self.verify_paths(paths, !self.config.verify_hashes_in_check)?)
        };
        Ok(CombinedReport::combine(Some(validation), chain))
    }

    /// The configured sample-artifact directory
    pub fn examples_dir(&self) -> LintResult<PathBuf> {
        let dir = &self.config.examples_dir;
        if !dir.is_dir() {
            return Err(LintError::ExamplesNotFound(dir.clone()));
        }
        Ok(dir.clone())
    }
}

fn require_existing(paths: &[PathBuf]) -> LintResult<()> {
    match paths.iter().find(|p| !p.exists()) {
        Some(missing) => Err(LintError::PathNotFound(missing.clone())),
        None => Ok(()),
    }
}

fn failure_to_validation(failure: &LoadFailure) -> FileValidation {
    FileValidation::input_error(
        failure.path.display().to_string(),
        "(file)",
        format!("Failed to load file: {}", failure),
    )
}

fn failure_to_chain_error(failure: &LoadFailure) -> ChainError {
    ChainError {
        invariant: None,
        artifact: "(unknown)".to_string(),
        file: failure.path.display().to_string(),
        message: format!("Failed to load artifact: {}", failure),
    }
}
