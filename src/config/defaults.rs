//! Built-in lint defaults (layer 1)

use cheddar_lineage::HashScheme;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Resolved lint configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LintConfig {
    /// Directory holding `*.schema.json` documents (default: "schemas")
    pub schema_dir: PathBuf,

    /// Sample artifacts checked by `check --examples` (default: "schemas/examples")
    pub examples_dir: PathBuf,

    /// Canonical form used for lineage hashes (default: "sorted-compact")
    pub hash_scheme: HashScheme,

    /// Descend into subdirectories (default: false)
    pub recursive: bool,

    /// File extensions treated as artifacts (default: yaml, yml)
    pub extensions: Vec<String>,

    /// Glob patterns excluded from directory discovery
    pub exclude: Vec<String>,

    /// Run own-hash checks during `check` (default: false)
    pub verify_hashes_in_check: bool,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            schema_dir: PathBuf::from("schemas"),
            examples_dir: PathBuf::from("schemas/examples"),
            hash_scheme: HashScheme::SortedCompact,
            recursive: false,
            extensions: vec!["yaml".to_string(), "yml".to_string()],
            exclude: Vec::new(),
            verify_hashes_in_check: false,
        }
    }
}

impl LintConfig {
    /// Convert to JSON Value for merging
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "schema_dir": self.schema_dir.to_string_lossy(),
            "examples_dir": self.examples_dir.to_string_lossy(),
            "hash_scheme": self.hash_scheme,
            "recursive": self.recursive,
            "extensions": self.extensions,
            "exclude": self.exclude,
            "verify_hashes_in_check": self.verify_hashes_in_check,
        })
    }

    /// Whether a file extension is one of the configured artifact extensions
    pub fn accepts_extension(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }
}
