//! Exclusion rules for artifact discovery

use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::Path;

/// Patterns never scanned for artifacts
const DEFAULT_EXCLUDES: &[&str] = &[".git", ".git/**", "**/.git", "**/.git/**"];

/// Errors for exclusion rules
#[derive(Debug, thiserror::Error)]
pub enum ExcludeError {
    #[error("Invalid exclude pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Glob set error: {0}")]
    Build(#[from] globset::Error),
}

/// Glob-based filter applied to paths relative to a scanned directory
#[derive(Debug)]
pub struct ExcludeRules {
    glob_set: GlobSet,
}

impl ExcludeRules {
    /// Default rules plus the given patterns
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, ExcludeError> {
        let mut builder = GlobSetBuilder::new();

        let extra: Vec<&str> = patterns
            .iter()
            .map(|p| p.as_ref())
            .filter(|p| !p.is_empty())
            .collect();
        for pattern in DEFAULT_EXCLUDES.iter().copied().chain(extra) {
            let glob = Glob::new(pattern).map_err(|source| ExcludeError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;
            builder.add(glob);
        }

        Ok(Self {
            glob_set: builder.build()?,
        })
    }

    /// Check if a relative path should be skipped
    pub fn is_excluded(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        self.glob_set.is_match(path_str.as_ref())
    }
}
