//! Artifact discovery, decoding and write-back
//!
//! Paths given on the command line are expanded into candidate files,
//! decoded from YAML into generic trees and wrapped as [`Artifact`]s. A file
//! that cannot be loaded becomes a [`LoadFailure`]; loading carries on with
//! the rest of the batch.

mod exclude;

pub use exclude::{ExcludeError, ExcludeRules};

use cheddar_lineage::Artifact;
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::LintConfig;

/// Errors for loading and writing artifact files
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{path}: top level is not a mapping")]
    NotAMapping { path: PathBuf },

    #[error("Failed to serialize {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// A file that could not be turned into an artifact
#[derive(Debug)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub error: LoadError,
}

impl fmt::Display for LoadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

/// A file selected for linting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    /// Named directly rather than found in a directory
    pub explicit: bool,
}

impl Candidate {
    /// Source location string carried by loaded artifacts
    pub fn source(&self) -> String {
        self.path.display().to_string()
    }
}

/// Expands paths into candidate artifact files
#[derive(Debug)]
pub struct Discovery<'a> {
    config: &'a LintConfig,
    recursive: bool,
    exclude: ExcludeRules,
}

impl<'a> Discovery<'a> {
    pub fn new(config: &'a LintConfig, recursive: bool) -> Result<Self, ExcludeError> {
        Ok(Self {
            config,
            recursive,
            exclude: ExcludeRules::new(&config.exclude)?,
        })
    }

    /// Expand files and directories into candidates.
    ///
    /// Directory entries come back sorted by file name; hidden files and
    /// excluded paths are skipped.
    pub fn discover(&self, paths: &[PathBuf]) -> (Vec<Candidate>, Vec<LoadFailure>) {
        let mut candidates = Vec::new();
        let mut failures = Vec::new();

        for path in paths {
            if path.is_file() {
                if self.has_artifact_extension(path) {
                    candidates.push(Candidate {
                        path: path.clone(),
                        explicit: true,
                    });
                } else {
                    warn!(path = %path.display(), "skipping file without an artifact extension");
                }
            } else if path.is_dir() {
                self.scan_directory(path, &mut candidates, &mut failures);
            } else {
                warn!(path = %path.display(), "skipping path that is neither file nor directory");
            }
        }

        debug!(candidates = candidates.len(), failures = failures.len(), "discovery finished");
        (candidates, failures)
    }

    fn scan_directory(&self, dir: &Path, candidates: &mut Vec<Candidate>, failures: &mut Vec<LoadFailure>) {
        let max_depth = if self.recursive { usize::MAX } else { 1 };
        let walker = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(max_depth)
            .follow_links(false)
            .sort_by(|a, b| a.file_name().cmp(b.file_name()));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf());
                    warn!(path = %path.display(), error = %e, "directory walk error");
                    failures.push(LoadFailure {
                        path,
                        error: LoadError::Walk(e),
                    });
                    continue;
                }
            };

            if !entry.file_type().is_file() || is_hidden(entry.path()) {
                continue;
            }
            if !self.has_artifact_extension(entry.path()) {
                continue;
            }
            let relative = entry.path().strip_prefix(dir).unwrap_or(entry.path());
            if self.exclude.is_excluded(relative) {
                debug!(path = %entry.path().display(), "excluded");
                continue;
            }

            candidates.push(Candidate {
                path: entry.into_path(),
                explicit: false,
            });
        }
    }

    fn has_artifact_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| self.config.accepts_extension(e))
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

/// Read and decode one YAML document whose top level is a mapping
pub fn read_document(path: &Path) -> Result<Value, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let content: Value = serde_yaml::from_str(&text).map_err(|source| LoadError::Yaml {
        path: path.to_path_buf(),
        source,
    })?;
    if !content.is_object() {
        return Err(LoadError::NotAMapping {
            path: path.to_path_buf(),
        });
    }
    Ok(content)
}

/// Write a document back as YAML, keeping key order
pub fn write_document(path: &Path, content: &Value) -> Result<(), LoadError> {
    let text = serde_yaml::to_string(content).map_err(|source| LoadError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, text).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Artifacts loaded for one chain verification run
#[derive(Debug, Default)]
pub struct ArtifactBatch {
    pub artifacts: Vec<Artifact>,
    pub failures: Vec<LoadFailure>,
}

/// Load candidates as artifacts.
///
/// Directory-discovered documents with neither `level` nor
/// `documentation_log` are not artifacts and are skipped; explicitly named
/// files are always kept.
pub fn load_artifacts(candidates: &[Candidate]) -> ArtifactBatch {
    let mut batch = ArtifactBatch::default();

    for candidate in candidates {
        match read_document(&candidate.path) {
            Ok(content) => {
                if !candidate.explicit && !looks_like_artifact(&content) {
                    debug!(path = %candidate.path.display(), "not an artifact, skipping");
                    continue;
                }
                batch.artifacts.push(Artifact::new(content, candidate.source()));
            }
            Err(error) => {
                warn!(path = %candidate.path.display(), error = %error, "failed to load artifact");
                batch.failures.push(LoadFailure {
                    path: candidate.path.clone(),
                    error,
                });
            }
        }
    }

    batch
}

fn looks_like_artifact(content: &Value) -> bool {
    let truthy = |key: &str| match content.get(key) {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Object(m)) => !m.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(_) => true,
    };
    truthy("level") || truthy("documentation_log")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, body: &str) -> PathBuf {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_discover_top_level_only() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "b_mission.yaml", "id: b_v1\nlevel: mission\n");
        write(dir.path(), "a_track.yml", "id: a_v1\nlevel: cheddar_track\n");
        write(dir.path(), "notes.md", "# notes\n");
        write(dir.path(), ".hidden.yaml", "id: h_v1\n");
        write(dir.path(), "nested/deep.yaml", "id: d_v1\n");

        let config = LintConfig::default();
        let discovery = Discovery::new(&config, false).unwrap();
        let (candidates, failures) = discovery.discover(&[dir.path().to_path_buf()]);

        assert!(failures.is_empty());
        let names: Vec<_> = candidates
            .iter()
            .map(|c| c.path.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a_track.yml", "b_mission.yaml"]);
        assert!(candidates.iter().all(|c| !c.explicit));
    }

    #[test]
    fn test_discover_recursive_with_exclude() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "mission.yaml", "id: m_v1\n");
        write(dir.path(), "tracks/checkout.yaml", "id: t_v1\n");
        write(dir.path(), "drafts/wip.yaml", "id: w_v1\n");

        let config = LintConfig {
            exclude: vec!["drafts/**".to_string()],
            ..LintConfig::default()
        };
        let discovery = Discovery::new(&config, true).unwrap();
        let (candidates, _) = discovery.discover(&[dir.path().to_path_buf()]);

        let found: Vec<_> = candidates
            .iter()
            .map(|c| c.path.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert!(found.contains(&PathBuf::from("mission.yaml")));
        assert!(found.contains(&PathBuf::from("tracks/checkout.yaml")));
        assert!(!found.contains(&PathBuf::from("drafts/wip.yaml")));
    }

    #[test]
    fn test_explicit_file_is_candidate() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "one.yaml", "id: x_v1\n");
        let config = LintConfig::default();
        let discovery = Discovery::new(&config, false).unwrap();
        let (candidates, _) = discovery.discover(&[path.clone()]);

        assert_eq!(candidates, vec![Candidate { path, explicit: true }]);
    }

    #[test]
    fn test_read_document_rejects_non_mapping() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "list.yaml", "- a\n- b\n");
        assert!(matches!(read_document(&path), Err(LoadError::NotAMapping { .. })));
    }

    #[test]
    fn test_read_document_invalid_yaml() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "bad.yaml", "id: [unclosed\n");
        assert!(matches!(read_document(&path), Err(LoadError::Yaml { .. })));
    }

    #[test]
    fn test_load_artifacts_filters_non_artifacts_from_directories() {
        let dir = TempDir::new().unwrap();
        let config_file = write(dir.path(), "settings.yaml", "colour: blue\n");
        let mission = write(dir.path(), "mission.yaml", "id: m_v1\nlevel: mission\n");
        let broken = write(dir.path(), "broken.yaml", "id: [\n");

        let candidates = vec![
            Candidate { path: config_file.clone(), explicit: false },
            Candidate { path: mission, explicit: false },
            Candidate { path: broken, explicit: false },
            Candidate { path: config_file, explicit: true },
        ];
        let batch = load_artifacts(&candidates);

        assert_eq!(batch.artifacts.len(), 2);
        assert_eq!(batch.artifacts[0].id(), Some("m_v1"));
        assert_eq!(batch.artifacts[1].id(), None);
        assert_eq!(batch.failures.len(), 1);
    }

    #[test]
    fn test_write_document_preserves_key_order() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "a.yaml", "zeta: 1\nalpha: 2\nlineage:\n  upstream_hash: null\n");

        let content = read_document(&path).unwrap();
        write_document(&path, &content).unwrap();
        let text = fs::read_to_string(&path).unwrap();

        let zeta = text.find("zeta").unwrap();
        let alpha = text.find("alpha").unwrap();
        assert!(zeta < alpha);
        assert_eq!(read_document(&path).unwrap(), content);
    }
}
