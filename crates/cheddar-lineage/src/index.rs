//! Identifier → artifact lookup for one verification batch

use std::collections::HashMap;

use crate::record::Artifact;

/// Read-only index over a batch of artifacts, built once before verification.
///
/// Artifacts without an id and documentation logs are not indexed, so neither
/// can serve as a parent. A later artifact with an id that
/// was already seen replaces the earlier one; each replacement is recorded in
/// [`ChainIndex::duplicates`].
#[derive(Debug, Default)]
pub struct ChainIndex<'a> {
    by_id: HashMap<&'a str, &'a Artifact>,
    duplicates: Vec<DuplicateId<'a>>,
}

/// An id that appeared more than once in a batch
#[derive(Debug, Clone, Copy)]
pub struct DuplicateId<'a> {
    pub id: &'a str,
    /// Source of the artifact that was replaced
    pub replaced: &'a str,
    /// Source of the artifact now held in the index
    pub kept: &'a str,
}

impl<'a> ChainIndex<'a> {
    pub fn build(artifacts: &'a [Artifact]) -> Self {
        let mut index = Self::default();
        for artifact in artifacts.iter().filter(|a| !a.is_documentation_log()) {
            let Some(id) = artifact.id().filter(|id| !id.is_empty()) else {
                continue;
            };
            if let Some(previous) = index.by_id.insert(id, artifact) {
                index.duplicates.push(DuplicateId {
                    id,
                    replaced: previous.source(),
                    kept: artifact.source(),
                });
            }
        }
        index
    }

    pub fn get(&self, id: &str) -> Option<&'a Artifact> {
        self.by_id.get(id).copied()
    }

    /// Number of indexed ids
    pub(crate) fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn duplicates(&self) -> &[DuplicateId<'a>] {
        &self.duplicates
    }
}
