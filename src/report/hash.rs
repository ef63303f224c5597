//! Single-file hash command outcome

use serde::{Deserialize, Serialize};
use std::fmt;

use super::exit::ExitCode;

/// What the hash command was asked to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAction {
    Compute,
    Verify,
    Update,
}

impl fmt::Display for HashAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashAction::Compute => write!(f, "compute"),
            HashAction::Verify => write!(f, "verify"),
            HashAction::Update => write!(f, "update"),
        }
    }
}

/// Computed hash for one file next to the stored one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashOutcome {
    pub file: String,
    pub computed_hash: String,
    pub existing_hash: Option<String>,
    /// `None` when there was no stored hash to compare
    #[serde(rename = "match")]
    pub matches: Option<bool>,
    pub action: HashAction,
}

impl HashOutcome {
    pub fn new(
        file: impl Into<String>,
        computed_hash: String,
        existing_hash: Option<String>,
        action: HashAction,
    ) -> Self {
        let existing_hash = existing_hash.filter(|h| !h.is_empty());
        let matches = existing_hash.as_ref().map(|h| *h == computed_hash);
        Self {
            file: file.into(),
            computed_hash,
            existing_hash,
            matches,
            action,
        }
    }

    /// Verification fails on a mismatch or a missing stored hash
    pub fn exit_code(&self) -> ExitCode {
        match self.action {
            HashAction::Verify => ExitCode::from_passed(self.matches == Some(true)),
            HashAction::Compute | HashAction::Update => ExitCode::Success,
        }
    }
}
