//! Stable invariant codes used to tag lint errors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lineage and artifact invariants
///
/// Codes are stable and used for automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Invariant {
    /// Every artifact has a stable, unique id
    #[serde(rename = "INV-001")]
    StableId,
    /// Every artifact id carries a version marker (`<name>_v<number>`)
    #[serde(rename = "INV-002")]
    VersionedId,
    /// Every non-mission artifact references exactly one upstream artifact
    #[serde(rename = "INV-003")]
    UpstreamReference,
    /// Every artifact carries a lineage hash computed from its content
    #[serde(rename = "INV-004")]
    ContentHash,
    /// Every upstream hash matches the current hash of its parent
    #[serde(rename = "INV-005")]
    ChainLink,
    /// Every automation has an identified human owner
    #[serde(rename = "INV-020")]
    HumanOwner,
    /// `cheddar_state` holds a valid state
    #[serde(rename = "INV-040")]
    CheddarState,
}

impl Invariant {
    pub fn code(&self) -> &'static str {
        match self {
            Invariant::StableId => "INV-001",
            Invariant::VersionedId => "INV-002",
            Invariant::UpstreamReference => "INV-003",
            Invariant::ContentHash => "INV-004",
            Invariant::ChainLink => "INV-005",
            Invariant::HumanOwner => "INV-020",
            Invariant::CheddarState => "INV-040",
        }
    }
}

impl fmt::Display for Invariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_code() {
        let json = serde_json::to_string(&Invariant::ChainLink).unwrap();
        assert_eq!(json, "\"INV-005\"");
        let parsed: Invariant = serde_json::from_str("\"INV-040\"").unwrap();
        assert_eq!(parsed, Invariant::CheddarState);
    }

    #[test]
    fn test_display_matches_serde() {
        for inv in [
            Invariant::StableId,
            Invariant::VersionedId,
            Invariant::UpstreamReference,
            Invariant::ContentHash,
            Invariant::ChainLink,
            Invariant::HumanOwner,
            Invariant::CheddarState,
        ] {
            assert_eq!(serde_json::to_value(inv).unwrap(), inv.to_string());
        }
    }
}
