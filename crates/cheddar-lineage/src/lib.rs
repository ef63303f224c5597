//! Cheddar lineage core
//!
//! Canonical content hashing, lineage field extraction and chain
//! verification for Cheddar artifacts. Inputs are already-decoded generic
//! trees (`serde_json::Value`); file handling lives with the callers.

pub mod canonical;
pub mod hash;
pub mod index;
pub mod invariant;
pub mod record;
pub mod verify;

pub use canonical::HashScheme;
pub use hash::{
    compute_hash, compute_hash_with, is_placeholder, is_well_formed_hash, set_hash, HashError,
    HASH_PREFIX, PLACEHOLDER_MARKER,
};
pub use index::ChainIndex;
pub use invariant::Invariant;
pub use record::{Artifact, ArtifactLevel, ArtifactRecord, DocumentationLog, LineageBlock, StandardArtifact};
pub use verify::{verify_chain, ChainError, ChainReport, ChainWarning, VerifyOptions};
