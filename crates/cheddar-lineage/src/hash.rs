//! Canonical lineage hash (INV-004)
//!
//! The hash of an artifact is `sha256:` + hex SHA-256 over the canonical
//! form of the artifact with its own `lineage.hash` removed. For
//! documentation logs the nested `documentation_log.lineage.hash` is removed
//! as well.

use regex_lite::Regex;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::sync::OnceLock;

use crate::canonical::{to_canonical_vec, HashScheme};

/// Prefix of every lineage hash string
pub const HASH_PREFIX: &str = "sha256:";

/// Suffix marking a stored hash as illustrative sample data
pub const PLACEHOLDER_MARKER: &str = "...";

pub(crate) const LINEAGE_KEY: &str = "lineage";
pub(crate) const HASH_KEY: &str = "hash";
pub(crate) const DOCUMENTATION_LOG_KEY: &str = "documentation_log";

/// Errors for hash computation
#[derive(Debug, thiserror::Error)]
pub enum HashError {
    #[error("Canonicalization error: {0}")]
    Canonicalize(String),
}

/// Compute the lineage hash with the default scheme
pub fn compute_hash(content: &Value) -> Result<String, HashError> {
    compute_hash_with(content, HashScheme::default())
}

/// Compute the lineage hash of an artifact tree.
///
/// The input is never modified; the exclusion works on a private copy.
pub fn compute_hash_with(content: &Value, scheme: HashScheme) -> Result<String, HashError> {
    let stripped = strip_own_hash(content);
    let canonical = to_canonical_vec(&stripped, scheme)?;
    Ok(digest_bytes(&canonical))
}

/// `sha256:<hex>` over raw bytes
pub fn digest_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{}{}", HASH_PREFIX, hex::encode(hasher.finalize()))
}

/// Copy of `content` without its own hash field(s)
pub fn strip_own_hash(content: &Value) -> Value {
    let mut copy = content.clone();
    if let Some(root) = copy.as_object_mut() {
        remove_lineage_hash(root);
        if let Some(log) = root
            .get_mut(DOCUMENTATION_LOG_KEY)
            .and_then(Value::as_object_mut)
        {
            remove_lineage_hash(log);
        }
    }
    copy
}

fn remove_lineage_hash(container: &mut Map<String, Value>) {
    if let Some(lineage) = container.get_mut(LINEAGE_KEY).and_then(Value::as_object_mut) {
        lineage.remove(HASH_KEY);
    }
}

/// Return a copy of `content` with `hash` stored as its lineage hash.
///
/// The hash goes into the top-level `lineage` mapping when present, else into
/// `documentation_log.lineage`, else a new top-level `lineage` mapping is
/// created.
pub fn set_hash(content: &Value, hash: &str) -> Value {
    let mut result = content.clone();
    let Some(root) = result.as_object_mut() else {
        return result;
    };

    if let Some(lineage) = root.get_mut(LINEAGE_KEY).and_then(Value::as_object_mut) {
        lineage.insert(HASH_KEY.to_string(), Value::String(hash.to_string()));
        return result;
    }

    let nested = root
        .get_mut(DOCUMENTATION_LOG_KEY)
        .and_then(Value::as_object_mut)
        .and_then(|log| log.get_mut(LINEAGE_KEY))
        .and_then(Value::as_object_mut);
    if let Some(lineage) = nested {
        lineage.insert(HASH_KEY.to_string(), Value::String(hash.to_string()));
        return result;
    }

    let mut lineage = Map::new();
    lineage.insert(HASH_KEY.to_string(), Value::String(hash.to_string()));
    root.insert(LINEAGE_KEY.to_string(), Value::Object(lineage));
    result
}

/// Whether a stored hash is a documentation placeholder (`sha256:a1b2...`)
pub fn is_placeholder(hash: &str) -> bool {
    hash.ends_with(PLACEHOLDER_MARKER)
}

/// Whether a hash string has the exact `sha256:<64 lowercase hex>` shape
pub fn is_well_formed_hash(hash: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^sha256:[0-9a-f]{64}$").expect("static pattern"))
        .is_match(hash)
}
