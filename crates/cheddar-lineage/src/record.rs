//! Typed artifact records and lineage field extraction
//!
//! Artifacts arrive as generic trees. The fields the verifier needs are pulled
//! out once into a closed [`ArtifactRecord`]; the original tree is kept intact
//! for hashing and for the update workflow.
//!
//! Missing fields are `None`, never an error: the verifier decides what an
//! absence means.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::hash::{DOCUMENTATION_LOG_KEY, HASH_KEY, LINEAGE_KEY};

const ID_KEY: &str = "id";
const LEVEL_KEY: &str = "level";
const SUPPORTS_UPPER_LAYER_KEY: &str = "supports_upper_layer";
const UPSTREAM_HASH_KEY: &str = "upstream_hash";

/// Closed set of artifact levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactLevel {
    Mission,
    FlowInitiative,
    CheddarTrack,
    AutomationBrief,
    Personal,
}

impl ArtifactLevel {
    pub const ALL: [ArtifactLevel; 5] = [
        ArtifactLevel::Mission,
        ArtifactLevel::FlowInitiative,
        ArtifactLevel::CheddarTrack,
        ArtifactLevel::AutomationBrief,
        ArtifactLevel::Personal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactLevel::Mission => "mission",
            ArtifactLevel::FlowInitiative => "flow_initiative",
            ArtifactLevel::CheddarTrack => "cheddar_track",
            ArtifactLevel::AutomationBrief => "automation_brief",
            ArtifactLevel::Personal => "personal",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.as_str() == tag)
    }
}

impl fmt::Display for ArtifactLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `lineage` block of an artifact
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineageBlock {
    /// Stored own hash (`lineage.hash`)
    pub hash: Option<String>,
    /// Claimed parent hash (`lineage.upstream_hash`)
    pub upstream_hash: Option<String>,
}

/// A mission, initiative, track, brief or personal artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandardArtifact {
    pub id: Option<String>,
    /// Raw level tag; may be outside the closed set
    pub level: Option<String>,
    /// Parent artifact id
    pub supports_upper_layer: Option<String>,
    pub lineage: LineageBlock,
}

impl StandardArtifact {
    pub fn level_tag(&self) -> Option<ArtifactLevel> {
        self.level.as_deref().and_then(ArtifactLevel::parse)
    }

    pub fn is_mission(&self) -> bool {
        self.level_tag() == Some(ArtifactLevel::Mission)
    }
}

/// A record wrapped in `documentation_log`; hashed but never chain-linked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentationLog {
    pub id: Option<String>,
    pub lineage: LineageBlock,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactRecord {
    Standard(StandardArtifact),
    DocumentationLog(DocumentationLog),
}

impl ArtifactRecord {
    /// Extract the typed record from a generic tree
    pub fn extract(content: &Value) -> Self {
        let lineage = LineageBlock {
            hash: own_hash(content),
            upstream_hash: upstream_hash(content),
        };

        if is_documentation_log(content) {
            ArtifactRecord::DocumentationLog(DocumentationLog {
                id: artifact_id(content).or_else(|| {
                    documentation_log(content).and_then(|log| text_field(log, ID_KEY))
                }),
                lineage,
            })
        } else {
            ArtifactRecord::Standard(StandardArtifact {
                id: artifact_id(content),
                level: artifact_level(content),
                supports_upper_layer: parent_reference(content),
                lineage,
            })
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            ArtifactRecord::Standard(a) => a.id.as_deref(),
            ArtifactRecord::DocumentationLog(l) => l.id.as_deref(),
        }
    }

    pub fn lineage(&self) -> &LineageBlock {
        match self {
            ArtifactRecord::Standard(a) => &a.lineage,
            ArtifactRecord::DocumentationLog(l) => &l.lineage,
        }
    }

    /// Parent id; documentation logs never have one
    pub fn parent_ref(&self) -> Option<&str> {
        match self {
            ArtifactRecord::Standard(a) => a.supports_upper_layer.as_deref(),
            ArtifactRecord::DocumentationLog(_) => None,
        }
    }
}

/// One loaded artifact: typed record, untouched content and source location
#[derive(Debug, Clone)]
pub struct Artifact {
    record: ArtifactRecord,
    content: Value,
    source: String,
}

impl Artifact {
    pub fn new(content: Value, source: impl Into<String>) -> Self {
        Self {
            record: ArtifactRecord::extract(&content),
            content,
            source: source.into(),
        }
    }

    pub fn record(&self) -> &ArtifactRecord {
        &self.record
    }

    /// The full generic tree, as loaded
    pub fn content(&self) -> &Value {
        &self.content
    }

    /// Where the artifact was loaded from (out-of-band, not hashed)
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn id(&self) -> Option<&str> {
        self.record.id()
    }

    /// Id for error listings
    pub fn display_id(&self) -> &str {
        self.id().unwrap_or("(unknown)")
    }

    pub fn is_documentation_log(&self) -> bool {
        matches!(self.record, ArtifactRecord::DocumentationLog(_))
    }

    pub fn own_hash(&self) -> Option<&str> {
        self.record.lineage().hash.as_deref()
    }

    pub fn upstream_hash(&self) -> Option<&str> {
        self.record.lineage().upstream_hash.as_deref()
    }

    pub fn parent_ref(&self) -> Option<&str> {
        self.record.parent_ref()
    }
}

/// `id` of an artifact tree
pub fn artifact_id(content: &Value) -> Option<String> {
    content.as_object().and_then(|m| text_field(m, ID_KEY))
}

/// `level` of an artifact tree
pub fn artifact_level(content: &Value) -> Option<String> {
    content.as_object().and_then(|m| text_field(m, LEVEL_KEY))
}

/// `supports_upper_layer` of an artifact tree
pub fn parent_reference(content: &Value) -> Option<String> {
    content
        .as_object()
        .and_then(|m| text_field(m, SUPPORTS_UPPER_LAYER_KEY))
}

/// `lineage.hash`, looking under `documentation_log` when needed
pub fn own_hash(content: &Value) -> Option<String> {
    lineage_map(content).and_then(|m| text_field(m, HASH_KEY))
}

/// `lineage.upstream_hash`, looking under `documentation_log` when needed
pub fn upstream_hash(content: &Value) -> Option<String> {
    lineage_map(content).and_then(|m| text_field(m, UPSTREAM_HASH_KEY))
}

/// Structural documentation-log detection: a `documentation_log` wrapper key
pub fn is_documentation_log(content: &Value) -> bool {
    content
        .as_object()
        .is_some_and(|m| m.contains_key(DOCUMENTATION_LOG_KEY))
}

fn documentation_log(content: &Value) -> Option<&Map<String, Value>> {
    content
        .as_object()?
        .get(DOCUMENTATION_LOG_KEY)?
        .as_object()
}

fn lineage_map(content: &Value) -> Option<&Map<String, Value>> {
    let root = content.as_object()?;
    match root.get(LINEAGE_KEY) {
        Some(lineage) => lineage.as_object(),
        None => documentation_log(content)?.get(LINEAGE_KEY)?.as_object(),
    }
}

/// Field as text. Null and absent are `None`; non-string values render as
/// compact JSON so a non-null value never reads as missing.
fn text_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
