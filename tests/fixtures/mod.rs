//! Test fixtures: a throwaway lint workspace with schemas and artifacts
//!
//! Each [`Workspace`] is a temp directory holding a `schemas/` directory with
//! one schema per artifact level, plus whatever artifacts a test writes.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use cheddar_lint::lineage::{compute_hash, set_hash};
use cheddar_lint::{LintConfig, Linter};
use serde_json::{json, Value};
use tempfile::TempDir;

pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let schemas = dir.path().join("schemas");
        fs::create_dir_all(&schemas).unwrap();
        for (name, schema) in schemas_by_name() {
            fs::write(schemas.join(name), serde_json::to_string_pretty(&schema).unwrap()).unwrap();
        }
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    /// Write an artifact as YAML, creating parent directories
    pub fn write_artifact(&self, rel: &str, content: &Value) -> PathBuf {
        self.write_raw(rel, &serde_yaml::to_string(content).unwrap())
    }

    pub fn write_raw(&self, rel: &str, text: &str) -> PathBuf {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, text).unwrap();
        path
    }

    pub fn config(&self) -> LintConfig {
        LintConfig {
            schema_dir: self.path("schemas"),
            examples_dir: self.path("schemas/examples"),
            ..LintConfig::default()
        }
    }

    pub fn linter(&self) -> Linter {
        Linter::new(self.config())
    }
}

/// Copy of `content` with its correct lineage hash filled in
pub fn sealed(content: Value) -> Value {
    let hash = compute_hash(&content).unwrap();
    set_hash(&content, &hash)
}

/// Stored `lineage.hash` of a sealed artifact
pub fn hash_of(content: &Value) -> String {
    content["lineage"]["hash"].as_str().unwrap().to_string()
}

pub fn mission() -> Value {
    sealed(json!({
        "id": "mission_growth_v1",
        "level": "mission",
        "title": "Grow sustainably",
        "owner": "dana",
        "lineage": {"upstream_hash": null}
    }))
}

pub fn initiative(parent: &Value) -> Value {
    sealed(json!({
        "id": "initiative_onboarding_v1",
        "level": "flow_initiative",
        "title": "Faster onboarding",
        "owner": "sam",
        "supports_upper_layer": parent["id"],
        "lineage": {"upstream_hash": hash_of(parent)}
    }))
}

pub fn track(parent: &Value) -> Value {
    sealed(json!({
        "id": "track_signup_v2",
        "level": "cheddar_track",
        "title": "Signup funnel",
        "owner": "lee",
        "cheddar_state": "active",
        "supports_upper_layer": parent["id"],
        "lineage": {"upstream_hash": hash_of(parent)}
    }))
}

fn base_properties() -> Value {
    json!({
        "id": {"type": "string", "minLength": 1},
        "level": {"type": "string"},
        "title": {"type": "string"},
        "owner": {"type": "string", "minLength": 1},
        "supports_upper_layer": {"type": "string"},
        "lineage": {
            "type": "object",
            "properties": {
                "hash": {"type": "string"},
                "upstream_hash": {"type": ["string", "null"]}
            }
        }
    })
}

fn level_schema(level: &str, extra_required: &[&str]) -> Value {
    let mut required = vec!["id", "level", "title", "lineage"];
    required.extend_from_slice(extra_required);
    let mut properties = base_properties();
    properties["level"] = json!({"const": level});
    properties["cheddar_state"] = json!({"enum": ["draft", "active", "retired"]});
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "required": required,
        "properties": properties
    })
}

fn schemas_by_name() -> Vec<(&'static str, Value)> {
    vec![
        ("mission_definition.schema.json", level_schema("mission", &["owner"])),
        ("flow_initiative.schema.json", level_schema("flow_initiative", &["supports_upper_layer"])),
        ("cheddar_track.schema.json", level_schema("cheddar_track", &["cheddar_state"])),
        ("automation_brief.schema.json", level_schema("automation_brief", &["owner"])),
        ("personal_artifact.schema.json", level_schema("personal", &[])),
        (
            "documentation_log.schema.json",
            json!({
                "type": "object",
                "required": ["documentation_log"],
                "properties": {
                    "documentation_log": {
                        "type": "object",
                        "required": ["id", "entries"],
                        "properties": {"entries": {"type": "array", "items": {"type": "string"}}}
                    }
                }
            }),
        ),
    ]
}
