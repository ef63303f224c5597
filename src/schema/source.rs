//! Schema resolution: schema name -> JSON document

use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Errors resolving or reading schema documents
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Schema directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("Schema not found: {0}")]
    NotFound(String),

    #[error("Failed to read schema {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid schema JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Schema {0} is not a JSON object")]
    NotAnObject(String),

    #[error("Invalid schema: {0}")]
    Invalid(String),
}

/// Resolves schema names to schema documents
pub trait SchemaSource {
    fn resolve(&self, name: &str) -> Result<Value, SchemaError>;
}

/// Schemas stored as `<dir>/<name>` files
#[derive(Debug, Clone)]
pub struct DirectorySchemaSource {
    dir: PathBuf,
}

impl DirectorySchemaSource {
    /// Open a schema directory, failing if it does not exist
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, SchemaError> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(SchemaError::DirectoryNotFound(dir));
        }
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl SchemaSource for DirectorySchemaSource {
    fn resolve(&self, name: &str) -> Result<Value, SchemaError> {
        let path = self.dir.join(name);
        if !path.is_file() {
            return Err(SchemaError::NotFound(path.display().to_string()));
        }
        load_schema_file(&path)
    }
}

impl SchemaSource for HashMap<String, Value> {
    fn resolve(&self, name: &str) -> Result<Value, SchemaError> {
        self.get(name)
            .cloned()
            .ok_or_else(|| SchemaError::NotFound(name.to_string()))
    }
}

/// Read one schema document from disk
pub fn load_schema_file(path: &Path) -> Result<Value, SchemaError> {
    debug!(path = %path.display(), "loading schema");
    let text = fs::read_to_string(path).map_err(|source| SchemaError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let schema: Value = serde_json::from_str(&text).map_err(|source| SchemaError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    if !schema.is_object() {
        return Err(SchemaError::NotAnObject(path.display().to_string()));
    }
    Ok(schema)
}
