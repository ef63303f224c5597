//! Cheddar lint - artifact schema validation and lineage verification
//!
//! Loads Cheddar artifacts from YAML, validates them against their JSON
//! schemas and verifies that they form a consistent, acyclic, hash-linked
//! chain. Hashing and chain verification live in the `cheddar-lineage`
//! crate; this crate adds file handling, schemas, reporting and the CLI.

pub mod config;
pub mod loader;
pub mod pipeline;
pub mod report;
pub mod schema;

pub use cheddar_lineage as lineage;
pub use config::{EffectiveConfig, LintConfig};
pub use pipeline::{LintError, LintResult, Linter};
pub use report::{ChainReport, CombinedReport, ExitCode, FileValidation, HashOutcome, HumanReport};
