//! Lint results: per-file validation, chain reports, combined runs, exit codes

mod combined;
mod exit;
mod hash;
mod render;
mod validation;

pub use cheddar_lineage::{ChainError, ChainReport, ChainWarning};
pub use combined::{Checks, CombinedReport, LineageCheck, Summary, ValidationCheck};
pub use exit::ExitCode;
pub use hash::{HashAction, HashOutcome};
pub use render::HumanReport;
pub use validation::{FileValidation, ValidationError, ValidationWarning, VALIDATE_LINTER};
