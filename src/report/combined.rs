//! Combined report for a full lint run

use cheddar_lineage::ChainReport;
use serde::{Deserialize, Serialize};

use super::exit::ExitCode;
use super::validation::FileValidation;

/// Schema validation section of a combined run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationCheck {
    pub passed: bool,
    pub files_checked: usize,
    /// Total error count across files
    pub errors: usize,
    pub results: Vec<FileValidation>,
}

impl ValidationCheck {
    pub fn from_results(results: Vec<FileValidation>) -> Self {
        Self {
            passed: results.iter().all(|r| r.passed),
            files_checked: results.len(),
            errors: results.iter().map(|r| r.errors.len()).sum(),
            results,
        }
    }

    fn warning_count(&self) -> usize {
        self.results.iter().map(|r| r.warnings.len()).sum()
    }
}

/// Chain verification section of a combined run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineageCheck {
    pub passed: bool,
    pub artifacts_checked: usize,
    /// Error count of the chain report
    pub errors: usize,
    pub results: ChainReport,
}

impl From<ChainReport> for LineageCheck {
    fn from(report: ChainReport) -> Self {
        Self {
            passed: report.passed,
            artifacts_checked: report.artifacts_checked,
            errors: report.errors.len(),
            results: report,
        }
    }
}

/// Checks that took part in a run; skipped checks are omitted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Checks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validate_artifact: Option<ValidationCheck>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verify_lineage: Option<LineageCheck>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total_errors: usize,
    pub total_warnings: usize,
}

/// Schema validation and chain verification merged into one verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedReport {
    pub passed: bool,
    pub checks: Checks,
    pub summary: Summary,
}

impl CombinedReport {
    /// Merge check results. Overall pass is the AND of the checks that ran.
    pub fn combine(validation: Option<Vec<FileValidation>>, chain: Option<ChainReport>) -> Self {
        let validate_artifact = validation.map(ValidationCheck::from_results);
        let verify_lineage = chain.map(LineageCheck::from);

        let mut summary = Summary::default();
        let mut passed = true;

        if let Some(check) = &validate_artifact {
            passed &= check.passed;
            summary.total_errors += check.errors;
            summary.total_warnings += check.warning_count();
        }
        if let Some(check) = &verify_lineage {
            passed &= check.passed;
            summary.total_errors += check.errors;
            summary.total_warnings += check.results.warnings.len();
        }

        Self {
            passed,
            checks: Checks {
                validate_artifact,
                verify_lineage,
            },
            summary,
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from_passed(self.passed)
    }
}
