//! Human and JSON renderings of lint results

use cheddar_lineage::{ChainReport, Invariant};
use serde::Serialize;

use super::combined::CombinedReport;
use super::hash::{HashAction, HashOutcome};
use super::validation::FileValidation;

const RULE_WIDTH: usize = 60;

/// Output formats for a result
pub trait HumanReport {
    /// Format as human-readable text
    fn to_human(&self) -> String;

    /// Format as JSON
    fn to_json(&self) -> Result<String, serde_json::Error>
    where
        Self: Serialize,
    {
        serde_json::to_string_pretty(self)
    }
}

fn tag(invariant: Option<Invariant>) -> String {
    invariant.map(|i| format!("[{}] ", i)).unwrap_or_default()
}

fn status(passed: bool) -> &'static str {
    if passed {
        "✓ PASSED"
    } else {
        "✗ FAILED"
    }
}

impl HumanReport for [FileValidation] {
    fn to_human(&self) -> String {
        let mut output = String::new();

        for result in self {
            let mark = if result.passed { "✓" } else { "✗" };
            output.push_str(&format!("{} {}\n", mark, result.file));
            for error in &result.errors {
                output.push_str(&format!(
                    "  {}{}: {}\n",
                    tag(error.invariant),
                    error.field,
                    error.message
                ));
            }
            for warning in &result.warnings {
                output.push_str(&format!("  ⚠ {}: {}\n", warning.field, warning.message));
            }
        }

        let passed = self.iter().filter(|r| r.passed).count();
        output.push_str(&format!("\nPassed: {}/{}\n", passed, self.len()));
        output
    }
}

impl HumanReport for ChainReport {
    fn to_human(&self) -> String {
        let mut output = String::new();

        if self.passed {
            output.push_str(&format!(
                "✓ Chain verification passed ({} artifacts)\n",
                self.artifacts_checked
            ));
        } else {
            output.push_str(&format!(
                "✗ Chain verification failed ({} artifacts)\n\n",
                self.artifacts_checked
            ));
            for error in &self.errors {
                output.push_str(&format!("  {}{}\n", tag(error.invariant), error.artifact));
                output.push_str(&format!("    File: {}\n", error.file));
                output.push_str(&format!("    {}\n\n", error.message));
            }
        }

        for warning in &self.warnings {
            output.push_str(&format!("  ⚠ {}: {}\n", warning.artifact, warning.message));
        }
        output
    }
}

impl HumanReport for CombinedReport {
    fn to_human(&self) -> String {
        let mut output = String::new();
        let banner = "=".repeat(RULE_WIDTH);
        output.push_str(&format!("{}\nCHEDDAR LINT RESULTS\n{}\n\n", banner, banner));

        if let Some(check) = &self.checks.validate_artifact {
            output.push_str(&format!("Schema Validation: {}\n", status(check.passed)));
            output.push_str(&format!("  Files checked: {}\n", check.files_checked));
            output.push_str(&format!("  Errors: {}\n", check.errors));

            if !check.passed {
                output.push('\n');
                for result in check.results.iter().filter(|r| !r.passed) {
                    output.push_str(&format!("  {}:\n", result.file));
                    for error in &result.errors {
                        output.push_str(&format!(
                            "    {}{}: {}\n",
                            tag(error.invariant),
                            error.field,
                            error.message
                        ));
                    }
                }
            }
            output.push('\n');
        }

        if let Some(check) = &self.checks.verify_lineage {
            output.push_str(&format!("Lineage Verification: {}\n", status(check.passed)));
            output.push_str(&format!("  Artifacts checked: {}\n", check.artifacts_checked));
            output.push_str(&format!("  Errors: {}\n", check.errors));

            if !check.passed {
                output.push('\n');
                for error in &check.results.errors {
                    output.push_str(&format!(
                        "  {}{}: {}\n",
                        tag(error.invariant),
                        error.artifact,
                        error.message
                    ));
                }
            }
            output.push('\n');
        }

        output.push_str(&format!("{}\n", "-".repeat(RULE_WIDTH)));
        let overall = if self.passed {
            "✓ ALL CHECKS PASSED"
        } else {
            "✗ CHECKS FAILED"
        };
        output.push_str(&format!("Overall: {}\n", overall));
        output.push_str(&format!("Total errors: {}\n", self.summary.total_errors));
        if self.summary.total_warnings > 0 {
            output.push_str(&format!("Total warnings: {}\n", self.summary.total_warnings));
        }
        output
    }
}

impl HumanReport for HashOutcome {
    fn to_human(&self) -> String {
        match self.action {
            HashAction::Compute => {
                let mut output = format!("File: {}\nComputed hash: {}\n", self.file, self.computed_hash);
                match &self.existing_hash {
                    Some(existing) => {
                        let mark = if self.matches == Some(true) { "✓" } else { "✗" };
                        output.push_str(&format!("Existing hash: {} {}\n", existing, mark));
                    }
                    None => output.push_str("Existing hash: (none)\n"),
                }
                output
            }
            HashAction::Verify => match (&self.existing_hash, self.matches) {
                (None, _) => format!("✗ {}: No existing hash to verify\n", self.file),
                (Some(_), Some(true)) => format!("✓ {}: Hash verified\n", self.file),
                (Some(existing), _) => format!(
                    "✗ {}: Hash mismatch\n  Expected: {}\n  Computed: {}\n",
                    self.file, existing, self.computed_hash
                ),
            },
            HashAction::Update => format!("✓ {}: Hash updated to {}\n", self.file, self.computed_hash),
        }
    }
}
