//! Stable process exit codes

use serde::{Deserialize, Serialize};

/// Exit codes shared by every command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum ExitCode {
    /// All checks passed
    Success = 0,
    /// Validation or verification found errors
    ValidationFailed = 1,
    /// Bad arguments, missing paths or config
    Usage = 2,
    /// Unexpected failure
    Internal = 3,
}

impl ExitCode {
    /// Get the integer value of the exit code
    pub fn as_i32(&self) -> i32 {
        *self as i32
    }

    /// Create from integer value
    pub fn from_i32(code: i32) -> Option<Self> {
        match code {
            0 => Some(ExitCode::Success),
            1 => Some(ExitCode::ValidationFailed),
            2 => Some(ExitCode::Usage),
            3 => Some(ExitCode::Internal),
            _ => None,
        }
    }

    /// Success when passed, ValidationFailed otherwise
    pub fn from_passed(passed: bool) -> Self {
        if passed {
            ExitCode::Success
        } else {
            ExitCode::ValidationFailed
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ExitCode::Success)
    }
}

impl Default for ExitCode {
    fn default() -> Self {
        ExitCode::Success
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code.as_i32() as u8)
    }
}
