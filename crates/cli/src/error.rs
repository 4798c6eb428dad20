//! CLI exit codes for scripting and automation.
//!
//! Responsibilities:
//! - Define structured exit codes that scripts can use to distinguish failures.
//! - Map `CommandError` variants to exit codes.
//!
//! Does NOT handle:
//! - Error message formatting (handled by anyhow Display).
//!
//! Invariants:
//! - Any error without a `CommandError` in its chain exits with 1.

use thiserror::Error;

/// Outcomes a command reports beyond a plain failure.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("No setting found at '{path}'")]
    NotFound { path: String },

    #[error("Settings do not match the schema ({count} violation(s))")]
    Invalid { count: usize },
}

/// Structured exit codes for settings-cli.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    Success = 0,

    /// Unhandled or generic failure, including I/O and schema load errors.
    GeneralError = 1,

    /// The requested path holds no value.
    NotFound = 4,

    /// The document fails schema validation.
    ValidationError = 5,
}

impl ExitCode {
    /// Convert the exit code to an i32 for use with std::process::exit().
    pub const fn as_i32(self) -> i32 {
        self as u8 as i32
    }
}

impl From<&CommandError> for ExitCode {
    fn from(err: &CommandError) -> Self {
        match err {
            CommandError::NotFound { .. } => ExitCode::NotFound,
            CommandError::Invalid { .. } => ExitCode::ValidationError,
        }
    }
}

/// Extension trait for anyhow::Error to extract exit codes.
pub trait ExitCodeExt {
    fn exit_code(&self) -> ExitCode;
}

impl ExitCodeExt for anyhow::Error {
    fn exit_code(&self) -> ExitCode {
        self.chain()
            .find_map(|cause| cause.downcast_ref::<CommandError>())
            .map(ExitCode::from)
            .unwrap_or(ExitCode::GeneralError)
    }
}
