//! Failures raised by the command layer itself.

use std::fmt;

use allot_core::AllocationStatus;
use allot_lp::SolverStatus;

#[derive(Debug, Clone, PartialEq)]
pub enum CliError {
    /// Log subscriber could not be installed.
    Logging(String),
    /// The run ended without any allocation to write.
    NoAllocation {
        status: AllocationStatus,
        solver_status: SolverStatus,
    },
}

impl CliError {
    pub fn code(&self) -> &'static str {
        match self {
            CliError::Logging(_) => "CLI_LOGGING",
            CliError::NoAllocation { .. } => "CLI_NO_ALLOCATION",
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = self.code();
        match self {
            CliError::Logging(message) => write!(f, "[{code}] {message}"),
            CliError::NoAllocation {
                status,
                solver_status,
            } => write!(
                f,
                "[{code}] no allocation found: status {status} (solver {})",
                solver_status.as_str()
            ),
        }
    }
}

impl std::error::Error for CliError {}
