use super::SolverStatus;

/// Why a backend produced no [`super::Solution`].
#[derive(Debug, Clone, PartialEq)]
pub enum SolverError {
    EmptyModel,
    NoObjective,
    /// A [`super::SolverConfig`] field is out of range.
    InvalidConfig { field: &'static str, message: String },
    /// The backend stopped without a primal vector.
    SolveFailure { status: SolverStatus },
    /// Backend failure outside the cases above.
    SolverSpecific(String),
}

impl SolverError {
    pub fn code(&self) -> &'static str {
        match self {
            SolverError::EmptyModel => "SOLVER_EMPTY_MODEL",
            SolverError::NoObjective => "SOLVER_NO_OBJECTIVE",
            SolverError::InvalidConfig { .. } => "SOLVER_INVALID_CONFIG",
            SolverError::SolverSpecific(_) => "SOLVER_INTERNAL",
            SolverError::SolveFailure { status } => match status {
                SolverStatus::Infeasible => "SOLVER_INFEASIBLE",
                SolverStatus::Unbounded => "SOLVER_UNBOUNDED",
                SolverStatus::TimeLimit => "SOLVER_TIME_LIMIT",
                SolverStatus::IterationLimit => "SOLVER_ITERATION_LIMIT",
                SolverStatus::Optimal | SolverStatus::Unknown => "SOLVER_NO_SOLUTION",
            },
        }
    }

    /// Status of a [`SolverError::SolveFailure`].
    pub fn status(&self) -> Option<SolverStatus> {
        match self {
            SolverError::SolveFailure { status } => Some(*status),
            _ => None,
        }
    }
}

impl std::fmt::Display for SolverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = self.code();
        match self {
            SolverError::EmptyModel => write!(f, "[{code}] model has no columns"),
            SolverError::NoObjective => write!(f, "[{code}] model has no objective"),
            SolverError::InvalidConfig { field, message } => {
                write!(f, "[{code}] solver option {field}: {message}")
            }
            SolverError::SolveFailure { status } => {
                write!(f, "[{code}] solver stopped without a solution ({status})")
            }
            SolverError::SolverSpecific(msg) => write!(f, "[{code}] {msg}"),
        }
    }
}

impl std::error::Error for SolverError {}
