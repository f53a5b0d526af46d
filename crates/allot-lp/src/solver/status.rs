use serde::Serialize;

/// How a backend stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverStatus {
    Optimal,
    Infeasible,
    Unbounded,
    /// Wall-clock limit hit; an incumbent may exist.
    TimeLimit,
    /// Iteration or node limit hit; an incumbent may exist.
    IterationLimit,
    /// Stopped without a definite verdict.
    Unknown,
}

impl SolverStatus {
    pub fn is_optimal(self) -> bool {
        self == SolverStatus::Optimal
    }

    /// Stopped by a time or iteration budget rather than a verdict.
    pub fn is_limit(self) -> bool {
        matches!(self, SolverStatus::TimeLimit | SolverStatus::IterationLimit)
    }

    /// Whether a primal vector reported with this status can be trusted.
    pub fn may_hold_solution(self) -> bool {
        self.is_optimal() || self.is_limit()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SolverStatus::Optimal => "optimal",
            SolverStatus::Infeasible => "infeasible",
            SolverStatus::Unbounded => "unbounded",
            SolverStatus::TimeLimit => "time_limit",
            SolverStatus::IterationLimit => "iteration_limit",
            SolverStatus::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
