//! Status conversions between HiGHS and the solver-agnostic model.

use crate::problem::HighsStatus;
use allot_lp::SolverStatus;

/// The allocation formulation never has an unbounded direction, so an
/// unbounded-or-infeasible verdict is reported as infeasible.
pub(crate) fn highs_to_core_status(status: HighsStatus) -> SolverStatus {
    match status {
        HighsStatus::Optimal => SolverStatus::Optimal,
        HighsStatus::Infeasible => SolverStatus::Infeasible,
        HighsStatus::Unbounded => SolverStatus::Unbounded,
        HighsStatus::UnboundedOrInfeasible => SolverStatus::Infeasible,
        HighsStatus::ReachedTimeLimit => SolverStatus::TimeLimit,
        HighsStatus::ReachedIterationLimit => SolverStatus::IterationLimit,
        HighsStatus::Unknown => SolverStatus::Unknown,
    }
}

/// Whether a status can carry a primal solution worth reading back.
pub(crate) fn highs_may_have_solution(status: HighsStatus) -> bool {
    highs_to_core_status(status).may_hold_solution()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_map_to_core_limits() {
        assert_eq!(
            highs_to_core_status(HighsStatus::ReachedTimeLimit),
            SolverStatus::TimeLimit
        );
        assert_eq!(
            highs_to_core_status(HighsStatus::ReachedIterationLimit),
            SolverStatus::IterationLimit
        );
    }

    #[test]
    fn ambiguous_presolve_outcome_counts_as_infeasible() {
        assert_eq!(
            highs_to_core_status(HighsStatus::UnboundedOrInfeasible),
            SolverStatus::Infeasible
        );
        assert!(!highs_may_have_solution(HighsStatus::UnboundedOrInfeasible));
        assert!(!highs_may_have_solution(HighsStatus::Infeasible));
        assert!(highs_may_have_solution(HighsStatus::ReachedTimeLimit));
    }
}
