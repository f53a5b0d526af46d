//! One allocation run: build, solve, optionally relax and solve once more.

use std::time::Instant;

use allot_lp::{Solution, Solver, SolverError, SolverStatus};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::entity::CargoId;
use crate::error::AllocationError;
use crate::extract::{OutputRecord, cargo_shares, extract_records};
use crate::formulation::{AllocationModel, ModelBuilder, ModelOptions};
use crate::partition::Partition;

/// Outcome category of an allocation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationStatus {
    Optimal,
    /// Usable but not proven optimal, e.g. an iteration limit.
    Feasible,
    /// Time limit reached. A solution may or may not be present.
    TimedOut,
    Infeasible,
    Unbounded,
    /// Solver stopped without a solution and without a definite status.
    Failed,
}

impl AllocationStatus {
    fn from_solver(status: SolverStatus) -> Self {
        match status {
            SolverStatus::Optimal => AllocationStatus::Optimal,
            SolverStatus::IterationLimit => AllocationStatus::Feasible,
            SolverStatus::TimeLimit => AllocationStatus::TimedOut,
            SolverStatus::Infeasible => AllocationStatus::Infeasible,
            SolverStatus::Unbounded => AllocationStatus::Unbounded,
            SolverStatus::Unknown => AllocationStatus::Failed,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AllocationStatus::Optimal => "optimal",
            AllocationStatus::Feasible => "feasible",
            AllocationStatus::TimedOut => "timed_out",
            AllocationStatus::Infeasible => "infeasible",
            AllocationStatus::Unbounded => "unbounded",
            AllocationStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for AllocationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of [`Allocator::run`].
#[derive(Debug, Clone)]
pub struct AllocationOutcome {
    status: AllocationStatus,
    solver_status: SolverStatus,
    built: AllocationModel,
    solution: Option<Solution>,
}

impl AllocationOutcome {
    pub fn status(&self) -> AllocationStatus {
        self.status
    }

    pub fn solver_status(&self) -> SolverStatus {
        self.solver_status
    }

    /// The model that produced this outcome; the relaxed one after a fallback.
    pub fn model(&self) -> &AllocationModel {
        &self.built
    }

    pub fn solution(&self) -> Option<&Solution> {
        self.solution.as_ref()
    }

    /// Whether the global minimum-share rows were dropped by the fallback.
    pub fn relaxed(&self) -> bool {
        self.built.is_relaxed()
    }

    pub fn has_solution(&self) -> bool {
        self.solution.is_some()
    }

    pub fn objective_value(&self) -> Option<f64> {
        self.solution.as_ref().map(|s| s.objective_value)
    }

    /// Per (depot, town) records.
    ///
    /// # Errors
    ///
    /// Returns [`AllocationError::NoSolution`] when the run has no solution.
    pub fn records(&self, partition: &Partition) -> Result<Vec<OutputRecord>, AllocationError> {
        let solution = self.require_solution()?;
        let started = Instant::now();
        let records = extract_records(&self.built, partition, solution);
        debug!(
            component = "extract",
            operation = "records",
            status = "success",
            records = records.len(),
            duration_ms = started.elapsed().as_secs_f64() * 1000.0,
            "Extracted allocation records"
        );
        Ok(records)
    }

    /// Per-cargo share of the order amount.
    pub fn cargo_shares(&self, partition: &Partition) -> Result<Vec<(CargoId, f64)>, AllocationError> {
        let solution = self.require_solution()?;
        Ok(cargo_shares(&self.built, partition, solution))
    }

    fn require_solution(&self) -> Result<&Solution, AllocationError> {
        self.solution.as_ref().ok_or(AllocationError::NoSolution {
            status: self.solver_status,
        })
    }
}

/// Drives model construction and solving with one solver backend.
#[derive(Debug)]
pub struct Allocator<S> {
    solver: S,
    options: ModelOptions,
}

impl<S: Solver> Allocator<S> {
    pub fn new(solver: S, options: ModelOptions) -> Self {
        Self { solver, options }
    }

    pub fn options(&self) -> &ModelOptions {
        &self.options
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    /// Build the unrelaxed model without solving it.
    pub fn build(&self, partition: &Partition) -> Result<AllocationModel, AllocationError> {
        Ok(ModelBuilder::new(partition, &self.options).build()?)
    }

    /// Build and solve. With `relax_on_infeasible`, an infeasible first
    /// solve is followed by exactly one solve without global minimum shares.
    ///
    /// Solver statuses are reported through the outcome; only malformed
    /// models and backend failures are errors.
    pub fn run(&mut self, partition: &Partition) -> Result<AllocationOutcome, AllocationError> {
        let started = Instant::now();
        let first = self.solve_once(partition, false)?;
        let outcome = if first.status == AllocationStatus::Infeasible
            && self.options.relax_on_infeasible
        {
            warn!(
                component = "allocate",
                operation = "relax",
                status = "warn",
                solver = self.solver.name(),
                "Model infeasible, solving once more without global minimum shares"
            );
            self.solve_once(partition, true)?
        } else {
            first
        };

        info!(
            component = "allocate",
            operation = "run",
            status = %outcome.status,
            solver = self.solver.name(),
            relaxed = outcome.relaxed(),
            objective_value = ?outcome.objective_value(),
            duration_ms = started.elapsed().as_secs_f64() * 1000.0,
            "Allocation run finished"
        );
        Ok(outcome)
    }

    fn solve_once(
        &mut self,
        partition: &Partition,
        relaxed: bool,
    ) -> Result<AllocationOutcome, AllocationError> {
        let built = ModelBuilder::new(partition, &self.options)
            .relaxed(relaxed)
            .build()?;
        match self.solver.solve(built.model()) {
            Ok(solution) => Ok(AllocationOutcome {
                status: AllocationStatus::from_solver(solution.status),
                solver_status: solution.status,
                built,
                solution: Some(solution),
            }),
            Err(SolverError::SolveFailure { status }) => Ok(AllocationOutcome {
                status: AllocationStatus::from_solver(status),
                solver_status: status,
                built,
                solution: None,
            }),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::fixture::{FixtureSolver, single_depot_partition, solution_with};

    fn infeasible() -> Result<Solution, SolverError> {
        Err(SolverError::SolveFailure {
            status: SolverStatus::Infeasible,
        })
    }

    fn optimal_for(partition: &Partition, options: &ModelOptions) -> Solution {
        let built = ModelBuilder::new(partition, options).build().unwrap();
        let index = built.index();
        solution_with(
            &built,
            &[
                (index.aggregate(0), 50.0),
                (index.aggregate(1), 50.0),
                (index.allocated(0, 0, 0), 50.0),
                (index.allocated(0, 1, 1), 50.0),
            ],
        )
    }

    #[test]
    fn optimal_run_extracts_records() {
        let partition = single_depot_partition();
        let options = ModelOptions::default();
        let solution = optimal_for(&partition, &options);
        let mut allocator =
            Allocator::new(FixtureSolver::with_results(vec![Ok(solution)]), options);

        let outcome = allocator.run(&partition).unwrap();
        assert_eq!(outcome.status(), AllocationStatus::Optimal);
        assert!(!outcome.relaxed());
        let records = outcome.records(&partition).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].allocations[0].1, 1.0);
        assert_eq!(records[1].allocations[1].1, 1.0);

        let shares = outcome.cargo_shares(&partition).unwrap();
        assert_eq!(shares[0].1, 0.5);
    }

    #[test]
    fn infeasible_run_has_no_records() {
        let partition = single_depot_partition();
        let mut allocator = Allocator::new(
            FixtureSolver::with_results(vec![infeasible()]),
            ModelOptions::default(),
        );

        let outcome = allocator.run(&partition).unwrap();
        assert_eq!(outcome.status(), AllocationStatus::Infeasible);
        assert!(!outcome.has_solution());
        let err = outcome.records(&partition).unwrap_err();
        assert_eq!(err.code(), "ALLOCATION_NO_SOLUTION");
        assert_eq!(allocator.solver().seen_rows.len(), 1);
    }

    #[test]
    fn relaxed_fallback_runs_exactly_once() {
        let partition = single_depot_partition();
        let options = ModelOptions::default().with_relax_on_infeasible(true);
        let mut allocator = Allocator::new(
            FixtureSolver::with_results(vec![infeasible(), infeasible()]),
            options,
        );

        let outcome = allocator.run(&partition).unwrap();
        assert_eq!(outcome.status(), AllocationStatus::Infeasible);
        assert!(outcome.relaxed());
        // Second model lacks the two global minimum rows.
        assert_eq!(allocator.solver().seen_rows, vec![19, 17]);
    }

    #[test]
    fn relaxed_fallback_can_recover() {
        let partition = single_depot_partition();
        let options = ModelOptions::default().with_relax_on_infeasible(true);
        let solution = optimal_for(&partition, &options);
        let mut allocator = Allocator::new(
            FixtureSolver::with_results(vec![infeasible(), Ok(solution)]),
            options,
        );

        let outcome = allocator.run(&partition).unwrap();
        assert_eq!(outcome.status(), AllocationStatus::Optimal);
        assert!(outcome.relaxed());
        assert!(outcome.records(&partition).is_ok());
    }

    #[test]
    fn time_limit_is_distinct_from_infeasible() {
        let partition = single_depot_partition();
        let options = ModelOptions::default().with_relax_on_infeasible(true);
        let mut solution = optimal_for(&partition, &options);
        solution.status = SolverStatus::TimeLimit;
        let mut allocator =
            Allocator::new(FixtureSolver::with_results(vec![Ok(solution)]), options);

        let outcome = allocator.run(&partition).unwrap();
        assert_eq!(outcome.status(), AllocationStatus::TimedOut);
        assert!(outcome.has_solution());
        assert!(!outcome.relaxed());
        assert_eq!(allocator.solver().seen_rows.len(), 1);
    }

    #[test]
    fn time_limit_without_incumbent_keeps_status() {
        let partition = single_depot_partition();
        let mut allocator = Allocator::new(
            FixtureSolver::with_results(vec![Err(SolverError::SolveFailure {
                status: SolverStatus::TimeLimit,
            })]),
            ModelOptions::default(),
        );
        let outcome = allocator.run(&partition).unwrap();
        assert_eq!(outcome.status(), AllocationStatus::TimedOut);
        assert!(outcome.records(&partition).is_err());
    }

    #[test]
    fn backend_errors_propagate() {
        let partition = single_depot_partition();
        let mut allocator =
            Allocator::new(FixtureSolver::default(), ModelOptions::default());
        let err = allocator.run(&partition).unwrap_err();
        assert_eq!(err.code(), "SOLVER_INTERNAL");
    }

    #[test]
    fn status_names() {
        assert_eq!(AllocationStatus::TimedOut.to_string(), "timed_out");
        assert_eq!(
            AllocationStatus::from_solver(SolverStatus::Unknown),
            AllocationStatus::Failed
        );
    }
}
