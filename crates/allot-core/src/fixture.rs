//! Shared test inputs and a canned solver.

use std::collections::VecDeque;

use allot_lp::{Model, Solution, Solver, SolverError, SolverStatus, VariableId};

use crate::entity::{Cargo, RatioBounds, Town};
use crate::formulation::AllocationModel;
use crate::partition::{EntitySet, Partition};

/// One depot, cargos `fast`/`slow` (capacity 100, share 0.3..0.7),
/// towns `c~1`/`c~2` (demand 50, group A, NPS [1, 2] and [2, 1]).
pub(crate) fn single_depot_partition() -> Partition {
    let window = RatioBounds::new(0.3, 0.7).unwrap();
    let mut set = EntitySet::new();
    for id in ["fast", "slow"] {
        set.add_cargo(
            "north",
            Cargo::new(id, 100.0, window)
                .unwrap()
                .with_group_ratio("A", RatioBounds::unrestricted()),
        );
    }
    for (id, scores) in [("c~1", [1.0, 2.0]), ("c~2", [2.0, 1.0])] {
        set.add_town(
            "north",
            Town::new(id, "A", 50.0)
                .unwrap()
                .with_score("fast", scores[0])
                .unwrap()
                .with_score("slow", scores[1])
                .unwrap(),
        );
    }
    Partition::build(&set).unwrap()
}

/// Optimal solution with the given values, zero elsewhere.
pub(crate) fn solution_with(built: &AllocationModel, values: &[(VariableId, f64)]) -> Solution {
    let mut primal_values = vec![0.0; built.model().num_variables()];
    for (var, value) in values {
        primal_values[var.index()] = *value;
    }
    Solution {
        primal_values,
        row_values: Vec::new(),
        objective_value: 0.0,
        status: SolverStatus::Optimal,
        solve_time_seconds: 0.0,
    }
}

/// Replays queued results and records the models it was handed.
#[derive(Default)]
pub(crate) struct FixtureSolver {
    results: VecDeque<Result<Solution, SolverError>>,
    pub(crate) seen_rows: Vec<usize>,
}

impl FixtureSolver {
    pub(crate) fn with_results(results: Vec<Result<Solution, SolverError>>) -> Self {
        Self {
            results: results.into(),
            seen_rows: Vec::new(),
        }
    }
}

impl Solver for FixtureSolver {
    fn name(&self) -> &'static str {
        "fixture"
    }

    fn solve(&mut self, model: &Model) -> Result<Solution, SolverError> {
        self.seen_rows.push(model.num_constraints());
        self.results
            .pop_front()
            .unwrap_or(Err(SolverError::SolverSpecific("no queued result".to_string())))
    }
}
