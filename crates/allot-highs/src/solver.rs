//! HiGHS solver implementation.

use crate::problem::{HighsOption, HighsProblem, HighsProblemError, HighsStatus};
use crate::status::{highs_may_have_solution, highs_to_core_status};
use allot_lp::{
    ConstraintId, Model, Sense, Solution, Solver, SolverConfig, SolverError, VariableId,
};
use std::time::Instant;
use tracing::{debug, trace, warn};

/// HiGHS' default MIP feasibility tolerance.
const DEFAULT_FEASIBILITY_TOLERANCE: f64 = 1e-6;

fn problem_error_to_solver_error(err: HighsProblemError) -> SolverError {
    SolverError::SolverSpecific(err.to_string())
}

/// HiGHS-backed implementation of [`allot_lp::Solver`].
#[derive(Debug, Clone, Default)]
pub struct HighsSolver {
    config: SolverConfig,
}

impl HighsSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Get access to the current solver configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Set the solver configuration.
    pub fn set_config(&mut self, config: SolverConfig) {
        self.config = config;
    }
}

impl Solver for HighsSolver {
    fn name(&self) -> &'static str {
        "highs"
    }

    fn solve(&mut self, model: &Model) -> Result<Solution, SolverError> {
        solve_model(model, &self.config)
    }
}

fn apply_solver_config(problem: &mut HighsProblem, config: &SolverConfig) {
    problem.set_log_to_console(config.log_to_console.unwrap_or(false));

    if let Some(limit) = config.time_limit {
        problem.set_option("time_limit", HighsOption::Float(limit));
    }
    if let Some(gap) = config.mip_gap {
        problem.set_option("mip_rel_gap", HighsOption::Float(gap));
    }
    if let Some(presolve) = config.presolve {
        let presolve_str = if presolve { "on" } else { "off" };
        problem.set_option("presolve", HighsOption::Str(presolve_str.to_string()));
    }
    if let Some(threads) = config.threads {
        problem.set_option("threads", HighsOption::Int(threads as i32));
    }
    if let Some(tolerance) = config.tolerance {
        problem.set_option("primal_feasibility_tolerance", HighsOption::Float(tolerance));
        problem.set_option("dual_feasibility_tolerance", HighsOption::Float(tolerance));
    }
}

fn dense_objective(model: &Model) -> Result<(Sense, Vec<f64>), SolverError> {
    let objective = model.objective();
    let Some(sense) = objective.sense else {
        return Err(SolverError::NoObjective);
    };
    let mut coeffs = vec![0.0; model.num_variables()];
    for (var_id, coeff) in &objective.terms {
        let slot = coeffs.get_mut(var_id.index()).ok_or_else(|| {
            SolverError::SolverSpecific(format!("objective references unknown {var_id}"))
        })?;
        *slot += *coeff;
    }
    Ok((sense, coeffs))
}

fn add_columns(model: &Model, problem: &mut HighsProblem, objective: &[f64]) {
    for (var_id, var) in model.variables() {
        let obj_coeff = objective[var_id.index()];
        let col_idx = problem.add_col(
            var.bounds.lower,
            var.bounds.upper,
            obj_coeff,
            var.is_integer,
        );
        trace!(
            component = "solver",
            operation = "add_variable",
            status = "success",
            var_id = var_id.inner(),
            col_idx,
            name = model.get_variable_name(var_id).unwrap_or(""),
            "Added variable to HiGHS"
        );
    }
}

fn add_rows(model: &Model, problem: &mut HighsProblem) -> Result<(), SolverError> {
    for ((constraint_id, constraint), row) in model.constraints().zip(model.rows()) {
        let num_coeffs = row.len();
        problem
            .add_row(
                constraint.bounds.lower,
                constraint.bounds.upper,
                row.into_iter().map(|(var_id, coeff)| (var_id.index(), coeff)),
            )
            .map_err(problem_error_to_solver_error)?;
        trace!(
            component = "solver",
            operation = "add_constraint",
            status = "success",
            constraint_id = constraint_id.inner(),
            name = model.get_constraint_name(constraint_id).unwrap_or(""),
            num_coeffs,
            "Added constraint to HiGHS"
        );
    }
    Ok(())
}

/// Where a candidate point breaks the model.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Violation {
    Column(VariableId),
    Row(ConstraintId),
}

fn outside(value: f64, lower: f64, upper: f64, tolerance: f64) -> bool {
    let slack = |bound: f64| tolerance * bound.abs().max(1.0);
    value < lower - slack(lower) || value > upper + slack(upper) || value.is_nan()
}

/// First column or row that `values` violates, integrality included.
///
/// HiGHS hands back a zero vector when a limit stops it before any
/// incumbent, so limit statuses are only trusted after this check.
fn first_violation(model: &Model, values: &[f64], tolerance: f64) -> Option<Violation> {
    if values.len() != model.num_variables() {
        return Some(Violation::Column(VariableId::new(values.len() as u32)));
    }
    for ((var_id, var), &value) in model.variables().zip(values) {
        let fractional = var.is_integer && (value - value.round()).abs() > tolerance;
        if fractional || outside(value, var.bounds.lower, var.bounds.upper, tolerance) {
            return Some(Violation::Column(var_id));
        }
    }
    for ((constraint_id, constraint), row) in model.constraints().zip(model.rows()) {
        let activity: f64 = row
            .iter()
            .map(|(var_id, coeff)| coeff * values[var_id.index()])
            .sum();
        let bounds = constraint.bounds;
        if outside(activity, bounds.lower, bounds.upper, tolerance) {
            return Some(Violation::Row(constraint_id));
        }
    }
    None
}

fn solve_model(model: &Model, config: &SolverConfig) -> Result<Solution, SolverError> {
    if model.num_variables() == 0 {
        return Err(SolverError::EmptyModel);
    }
    config.validate()?;
    let solve_started = Instant::now();
    let (sense, objective) = dense_objective(model)?;

    let mut problem = HighsProblem::new();
    apply_solver_config(&mut problem, config);
    problem.set_sense(sense);
    add_columns(model, &mut problem, &objective);
    add_rows(model, &mut problem)?;

    debug!(
        component = "solver",
        operation = "build",
        status = "success",
        solver = "highs",
        variables = model.num_variables(),
        constraints = model.num_constraints(),
        nnz = model.num_coefficients(),
        time_limit = ?config.time_limit,
        "Lowered model into HiGHS"
    );

    let status = problem.solve();
    let duration_ms = solve_started.elapsed().as_secs_f64() * 1000.0;
    let core_status = highs_to_core_status(status);

    if !highs_may_have_solution(status) {
        warn!(
            component = "solver",
            operation = "solve",
            status = "warn",
            solver = "highs",
            solver_status = %core_status,
            duration_ms,
            "Solver did not find a solution"
        );
        return Err(SolverError::SolveFailure {
            status: core_status,
        });
    }

    let snapshot = problem
        .solution_snapshot()
        .map_err(problem_error_to_solver_error)?;
    if status != HighsStatus::Optimal {
        let tolerance = config.tolerance.unwrap_or(DEFAULT_FEASIBILITY_TOLERANCE);
        if let Some(violation) = first_violation(model, &snapshot.col_values, tolerance) {
            warn!(
                component = "solver",
                operation = "solve",
                status = "warn",
                solver = "highs",
                solver_status = %core_status,
                violation = ?violation,
                duration_ms,
                "Solver stopped without an incumbent"
            );
            return Err(SolverError::SolveFailure {
                status: core_status,
            });
        }
        warn!(
            component = "solver",
            operation = "solve",
            status = "warn",
            solver = "highs",
            solver_status = %core_status,
            duration_ms,
            "Solver hit limit but returning best solution found"
        );
    }

    let objective_value = objective
        .iter()
        .zip(&snapshot.col_values)
        .map(|(coeff, value)| coeff * value)
        .sum();

    debug!(
        component = "solver",
        operation = "solve",
        status = "success",
        solver = "highs",
        solver_status = %core_status,
        objective_value,
        duration_ms,
        "HiGHS solve completed"
    );

    Ok(Solution {
        primal_values: snapshot.col_values,
        row_values: snapshot.row_values,
        objective_value,
        status: core_status,
        solve_time_seconds: solve_started.elapsed().as_secs_f64(),
    })
}
