//! Backend boundary: a [`Solver`] turns a finished [`Model`] into a
//! [`Solution`].

mod config;
mod error;
mod status;

use crate::Model;
use crate::ids::VariableId;

pub use config::SolverConfig;
pub use error::SolverError;
pub use status::SolverStatus;

/// Primal result of one solve.
///
/// `primal_values[j]` belongs to the column whose [`VariableId::index`] is `j`.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub primal_values: Vec<f64>,
    /// Row activities in constraint order.
    pub row_values: Vec<f64>,
    pub objective_value: f64,
    /// Optimal, or a limit status when the backend returned its incumbent.
    pub status: SolverStatus,
    pub solve_time_seconds: f64,
}

impl Solution {
    pub fn get_primal(&self, index: usize) -> Option<f64> {
        self.primal_values.get(index).copied()
    }

    /// Column value; columns beyond the vector read as zero.
    pub fn value(&self, var_id: VariableId) -> f64 {
        self.get_primal(var_id.index()).unwrap_or(0.0)
    }

    /// Sum of the values of `vars`.
    pub fn sum<I>(&self, vars: I) -> f64
    where
        I: IntoIterator<Item = VariableId>,
    {
        vars.into_iter().map(|var| self.value(var)).sum()
    }

    pub fn get_row_value(&self, index: usize) -> Option<f64> {
        self.row_values.get(index).copied()
    }

    pub fn is_optimal(&self) -> bool {
        self.status.is_optimal()
    }
}

/// A numeric backend.
///
/// `solve` returns `Err(SolverError::SolveFailure { .. })` when the backend
/// stops without a primal vector, so an `Ok` always carries values for every
/// column.
pub trait Solver {
    /// Backend name for logs.
    fn name(&self) -> &'static str;

    fn solve(&mut self, model: &Model) -> Result<Solution, SolverError>;
}
