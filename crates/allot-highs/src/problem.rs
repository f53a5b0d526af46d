//! Thin owner of a `highs::RowProblem` that keeps column handles addressable
//! by position and remembers options until the solve.

use allot_lp::Sense;
use highs::{Col, HighsModelStatus, RowProblem, Sense as HighsSense, SolvedModel};
use std::fmt;
use tracing::{debug, trace};

/// Model status after [`HighsProblem::solve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighsStatus {
    Optimal,
    Infeasible,
    Unbounded,
    /// Presolve proved one of the two without telling which.
    UnboundedOrInfeasible,
    ReachedTimeLimit,
    ReachedIterationLimit,
    Unknown,
}

impl From<HighsModelStatus> for HighsStatus {
    fn from(status: HighsModelStatus) -> Self {
        match status {
            HighsModelStatus::Optimal => HighsStatus::Optimal,
            HighsModelStatus::Infeasible => HighsStatus::Infeasible,
            HighsModelStatus::Unbounded => HighsStatus::Unbounded,
            HighsModelStatus::UnboundedOrInfeasible => HighsStatus::UnboundedOrInfeasible,
            HighsModelStatus::ReachedTimeLimit => HighsStatus::ReachedTimeLimit,
            HighsModelStatus::ReachedIterationLimit => HighsStatus::ReachedIterationLimit,
            _ => HighsStatus::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HighsProblemError {
    UnknownColumn { index: usize, columns: usize },
    NotSolved,
}

impl fmt::Display for HighsProblemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HighsProblemError::UnknownColumn { index, columns } => {
                write!(f, "row refers to column {index} but only {columns} exist")
            }
            HighsProblemError::NotSolved => f.write_str("no solve has run on this problem"),
        }
    }
}

impl std::error::Error for HighsProblemError {}

/// Typed value for a named HiGHS option.
#[derive(Debug, Clone, PartialEq)]
pub enum HighsOption {
    Int(i32),
    Float(f64),
    Str(String),
}

/// Column and row activities of the last solve.
#[derive(Debug, Clone)]
pub struct SolutionSnapshot {
    pub col_values: Vec<f64>,
    pub row_values: Vec<f64>,
}

pub struct HighsProblem {
    problem: RowProblem,
    sense: Sense,
    columns: Vec<Col>,
    options: Vec<(String, HighsOption)>,
    quiet: bool,
    solved: Option<SolvedModel>,
}

impl HighsProblem {
    pub fn new() -> Self {
        HighsProblem {
            problem: RowProblem::default(),
            sense: Sense::Minimize,
            columns: Vec::new(),
            options: Vec::new(),
            quiet: true,
            solved: None,
        }
    }

    /// Append a column; its position is the returned index.
    pub fn add_col(&mut self, lower: f64, upper: f64, cost: f64, is_integer: bool) -> usize {
        let col = if is_integer {
            self.problem.add_integer_column(cost, lower..=upper)
        } else {
            self.problem.add_column(cost, lower..=upper)
        };
        self.columns.push(col);
        self.columns.len() - 1
    }

    /// Append `lower <= sum(coeff * column) <= upper`.
    pub fn add_row(
        &mut self,
        lower: f64,
        upper: f64,
        terms: impl IntoIterator<Item = (usize, f64)>,
    ) -> Result<(), HighsProblemError> {
        let columns = self.columns.len();
        let factors = terms
            .into_iter()
            .map(|(index, coeff)| {
                self.columns
                    .get(index)
                    .map(|col| (*col, coeff))
                    .ok_or(HighsProblemError::UnknownColumn { index, columns })
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.problem.add_row(lower..=upper, factors);
        Ok(())
    }

    pub fn set_sense(&mut self, sense: Sense) {
        self.sense = sense;
    }

    pub fn set_log_to_console(&mut self, enabled: bool) {
        self.quiet = !enabled;
    }

    /// Queue an option for the next solve.
    pub fn set_option(&mut self, name: impl Into<String>, value: HighsOption) {
        self.options.push((name.into(), value));
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn num_rows(&self) -> usize {
        self.problem.num_rows()
    }

    /// Solve once. The row problem is moved into HiGHS.
    pub fn solve(&mut self) -> HighsStatus {
        debug!(
            component = "solver",
            operation = "highs_solve",
            status = "started",
            columns = self.num_columns(),
            rows = self.num_rows(),
            sense = ?self.sense,
            options = self.options.len(),
            "Handing problem to HiGHS"
        );

        let sense = match self.sense {
            Sense::Minimize => HighsSense::Minimise,
            Sense::Maximize => HighsSense::Maximise,
        };
        let mut model = std::mem::take(&mut self.problem).optimise(sense);
        if self.quiet {
            model.make_quiet();
        } else {
            model.set_option("output_flag", true);
            model.set_option("log_to_console", true);
        }
        for (name, value) in self.options.drain(..) {
            let name = name.as_str();
            match value {
                HighsOption::Int(v) => model.set_option(name, v),
                HighsOption::Float(v) => model.set_option(name, v),
                HighsOption::Str(v) => model.set_option(name, v.as_str()),
            }
        }

        let solved = model.solve();
        let status = HighsStatus::from(solved.status());
        trace!(
            component = "solver",
            operation = "highs_solve",
            status = "success",
            highs_status = ?status,
            "HiGHS returned"
        );
        self.solved = Some(solved);
        status
    }

    /// Read back the last solve's column and row values.
    pub fn solution_snapshot(&self) -> Result<SolutionSnapshot, HighsProblemError> {
        let solved = self.solved.as_ref().ok_or(HighsProblemError::NotSolved)?;
        let solution = solved.get_solution();
        Ok(SolutionSnapshot {
            col_values: solution.columns().to_vec(),
            row_values: solution.rows().to_vec(),
        })
    }
}

impl Default for HighsProblem {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HighsProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HighsProblem")
            .field("columns", &self.num_columns())
            .field("rows", &self.num_rows())
            .field("sense", &self.sense)
            .field("solved", &self.solved.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_are_numbered_in_order() {
        let mut problem = HighsProblem::new();
        assert_eq!(problem.add_col(0.0, 1.0, 1.0, false), 0);
        assert_eq!(problem.add_col(0.0, 5.0, 2.0, true), 1);
        assert_eq!(problem.num_columns(), 2);
        assert_eq!(problem.sense, Sense::Minimize);
    }

    #[test]
    fn row_over_unknown_column_is_rejected() {
        let mut problem = HighsProblem::new();
        problem.add_col(0.0, 1.0, 1.0, false);
        let err = problem.add_row(0.0, 1.0, [(0, 1.0), (3, 1.0)]).unwrap_err();
        assert_eq!(
            err,
            HighsProblemError::UnknownColumn {
                index: 3,
                columns: 1
            }
        );
        assert_eq!(problem.num_rows(), 0);
    }

    #[test]
    fn snapshot_requires_solve() {
        let problem = HighsProblem::new();
        assert_eq!(
            problem.solution_snapshot().unwrap_err(),
            HighsProblemError::NotSolved
        );
    }

    #[test]
    fn tiny_lp_solves() {
        let mut problem = HighsProblem::new();
        let x = problem.add_col(0.0, 10.0, 1.0, false);
        problem.add_row(3.0, f64::INFINITY, [(x, 1.0)]).unwrap();
        assert_eq!(problem.solve(), HighsStatus::Optimal);
        let snapshot = problem.solution_snapshot().unwrap();
        assert!((snapshot.col_values[0] - 3.0).abs() < 1e-9);
    }
}
