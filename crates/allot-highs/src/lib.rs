//! HiGHS backend for `allot-lp` models.
//!
//! [`HighsSolver`] lowers a [`allot_lp::Model`] into a HiGHS row problem,
//! applies the [`allot_lp::SolverConfig`], solves once and reads back a
//! solver-agnostic [`allot_lp::Solution`].

pub mod problem;
mod solver;
mod status;

pub use problem::{HighsOption, HighsProblem, HighsProblemError, HighsStatus, SolutionSnapshot};
pub use solver::HighsSolver;
