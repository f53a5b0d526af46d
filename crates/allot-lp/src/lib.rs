//! Solver-agnostic linear program model.
//!
//! This crate is the boundary between the allocation formulation and a
//! numeric backend. It provides:
//!
//! - [`Model`]: column-first storage of variables, constraints and a linear objective
//! - [`Expr`] / [`ConstraintExpr`]: linear expressions and comparisons over [`VariableId`]s
//! - [`Solver`]: the trait a backend implements to turn a [`Model`] into a [`Solution`]
//! - [`SolverConfig`], [`SolverStatus`], [`SolverError`]: shared solve vocabulary

pub mod expr;
pub mod ids;
pub mod model;
pub mod solver;
pub mod types;

pub use expr::{ComparisonSense, ConstraintExpr, Expr};
pub use ids::{ConstraintId, VariableId};
pub use model::{Model, ModelError};
pub use solver::{Solution, Solver, SolverConfig, SolverError, SolverStatus};
pub use types::{Bounds, Constraint, Objective, Sense, Variable};
