//! Column-first LP/MIP model.
//!
//! Edits live in `builder`, read access in `storage`, labels in `names`.

mod builder;
mod error;
mod names;
mod storage;

use crate::ids::{ConstraintId, VariableId};
use crate::types::{Constraint, Objective, Variable};
use std::collections::BTreeMap;
use std::time::Instant;

pub use error::ModelError;
use names::NameTable;

/// A model builder for linear and mixed-integer programs.
///
/// Ids are dense: the n-th added variable has id `n`, which is also its
/// column position in every [`crate::Solution`].
#[derive(Debug, Clone, Default)]
pub struct Model {
    pub(crate) variables: Vec<Variable>,
    pub(crate) constraints: Vec<Constraint>,
    pub(crate) objective: Objective,
    // Column-first sparse storage: variable index -> (constraint_id, coefficient)
    pub(crate) columns: Vec<Vec<(ConstraintId, f64)>>,
    pub(crate) variable_names: NameTable<VariableId>,
    pub(crate) constraint_names: NameTable<ConstraintId>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty model with room for the given number of columns and rows.
    pub fn with_capacities(variables: usize, constraints: usize) -> Self {
        Self {
            variables: Vec::with_capacity(variables),
            constraints: Vec::with_capacity(constraints),
            columns: Vec::with_capacity(variables),
            ..Self::default()
        }
    }

    pub fn objective(&self) -> &Objective {
        &self.objective
    }

    pub(crate) fn ensure_variable_exists(&self, id: VariableId) -> Result<(), ModelError> {
        if id.index() < self.variables.len() {
            Ok(())
        } else {
            Err(ModelError::InvalidVariableId(id))
        }
    }

    pub(crate) fn ensure_constraint_exists(&self, id: ConstraintId) -> Result<(), ModelError> {
        if id.index() < self.constraints.len() {
            Ok(())
        } else {
            Err(ModelError::InvalidConstraintId(id))
        }
    }

    pub(crate) fn normalize_terms(&self, terms: Vec<(VariableId, f64)>) -> Vec<(VariableId, f64)> {
        let started = Instant::now();
        let terms_in = terms.len();

        let mut merged: BTreeMap<VariableId, f64> = BTreeMap::new();
        for (var_id, coeff) in terms {
            *merged.entry(var_id).or_insert(0.0) += coeff;
        }
        let normalized: Vec<(VariableId, f64)> = merged
            .into_iter()
            .filter(|(_, coeff)| *coeff != 0.0)
            .collect();

        tracing::trace!(
            component = "model",
            operation = "lower_expr",
            status = "success",
            expr_terms_in = terms_in,
            expr_terms_out = normalized.len(),
            duration_ms = started.elapsed().as_secs_f64() * 1000.0,
            "Lowered linear expression"
        );

        normalized
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::expr::Expr;
    use crate::types::{Bounds, Sense};

    fn column_between(lower: f64, upper: f64) -> Variable {
        Variable::continuous(Bounds::new(lower, upper))
    }

    fn row_between(lower: f64, upper: f64) -> Constraint {
        Constraint {
            bounds: Bounds::new(lower, upper),
        }
    }

    #[test]
    fn new_model_is_empty() {
        let model = Model::new();
        assert_eq!(model.num_variables(), 0);
        assert_eq!(model.num_constraints(), 0);
        assert_eq!(model.num_coefficients(), 0);
    }

    #[test]
    fn ids_are_dense_and_sequential() {
        let mut model = Model::new();
        let first = model.add_variable(column_between(0.0, 1.0)).unwrap();
        let second = model.add_variable(column_between(0.0, 1.0)).unwrap();
        assert_eq!(first.index(), 0);
        assert_eq!(second.index(), 1);

        let row = model.add_constraint(row_between(0.0, 1.0)).unwrap();
        assert_eq!(row.index(), 0);
    }

    #[test]
    fn set_coefficient_upserts_existing_entry() {
        let mut model = Model::new();
        let var = model.add_variable(column_between(0.0, 10.0)).unwrap();
        let row = model.add_constraint(row_between(0.0, 5.0)).unwrap();

        model.set_coefficient(var, row, 2.5).unwrap();
        model.set_coefficient(var, row, 4.0).unwrap();

        assert_eq!(model.get_column(var), Some(&[(row, 4.0)][..]));
        assert_eq!(model.num_coefficients(), 1);
    }

    #[test]
    fn set_coefficient_rejects_unknown_ids() {
        let mut model = Model::new();
        let var = model.add_variable(column_between(0.0, 10.0)).unwrap();
        let row = model.add_constraint(row_between(0.0, 5.0)).unwrap();

        let bad_var = VariableId::new(99);
        assert_eq!(
            model.set_coefficient(bad_var, row, 1.0),
            Err(ModelError::InvalidVariableId(bad_var))
        );
        let bad_row = ConstraintId::new(42);
        assert_eq!(
            model.set_coefficient(var, bad_row, 1.0),
            Err(ModelError::InvalidConstraintId(bad_row))
        );
        assert_eq!(
            model.set_coefficient(var, row, f64::NAN).unwrap_err().code(),
            "MODEL_INVALID_COEFFICIENT"
        );
    }

    #[test]
    fn rows_transpose_columns() {
        let mut model = Model::new();
        let x = model.add_variable(column_between(0.0, 10.0)).unwrap();
        let y = model.add_variable(column_between(0.0, 10.0)).unwrap();
        let r0 = model.add_constraint(row_between(0.0, 15.0)).unwrap();
        let r1 = model.add_constraint(row_between(-10.0, 10.0)).unwrap();

        model.set_coefficient(x, r0, 1.5).unwrap();
        model.set_coefficient(x, r1, -2.0).unwrap();
        model.set_coefficient(y, r1, 3.5).unwrap();

        let rows = model.rows();
        assert_eq!(rows[0], vec![(x, 1.5)]);
        assert_eq!(rows[1], vec![(x, -2.0), (y, 3.5)]);
    }

    #[test]
    fn add_constraint_expr_maps_sense_to_bounds() {
        let mut model = Model::new();
        let x = model.add_variable(column_between(0.0, 1.0)).unwrap();

        let ge = model.add_constraint_expr(Expr::term(x, 1.0).geq(2.0)).unwrap();
        let le = model.add_constraint_expr(Expr::term(x, 1.0).leq(3.0)).unwrap();
        let eq = model
            .add_constraint_expr(Expr::term(x, 1.0).equals(4.0))
            .unwrap();

        let ge = model.get_constraint(ge).unwrap();
        assert_eq!(ge.bounds.lower, 2.0);
        assert!(ge.bounds.upper.is_infinite());
        let le = model.get_constraint(le).unwrap();
        assert!(le.bounds.lower.is_infinite());
        assert_eq!(le.bounds.upper, 3.0);
        assert_eq!(model.get_constraint(eq).unwrap().bounds, Bounds::fixed(4.0));
    }

    #[test]
    fn add_constraint_expr_merges_duplicate_terms() {
        let mut model = Model::new();
        let x = model.add_variable(column_between(0.0, 1.0)).unwrap();
        let y = model.add_variable(column_between(0.0, 1.0)).unwrap();

        let mut expr = Expr::sum([x, y, x]);
        expr.push(y, -1.0);
        let row = model.add_constraint_expr(expr.leq(1.0)).unwrap();

        assert_eq!(model.rows()[row.index()], vec![(x, 2.0)]);
    }

    #[test]
    fn minimize_twice_is_rejected() {
        let mut model = Model::new();
        let x = model.add_variable(column_between(0.0, 10.0)).unwrap();

        model.minimize(Expr::term(x, 1.0)).unwrap();
        assert_eq!(model.objective().sense, Some(Sense::Minimize));
        assert_eq!(
            model.minimize(Expr::term(x, 2.0)),
            Err(ModelError::MultipleObjectives)
        );
    }

    #[test]
    fn maximize_merges_repeated_terms() {
        let mut model = Model::new();
        let x = model.add_variable(column_between(0.0, 10.0)).unwrap();
        let mut expr = Expr::term(x, 3.0);
        expr.push(x, 1.0);

        model.maximize(expr).unwrap();
        assert_eq!(model.objective().sense, Some(Sense::Maximize));
        assert_eq!(model.objective().terms, vec![(x, 4.0)]);
        assert_eq!(
            model.maximize(Expr::term(x, 1.0)),
            Err(ModelError::MultipleObjectives)
        );
    }

    #[test]
    fn variable_and_constraint_bounds_are_validated() {
        let mut model = Model::new();
        assert!(matches!(
            model.add_variable(column_between(5.0, 1.0)),
            Err(ModelError::InvalidBounds {
                kind: "variable",
                ..
            })
        ));
        assert!(matches!(
            model.add_constraint(row_between(10.0, 0.0)),
            Err(ModelError::InvalidBounds {
                kind: "constraint",
                ..
            })
        ));
    }

    #[test]
    fn names_round_trip_and_lookup() {
        let mut model = Model::new();
        let x = model.add_variable(column_between(0.0, 1.0)).unwrap();
        let y = model.add_variable(column_between(0.0, 1.0)).unwrap();
        let row = model.add_constraint(row_between(0.0, 1.0)).unwrap();

        assert!(model.get_variable_name(x).is_none());
        model.set_variable_name(x, "a[c1]").unwrap();
        model.set_constraint_name(row, "global_balance").unwrap();

        assert_eq!(model.get_variable_name(x), Some("a[c1]"));
        assert_eq!(model.get_variable_by_name("a[c1]"), Some(x));
        assert_eq!(model.get_constraint_by_name("global_balance"), Some(row));
        assert_eq!(model.num_names(), (1, 1));
        assert_eq!(
            model.set_variable_name(VariableId::new(3), "nope"),
            Err(ModelError::InvalidVariableId(VariableId::new(3)))
        );
        assert_eq!(
            model.set_variable_name(y, "a[c1]").unwrap_err().code(),
            "MODEL_DUPLICATE_NAME"
        );
    }

    #[test]
    fn relabelling_frees_the_old_name() {
        let mut model = Model::new();
        let x = model.add_variable(column_between(0.0, 1.0)).unwrap();
        let y = model.add_variable(column_between(0.0, 1.0)).unwrap();

        model.set_variable_name(x, "first").unwrap();
        model.set_variable_name(x, "second").unwrap();
        assert_eq!(model.get_variable_by_name("first"), None);
        model.set_variable_name(y, "first").unwrap();
        assert_eq!(model.get_variable_by_name("first"), Some(y));
        // Re-applying the same label is a no-op.
        model.set_variable_name(y, "first").unwrap();
    }
}
