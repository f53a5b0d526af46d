use crate::expr::{ConstraintExpr, Expr};
use crate::ids::{ConstraintId, VariableId};
use crate::types::{Bounds, Constraint, Objective, Sense, Variable};

use crate::model::Model;
use crate::model::error::ModelError;

fn check_bounds(kind: &'static str, bounds: Bounds) -> Result<(), ModelError> {
    if bounds.is_valid() {
        Ok(())
    } else {
        Err(ModelError::InvalidBounds {
            kind,
            lower: bounds.lower,
            upper: bounds.upper,
        })
    }
}

fn check_coefficient(coefficient: f64) -> Result<(), ModelError> {
    if coefficient.is_finite() {
        Ok(())
    } else {
        Err(ModelError::InvalidCoefficient { coefficient })
    }
}

impl Model {
    /// Append a column. Its id is its position.
    pub fn add_variable(&mut self, variable: Variable) -> Result<VariableId, ModelError> {
        check_bounds("variable", variable.bounds)?;
        let id = VariableId::new(self.variables.len() as u32);
        self.variables.push(variable);
        self.columns.push(Vec::new());
        Ok(id)
    }

    pub fn add_named_variable(
        &mut self,
        variable: Variable,
        name: impl Into<String>,
    ) -> Result<VariableId, ModelError> {
        let id = self.add_variable(variable)?;
        self.set_variable_name(id, name)?;
        Ok(id)
    }

    /// Append an empty row. Its id is its position.
    pub fn add_constraint(&mut self, constraint: Constraint) -> Result<ConstraintId, ModelError> {
        check_bounds("constraint", constraint.bounds)?;
        let id = ConstraintId::new(self.constraints.len() as u32);
        self.constraints.push(constraint);
        Ok(id)
    }

    /// Replace the objective.
    pub fn set_objective(&mut self, objective: Objective) -> Result<(), ModelError> {
        let sense = objective.sense.ok_or(ModelError::NoObjective)?;
        for &(var_id, coeff) in &objective.terms {
            self.ensure_variable_exists(var_id)?;
            check_coefficient(coeff)?;
        }
        let terms = self.normalize_terms(objective.terms);
        tracing::debug!(
            component = "model",
            operation = "set_objective",
            status = "success",
            sense = ?sense,
            terms = terms.len(),
            "Set objective function"
        );
        self.objective = Objective {
            sense: Some(sense),
            terms,
        };
        Ok(())
    }

    /// Fails with [`ModelError::MultipleObjectives`] once an objective exists.
    pub fn minimize(&mut self, expr: Expr) -> Result<(), ModelError> {
        self.first_objective(Sense::Minimize, expr)
    }

    /// Fails with [`ModelError::MultipleObjectives`] once an objective exists.
    pub fn maximize(&mut self, expr: Expr) -> Result<(), ModelError> {
        self.first_objective(Sense::Maximize, expr)
    }

    fn first_objective(&mut self, sense: Sense, expr: Expr) -> Result<(), ModelError> {
        if self.objective.sense.is_some() {
            return Err(ModelError::MultipleObjectives);
        }
        // The constant is dropped.
        let (terms, _) = expr.into_parts();
        self.set_objective(Objective {
            sense: Some(sense),
            terms,
        })
    }

    /// Add `bounds.lower <= expr <= bounds.upper`, duplicates merged.
    pub fn add_expr_constraint(
        &mut self,
        expr: Expr,
        bounds: Bounds,
    ) -> Result<ConstraintId, ModelError> {
        let (terms, _) = expr.into_parts();
        for &(var_id, coeff) in &terms {
            self.ensure_variable_exists(var_id)?;
            check_coefficient(coeff)?;
        }
        let row = self.add_constraint(Constraint { bounds })?;
        for (var_id, coeff) in self.normalize_terms(terms) {
            self.columns[var_id.index()].push((row, coeff));
        }
        Ok(row)
    }

    pub fn add_constraint_expr(
        &mut self,
        constraint: ConstraintExpr,
    ) -> Result<ConstraintId, ModelError> {
        let (expr, sense, rhs) = constraint.into_parts();
        self.add_expr_constraint(expr, sense.bounds(rhs))
    }

    pub fn add_named_constraint(
        &mut self,
        constraint: ConstraintExpr,
        name: impl Into<String>,
    ) -> Result<ConstraintId, ModelError> {
        let id = self.add_constraint_expr(constraint)?;
        self.set_constraint_name(id, name)?;
        Ok(id)
    }

    /// Write one matrix entry, overwriting an existing one.
    pub fn set_coefficient(
        &mut self,
        var_id: VariableId,
        constraint_id: ConstraintId,
        coefficient: f64,
    ) -> Result<(), ModelError> {
        check_coefficient(coefficient)?;
        self.ensure_variable_exists(var_id)?;
        self.ensure_constraint_exists(constraint_id)?;

        let column = &mut self.columns[var_id.index()];
        if let Some(entry) = column.iter_mut().find(|(row, _)| *row == constraint_id) {
            entry.1 = coefficient;
        } else {
            column.push((constraint_id, coefficient));
        }
        Ok(())
    }
}
