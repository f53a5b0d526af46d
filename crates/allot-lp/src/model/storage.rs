use crate::ids::{ConstraintId, VariableId};
use crate::types::{Constraint, Variable};

use super::Model;
use super::error::ModelError;

impl Model {
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Stored matrix entries.
    pub fn num_coefficients(&self) -> usize {
        self.columns.iter().map(Vec::len).sum()
    }

    pub fn get_variable(&self, id: VariableId) -> Result<&Variable, ModelError> {
        self.variables
            .get(id.index())
            .ok_or(ModelError::InvalidVariableId(id))
    }

    pub fn get_constraint(&self, id: ConstraintId) -> Result<&Constraint, ModelError> {
        self.constraints
            .get(id.index())
            .ok_or(ModelError::InvalidConstraintId(id))
    }

    pub fn variables(&self) -> impl Iterator<Item = (VariableId, &Variable)> {
        (0u32..).map(VariableId::new).zip(&self.variables)
    }

    pub fn constraints(&self) -> impl Iterator<Item = (ConstraintId, &Constraint)> {
        (0u32..).map(ConstraintId::new).zip(&self.constraints)
    }

    /// Matrix entries grouped by column, in column order.
    pub fn columns(&self) -> impl Iterator<Item = (VariableId, &[(ConstraintId, f64)])> {
        (0u32..)
            .map(VariableId::new)
            .zip(self.columns.iter().map(Vec::as_slice))
    }

    /// Matrix entries grouped by row. Entries within a row are in column order.
    pub fn rows(&self) -> Vec<Vec<(VariableId, f64)>> {
        let mut rows = vec![Vec::new(); self.constraints.len()];
        for (var_id, entries) in self.columns() {
            for &(row, coeff) in entries {
                rows[row.index()].push((var_id, coeff));
            }
        }
        rows
    }

    pub fn get_column(&self, var_id: VariableId) -> Option<&[(ConstraintId, f64)]> {
        self.columns.get(var_id.index()).map(Vec::as_slice)
    }
}
