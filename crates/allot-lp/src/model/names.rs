//! Row and column labels.
//!
//! Labels are optional but unique per kind, so a label resolves to at most
//! one column (or row).

use std::collections::HashMap;

use crate::ids::{ConstraintId, VariableId};

use crate::model::Model;
use crate::model::error::ModelError;

/// Two-way label map for one kind of handle.
#[derive(Debug, Clone)]
pub(crate) struct NameTable<Id> {
    by_id: HashMap<Id, String>,
    by_name: HashMap<String, Id>,
}

impl<Id> Default for NameTable<Id> {
    fn default() -> Self {
        Self {
            by_id: HashMap::new(),
            by_name: HashMap::new(),
        }
    }
}

impl<Id: Copy + Eq + std::hash::Hash> NameTable<Id> {
    fn assign(&mut self, id: Id, name: String) -> Result<(), ModelError> {
        match self.by_name.get(&name) {
            Some(owner) if *owner == id => return Ok(()),
            Some(_) => return Err(ModelError::DuplicateName { name }),
            None => {}
        }
        if let Some(previous) = self.by_id.insert(id, name.clone()) {
            self.by_name.remove(&previous);
        }
        self.by_name.insert(name, id);
        Ok(())
    }

    fn name(&self, id: Id) -> Option<&str> {
        self.by_id.get(&id).map(String::as_str)
    }

    fn lookup(&self, name: &str) -> Option<Id> {
        self.by_name.get(name).copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.by_id.len()
    }
}

impl Model {
    /// Label a column. Relabelling replaces the previous label.
    pub fn set_variable_name(
        &mut self,
        id: VariableId,
        name: impl Into<String>,
    ) -> Result<(), ModelError> {
        self.ensure_variable_exists(id)?;
        self.variable_names.assign(id, name.into())
    }

    pub fn get_variable_name(&self, id: VariableId) -> Option<&str> {
        self.variable_names.name(id)
    }

    pub fn get_variable_by_name(&self, name: &str) -> Option<VariableId> {
        self.variable_names.lookup(name)
    }

    /// Label a row. Relabelling replaces the previous label.
    pub fn set_constraint_name(
        &mut self,
        id: ConstraintId,
        name: impl Into<String>,
    ) -> Result<(), ModelError> {
        self.ensure_constraint_exists(id)?;
        self.constraint_names.assign(id, name.into())
    }

    pub fn get_constraint_name(&self, id: ConstraintId) -> Option<&str> {
        self.constraint_names.name(id)
    }

    pub fn get_constraint_by_name(&self, name: &str) -> Option<ConstraintId> {
        self.constraint_names.lookup(name)
    }

    /// Number of labelled columns and rows.
    pub fn num_names(&self) -> (usize, usize) {
        (self.variable_names.len(), self.constraint_names.len())
    }
}
