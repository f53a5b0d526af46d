use allot_lp::ModelError;

/// Error raised while translating a partition into a model.
#[derive(Debug, Clone, PartialEq)]
pub enum FormulationError {
    /// Overflow penalty must be a finite, non-negative number.
    InvalidExceedCost(f64),
    /// The underlying model rejected a variable, row or objective.
    Model(ModelError),
}

impl FormulationError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            FormulationError::InvalidExceedCost(_) => "FORMULATION_INVALID_EXCEED_COST",
            FormulationError::Model(err) => err.code(),
        }
    }
}

impl std::fmt::Display for FormulationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormulationError::InvalidExceedCost(cost) => {
                write!(f, "[{}] Exceed cost {} is invalid", self.code(), cost)
            }
            FormulationError::Model(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for FormulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FormulationError::Model(err) => Some(err),
            FormulationError::InvalidExceedCost(_) => None,
        }
    }
}

impl From<ModelError> for FormulationError {
    fn from(err: ModelError) -> Self {
        FormulationError::Model(err)
    }
}
