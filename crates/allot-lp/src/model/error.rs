use crate::ids::{ConstraintId, VariableId};

/// Rejected model edits.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    InvalidVariableId(VariableId),
    InvalidConstraintId(ConstraintId),
    /// Lower bound above upper bound, or a NaN bound.
    InvalidBounds {
        kind: &'static str,
        lower: f64,
        upper: f64,
    },
    InvalidCoefficient { coefficient: f64 },
    /// A label already used by another column (or row).
    DuplicateName { name: String },
    NoObjective,
    MultipleObjectives,
}

impl ModelError {
    pub fn code(&self) -> &'static str {
        match self {
            ModelError::InvalidVariableId(_) => "MODEL_UNKNOWN_VARIABLE",
            ModelError::InvalidConstraintId(_) => "MODEL_UNKNOWN_CONSTRAINT",
            ModelError::InvalidBounds { .. } => "MODEL_INVALID_BOUNDS",
            ModelError::InvalidCoefficient { .. } => "MODEL_INVALID_COEFFICIENT",
            ModelError::DuplicateName { .. } => "MODEL_DUPLICATE_NAME",
            ModelError::NoObjective => "MODEL_NO_OBJECTIVE",
            ModelError::MultipleObjectives => "MODEL_OBJECTIVE_ALREADY_SET",
        }
    }
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = self.code();
        match self {
            ModelError::InvalidVariableId(id) => write!(f, "[{code}] unknown {id}"),
            ModelError::InvalidConstraintId(id) => write!(f, "[{code}] unknown {id}"),
            ModelError::InvalidBounds { kind, lower, upper } => {
                write!(f, "[{code}] {kind} bounds [{lower}, {upper}] are empty")
            }
            ModelError::InvalidCoefficient { coefficient } => {
                write!(f, "[{code}] coefficient {coefficient} is not finite")
            }
            ModelError::DuplicateName { name } => {
                write!(f, "[{code}] label '{name}' is already taken")
            }
            ModelError::NoObjective => write!(f, "[{code}] objective has no sense"),
            ModelError::MultipleObjectives => {
                write!(f, "[{code}] objective is already set")
            }
        }
    }
}

impl std::error::Error for ModelError {}
