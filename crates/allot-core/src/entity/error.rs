//! Entity validation errors.

/// Error raised while constructing an entity value.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityError {
    /// Ratio outside `[0, 1]` or not a number.
    InvalidRatio { value: f64 },
    /// Minimum ratio above maximum ratio.
    InvertedRatio { min: f64, max: f64 },
    /// Negative or non-finite demand.
    InvalidDemand { town: String, value: f64 },
    /// Negative or non-finite capacity.
    InvalidCapacity { owner: String, value: f64 },
    /// Non-finite cost or score.
    InvalidScore { owner: String, value: f64 },
}

impl EntityError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            EntityError::InvalidRatio { .. } => "ENTITY_INVALID_RATIO",
            EntityError::InvertedRatio { .. } => "ENTITY_INVERTED_RATIO",
            EntityError::InvalidDemand { .. } => "ENTITY_INVALID_DEMAND",
            EntityError::InvalidCapacity { .. } => "ENTITY_INVALID_CAPACITY",
            EntityError::InvalidScore { .. } => "ENTITY_INVALID_SCORE",
        }
    }
}

impl std::fmt::Display for EntityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityError::InvalidRatio { value } => {
                write!(f, "[{}] Ratio {} is outside [0, 1]", self.code(), value)
            }
            EntityError::InvertedRatio { min, max } => write!(
                f,
                "[{}] Minimum ratio {} exceeds maximum ratio {}",
                self.code(),
                min,
                max
            ),
            EntityError::InvalidDemand { town, value } => write!(
                f,
                "[{}] Town '{}' has invalid demand {}",
                self.code(),
                town,
                value
            ),
            EntityError::InvalidCapacity { owner, value } => write!(
                f,
                "[{}] '{}' has invalid capacity {}",
                self.code(),
                owner,
                value
            ),
            EntityError::InvalidScore { owner, value } => write!(
                f,
                "[{}] '{}' has non-finite score {}",
                self.code(),
                owner,
                value
            ),
        }
    }
}

impl std::error::Error for EntityError {}
