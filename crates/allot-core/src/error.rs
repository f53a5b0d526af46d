//! Top-level error for an allocation run.

use allot_lp::{SolverError, SolverStatus};

use crate::entity::EntityError;
use crate::formulation::FormulationError;
use crate::partition::PartitionError;

/// Any error raised between entity construction and record extraction.
#[derive(Debug, Clone, PartialEq)]
pub enum AllocationError {
    Entity(EntityError),
    Partition(PartitionError),
    Formulation(FormulationError),
    /// Solver failed for a reason other than the model's status.
    Solver(SolverError),
    /// Records were requested from a run without a usable solution.
    NoSolution { status: SolverStatus },
}

impl AllocationError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            AllocationError::Entity(err) => err.code(),
            AllocationError::Partition(err) => err.code(),
            AllocationError::Formulation(err) => err.code(),
            AllocationError::Solver(err) => err.code(),
            AllocationError::NoSolution { .. } => "ALLOCATION_NO_SOLUTION",
        }
    }
}

impl std::fmt::Display for AllocationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AllocationError::Entity(err) => write!(f, "{err}"),
            AllocationError::Partition(err) => write!(f, "{err}"),
            AllocationError::Formulation(err) => write!(f, "{err}"),
            AllocationError::Solver(err) => write!(f, "{err}"),
            AllocationError::NoSolution { status } => write!(
                f,
                "[{}] No allocation to extract, solver finished with status {}",
                self.code(),
                status
            ),
        }
    }
}

impl std::error::Error for AllocationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AllocationError::Entity(err) => Some(err),
            AllocationError::Partition(err) => Some(err),
            AllocationError::Formulation(err) => Some(err),
            AllocationError::Solver(err) => Some(err),
            AllocationError::NoSolution { .. } => None,
        }
    }
}

impl From<EntityError> for AllocationError {
    fn from(err: EntityError) -> Self {
        AllocationError::Entity(err)
    }
}

impl From<PartitionError> for AllocationError {
    fn from(err: PartitionError) -> Self {
        AllocationError::Partition(err)
    }
}

impl From<FormulationError> for AllocationError {
    fn from(err: FormulationError) -> Self {
        AllocationError::Formulation(err)
    }
}

impl From<SolverError> for AllocationError {
    fn from(err: SolverError) -> Self {
        AllocationError::Solver(err)
    }
}
