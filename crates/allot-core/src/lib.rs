//! Carrier allocation over depot inventories.
//!
//! The pipeline is:
//!
//! 1. [`entity`]: validated cargo, town and depot values
//! 2. [`partition`]: towns and cargos grouped per depot and aligned by position
//! 3. [`formulation`]: the linear program over the partition
//! 4. [`allocate`]: solving through any [`allot_lp::Solver`], with an optional relaxed retry
//! 5. [`extract`] and [`sink`]: per (depot, town) ratios handed to an output sink

pub mod allocate;
pub mod entity;
mod error;
pub mod extract;
pub mod formulation;
pub mod partition;
pub mod sink;

#[cfg(test)]
mod fixture;

pub use allocate::{AllocationOutcome, AllocationStatus, Allocator};
pub use entity::{
    Cargo, CargoId, DeliveryModes, Depot, DepotId, EntityError, RatioBounds, Town, TownGroup,
    TownId,
};
pub use error::AllocationError;
pub use extract::{OutputLayout, OutputRecord};
pub use formulation::{
    AllocationModel, FormulationError, GroupCapPolicy, ModelBuilder, ModelOptions, ModelSize,
};
pub use partition::{EntitySet, Inventory, Partition, PartitionError};
pub use sink::{MemorySink, RecordSink, emit};
