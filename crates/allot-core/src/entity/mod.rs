//! Cargo, town and depot value objects.
//!
//! Entities are validated on construction and read-only afterwards.

mod cargo;
mod depot;
mod error;
mod keys;
mod town;

pub use cargo::{Cargo, RatioBounds};
pub use depot::Depot;
pub use error::EntityError;
pub use keys::{CargoId, DepotId, TownGroup, TownId};
pub use town::{DeliveryModes, Town, normalize_demand};
