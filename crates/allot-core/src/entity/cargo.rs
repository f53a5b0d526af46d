use std::collections::BTreeMap;

use super::error::EntityError;
use super::keys::{CargoId, TownGroup};

/// Inclusive share bounds, both in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatioBounds {
    pub min: f64,
    pub max: f64,
}

impl RatioBounds {
    pub fn new(min: f64, max: f64) -> Result<Self, EntityError> {
        for value in [min, max] {
            if !(0.0..=1.0).contains(&value) {
                return Err(EntityError::InvalidRatio { value });
            }
        }
        if min > max {
            return Err(EntityError::InvertedRatio { min, max });
        }
        Ok(Self { min, max })
    }

    /// `[0, 1]`, no restriction.
    pub fn unrestricted() -> Self {
        Self { min: 0.0, max: 1.0 }
    }
}

/// A carrier with capacity, a global share window and per-group share windows.
#[derive(Debug, Clone, PartialEq)]
pub struct Cargo {
    id: CargoId,
    capacity: f64,
    global: RatioBounds,
    groups: BTreeMap<TownGroup, RatioBounds>,
}

impl Cargo {
    pub fn new(
        id: impl Into<CargoId>,
        capacity: f64,
        global: RatioBounds,
    ) -> Result<Self, EntityError> {
        let id = id.into();
        if !capacity.is_finite() || capacity < 0.0 {
            return Err(EntityError::InvalidCapacity {
                owner: id.to_string(),
                value: capacity,
            });
        }
        Ok(Self {
            id,
            capacity,
            global,
            groups: BTreeMap::new(),
        })
    }

    /// Set the share window for one town group.
    pub fn with_group_ratio(mut self, group: impl Into<TownGroup>, bounds: RatioBounds) -> Self {
        self.groups.insert(group.into(), bounds);
        self
    }

    /// Copy of this cargo with a depot-specific capacity.
    pub fn with_capacity(&self, capacity: f64) -> Result<Self, EntityError> {
        let mut cargo = Cargo::new(self.id.clone(), capacity, self.global)?;
        cargo.groups = self.groups.clone();
        Ok(cargo)
    }

    pub fn id(&self) -> &CargoId {
        &self.id
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    pub fn global_ratio(&self) -> RatioBounds {
        self.global
    }

    pub fn group_ratio(&self, group: &TownGroup) -> Option<RatioBounds> {
        self.groups.get(group).copied()
    }

    pub fn groups(&self) -> impl Iterator<Item = (&TownGroup, &RatioBounds)> {
        self.groups.iter()
    }

    /// Whether both cargos carry the same global and per-group windows.
    pub fn same_windows(&self, other: &Cargo) -> bool {
        self.global == other.global && self.groups == other.groups
    }
}
