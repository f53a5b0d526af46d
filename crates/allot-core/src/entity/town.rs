use std::collections::BTreeMap;

use super::error::EntityError;
use super::keys::{CargoId, TownGroup, TownId};

/// Round a raw demand to whole units, flooring an exact zero to 1.
///
/// Negative and non-finite inputs are rejected.
pub fn normalize_demand(town: &TownId, raw: f64) -> Result<f64, EntityError> {
    if !raw.is_finite() || raw < 0.0 {
        return Err(EntityError::InvalidDemand {
            town: town.to_string(),
            value: raw,
        });
    }
    Ok(raw.round().max(1.0))
}

/// Same-day and carry-over delivery data for one (town, cargo) pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeliveryModes {
    pub same_day_capacity: f64,
    pub same_day_cost: f64,
    pub carry_over_capacity: f64,
    pub carry_over_cost: f64,
}

impl DeliveryModes {
    pub fn validate(&self, owner: &str) -> Result<(), EntityError> {
        for value in [self.same_day_capacity, self.carry_over_capacity] {
            if !value.is_finite() || value < 0.0 {
                return Err(EntityError::InvalidCapacity {
                    owner: owner.to_string(),
                    value,
                });
            }
        }
        for value in [self.same_day_cost, self.carry_over_cost] {
            if !value.is_finite() {
                return Err(EntityError::InvalidScore {
                    owner: owner.to_string(),
                    value,
                });
            }
        }
        Ok(())
    }
}

/// A demand point within one inventory.
#[derive(Debug, Clone, PartialEq)]
pub struct Town {
    id: TownId,
    group: TownGroup,
    demand: f64,
    scores: BTreeMap<CargoId, f64>,
    delivery: BTreeMap<CargoId, DeliveryModes>,
}

impl Town {
    /// Create a town. `raw_demand` goes through [`normalize_demand`].
    pub fn new(
        id: impl Into<TownId>,
        group: impl Into<TownGroup>,
        raw_demand: f64,
    ) -> Result<Self, EntityError> {
        let id = id.into();
        let demand = normalize_demand(&id, raw_demand)?;
        Ok(Self {
            id,
            group: group.into(),
            demand,
            scores: BTreeMap::new(),
            delivery: BTreeMap::new(),
        })
    }

    /// Set the NPS score for a cargo.
    pub fn with_score(mut self, cargo: impl Into<CargoId>, score: f64) -> Result<Self, EntityError> {
        if !score.is_finite() {
            return Err(EntityError::InvalidScore {
                owner: self.id.to_string(),
                value: score,
            });
        }
        self.scores.insert(cargo.into(), score);
        Ok(self)
    }

    /// Attach delivery-mode data for a cargo.
    pub fn set_delivery_modes(
        &mut self,
        cargo: impl Into<CargoId>,
        modes: DeliveryModes,
    ) -> Result<(), EntityError> {
        modes.validate(self.id.as_str())?;
        self.delivery.insert(cargo.into(), modes);
        Ok(())
    }

    /// Copy of this town with a depot-specific demand.
    pub fn with_demand(&self, raw_demand: f64) -> Result<Self, EntityError> {
        let demand = normalize_demand(&self.id, raw_demand)?;
        Ok(Self {
            demand,
            ..self.clone()
        })
    }

    pub fn id(&self) -> &TownId {
        &self.id
    }

    pub fn group(&self) -> &TownGroup {
        &self.group
    }

    /// Whole-unit demand, never below 1.
    pub fn demand(&self) -> f64 {
        self.demand
    }

    pub fn score(&self, cargo: &CargoId) -> Option<f64> {
        self.scores.get(cargo).copied()
    }

    pub fn delivery_modes(&self, cargo: &CargoId) -> Option<DeliveryModes> {
        self.delivery.get(cargo).copied()
    }

    pub fn has_delivery_modes(&self) -> bool {
        !self.delivery.is_empty()
    }
}
