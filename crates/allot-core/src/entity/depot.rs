use std::collections::BTreeMap;

use super::keys::{CargoId, DepotId, TownId};

/// Per-depot view of cargo capacities and town demands.
///
/// Both maps only grow. Inserting an existing key keeps the first value.
#[derive(Debug, Clone, PartialEq)]
pub struct Depot {
    id: DepotId,
    capacities: BTreeMap<CargoId, f64>,
    demands: BTreeMap<TownId, f64>,
}

impl Depot {
    pub fn new(id: impl Into<DepotId>) -> Self {
        Self {
            id: id.into(),
            capacities: BTreeMap::new(),
            demands: BTreeMap::new(),
        }
    }

    /// Record a cargo capacity. Returns `false` when the cargo was already present.
    pub fn insert_capacity(&mut self, cargo: &CargoId, capacity: f64) -> bool {
        if self.capacities.contains_key(cargo) {
            return false;
        }
        self.capacities.insert(cargo.clone(), capacity);
        true
    }

    /// Record a town demand. Returns `false` when the town was already present.
    pub fn insert_demand(&mut self, town: &TownId, demand: f64) -> bool {
        if self.demands.contains_key(town) {
            return false;
        }
        self.demands.insert(town.clone(), demand);
        true
    }

    pub fn id(&self) -> &DepotId {
        &self.id
    }

    pub fn capacity(&self, cargo: &CargoId) -> Option<f64> {
        self.capacities.get(cargo).copied()
    }

    pub fn demand(&self, town: &TownId) -> Option<f64> {
        self.demands.get(town).copied()
    }

    /// Sum of all recorded cargo capacities.
    pub fn total_capacity(&self) -> f64 {
        self.capacities.values().sum()
    }

    pub fn total_demand(&self) -> f64 {
        self.demands.values().sum()
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn inserts_are_idempotent() {
        let mut depot = Depot::new("north");
        let cargo = CargoId::from("fast");
        assert!(depot.insert_capacity(&cargo, 50.0));
        assert!(!depot.insert_capacity(&cargo, 80.0));
        assert_eq!(depot.capacity(&cargo), Some(50.0));

        let town = TownId::from("c~t");
        assert!(depot.insert_demand(&town, 7.0));
        assert!(!depot.insert_demand(&town, 9.0));
        assert_eq!(depot.demand(&town), Some(7.0));
    }

    #[test]
    fn totals_sum_cached_values() {
        let mut depot = Depot::new("north");
        depot.insert_capacity(&"a".into(), 10.0);
        depot.insert_capacity(&"b".into(), 15.0);
        depot.insert_demand(&"x~1".into(), 3.0);
        assert_eq!(depot.total_capacity(), 25.0);
        assert_eq!(depot.total_demand(), 3.0);
        assert_eq!(depot.id().as_str(), "north");
    }
}
