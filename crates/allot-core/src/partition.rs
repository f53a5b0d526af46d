//! Grouping of towns and cargos into aligned per-depot inventories.
//!
//! The model builder indexes cargos and towns by position. After
//! [`Partition::build`] every inventory lists the same cargo ids and town
//! ids in the same order as the first inventory.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

use tracing::debug;

use crate::entity::{Cargo, CargoId, Depot, DepotId, Town, TownGroup, TownId};

/// Error raised when inventories cannot be aligned.
#[derive(Debug, Clone, PartialEq)]
pub enum PartitionError {
    /// No depot contributed any entity.
    Empty,
    /// A depot has no cargos or no towns.
    EmptyInventory { depot: DepotId },
    /// Same cargo id listed twice for one depot.
    DuplicateCargo { depot: DepotId, cargo: CargoId },
    /// Same town id listed twice for one depot.
    DuplicateTown { depot: DepotId, town: TownId },
    /// Cargo count differs from the first inventory.
    CargoCountMismatch {
        depot: DepotId,
        expected: usize,
        found: usize,
    },
    /// Town count differs from the first inventory.
    TownCountMismatch {
        depot: DepotId,
        expected: usize,
        found: usize,
    },
    /// A cargo of the first inventory is absent from this depot.
    MissingCargo { depot: DepotId, cargo: CargoId },
    /// A town of the first inventory is absent from this depot.
    MissingTown { depot: DepotId, town: TownId },
    /// A cargo has no share window for a group used by the inventory's towns.
    MissingGroupRatio {
        depot: DepotId,
        cargo: CargoId,
        group: TownGroup,
    },
    /// A town sits in a different group than in the first inventory.
    TownGroupMismatch {
        depot: DepotId,
        town: TownId,
        expected: TownGroup,
        found: TownGroup,
    },
    /// A cargo's share windows differ from the first inventory.
    CargoWindowMismatch { depot: DepotId, cargo: CargoId },
    /// A town has no NPS score for a cargo of its inventory.
    MissingScore {
        depot: DepotId,
        town: TownId,
        cargo: CargoId,
    },
}

impl PartitionError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            PartitionError::Empty => "PARTITION_EMPTY",
            PartitionError::EmptyInventory { .. } => "PARTITION_EMPTY_INVENTORY",
            PartitionError::DuplicateCargo { .. } => "PARTITION_DUPLICATE_CARGO",
            PartitionError::DuplicateTown { .. } => "PARTITION_DUPLICATE_TOWN",
            PartitionError::CargoCountMismatch { .. } => "PARTITION_CARGO_COUNT_MISMATCH",
            PartitionError::TownCountMismatch { .. } => "PARTITION_TOWN_COUNT_MISMATCH",
            PartitionError::MissingCargo { .. } => "PARTITION_CARGO_MISMATCH",
            PartitionError::MissingTown { .. } => "PARTITION_TOWN_MISMATCH",
            PartitionError::MissingGroupRatio { .. } => "PARTITION_MISSING_GROUP_RATIO",
            PartitionError::TownGroupMismatch { .. } => "PARTITION_TOWN_GROUP_MISMATCH",
            PartitionError::CargoWindowMismatch { .. } => "PARTITION_CARGO_WINDOW_MISMATCH",
            PartitionError::MissingScore { .. } => "PARTITION_MISSING_SCORE",
        }
    }
}

impl std::fmt::Display for PartitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = self.code();
        match self {
            PartitionError::Empty => write!(f, "[{code}] No depot has any cargo or town"),
            PartitionError::EmptyInventory { depot } => {
                write!(f, "[{code}] Depot '{depot}' needs at least one cargo and one town")
            }
            PartitionError::DuplicateCargo { depot, cargo } => {
                write!(f, "[{code}] Cargo '{cargo}' listed twice for depot '{depot}'")
            }
            PartitionError::DuplicateTown { depot, town } => {
                write!(f, "[{code}] Town '{town}' listed twice for depot '{depot}'")
            }
            PartitionError::CargoCountMismatch {
                depot,
                expected,
                found,
            } => write!(
                f,
                "[{code}] Depot '{depot}' has {found} cargos, expected {expected}"
            ),
            PartitionError::TownCountMismatch {
                depot,
                expected,
                found,
            } => write!(
                f,
                "[{code}] Depot '{depot}' has {found} towns, expected {expected}"
            ),
            PartitionError::MissingCargo { depot, cargo } => {
                write!(f, "[{code}] Depot '{depot}' has no cargo '{cargo}'")
            }
            PartitionError::MissingTown { depot, town } => {
                write!(f, "[{code}] Depot '{depot}' has no town '{town}'")
            }
            PartitionError::MissingGroupRatio {
                depot,
                cargo,
                group,
            } => write!(
                f,
                "[{code}] Cargo '{cargo}' at depot '{depot}' has no ratio for town group '{group}'"
            ),
            PartitionError::TownGroupMismatch {
                depot,
                town,
                expected,
                found,
            } => write!(
                f,
                "[{code}] Town '{town}' is in group '{found}' at depot '{depot}' but '{expected}' elsewhere"
            ),
            PartitionError::CargoWindowMismatch { depot, cargo } => write!(
                f,
                "[{code}] Cargo '{cargo}' at depot '{depot}' has share windows that differ from the first depot"
            ),
            PartitionError::MissingScore { depot, town, cargo } => write!(
                f,
                "[{code}] Town '{town}' at depot '{depot}' has no score for cargo '{cargo}'"
            ),
        }
    }
}

impl std::error::Error for PartitionError {}

/// Flat entity input, each cargo and town tagged with its depot.
#[derive(Debug, Clone, Default)]
pub struct EntitySet {
    depots: Vec<DepotId>,
    cargos: Vec<(DepotId, Cargo)>,
    towns: Vec<(DepotId, Town)>,
}

impl EntitySet {
    pub fn new() -> Self {
        Self::default()
    }

    fn touch_depot(&mut self, depot: &DepotId) {
        if !self.depots.contains(depot) {
            self.depots.push(depot.clone());
        }
    }

    pub fn add_cargo(&mut self, depot: impl Into<DepotId>, cargo: Cargo) {
        let depot = depot.into();
        self.touch_depot(&depot);
        self.cargos.push((depot, cargo));
    }

    pub fn add_town(&mut self, depot: impl Into<DepotId>, town: Town) {
        let depot = depot.into();
        self.touch_depot(&depot);
        self.towns.push((depot, town));
    }

    /// Depots in first-seen order.
    pub fn depots(&self) -> &[DepotId] {
        &self.depots
    }

    pub fn num_cargos(&self) -> usize {
        self.cargos.len()
    }

    pub fn num_towns(&self) -> usize {
        self.towns.len()
    }
}

/// All towns and cargos of one depot, aligned to the partition order.
#[derive(Debug, Clone)]
pub struct Inventory {
    depot: Depot,
    cargos: Vec<Cargo>,
    towns: Vec<Town>,
}

impl Inventory {
    pub fn depot(&self) -> &Depot {
        &self.depot
    }

    pub fn cargos(&self) -> &[Cargo] {
        &self.cargos
    }

    pub fn towns(&self) -> &[Town] {
        &self.towns
    }
}

/// Aligned inventories in depot first-seen order.
#[derive(Debug, Clone)]
pub struct Partition {
    inventories: Vec<Inventory>,
    order_amount: f64,
}

impl Partition {
    /// Group and align the entity set.
    ///
    /// # Errors
    ///
    /// Returns an error if any inventory is empty, contains duplicates, or
    /// does not list exactly the cargos and towns of the first inventory.
    /// Missing group ratios and missing NPS scores are also rejected here,
    /// before any model variable exists.
    pub fn build(entities: &EntitySet) -> Result<Self, PartitionError> {
        let started = Instant::now();
        if entities.depots.is_empty() {
            return Err(PartitionError::Empty);
        }

        let mut grouped: Vec<(Vec<&Cargo>, Vec<&Town>)> =
            vec![(Vec::new(), Vec::new()); entities.depots.len()];
        let position = |depot: &DepotId| entities.depots.iter().position(|d| d == depot);
        for (depot, cargo) in &entities.cargos {
            if let Some(slot) = position(depot) {
                grouped[slot].0.push(cargo);
            }
        }
        for (depot, town) in &entities.towns {
            if let Some(slot) = position(depot) {
                grouped[slot].1.push(town);
            }
        }

        let mut cargo_order: Vec<CargoId> = Vec::new();
        let mut town_order: Vec<TownId> = Vec::new();
        let mut inventories = Vec::with_capacity(entities.depots.len());

        for (depot_id, (cargos, towns)) in entities.depots.iter().zip(grouped) {
            if cargos.is_empty() || towns.is_empty() {
                return Err(PartitionError::EmptyInventory {
                    depot: depot_id.clone(),
                });
            }
            let cargos = index_unique(depot_id, cargos, Cargo::id, |depot, cargo| {
                PartitionError::DuplicateCargo { depot, cargo }
            })?;
            let towns = index_unique(depot_id, towns, Town::id, |depot, town| {
                PartitionError::DuplicateTown { depot, town }
            })?;

            if inventories.is_empty() {
                cargo_order = cargos.keys_in_order();
                town_order = towns.keys_in_order();
            }
            if cargos.len() != cargo_order.len() {
                return Err(PartitionError::CargoCountMismatch {
                    depot: depot_id.clone(),
                    expected: cargo_order.len(),
                    found: cargos.len(),
                });
            }
            if towns.len() != town_order.len() {
                return Err(PartitionError::TownCountMismatch {
                    depot: depot_id.clone(),
                    expected: town_order.len(),
                    found: towns.len(),
                });
            }

            let cargos: Vec<Cargo> = cargo_order
                .iter()
                .map(|id| {
                    cargos
                        .get(id)
                        .cloned()
                        .ok_or_else(|| PartitionError::MissingCargo {
                            depot: depot_id.clone(),
                            cargo: id.clone(),
                        })
                })
                .collect::<Result<_, _>>()?;
            let towns: Vec<Town> = town_order
                .iter()
                .map(|id| {
                    towns
                        .get(id)
                        .cloned()
                        .ok_or_else(|| PartitionError::MissingTown {
                            depot: depot_id.clone(),
                            town: id.clone(),
                        })
                })
                .collect::<Result<_, _>>()?;

            validate_inventory(depot_id, &cargos, &towns)?;
            if let Some(first) = inventories.first() {
                match_first_inventory(depot_id, first, &cargos, &towns)?;
            }

            let mut depot = Depot::new(depot_id.clone());
            for cargo in &cargos {
                depot.insert_capacity(cargo.id(), cargo.capacity());
            }
            for town in &towns {
                depot.insert_demand(town.id(), town.demand());
            }
            inventories.push(Inventory {
                depot,
                cargos,
                towns,
            });
        }

        let order_amount = inventories
            .iter()
            .map(|inventory| inventory.depot.total_demand())
            .sum();

        debug!(
            component = "partition",
            operation = "build",
            status = "success",
            depots = inventories.len(),
            cargos = cargo_order.len(),
            towns = town_order.len(),
            order_amount,
            duration_ms = started.elapsed().as_secs_f64() * 1000.0,
            "Partitioned entities into inventories"
        );

        Ok(Self {
            inventories,
            order_amount,
        })
    }

    pub fn inventories(&self) -> &[Inventory] {
        &self.inventories
    }

    pub fn num_depots(&self) -> usize {
        self.inventories.len()
    }

    /// Cargos per inventory.
    pub fn num_cargos(&self) -> usize {
        self.inventories.first().map_or(0, |inv| inv.cargos.len())
    }

    /// Towns per inventory.
    pub fn num_towns(&self) -> usize {
        self.inventories.first().map_or(0, |inv| inv.towns.len())
    }

    /// Sum of every town's demand across every depot.
    pub fn order_amount(&self) -> f64 {
        self.order_amount
    }

    pub fn depot(&self, d: usize) -> &Depot {
        &self.inventories[d].depot
    }

    pub fn cargo(&self, d: usize, i: usize) -> &Cargo {
        &self.inventories[d].cargos[i]
    }

    pub fn town(&self, d: usize, k: usize) -> &Town {
        &self.inventories[d].towns[k]
    }

    pub fn demand(&self, d: usize, k: usize) -> f64 {
        self.town(d, k).demand()
    }

    pub fn capacity(&self, d: usize, i: usize) -> f64 {
        self.cargo(d, i).capacity()
    }

    /// Demand of town position `k` summed over all depots.
    pub fn town_demand_total(&self, k: usize) -> f64 {
        (0..self.num_depots()).map(|d| self.demand(d, k)).sum()
    }
}

/// Id-indexed entities that remember insertion order.
struct Indexed<'a, K, V> {
    order: Vec<K>,
    by_id: BTreeMap<K, &'a V>,
}

impl<K: Ord + Clone, V> Indexed<'_, K, V> {
    fn len(&self) -> usize {
        self.order.len()
    }

    fn keys_in_order(&self) -> Vec<K> {
        self.order.clone()
    }

    fn get(&self, key: &K) -> Option<&V> {
        self.by_id.get(key).copied()
    }
}

fn index_unique<'a, K, V>(
    depot: &DepotId,
    values: Vec<&'a V>,
    key: fn(&V) -> &K,
    duplicate: fn(DepotId, K) -> PartitionError,
) -> Result<Indexed<'a, K, V>, PartitionError>
where
    K: Ord + Clone,
{
    let mut order = Vec::with_capacity(values.len());
    let mut by_id = BTreeMap::new();
    for value in values {
        let id = key(value).clone();
        if by_id.insert(id.clone(), value).is_some() {
            return Err(duplicate(depot.clone(), id));
        }
        order.push(id);
    }
    Ok(Indexed { order, by_id })
}

fn validate_inventory(
    depot: &DepotId,
    cargos: &[Cargo],
    towns: &[Town],
) -> Result<(), PartitionError> {
    let groups: BTreeSet<&TownGroup> = towns.iter().map(Town::group).collect();
    for cargo in cargos {
        if let Some(group) = groups.iter().find(|g| cargo.group_ratio(g).is_none()) {
            return Err(PartitionError::MissingGroupRatio {
                depot: depot.clone(),
                cargo: cargo.id().clone(),
                group: (*group).clone(),
            });
        }
    }
    for town in towns {
        if let Some(cargo) = cargos.iter().find(|c| town.score(c.id()).is_none()) {
            return Err(PartitionError::MissingScore {
                depot: depot.clone(),
                town: town.id().clone(),
                cargo: cargo.id().clone(),
            });
        }
    }
    Ok(())
}

/// Groups and share windows are modelled once, from the first inventory.
fn match_first_inventory(
    depot: &DepotId,
    first: &Inventory,
    cargos: &[Cargo],
    towns: &[Town],
) -> Result<(), PartitionError> {
    for (expected, cargo) in first.cargos.iter().zip(cargos) {
        if !expected.same_windows(cargo) {
            return Err(PartitionError::CargoWindowMismatch {
                depot: depot.clone(),
                cargo: cargo.id().clone(),
            });
        }
    }
    for (expected, town) in first.towns.iter().zip(towns) {
        if expected.group() != town.group() {
            return Err(PartitionError::TownGroupMismatch {
                depot: depot.clone(),
                town: town.id().clone(),
                expected: expected.group().clone(),
                found: town.group().clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::entity::RatioBounds;

    fn cargo(id: &str, capacity: f64) -> Cargo {
        Cargo::new(id, capacity, RatioBounds::unrestricted())
            .unwrap()
            .with_group_ratio("A", RatioBounds::unrestricted())
    }

    fn town(id: &str, demand: f64) -> Town {
        Town::new(id, "A", demand)
            .unwrap()
            .with_score("fast", 1.0)
            .unwrap()
            .with_score("slow", 2.0)
            .unwrap()
    }

    fn two_depot_set() -> EntitySet {
        let mut set = EntitySet::new();
        set.add_cargo("north", cargo("fast", 10.0));
        set.add_cargo("north", cargo("slow", 20.0));
        set.add_town("north", town("c~1", 5.0));
        set.add_town("north", town("c~2", 6.0));
        set.add_cargo("south", cargo("slow", 30.0));
        set.add_cargo("south", cargo("fast", 40.0));
        set.add_town("south", town("c~2", 7.0));
        set.add_town("south", town("c~1", 8.0));
        set
    }

    #[test]
    fn aligns_positions_with_first_inventory() {
        let partition = Partition::build(&two_depot_set()).unwrap();
        assert_eq!(partition.num_depots(), 2);
        assert_eq!(partition.num_cargos(), 2);
        assert_eq!(partition.num_towns(), 2);

        assert_eq!(partition.cargo(1, 0).id().as_str(), "fast");
        assert_eq!(partition.capacity(1, 0), 40.0);
        assert_eq!(partition.town(1, 0).id().as_str(), "c~1");
        assert_eq!(partition.demand(1, 0), 8.0);
        assert_eq!(partition.town_demand_total(1), 13.0);
        assert_eq!(partition.order_amount(), 26.0);
    }

    #[test]
    fn depot_caches_reflect_inventory() {
        let partition = Partition::build(&two_depot_set()).unwrap();
        let south = partition.depot(1);
        assert_eq!(south.id().as_str(), "south");
        assert_eq!(south.capacity(&"slow".into()), Some(30.0));
        assert_eq!(south.demand(&"c~2".into()), Some(7.0));
    }

    #[test]
    fn empty_set_is_rejected() {
        let err = Partition::build(&EntitySet::new()).unwrap_err();
        assert_eq!(err, PartitionError::Empty);
    }

    #[test]
    fn depot_without_towns_is_rejected() {
        let mut set = EntitySet::new();
        set.add_cargo("north", cargo("fast", 1.0));
        let err = Partition::build(&set).unwrap_err();
        assert_eq!(err.code(), "PARTITION_EMPTY_INVENTORY");
    }

    #[test]
    fn town_count_mismatch_is_rejected() {
        let mut set = two_depot_set();
        set.add_town("south", town("c~3", 1.0));
        let err = Partition::build(&set).unwrap_err();
        assert_eq!(
            err,
            PartitionError::TownCountMismatch {
                depot: "south".into(),
                expected: 2,
                found: 3,
            }
        );
    }

    #[test]
    fn town_missing_from_other_depot_is_rejected() {
        let mut set = EntitySet::new();
        set.add_cargo("north", cargo("fast", 10.0));
        set.add_cargo("north", cargo("slow", 10.0));
        set.add_town("north", town("c~1", 5.0));
        set.add_cargo("south", cargo("fast", 10.0));
        set.add_cargo("south", cargo("slow", 10.0));
        set.add_town("south", town("c~9", 5.0));
        let err = Partition::build(&set).unwrap_err();
        assert_eq!(err.code(), "PARTITION_TOWN_MISMATCH");
        assert!(err.to_string().contains("c~1"));
    }

    #[test]
    fn duplicate_cargo_is_rejected() {
        let mut set = two_depot_set();
        set.add_cargo("north", cargo("fast", 1.0));
        let err = Partition::build(&set).unwrap_err();
        assert_eq!(err.code(), "PARTITION_DUPLICATE_CARGO");
    }

    #[test]
    fn missing_group_ratio_is_rejected() {
        let mut set = EntitySet::new();
        set.add_cargo("north", cargo("fast", 10.0));
        set.add_cargo("north", cargo("slow", 10.0));
        set.add_town(
            "north",
            Town::new("c~1", "B", 3.0)
                .unwrap()
                .with_score("fast", 1.0)
                .unwrap()
                .with_score("slow", 1.0)
                .unwrap(),
        );
        let err = Partition::build(&set).unwrap_err();
        assert_eq!(
            err,
            PartitionError::MissingGroupRatio {
                depot: "north".into(),
                cargo: "fast".into(),
                group: "B".into(),
            }
        );
    }

    fn scored_town(id: &str, group: &str) -> Town {
        Town::new(id, group, 1.0)
            .unwrap()
            .with_score("fast", 1.0)
            .unwrap()
    }

    #[test]
    fn town_changing_group_between_depots_is_rejected() {
        let mut set = EntitySet::new();
        for (depot, group) in [("north", "A"), ("south", "B")] {
            set.add_cargo(
                depot,
                cargo("fast", 10.0).with_group_ratio("B", RatioBounds::unrestricted()),
            );
            set.add_town(depot, scored_town("c~1", group));
        }
        let err = Partition::build(&set).unwrap_err();
        assert_eq!(
            err,
            PartitionError::TownGroupMismatch {
                depot: "south".into(),
                town: "c~1".into(),
                expected: "A".into(),
                found: "B".into(),
            }
        );
    }

    #[test]
    fn cargo_with_different_global_window_is_rejected() {
        let mut set = EntitySet::new();
        set.add_cargo("north", cargo("fast", 10.0));
        set.add_town("north", scored_town("c~1", "A"));
        let narrow = RatioBounds::new(0.9, 1.0).unwrap();
        set.add_cargo(
            "south",
            Cargo::new("fast", 10.0, narrow)
                .unwrap()
                .with_group_ratio("A", RatioBounds::unrestricted()),
        );
        set.add_town("south", scored_town("c~1", "A"));
        let err = Partition::build(&set).unwrap_err();
        assert_eq!(err.code(), "PARTITION_CARGO_WINDOW_MISMATCH");
        assert!(err.to_string().contains("south"));
    }

    #[test]
    fn capacities_may_differ_between_depots() {
        let partition = Partition::build(&two_depot_set()).unwrap();
        assert_ne!(partition.capacity(0, 0), partition.capacity(1, 0));
    }

    #[test]
    fn missing_score_is_rejected() {
        let mut set = EntitySet::new();
        set.add_cargo("north", cargo("fast", 10.0));
        set.add_cargo("north", cargo("other", 10.0));
        set.add_town("north", town("c~1", 3.0));
        let err = Partition::build(&set).unwrap_err();
        assert_eq!(err.code(), "PARTITION_MISSING_SCORE");
    }
}
