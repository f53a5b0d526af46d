//! CSV format adapters.
//!
//! Readers turn the cargo, town, depot and delivery-mode tables into an
//! [`EntitySet`]; [`CsvSink`] writes the result table.

mod cargo;
mod delivery;
mod depot;
mod error;
mod table;
mod town;
mod writer;

use std::path::PathBuf;

use allot_core::{Cargo, DepotId, EntitySet};
use tracing::debug;

pub use cargo::{TOWN_GROUPS, read_cargo_file, read_cargo_table};
pub use delivery::{DeliveryEntry, read_delivery_file, read_delivery_table};
pub use depot::{DepotTable, read_depot_file, read_depot_table};
pub use error::FormatError;
pub use town::{TownEntry, read_town_file, read_town_table, split_town_key, town_key};
pub use writer::CsvSink;

/// Input file locations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputPaths {
    pub cargo: PathBuf,
    pub towns: PathBuf,
    pub depots: Option<PathBuf>,
    pub delivery: Option<PathBuf>,
}

/// Parsed input tables before depot expansion.
#[derive(Debug, Clone)]
pub struct InputTables {
    pub cargos: Vec<Cargo>,
    pub towns: Vec<TownEntry>,
    pub depots: Option<DepotTable>,
    pub delivery: Vec<DeliveryEntry>,
}

impl InputTables {
    pub fn read(paths: &InputPaths) -> Result<Self, FormatError> {
        Ok(Self {
            cargos: read_cargo_file(&paths.cargo)?,
            towns: read_town_file(&paths.towns)?,
            depots: paths.depots.as_deref().map(read_depot_file).transpose()?,
            delivery: match &paths.delivery {
                Some(path) => read_delivery_file(path)?,
                None => Vec::new(),
            },
        })
    }

    /// Expand the tables into one inventory per depot.
    ///
    /// Without a depot table every entity belongs to a single default
    /// depot and the town demand column is absolute. With one, each depot
    /// gets its own cargo capacities and each town's demand becomes
    /// `round(depot capacity sum * percent / 100)`, floored to 1.
    pub fn into_entities(mut self) -> Result<EntitySet, FormatError> {
        self.attach_delivery()?;

        let mut set = EntitySet::new();
        match &self.depots {
            None => {
                let depot = DepotId::single();
                for cargo in self.cargos {
                    set.add_cargo(depot.clone(), cargo);
                }
                for entry in self.towns {
                    set.add_town(depot.clone(), entry.town);
                }
            }
            Some(table) => {
                for (d, depot) in table.depots().iter().enumerate() {
                    for cargo in &self.cargos {
                        let capacity = table.capacity(d, cargo.id()).ok_or_else(|| {
                            FormatError::MissingCargo {
                                table: "depot",
                                cargo: cargo.id().to_string(),
                            }
                        })?;
                        let local = cargo.with_capacity(capacity).map_err(|source| {
                            FormatError::Entity {
                                table: "depot",
                                line: table.line(cargo.id()).unwrap_or_default(),
                                source,
                            }
                        })?;
                        set.add_cargo(depot.clone(), local);
                    }
                    for entry in &self.towns {
                        let demand = table.town_demand(d, entry.raw_demand);
                        let local = entry.town.with_demand(demand).map_err(|source| {
                            FormatError::Entity {
                                table: "town",
                                line: entry.line,
                                source,
                            }
                        })?;
                        set.add_town(depot.clone(), local);
                    }
                }
            }
        }

        debug!(
            component = "io",
            operation = "expand",
            status = "success",
            depots = set.depots().len(),
            cargos = set.num_cargos(),
            towns = set.num_towns(),
            "Expanded input tables into inventories"
        );
        Ok(set)
    }

    fn attach_delivery(&mut self) -> Result<(), FormatError> {
        for entry in &self.delivery {
            if !self.cargos.iter().any(|c| *c.id() == entry.cargo) {
                return Err(FormatError::UnknownCargo {
                    table: "delivery",
                    line: entry.line,
                    cargo: entry.cargo.to_string(),
                });
            }
            let town = self
                .towns
                .iter_mut()
                .find(|t| *t.town.id() == entry.town)
                .ok_or_else(|| FormatError::UnknownTown {
                    table: "delivery",
                    line: entry.line,
                    town: entry.town.to_string(),
                })?;
            town.town
                .set_delivery_modes(entry.cargo.clone(), entry.modes)
                .map_err(|source| FormatError::Entity {
                    table: "delivery",
                    line: entry.line,
                    source,
                })?;
        }
        Ok(())
    }
}

/// Read every table named in `paths` and expand them into an entity set.
pub fn load_entities(paths: &InputPaths) -> Result<EntitySet, FormatError> {
    InputTables::read(paths)?.into_entities()
}
