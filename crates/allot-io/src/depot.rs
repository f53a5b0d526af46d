//! Depot table: header row `label, depot1, depot2, ...`, then one row per
//! cargo with its capacity at each depot.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use allot_core::{CargoId, DepotId};
use tracing::debug;

use crate::error::FormatError;
use crate::table::{open, read_records};

const TABLE: &str = "depot";

/// Cargo capacities per depot, depots in header order.
#[derive(Debug, Clone, PartialEq)]
pub struct DepotTable {
    depots: Vec<DepotId>,
    capacities: Vec<BTreeMap<CargoId, f64>>,
    lines: BTreeMap<CargoId, u64>,
}

impl DepotTable {
    pub fn depots(&self) -> &[DepotId] {
        &self.depots
    }

    pub fn capacity(&self, depot: usize, cargo: &CargoId) -> Option<f64> {
        self.capacities.get(depot).and_then(|caps| caps.get(cargo).copied())
    }

    /// Input line of a cargo's capacity row.
    pub fn line(&self, cargo: &CargoId) -> Option<u64> {
        self.lines.get(cargo).copied()
    }

    /// Sum of all cargo capacities at a depot.
    pub fn total_capacity(&self, depot: usize) -> f64 {
        self.capacities
            .get(depot)
            .map_or(0.0, |caps| caps.values().sum())
    }

    /// Demand of a town at a depot from its percentage of the depot's capacity.
    pub fn town_demand(&self, depot: usize, percent: f64) -> f64 {
        self.total_capacity(depot) * percent / 100.0
    }
}

pub fn read_depot_table<R: Read>(reader: R) -> Result<DepotTable, FormatError> {
    let rows = read_records(TABLE, reader)?;
    let header = rows.first().ok_or(FormatError::EmptyTable { table: TABLE })?;
    let depots: Vec<DepotId> = header
        .tail(1)
        .take_while(|cell| !cell.is_empty())
        .map(DepotId::from)
        .collect();
    if depots.is_empty() || rows.len() < 2 {
        return Err(FormatError::EmptyTable { table: TABLE });
    }

    let mut capacities = vec![BTreeMap::new(); depots.len()];
    let mut lines = BTreeMap::new();
    for row in rows.iter().skip(1) {
        row.expect_width(depots.len() + 1)?;
        let cargo = CargoId::from(row.text(0)?);
        for (d, caps) in capacities.iter_mut().enumerate() {
            let capacity = row.number(d + 1)?;
            caps.insert(cargo.clone(), capacity);
        }
        lines.insert(cargo, row.line);
    }

    debug!(
        component = "io",
        operation = "read_depots",
        status = "success",
        depots = depots.len(),
        cargos = rows.len() - 1,
        "Read depot table"
    );
    Ok(DepotTable {
        depots,
        capacities,
        lines,
    })
}

pub fn read_depot_file(path: &Path) -> Result<DepotTable, FormatError> {
    read_depot_table(open(path)?)
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
cargo,north,south
fast,60,10
slow,40,30
";

    #[test]
    fn capacities_are_per_depot() {
        let table = read_depot_table(SAMPLE.as_bytes()).unwrap();
        assert_eq!(table.depots(), &[DepotId::from("north"), DepotId::from("south")]);
        assert_eq!(table.capacity(1, &"fast".into()), Some(10.0));
        assert_eq!(table.total_capacity(0), 100.0);
        assert_eq!(table.total_capacity(1), 40.0);
        assert_eq!(table.capacity(0, &"other".into()), None);
        assert_eq!(table.line(&"slow".into()), Some(3));
    }

    #[test]
    fn demand_is_share_of_depot_capacity() {
        let table = read_depot_table(SAMPLE.as_bytes()).unwrap();
        assert_eq!(table.town_demand(0, 25.0), 25.0);
        assert_eq!(table.town_demand(1, 25.0), 10.0);
    }

    #[test]
    fn header_without_depots_is_rejected() {
        let err = read_depot_table("cargo\nfast\n".as_bytes()).unwrap_err();
        assert_eq!(err.code(), "FORMAT_EMPTY_TABLE");
    }

    #[test]
    fn capacity_row_wider_than_header_is_rejected() {
        let err = read_depot_table("cargo,north\nfast,10,20\n".as_bytes()).unwrap_err();
        assert_eq!(err.code(), "FORMAT_ROW_LENGTH");
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn non_numeric_capacity_is_rejected() {
        let err = read_depot_table("cargo,north\nfast,lots\n".as_bytes()).unwrap_err();
        assert_eq!(err.code(), "FORMAT_INVALID_NUMBER");
    }
}
