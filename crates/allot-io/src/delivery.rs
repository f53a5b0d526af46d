//! Delivery-mode table: one header row, then
//! `cityId, townId, cargoId, sameDayCapacity, sameDayCost, carryOverCapacity, carryOverCost`.

use std::io::Read;
use std::path::Path;

use allot_core::{CargoId, DeliveryModes, TownId};
use serde::Deserialize;
use tracing::debug;

use crate::error::FormatError;
use crate::table::{open, read_records};
use crate::town::town_key;

const TABLE: &str = "delivery";
const WIDTH: usize = 7;

#[derive(Debug, Deserialize)]
struct DeliveryRow {
    city: String,
    town: String,
    cargo: String,
    same_day_capacity: f64,
    same_day_cost: f64,
    carry_over_capacity: f64,
    carry_over_cost: f64,
}

/// Delivery modes of one (town, cargo) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryEntry {
    pub town: TownId,
    pub cargo: CargoId,
    pub modes: DeliveryModes,
    pub(crate) line: u64,
}

pub fn read_delivery_table<R: Read>(reader: R) -> Result<Vec<DeliveryEntry>, FormatError> {
    let rows = read_records(TABLE, reader)?;
    let mut entries = Vec::with_capacity(rows.len().saturating_sub(1));
    for row in rows.iter().skip(1) {
        row.expect_width(WIDTH)?;
        let parsed: DeliveryRow = row.deserialize()?;
        let town = town_key(&parsed.city, &parsed.town);
        let modes = DeliveryModes {
            same_day_capacity: parsed.same_day_capacity,
            same_day_cost: parsed.same_day_cost,
            carry_over_capacity: parsed.carry_over_capacity,
            carry_over_cost: parsed.carry_over_cost,
        };
        modes
            .validate(town.as_str())
            .map_err(|e| row.entity_error(e))?;
        entries.push(DeliveryEntry {
            town,
            cargo: CargoId::new(parsed.cargo),
            modes,
            line: row.line,
        });
    }
    debug!(
        component = "io",
        operation = "read_delivery",
        status = "success",
        entries = entries.len(),
        "Read delivery-mode table"
    );
    Ok(entries)
}

pub fn read_delivery_file(path: &Path) -> Result<Vec<DeliveryEntry>, FormatError> {
    read_delivery_table(open(path)?)
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn reads_mode_columns() {
        let text = "city,town,cargo,sdc,sdcost,coc,cocost\nAnkara,Cankaya,fast,20,0.5,10,2\n";
        let entries = read_delivery_table(text.as_bytes()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].town.as_str(), "Ankara~Cankaya");
        assert_eq!(entries[0].cargo.as_str(), "fast");
        assert_eq!(entries[0].modes.carry_over_capacity, 10.0);
        assert_eq!(entries[0].line, 2);
    }

    #[test]
    fn negative_capacity_is_rejected() {
        let text = "h\nA,B,fast,-1,0,0,0\n";
        let err = read_delivery_table(text.as_bytes()).unwrap_err();
        assert_eq!(err.code(), "FORMAT_INVALID_ENTITY");
    }
}
