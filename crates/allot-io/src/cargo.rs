//! Cargo table: one header row, then
//! `cargoId, capacity, globalMin, minA, minB, minC, globalMax, maxA, maxB, maxC`.

use std::io::Read;
use std::path::Path;

use allot_core::{Cargo, RatioBounds};
use serde::Deserialize;
use tracing::debug;

use crate::error::FormatError;
use crate::table::{Row, open, read_records};

const TABLE: &str = "cargo";
const WIDTH: usize = 10;

/// Town-group labels, in column order.
pub const TOWN_GROUPS: [&str; 3] = ["A", "B", "C"];

#[derive(Debug, Deserialize)]
struct CargoRow {
    id: String,
    capacity: f64,
    global_min: f64,
    min_a: f64,
    min_b: f64,
    min_c: f64,
    global_max: f64,
    max_a: f64,
    max_b: f64,
    max_c: f64,
}

fn cargo_from_row(row: &Row) -> Result<Cargo, FormatError> {
    row.expect_width(WIDTH)?;
    let parsed: CargoRow = row.deserialize()?;
    let global =
        RatioBounds::new(parsed.global_min, parsed.global_max).map_err(|e| row.entity_error(e))?;
    let mut cargo =
        Cargo::new(parsed.id, parsed.capacity, global).map_err(|e| row.entity_error(e))?;
    let group_min = [parsed.min_a, parsed.min_b, parsed.min_c];
    let group_max = [parsed.max_a, parsed.max_b, parsed.max_c];
    for ((group, min), max) in TOWN_GROUPS.iter().zip(group_min).zip(group_max) {
        let bounds = RatioBounds::new(min, max).map_err(|e| row.entity_error(e))?;
        cargo = cargo.with_group_ratio(*group, bounds);
    }
    Ok(cargo)
}

/// Read cargos in table order.
pub fn read_cargo_table<R: Read>(reader: R) -> Result<Vec<Cargo>, FormatError> {
    let rows = read_records(TABLE, reader)?;
    let cargos = rows
        .iter()
        .skip(1)
        .map(cargo_from_row)
        .collect::<Result<Vec<_>, _>>()?;
    if cargos.is_empty() {
        return Err(FormatError::EmptyTable { table: TABLE });
    }
    debug!(
        component = "io",
        operation = "read_cargo",
        status = "success",
        cargos = cargos.len(),
        "Read cargo table"
    );
    Ok(cargos)
}

pub fn read_cargo_file(path: &Path) -> Result<Vec<Cargo>, FormatError> {
    read_cargo_table(open(path)?)
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
cargo,capacity,min,minA,minB,minC,max,maxA,maxB,maxC
fast,120,0.1,0.0,0.2,0.0,0.6,1.0,0.8,0.5
slow,80,0,0,0,0,1,1,1,1
";

    #[test]
    fn reads_ratio_columns_positionally() {
        let cargos = read_cargo_table(SAMPLE.as_bytes()).unwrap();
        assert_eq!(cargos.len(), 2);

        let fast = &cargos[0];
        assert_eq!(fast.id().as_str(), "fast");
        assert_eq!(fast.capacity(), 120.0);
        assert_eq!(fast.global_ratio(), RatioBounds::new(0.1, 0.6).unwrap());
        assert_eq!(
            fast.group_ratio(&"B".into()),
            Some(RatioBounds::new(0.2, 0.8).unwrap())
        );
        assert_eq!(fast.group_ratio(&"C".into()).unwrap().max, 0.5);
    }

    #[test]
    fn short_row_is_rejected() {
        let err = read_cargo_table("h\nfast,1,0\n".as_bytes()).unwrap_err();
        assert_eq!(err.code(), "FORMAT_ROW_LENGTH");
    }

    #[test]
    fn long_row_is_rejected() {
        let err = read_cargo_table("h\nfast,1,0,0,0,0,1,1,1,1,9\n".as_bytes()).unwrap_err();
        assert_eq!(err.code(), "FORMAT_ROW_LENGTH");
    }

    #[test]
    fn out_of_range_ratio_is_rejected() {
        let err = read_cargo_table("h\nfast,1,0,0,0,0,1.2,1,1,1\n".as_bytes()).unwrap_err();
        assert_eq!(err.code(), "FORMAT_INVALID_ENTITY");
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn header_only_is_empty() {
        let err = read_cargo_table("cargo,capacity\n".as_bytes()).unwrap_err();
        assert_eq!(err, FormatError::EmptyTable { table: "cargo" });
    }
}
