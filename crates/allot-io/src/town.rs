//! Town table.
//!
//! Two header rows. The second lists cargo ids above the score columns.
//! Data rows are `cityId, townId, townGroup, demandOrPercent, score...`.

use std::io::Read;
use std::path::Path;

use allot_core::{CargoId, Town, TownId};
use tracing::debug;

use crate::error::FormatError;
use crate::table::{Row, open, read_records};

const TABLE: &str = "town";
const SCORE_COLUMN: usize = 4;

/// Separator of the composite `city~town` key.
pub const TOWN_KEY_SEPARATOR: char = '~';

/// Join city and town into the composite town key.
pub fn town_key(city: &str, town: &str) -> TownId {
    TownId::new(format!("{city}{TOWN_KEY_SEPARATOR}{town}"))
}

/// Split a composite town key back into city and town.
pub fn split_town_key(id: &TownId) -> (&str, &str) {
    id.as_str()
        .split_once(TOWN_KEY_SEPARATOR)
        .unwrap_or(("", id.as_str()))
}

/// A town row and the raw demand column.
///
/// With a depot table the raw value is a percentage, otherwise an absolute demand.
#[derive(Debug, Clone, PartialEq)]
pub struct TownEntry {
    pub town: Town,
    pub raw_demand: f64,
    pub(crate) line: u64,
}

fn score_header(rows: &[Row]) -> Result<Vec<CargoId>, FormatError> {
    let header = rows.get(1).ok_or(FormatError::EmptyTable { table: TABLE })?;
    Ok(header
        .tail(SCORE_COLUMN)
        .take_while(|cell| !cell.is_empty())
        .map(CargoId::from)
        .collect())
}

fn entry_from_row(row: &Row, cargos: &[CargoId]) -> Result<TownEntry, FormatError> {
    row.expect_width(SCORE_COLUMN + cargos.len())?;
    let id = town_key(row.text(0)?, row.text(1)?);
    let group = row.text(2)?;
    let raw_demand = row.number(3)?;
    let mut town = Town::new(id, group, raw_demand).map_err(|e| row.entity_error(e))?;
    for (offset, cargo) in cargos.iter().enumerate() {
        let score = row.number(SCORE_COLUMN + offset)?;
        town = town
            .with_score(cargo.clone(), score)
            .map_err(|e| row.entity_error(e))?;
    }
    Ok(TownEntry {
        town,
        raw_demand,
        line: row.line,
    })
}

/// Read towns in table order.
pub fn read_town_table<R: Read>(reader: R) -> Result<Vec<TownEntry>, FormatError> {
    let rows = read_records(TABLE, reader)?;
    let cargos = score_header(&rows)?;
    let entries = rows
        .iter()
        .skip(2)
        .map(|row| entry_from_row(row, &cargos))
        .collect::<Result<Vec<_>, _>>()?;
    if entries.is_empty() {
        return Err(FormatError::EmptyTable { table: TABLE });
    }
    debug!(
        component = "io",
        operation = "read_towns",
        status = "success",
        towns = entries.len(),
        scored_cargos = cargos.len(),
        "Read town table"
    );
    Ok(entries)
}

pub fn read_town_file(path: &Path) -> Result<Vec<TownEntry>, FormatError> {
    read_town_table(open(path)?)
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
city,town,group,demand,nps
,,,,fast,slow
Ankara,Cankaya,A,40.4,1.5,2
Izmir,Bornova,B,0,3,0.5
";

    #[test]
    fn scores_follow_second_header() {
        let entries = read_town_table(SAMPLE.as_bytes()).unwrap();
        assert_eq!(entries.len(), 2);

        let first = &entries[0];
        assert_eq!(first.town.id().as_str(), "Ankara~Cankaya");
        assert_eq!(first.town.group().as_str(), "A");
        assert_eq!(first.town.demand(), 40.0);
        assert_eq!(first.raw_demand, 40.4);
        assert_eq!(first.line, 3);
        assert_eq!(first.town.score(&"fast".into()), Some(1.5));
        assert_eq!(first.town.score(&"slow".into()), Some(2.0));
    }

    #[test]
    fn zero_demand_is_floored() {
        let entries = read_town_table(SAMPLE.as_bytes()).unwrap();
        assert_eq!(entries[1].town.demand(), 1.0);
    }

    #[test]
    fn missing_score_cell_is_reported() {
        let text = "h\n,,,,fast,slow\nA,B,A,10,1\n";
        let err = read_town_table(text.as_bytes()).unwrap_err();
        assert_eq!(
            err,
            FormatError::RowLength {
                table: "town",
                line: 3,
                expected: 6,
                found: 5,
            }
        );
    }

    #[test]
    fn extra_score_cell_is_reported() {
        let text = "h\n,,,,fast\nA,B,A,10,1,7,9\n";
        let err = read_town_table(text.as_bytes()).unwrap_err();
        assert_eq!(
            err,
            FormatError::RowLength {
                table: "town",
                line: 3,
                expected: 5,
                found: 7,
            }
        );
    }

    #[test]
    fn negative_demand_is_rejected() {
        let text = "h\n,,,,fast\nA,B,A,-4,1\n";
        let err = read_town_table(text.as_bytes()).unwrap_err();
        assert_eq!(err.code(), "FORMAT_INVALID_ENTITY");
    }

    #[test]
    fn town_keys_round_trip() {
        let id = town_key("Ankara", "Cankaya");
        assert_eq!(split_town_key(&id), ("Ankara", "Cankaya"));
        assert_eq!(split_town_key(&TownId::from("solo")), ("", "solo"));
    }
}
