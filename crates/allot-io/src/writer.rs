//! Result table writer.
//!
//! Layout:
//!
//! ```text
//! ,,north,,south,
//! City,Town,fast,slow,fast,slow
//! Ankara,Cankaya,0.6000,0.4000,0.5000,0.5000
//! ```
//!
//! One row per town, one ratio column per (depot, cargo).

use std::fs::File;
use std::io::Write;
use std::path::Path;

use allot_core::{OutputLayout, OutputRecord, RecordSink};
use tracing::debug;

use crate::error::FormatError;
use crate::town::split_town_key;

const TABLE: &str = "output";

/// [`RecordSink`] that pivots records into the result table.
///
/// Rows are buffered between `open` and `close`; `close` writes the table
/// unless a record was rejected in between.
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
    target: String,
    layout: Option<OutputLayout>,
    cells: Vec<Vec<Option<f64>>>,
    rejected: bool,
}

impl CsvSink<File> {
    pub fn create(path: &Path) -> Result<Self, FormatError> {
        let file = File::create(path).map_err(|err| FormatError::io(path, &err))?;
        let mut sink = CsvSink::new(file);
        sink.target = path.display().to_string();
        Ok(sink)
    }
}

impl<W: Write> CsvSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: csv::WriterBuilder::new().flexible(true).from_writer(writer),
            target: TABLE.to_string(),
            layout: None,
            cells: Vec::new(),
            rejected: false,
        }
    }

    /// Recover the underlying writer.
    pub fn into_inner(self) -> Result<W, FormatError> {
        self.writer.into_inner().map_err(|err| FormatError::Io {
            path: self.target.clone(),
            message: err.error().to_string(),
        })
    }

    fn csv_error(err: &csv::Error) -> FormatError {
        FormatError::csv(TABLE, err)
    }

    fn place(&mut self, record: &OutputRecord) -> Result<(), FormatError> {
        let unexpected = || FormatError::UnexpectedRecord {
            town: record.town.to_string(),
            depot: record.depot.to_string(),
        };
        let layout = self.layout.as_ref().ok_or_else(unexpected)?;
        let k = layout
            .towns
            .iter()
            .position(|t| *t == record.town)
            .ok_or_else(unexpected)?;
        let d = layout
            .depots
            .iter()
            .position(|dp| *dp == record.depot)
            .ok_or_else(unexpected)?;
        let width = layout.cargos.len();
        for (cargo, ratio) in &record.allocations {
            let i = layout
                .cargos
                .iter()
                .position(|c| c == cargo)
                .ok_or_else(unexpected)?;
            self.cells[k][d * width + i] = Some(*ratio);
        }
        Ok(())
    }

    fn write_table(&mut self, layout: &OutputLayout) -> Result<(), FormatError> {
        let mut depot_header = vec![String::new(), String::new()];
        for depot in &layout.depots {
            depot_header.push(depot.to_string());
            depot_header.extend(std::iter::repeat_n(
                String::new(),
                layout.cargos.len().saturating_sub(1),
            ));
        }
        self.writer
            .write_record(&depot_header)
            .map_err(|e| Self::csv_error(&e))?;

        let mut cargo_header = vec!["City".to_string(), "Town".to_string()];
        for _ in &layout.depots {
            cargo_header.extend(layout.cargos.iter().map(ToString::to_string));
        }
        self.writer
            .write_record(&cargo_header)
            .map_err(|e| Self::csv_error(&e))?;

        for (town, cells) in layout.towns.iter().zip(&self.cells) {
            let (city, name) = split_town_key(town);
            let mut row = vec![city.to_string(), name.to_string()];
            row.extend(
                cells
                    .iter()
                    .map(|cell| cell.map_or_else(String::new, |ratio| format!("{ratio:.4}"))),
            );
            self.writer
                .write_record(&row)
                .map_err(|e| Self::csv_error(&e))?;
        }

        self.writer.flush().map_err(|err| FormatError::Io {
            path: self.target.clone(),
            message: err.to_string(),
        })
    }
}

impl<W: Write> RecordSink for CsvSink<W> {
    type Error = FormatError;

    fn open(&mut self, layout: &OutputLayout) -> Result<(), FormatError> {
        let width = layout.depots.len() * layout.cargos.len();
        self.cells = vec![vec![None; width]; layout.towns.len()];
        self.layout = Some(layout.clone());
        self.rejected = false;
        Ok(())
    }

    fn write_record(&mut self, record: &OutputRecord) -> Result<(), FormatError> {
        let placed = self.place(record);
        self.rejected |= placed.is_err();
        placed
    }

    fn close(&mut self) -> Result<(), FormatError> {
        let Some(layout) = self.layout.take() else {
            return Ok(());
        };
        if self.rejected {
            self.cells.clear();
            return Ok(());
        }
        self.write_table(&layout)?;
        debug!(
            component = "io",
            operation = "write_output",
            status = "success",
            target = %self.target,
            towns = layout.towns.len(),
            columns = layout.depots.len() * layout.cargos.len(),
            "Wrote result table"
        );
        self.cells.clear();
        Ok(())
    }
}
