//! Headerless CSV access shared by the table readers.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use serde::de::DeserializeOwned;

use crate::error::FormatError;

pub(crate) fn open(path: &Path) -> Result<File, FormatError> {
    File::open(path).map_err(|err| FormatError::io(path, &err))
}

/// Read every record, trimming fields. Row widths are checked per table.
pub(crate) fn read_records<R: Read>(
    table: &'static str,
    reader: R,
) -> Result<Vec<Row>, FormatError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = vec![];
    for record in reader.records() {
        let record = record.map_err(|err| FormatError::csv(table, &err))?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let line = record.position().map_or(0, csv::Position::line);
        rows.push(Row {
            table,
            line,
            record,
        });
    }
    Ok(rows)
}

/// One non-blank input line.
#[derive(Debug, Clone)]
pub(crate) struct Row {
    pub(crate) table: &'static str,
    pub(crate) line: u64,
    record: StringRecord,
}

impl Row {
    pub(crate) fn len(&self) -> usize {
        self.record.len()
    }

    /// Fail unless the row spans exactly `width` cells. Trailing blank
    /// cells past the layout are padding.
    pub(crate) fn expect_width(&self, width: usize) -> Result<(), FormatError> {
        let used = self
            .record
            .iter()
            .collect::<Vec<_>>()
            .iter()
            .rposition(|cell| !cell.is_empty())
            .map_or(0, |last| last + 1);
        let found = if used > width {
            used
        } else {
            self.record.len().min(width)
        };
        if found != width {
            return Err(FormatError::RowLength {
                table: self.table,
                line: self.line,
                expected: width,
                found,
            });
        }
        Ok(())
    }

    pub(crate) fn text(&self, column: usize) -> Result<&str, FormatError> {
        self.record
            .get(column)
            .ok_or(FormatError::MissingColumn {
                table: self.table,
                line: self.line,
                column,
            })
    }

    pub(crate) fn number(&self, column: usize) -> Result<f64, FormatError> {
        let text = self.text(column)?;
        text.parse::<f64>().map_err(|_| FormatError::InvalidNumber {
            table: self.table,
            line: self.line,
            column,
            value: text.to_string(),
        })
    }

    /// Fields from `column` on, blanks included.
    pub(crate) fn tail(&self, column: usize) -> impl Iterator<Item = &str> {
        self.record.iter().skip(column)
    }

    /// Deserialize the row positionally into a fixed-layout struct.
    pub(crate) fn deserialize<T: DeserializeOwned>(&self) -> Result<T, FormatError> {
        self.record
            .deserialize(None)
            .map_err(|err| FormatError::Csv {
                table: self.table,
                line: self.line,
                message: err.to_string(),
            })
    }

    pub(crate) fn entity_error(&self, source: allot_core::EntityError) -> FormatError {
        FormatError::Entity {
            table: self.table,
            line: self.line,
            source,
        }
    }
}
