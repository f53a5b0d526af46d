//! Format adapter errors.

use allot_core::EntityError;

/// Error raised while reading an input table or writing the result table.
#[derive(Debug, Clone, PartialEq)]
pub enum FormatError {
    /// File could not be opened, read or written.
    Io { path: String, message: String },
    /// Row could not be parsed by the CSV layer.
    Csv {
        table: &'static str,
        line: u64,
        message: String,
    },
    /// Row is shorter than the table layout requires.
    MissingColumn {
        table: &'static str,
        line: u64,
        column: usize,
    },
    /// Row carries a different number of cells than the table layout.
    RowLength {
        table: &'static str,
        line: u64,
        expected: usize,
        found: usize,
    },
    /// Field is not a number.
    InvalidNumber {
        table: &'static str,
        line: u64,
        column: usize,
        value: String,
    },
    /// Table has no data rows, or lacks its header rows.
    EmptyTable { table: &'static str },
    /// Row names a cargo absent from the cargo table.
    UnknownCargo {
        table: &'static str,
        line: u64,
        cargo: String,
    },
    /// Table has no row for a cargo of the cargo table.
    MissingCargo { table: &'static str, cargo: String },
    /// Row names a town absent from the town table.
    UnknownTown {
        table: &'static str,
        line: u64,
        town: String,
    },
    /// Field values were rejected by entity validation.
    Entity {
        table: &'static str,
        line: u64,
        source: EntityError,
    },
    /// Record arrived for a town or depot outside the opened layout.
    UnexpectedRecord { town: String, depot: String },
}

impl FormatError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            FormatError::Io { .. } => "FORMAT_IO",
            FormatError::Csv { .. } => "FORMAT_CSV",
            FormatError::MissingColumn { .. } => "FORMAT_MISSING_COLUMN",
            FormatError::RowLength { .. } => "FORMAT_ROW_LENGTH",
            FormatError::InvalidNumber { .. } => "FORMAT_INVALID_NUMBER",
            FormatError::EmptyTable { .. } => "FORMAT_EMPTY_TABLE",
            FormatError::UnknownCargo { .. } => "FORMAT_UNKNOWN_CARGO",
            FormatError::MissingCargo { .. } => "FORMAT_MISSING_CARGO",
            FormatError::UnknownTown { .. } => "FORMAT_UNKNOWN_TOWN",
            FormatError::Entity { .. } => "FORMAT_INVALID_ENTITY",
            FormatError::UnexpectedRecord { .. } => "FORMAT_UNEXPECTED_RECORD",
        }
    }

    pub(crate) fn io(path: &std::path::Path, err: &std::io::Error) -> Self {
        FormatError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }

    pub(crate) fn csv(table: &'static str, err: &csv::Error) -> Self {
        FormatError::Csv {
            table,
            line: err.position().map_or(0, csv::Position::line),
            message: err.to_string(),
        }
    }
}

impl std::fmt::Display for FormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = self.code();
        match self {
            FormatError::Io { path, message } => write!(f, "[{code}] {path}: {message}"),
            FormatError::Csv {
                table,
                line,
                message,
            } => write!(f, "[{code}] {table} table, line {line}: {message}"),
            FormatError::MissingColumn {
                table,
                line,
                column,
            } => write!(
                f,
                "[{code}] {table} table, line {line}: missing column {}",
                column + 1
            ),
            FormatError::RowLength {
                table,
                line,
                expected,
                found,
            } => write!(
                f,
                "[{code}] {table} table, line {line}: {found} cells, layout has {expected}"
            ),
            FormatError::InvalidNumber {
                table,
                line,
                column,
                value,
            } => write!(
                f,
                "[{code}] {table} table, line {line}, column {}: '{value}' is not a number",
                column + 1
            ),
            FormatError::EmptyTable { table } => write!(f, "[{code}] {table} table has no rows"),
            FormatError::UnknownCargo { table, line, cargo } => write!(
                f,
                "[{code}] {table} table, line {line}: unknown cargo '{cargo}'"
            ),
            FormatError::MissingCargo { table, cargo } => {
                write!(f, "[{code}] {table} table has no row for cargo '{cargo}'")
            }
            FormatError::UnknownTown { table, line, town } => write!(
                f,
                "[{code}] {table} table, line {line}: unknown town '{town}'"
            ),
            FormatError::Entity {
                table,
                line,
                source,
            } => write!(f, "[{code}] {table} table, line {line}: {source}"),
            FormatError::UnexpectedRecord { town, depot } => write!(
                f,
                "[{code}] record for town '{town}' at depot '{depot}' is not in the output layout"
            ),
        }
    }
}

impl std::error::Error for FormatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FormatError::Entity { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_one_based_and_coded() {
        let err = FormatError::InvalidNumber {
            table: "cargo",
            line: 3,
            column: 1,
            value: "abc".to_string(),
        };
        let text = err.to_string();
        assert!(text.starts_with("[FORMAT_INVALID_NUMBER]"));
        assert!(text.contains("line 3, column 2"));
    }

    #[test]
    fn entity_errors_are_sources() {
        let err = FormatError::Entity {
            table: "town",
            line: 4,
            source: EntityError::InvalidRatio { value: 2.0 },
        };
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("ENTITY_INVALID_RATIO"));
    }
}
