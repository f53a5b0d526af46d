//! Output sinks for allocation records.

use std::convert::Infallible;

use tracing::{debug, warn};

use crate::extract::{OutputLayout, OutputRecord};

/// Destination for output records.
///
/// [`emit`] calls `open` once, `write_record` per record, then `close`.
pub trait RecordSink {
    type Error: std::error::Error;

    fn open(&mut self, layout: &OutputLayout) -> Result<(), Self::Error>;

    fn write_record(&mut self, record: &OutputRecord) -> Result<(), Self::Error>;

    /// Flush and release the destination.
    fn close(&mut self) -> Result<(), Self::Error>;
}

/// Write every record to `sink` inside one open/close scope.
///
/// `close` runs even when a write fails; the first error wins.
pub fn emit<S: RecordSink>(
    sink: &mut S,
    layout: &OutputLayout,
    records: &[OutputRecord],
) -> Result<usize, S::Error> {
    sink.open(layout)?;
    let written = records
        .iter()
        .try_for_each(|record| sink.write_record(record));
    let closed = sink.close();

    match (written, closed) {
        (Ok(()), Ok(())) => {
            debug!(
                component = "sink",
                operation = "emit",
                status = "success",
                records = records.len(),
                "Wrote output records"
            );
            Ok(records.len())
        }
        (Err(err), _) | (Ok(()), Err(err)) => {
            warn!(
                component = "sink",
                operation = "emit",
                status = "error",
                error = %err,
                "Failed to write output records"
            );
            Err(err)
        }
    }
}

/// Collects records in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub layout: Option<OutputLayout>,
    pub records: Vec<OutputRecord>,
    pub closed: bool,
}

impl RecordSink for MemorySink {
    type Error = Infallible;

    fn open(&mut self, layout: &OutputLayout) -> Result<(), Self::Error> {
        self.layout = Some(layout.clone());
        self.records.clear();
        self.closed = false;
        Ok(())
    }

    fn write_record(&mut self, record: &OutputRecord) -> Result<(), Self::Error> {
        self.records.push(record.clone());
        Ok(())
    }

    fn close(&mut self) -> Result<(), Self::Error> {
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{CargoId, DepotId, TownId};

    #[derive(Debug)]
    struct Broken;

    impl std::fmt::Display for Broken {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("broken")
        }
    }

    impl std::error::Error for Broken {}

    #[derive(Default)]
    struct FailingSink {
        writes: usize,
        closed: bool,
    }

    impl RecordSink for FailingSink {
        type Error = Broken;

        fn open(&mut self, _layout: &OutputLayout) -> Result<(), Broken> {
            Ok(())
        }

        fn write_record(&mut self, _record: &OutputRecord) -> Result<(), Broken> {
            self.writes += 1;
            Err(Broken)
        }

        fn close(&mut self) -> Result<(), Broken> {
            self.closed = true;
            Ok(())
        }
    }

    fn layout() -> OutputLayout {
        OutputLayout {
            depots: vec![DepotId::from("north")],
            cargos: vec![CargoId::from("fast")],
            towns: vec![TownId::from("c~1")],
        }
    }

    fn record() -> OutputRecord {
        OutputRecord {
            town: "c~1".into(),
            depot: "north".into(),
            allocations: vec![("fast".into(), 1.0)],
        }
    }

    #[test]
    fn memory_sink_collects_in_order() {
        let mut sink = MemorySink::default();
        let written = emit(&mut sink, &layout(), &[record(), record()]).unwrap();
        assert_eq!(written, 2);
        assert_eq!(sink.records.len(), 2);
        assert!(sink.closed);
        assert_eq!(sink.layout, Some(layout()));
    }

    #[test]
    fn sink_is_closed_after_failed_write() {
        let mut sink = FailingSink::default();
        let result = emit(&mut sink, &layout(), &[record(), record()]);
        assert!(result.is_err());
        assert_eq!(sink.writes, 1);
        assert!(sink.closed);
    }
}
