//! Output sinks for flattened records.
//!
//! Two destinations exist, matching the two collection modes:
//!
//! - [`CsvSink`] streams every row to disk as it arrives, so memory use does
//!   not grow with the result count.
//! - [`SnapshotSink`] accumulates the whole run in memory and serializes the
//!   entire table to a fresh JSON file at every checkpoint boundary, plus one
//!   final snapshot when the run ends. Earlier snapshot files are never
//!   overwritten.

use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::record::FlatRecord;

/// UTF-8 byte-order mark written at the head of every CSV file.
const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// Default number of records between snapshot checkpoints.
pub const DEFAULT_CHECKPOINT: usize = 50_000;

/// Seconds since the Unix epoch, used to stamp output filenames.
pub fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

/// A streaming CSV destination: BOM, one header row, then one row per record.
pub struct CsvSink {
    writer: csv::Writer<File>,
}

impl CsvSink {
    /// Creates the destination file and writes the BOM and header row.
    ///
    /// The header is written unconditionally, so a run that collects nothing
    /// still leaves a header-only file behind.
    pub fn create(path: &Path) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        info!("Writing CSV output to {}", path.display());
        let mut file = File::create(path)?;
        file.write_all(UTF8_BOM)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.write_record(FlatRecord::FIELD_NAMES)?;

        Ok(CsvSink { writer })
    }

    /// Appends one row.
    pub fn write(
        &mut self,
        record: &FlatRecord,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.writer.serialize(record)?;
        Ok(())
    }

    /// Flushes and closes the destination.
    pub fn finish(mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.writer.flush()?;
        Ok(())
    }
}

/// A batch destination that keeps every record in memory and writes full
/// snapshots of the accumulated table.
pub struct SnapshotSink {
    out_dir: PathBuf,
    checkpoint: usize,
    records: Vec<FlatRecord>,
}

impl SnapshotSink {
    /// Creates a sink writing snapshot files into `out_dir`.
    ///
    /// A snapshot is written every time the record count reaches an exact
    /// multiple of `checkpoint`. A checkpoint of 0 disables intermediate
    /// snapshots; the final snapshot is still written.
    pub fn new(out_dir: &Path, checkpoint: usize) -> Self {
        SnapshotSink {
            out_dir: out_dir.to_path_buf(),
            checkpoint,
            records: Vec::new(),
        }
    }

    /// Number of records accumulated so far.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing has been accumulated yet.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Appends one record, writing a checkpoint snapshot when the count
    /// lands on a checkpoint boundary.
    pub fn push(
        &mut self,
        record: FlatRecord,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.records.push(record);
        if self.checkpoint > 0 && self.records.len() % self.checkpoint == 0 {
            self.write_snapshot()?;
        }
        Ok(())
    }

    /// Serializes the entire accumulated table to a new snapshot file.
    ///
    /// Filenames carry the timestamp and the record count, so consecutive
    /// checkpoints inside the same clock second still get distinct names.
    fn write_snapshot(&self) -> Result<PathBuf, Box<dyn std::error::Error + Send + Sync>> {
        let filename = format!("{}_{}_output.json", unix_timestamp(), self.records.len());
        let path = self.out_dir.join(filename);

        let file = File::create(&path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, &self.records)?;
        writer.flush()?;

        info!(
            "Checkpoint: wrote {} records to {}",
            self.records.len(),
            path.display()
        );
        Ok(path)
    }

    /// Ends the run: writes one final full snapshot regardless of checkpoint
    /// alignment, and optionally a full CSV export of every record.
    ///
    /// Returns the total number of records collected.
    pub fn finish(
        self,
        export_csv: Option<&Path>,
    ) -> Result<usize, Box<dyn std::error::Error + Send + Sync>> {
        self.write_snapshot()?;

        if let Some(path) = export_csv {
            let mut csv_sink = CsvSink::create(path)?;
            for record in &self.records {
                csv_sink.write(record)?;
            }
            csv_sink.finish()?;
        }

        Ok(self.records.len())
    }
}
