use std::fs::File;
use std::path::{Path, PathBuf};

use log::info;

use super::ReportError;
use crate::battery::Measurement;

/// Header row of the time-series CSV
pub const CSV_HEADER: [&str; 4] = ["elapsed", "voltage", "current", "power"];

/// Append-only CSV record of a run. Each row reaches the OS before `append` returns.
pub struct CsvSink {
    writer: csv::Writer<File>,
    path: PathBuf,
    rows_written: usize,
}

impl CsvSink {
    /// Create or truncate `path` and write the header.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, ReportError> {
        let path = path.as_ref().to_path_buf();
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&path)?;

        writer.write_record(CSV_HEADER)?;
        writer.flush()?;
        info!("Recording samples to {}", path.display());

        Ok(Self {
            writer,
            path,
            rows_written: 0,
        })
    }

    /// Write one sample and flush it.
    pub fn append(&mut self, measurement: &Measurement) -> Result<(), ReportError> {
        self.writer.write_record([
            measurement.elapsed_seconds.to_string(),
            measurement.voltage.to_string(),
            measurement.current.to_string(),
            measurement.power.to_string(),
        ])?;
        self.writer.flush()?;
        self.rows_written += 1;
        Ok(())
    }

    /// Path of the CSV file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of sample rows written, excluding the header
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Flush and close, returning the number of rows written.
    pub fn finish(mut self) -> Result<usize, ReportError> {
        self.writer.flush()?;
        Ok(self.rows_written)
    }
}
