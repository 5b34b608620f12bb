//! # Report Writer
//!
//! Persists a battery test as two artifacts:
//!
//! ```text
//! <base>.csv   # elapsed,voltage,current,power - one row per sample, flushed per row
//! <base>.png   # voltage over elapsed seconds, titled with the discharge summary
//! ```
//!
//! The CSV is written incrementally by [`CsvSink`] so a crash or power cut
//! loses at most the sample in flight. The chart is drawn once at the end
//! through a [`ChartRenderer`]; [`PlottersRenderer`] is the PNG implementation.

mod chart;
mod csv_sink;
mod title;

pub use chart::{ChartRenderer, PlottersRenderer, SummaryChart};
pub use csv_sink::{CsvSink, CSV_HEADER};
pub use title::{chart_title, format_hours};

use std::path::Path;

use log::info;

use crate::battery::{Measurement, RunningTotals, TestConfig};

/// Errors that can occur while writing report artifacts
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// I/O error creating or writing a file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV encoding error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Chart could not be drawn
    #[error("Chart rendering error: {0}")]
    Chart(String),
}

/// Render the summary chart for a finished run to `path`.
pub fn finalize<R: ChartRenderer + ?Sized>(
    renderer: &R,
    series: &[Measurement],
    config: &TestConfig,
    totals: &RunningTotals,
    path: &Path,
) -> Result<(), ReportError> {
    let chart = SummaryChart {
        title: chart_title(&config.rate(), totals),
        x_label: "Seconds".to_string(),
        y_label: "Volt".to_string(),
        points: series
            .iter()
            .map(|m| (m.elapsed_seconds, m.voltage))
            .collect(),
    };

    renderer.render(&chart, path)?;
    info!("Wrote chart {}", path.display());
    Ok(())
}
