//! # korad-load - Electronic Load Controller and Battery Tester
//!
//! `korad_load` drives a KORAD-style programmable electronic load over its
//! ASCII serial protocol and runs battery-discharge tests with it.
//!
//! ## Key Features
//!
//! - **Typed instrument access**: paired get/set methods for the enable state,
//!   regulation mode and each setpoint, plus live voltage/current/power reads.
//!
//! - **Battery discharge test**: constant-current or constant-power discharge
//!   with voltage and/or time cutoffs, charge (Ah) and energy (Wh) integration,
//!   and cooperative cancellation from Ctrl-C.
//!
//! - **Safe shutdown**: the load is switched off on every exit path of a test,
//!   including instrument and report errors.
//!
//! - **Durable reports**: one CSV row per sample, flushed as it is taken, and a
//!   PNG chart of voltage over time titled with the discharge summary.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use korad_load::prelude::*;
//!
//! let mut load = SerialSession::connect("/dev/ttyACM0", 115200)?;
//! println!("{}", load.id()?);
//!
//! let options = TestOptions {
//!     constant_power: Some(2.0),
//!     cutoff_voltage: Some(3.0),
//!     cutoff_seconds: Some(4 * 3600),
//!     sampling_interval: 10.0,
//!     file_base_name: "cell-a".to_string(),
//!     ..Default::default()
//! };
//!
//! let result = run_battery_test(&mut load, &options, &CancellationToken::new())?;
//! println!("{}", result);
//! // cell-a.csv and cell-a.png are now on disk
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - [`instrument`]: serial session, wire protocol and the [`instrument::ElectronicLoad`] trait
//! - [`battery`]: test configuration, accumulator, stop conditions and the test loop
//! - [`report`]: CSV time series and summary chart

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod battery;
pub mod instrument;
pub mod report;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::battery::{
        run_battery_test, BatteryTestController, BatteryTestError, CancellationToken, Clock,
        ConfigError, DischargeRate, Measurement, RunningTotals, StopReason, SystemClock,
        TestConfig, TestOptions, TestResult,
    };
    pub use crate::instrument::{
        ElectronicLoad, InstrumentError, InstrumentMode, SerialSession, Session, Unit,
    };
    pub use crate::report::{ChartRenderer, CsvSink, PlottersRenderer, ReportError, SummaryChart};
}
