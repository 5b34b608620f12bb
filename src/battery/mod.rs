//! # Battery Discharge Test
//!
//! The long-running procedure at the heart of the tool: enable the load at a
//! constant current or power, sample voltage/current/power every sampling
//! interval, integrate charge and energy, and stop on the first of
//! cancellation, voltage cutoff or time cutoff.
//!
//! ```text
//! configure mode/setpoint -> open CSV -> enable load
//!   loop { cancelled? -> sample -> append row -> integrate -> evaluate -> sleep }
//! disable load (always) -> close CSV -> render chart
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use korad_load::battery::{run_battery_test, CancellationToken, TestOptions};
//! use korad_load::instrument::SerialSession;
//!
//! let mut load = SerialSession::connect("/dev/ttyACM0", 115200)?;
//! let options = TestOptions {
//!     constant_current: Some(0.5),
//!     cutoff_voltage: Some(3.0),
//!     ..Default::default()
//! };
//!
//! let result = run_battery_test(&mut load, &options, &CancellationToken::new())?;
//! println!("{}", result);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Charge and energy are integrated with the configured sampling interval as
//! the timestep, not the measured time between ticks.

mod accumulator;
mod cancel;
mod clock;
mod config;
mod controller;
mod error;
mod sampler;
mod stop;

pub use accumulator::{integrate, RunningTotals};
pub use cancel::CancellationToken;
pub use clock::{Clock, SystemClock};
pub use config::{
    DischargeRate, TestConfig, TestOptions, DEFAULT_FILE_BASE_NAME, DEFAULT_SAMPLING_INTERVAL,
};
pub use controller::{progress_line, run_battery_test, BatteryTestController, TestResult};
pub use error::{BatteryTestError, ConfigError};
pub use sampler::{sample, Measurement};
pub use stop::{evaluate, StopReason};
