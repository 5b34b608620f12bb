use std::fmt;

use super::TestConfig;

/// Why a battery test ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Operator interrupted the run
    UserCancelled,
    /// Measured voltage fell below the configured cutoff
    VoltageBelowCutoff,
    /// Elapsed time went past the configured number of seconds
    TimeExceeded,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::UserCancelled => write!(f, "cancelled by user"),
            StopReason::VoltageBelowCutoff => write!(f, "voltage below cutoff"),
            StopReason::TimeExceeded => write!(f, "time limit exceeded"),
        }
    }
}

/// Decide whether the run must stop after the latest sample.
///
/// Checks in order, first match wins: cancellation, voltage cutoff, time
/// cutoff. The time check is strict, so a run limited to N seconds takes one
/// sample past N. `None` means keep running.
pub fn evaluate(
    config: &TestConfig,
    elapsed_seconds: u64,
    latest_voltage: f64,
    cancelled: bool,
) -> Option<StopReason> {
    if cancelled {
        return Some(StopReason::UserCancelled);
    }

    if config.voltage_cutoff().is_some_and(|cutoff| latest_voltage < cutoff) {
        return Some(StopReason::VoltageBelowCutoff);
    }

    if config.seconds_cutoff().is_some_and(|limit| elapsed_seconds > limit) {
        return Some(StopReason::TimeExceeded);
    }

    None
}
