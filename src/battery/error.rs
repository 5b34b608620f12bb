use crate::instrument::InstrumentError;
use crate::report::ReportError;

/// Invalid battery-test option combinations, detected before any instrument I/O
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Neither or both of constant current / constant power were given
    #[error("exactly one rate required: pass one of --constant-current or --constant-power")]
    RateRequired,

    /// No voltage cutoff, seconds cutoff, or explicit no-cutoff override
    #[error("at least one stop condition required: pass --cutoff-voltage, --cutoff-seconds or --no-cutoff")]
    StopConditionRequired,

    /// Discharge rate is not a positive finite number
    #[error("discharge rate must be a positive number, got {0}")]
    InvalidRate(f64),

    /// Sampling interval is not a positive, sleepable number of seconds
    #[error("sampling interval must be a positive number of seconds within the sleep range, got {0}")]
    InvalidSamplingInterval(f64),
}

/// Errors that end a battery test
#[derive(Debug, thiserror::Error)]
pub enum BatteryTestError {
    /// Options failed validation; nothing was sent to the instrument
    #[error("Invalid battery test configuration: {0}")]
    Config(#[from] ConfigError),

    /// Instrument round trip failed
    #[error("Instrument error: {0}")]
    Instrument(#[from] InstrumentError),

    /// Writing the CSV or chart failed
    #[error("Report error: {0}")]
    Report(#[from] ReportError),
}
