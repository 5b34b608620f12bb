use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::instrument::InstrumentMode;

use super::ConfigError;

/// Default seconds between samples
pub const DEFAULT_SAMPLING_INTERVAL: f64 = 5.0;

/// Default base name of the CSV and PNG artifacts
pub const DEFAULT_FILE_BASE_NAME: &str = "report";

/// Discharge regime of a battery test
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DischargeRate {
    /// Draw a constant current in amperes
    ConstantCurrent(f64),
    /// Draw a constant power in watts
    ConstantPower(f64),
}

impl DischargeRate {
    /// Instrument mode that realises this rate.
    pub fn mode(&self) -> InstrumentMode {
        match self {
            DischargeRate::ConstantCurrent(_) => InstrumentMode::ConstantCurrent,
            DischargeRate::ConstantPower(_) => InstrumentMode::ConstantPower,
        }
    }

    /// Setpoint value in instrument-native units.
    pub fn value(&self) -> f64 {
        match *self {
            DischargeRate::ConstantCurrent(amps) => amps,
            DischargeRate::ConstantPower(watts) => watts,
        }
    }
}

impl fmt::Display for DischargeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = self.mode();
        write!(f, "{} {:?} {}", mode, self.value(), mode.unit().symbol())
    }
}

/// Battery-test options as supplied by the user, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct TestOptions {
    /// `--constant-current <A>`
    pub constant_current: Option<f64>,
    /// `--constant-power <W>`
    pub constant_power: Option<f64>,
    /// `--cutoff-voltage <V>`
    pub cutoff_voltage: Option<f64>,
    /// `--cutoff-seconds <N>`
    pub cutoff_seconds: Option<u64>,
    /// `--no-cutoff`
    pub no_cutoff: bool,
    /// `--sampling-interval <S>`
    pub sampling_interval: f64,
    /// `--file-base-name <NAME>`
    pub file_base_name: String,
    /// `--verbose`
    pub verbose: bool,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            constant_current: None,
            constant_power: None,
            cutoff_voltage: None,
            cutoff_seconds: None,
            no_cutoff: false,
            sampling_interval: DEFAULT_SAMPLING_INTERVAL,
            file_base_name: DEFAULT_FILE_BASE_NAME.to_string(),
            verbose: false,
        }
    }
}

impl TestOptions {
    /// Check the option combination and produce an immutable [`TestConfig`].
    pub fn validate(&self) -> Result<TestConfig, ConfigError> {
        let rate = match (self.constant_current, self.constant_power) {
            (Some(amps), None) => DischargeRate::ConstantCurrent(amps),
            (None, Some(watts)) => DischargeRate::ConstantPower(watts),
            _ => return Err(ConfigError::RateRequired),
        };

        if !(rate.value().is_finite() && rate.value() > 0.0) {
            return Err(ConfigError::InvalidRate(rate.value()));
        }

        if self.cutoff_voltage.is_none() && self.cutoff_seconds.is_none() && !self.no_cutoff {
            return Err(ConfigError::StopConditionRequired);
        }

        if !(self.sampling_interval.is_finite() && self.sampling_interval > 0.0) {
            return Err(ConfigError::InvalidSamplingInterval(self.sampling_interval));
        }
        let sampling_period = Duration::try_from_secs_f64(self.sampling_interval)
            .map_err(|_| ConfigError::InvalidSamplingInterval(self.sampling_interval))?;

        Ok(TestConfig {
            rate,
            voltage_cutoff: self.cutoff_voltage,
            seconds_cutoff: self.cutoff_seconds,
            no_cutoff: self.no_cutoff,
            sampling_interval: self.sampling_interval,
            sampling_period,
            file_base_name: self.file_base_name.clone(),
            verbose: self.verbose,
        })
    }
}

/// Validated description of one battery test run. Never mutated once built.
#[derive(Debug, Clone, PartialEq)]
pub struct TestConfig {
    rate: DischargeRate,
    voltage_cutoff: Option<f64>,
    seconds_cutoff: Option<u64>,
    no_cutoff: bool,
    sampling_interval: f64,
    sampling_period: Duration,
    file_base_name: String,
    verbose: bool,
}

impl TestConfig {
    /// Discharge regime
    pub fn rate(&self) -> DischargeRate {
        self.rate
    }

    /// Stop once measured voltage drops below this many volts
    pub fn voltage_cutoff(&self) -> Option<f64> {
        self.voltage_cutoff
    }

    /// Stop once elapsed seconds exceed this value
    pub fn seconds_cutoff(&self) -> Option<u64> {
        self.seconds_cutoff
    }

    /// Whether the operator explicitly allowed running without a cutoff
    pub fn no_cutoff(&self) -> bool {
        self.no_cutoff
    }

    /// Seconds between samples; also the integration timestep
    pub fn sampling_interval(&self) -> f64 {
        self.sampling_interval
    }

    /// Sleep between ticks
    pub fn sampling_period(&self) -> Duration {
        self.sampling_period
    }

    /// Base name shared by the CSV and chart artifacts
    pub fn file_base_name(&self) -> &str {
        &self.file_base_name
    }

    /// `<base>.csv`
    pub fn csv_path(&self) -> PathBuf {
        PathBuf::from(format!("{}.csv", self.file_base_name))
    }

    /// `<base>.png`
    pub fn chart_path(&self) -> PathBuf {
        PathBuf::from(format!("{}.png", self.file_base_name))
    }

    /// Echo each sample to the console
    pub fn verbose(&self) -> bool {
        self.verbose
    }
}
