use std::fmt;

use super::{ElectronicLoad, InstrumentError, InstrumentMode};

/// Snapshot of the load's configuration and live measurements
#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    /// Whether the input is enabled
    pub enabled: bool,
    /// Active regulation mode
    pub mode: InstrumentMode,
    /// Setpoint of the active mode
    pub setpoint: f64,
    /// Measured voltage in volts
    pub voltage: f64,
    /// Measured current in amperes
    pub current: f64,
    /// Measured power in watts
    pub power: f64,
}

impl Status {
    /// Query enable state, mode, the active setpoint and all three measurements.
    pub fn read<L: ElectronicLoad + ?Sized>(load: &mut L) -> Result<Self, InstrumentError> {
        let enabled = load.enabled()?;
        let mode = load.mode()?;
        let setpoint = load.setpoint(mode)?;

        Ok(Self {
            enabled,
            mode,
            setpoint,
            voltage: load.voltage()?,
            current: load.current()?,
            power: load.power()?,
        })
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}: {} {} ({})",
            self.mode,
            self.setpoint,
            self.mode.unit().symbol(),
            if self.enabled { "On" } else { "Off" }
        )?;
        writeln!(f, "Voltage: {} V", self.voltage)?;
        writeln!(f, "Current: {} A", self.current)?;
        write!(f, "  Power: {} W", self.power)
    }
}
