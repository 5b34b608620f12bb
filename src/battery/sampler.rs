use crate::instrument::{ElectronicLoad, InstrumentError};

/// One sample of the load's input, taken once per tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// Whole seconds since the load was enabled
    pub elapsed_seconds: u64,
    /// Input voltage in volts
    pub voltage: f64,
    /// Input current in amperes
    pub current: f64,
    /// Input power in watts
    pub power: f64,
}

/// Read voltage, current and power (in that order) from the load.
pub fn sample<L: ElectronicLoad + ?Sized>(
    load: &mut L,
    elapsed_seconds: u64,
) -> Result<Measurement, InstrumentError> {
    let voltage = load.voltage()?;
    let current = load.current()?;
    let power = load.power()?;

    Ok(Measurement {
        elapsed_seconds,
        voltage,
        current,
        power,
    })
}
