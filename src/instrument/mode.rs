use std::fmt;
use std::str::FromStr;

use super::InstrumentError;

/// Physical unit carried by a setpoint or measurement response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    /// Volts
    Volt,
    /// Amperes
    Ampere,
    /// Ohms
    Ohm,
    /// Watts
    Watt,
}

impl Unit {
    /// Suffix the instrument appends to values of this unit on the wire.
    pub fn wire_suffix(&self) -> &'static str {
        match self {
            Unit::Volt => "V",
            Unit::Ampere => "A",
            Unit::Ohm => "OHM",
            Unit::Watt => "W",
        }
    }

    /// Symbol used when printing values for humans.
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Volt => "V",
            Unit::Ampere => "A",
            Unit::Ohm => "Ω",
            Unit::Watt => "W",
        }
    }
}

/// Regulation mode of the load. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstrumentMode {
    /// Hold the input voltage constant (`CV`)
    ConstantVoltage,
    /// Hold the drawn current constant (`CC`)
    ConstantCurrent,
    /// Hold the presented resistance constant (`CR`)
    ConstantResistance,
    /// Hold the drawn power constant (`CW` on the wire)
    ConstantPower,
}

impl InstrumentMode {
    /// Token used by `:FUNC` and returned by `:FUNC?`.
    pub fn wire_token(&self) -> &'static str {
        match self {
            InstrumentMode::ConstantVoltage => "CV",
            InstrumentMode::ConstantCurrent => "CC",
            InstrumentMode::ConstantResistance => "CR",
            InstrumentMode::ConstantPower => "CW",
        }
    }

    /// Unit of the setpoint regulated in this mode.
    pub fn unit(&self) -> Unit {
        match self {
            InstrumentMode::ConstantVoltage => Unit::Volt,
            InstrumentMode::ConstantCurrent => Unit::Ampere,
            InstrumentMode::ConstantResistance => Unit::Ohm,
            InstrumentMode::ConstantPower => Unit::Watt,
        }
    }

    /// Name of the regulated quantity ("Voltage", "Current", ...).
    pub fn quantity(&self) -> &'static str {
        match self {
            InstrumentMode::ConstantVoltage => "Voltage",
            InstrumentMode::ConstantCurrent => "Current",
            InstrumentMode::ConstantResistance => "Resistance",
            InstrumentMode::ConstantPower => "Power",
        }
    }
}

impl fmt::Display for InstrumentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Constant {}", self.quantity())
    }
}

impl FromStr for InstrumentMode {
    type Err = InstrumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "CV" => Ok(InstrumentMode::ConstantVoltage),
            "CC" => Ok(InstrumentMode::ConstantCurrent),
            "CR" => Ok(InstrumentMode::ConstantResistance),
            "CW" => Ok(InstrumentMode::ConstantPower),
            other => Err(InstrumentError::UnknownMode(other.to_string())),
        }
    }
}
