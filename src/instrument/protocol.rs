//! ASCII command set of the load.
//!
//! Commands are single lines terminated by `\n`. Queries end in `?` and are
//! answered with one line. Numeric answers carry a unit suffix, e.g. `12.34V`,
//! `0.500A` or `1500OHM`.

use super::{InstrumentError, InstrumentMode, Unit};

/// Identification query
pub const IDENTIFY: &str = "*IDN?";
/// Input (load enable) state query
pub const INPUT_QUERY: &str = ":INP?";
/// Regulation mode query
pub const FUNCTION_QUERY: &str = ":FUNC?";
/// Measured input voltage
pub const MEASURE_VOLTAGE: &str = ":MEAS:VOLT?";
/// Measured input current
pub const MEASURE_CURRENT: &str = ":MEAS:CURR?";
/// Measured input power
pub const MEASURE_POWER: &str = ":MEAS:POW?";

/// Header of the setpoint command for a mode (`:VOLT`, `:CURR`, `:RES`, `:POW`).
fn setpoint_header(mode: InstrumentMode) -> &'static str {
    match mode {
        InstrumentMode::ConstantVoltage => ":VOLT",
        InstrumentMode::ConstantCurrent => ":CURR",
        InstrumentMode::ConstantResistance => ":RES",
        InstrumentMode::ConstantPower => ":POW",
    }
}

/// Query for the stored setpoint of `mode`, e.g. `:CURR?`.
pub fn setpoint_query(mode: InstrumentMode) -> String {
    format!("{}?", setpoint_header(mode))
}

/// Command writing the setpoint of `mode`, e.g. `:CURR 1.5A`.
pub fn setpoint_command(mode: InstrumentMode, value: f64) -> String {
    format!("{} {}{}", setpoint_header(mode), value, mode.unit().wire_suffix())
}

/// Command selecting the regulation mode, e.g. `:FUNC CW`.
pub fn function_command(mode: InstrumentMode) -> String {
    format!(":FUNC {}", mode.wire_token())
}

/// Command switching the load input on or off.
pub fn input_command(enabled: bool) -> String {
    format!(":INP {}", if enabled { "ON" } else { "OFF" })
}

/// Parse a numeric response with a trailing unit suffix.
///
/// The suffix must match `unit` (ASCII case-insensitive); the remainder must
/// be a finite decimal number.
pub fn parse_quantity(command: &str, response: &str, unit: Unit) -> Result<f64, InstrumentError> {
    let malformed = || InstrumentError::MalformedResponse {
        command: command.to_string(),
        response: response.to_string(),
    };

    let suffix = unit.wire_suffix();
    let split = response.len().checked_sub(suffix.len()).ok_or_else(malformed)?;
    if !response.is_char_boundary(split) || !response[split..].eq_ignore_ascii_case(suffix) {
        return Err(malformed());
    }

    response[..split]
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(malformed)
}

/// Parse the answer to [`INPUT_QUERY`].
pub fn parse_input_state(response: &str) -> Result<bool, InstrumentError> {
    match response {
        "ON" => Ok(true),
        "OFF" => Ok(false),
        other => Err(InstrumentError::MalformedResponse {
            command: INPUT_QUERY.to_string(),
            response: other.to_string(),
        }),
    }
}
