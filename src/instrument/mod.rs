//! # Instrument Session
//!
//! Typed access to a KORAD-style programmable electronic load over its ASCII
//! serial protocol.
//!
//! [`ElectronicLoad`] is the capability the rest of the crate is written
//! against; [`Session`] implements it over any `Read + Write` transport, and
//! [`SerialSession`] is the serial-port flavour used by the binary.
//!
//! ```rust,no_run
//! use korad_load::instrument::{ElectronicLoad, InstrumentMode, SerialSession};
//!
//! let mut load = SerialSession::connect("/dev/ttyACM0", 115200)?;
//! load.configure(InstrumentMode::ConstantCurrent, 0.5)?;
//! load.set_enabled(true)?;
//! println!("{} V", load.voltage()?);
//! load.set_enabled(false)?;
//! load.close();
//! # Ok::<(), korad_load::instrument::InstrumentError>(())
//! ```

mod error;
mod mode;
mod ports;
pub mod protocol;
mod session;
mod status;

pub use error::InstrumentError;
pub use mode::{InstrumentMode, Unit};
pub use ports::{available_ports, PortEntry};
pub use session::{SerialSession, Session, IO_TIMEOUT};
pub use status::Status;

/// Paired get/set access to the load's state, setpoints and measurements.
///
/// Each method is one command round trip. Getters reflect the live state of
/// the instrument at call time.
pub trait ElectronicLoad {
    /// Identification string (`*IDN?`)
    fn id(&mut self) -> Result<String, InstrumentError>;

    /// Whether the load input is drawing current
    fn enabled(&mut self) -> Result<bool, InstrumentError>;
    /// Switch the load input on or off
    fn set_enabled(&mut self, enabled: bool) -> Result<(), InstrumentError>;

    /// Active regulation mode
    fn mode(&mut self) -> Result<InstrumentMode, InstrumentError>;
    /// Select the regulation mode
    fn set_mode(&mut self, mode: InstrumentMode) -> Result<(), InstrumentError>;

    /// Constant-voltage setpoint in volts
    fn constant_voltage(&mut self) -> Result<f64, InstrumentError>;
    /// Write the constant-voltage setpoint in volts
    fn set_constant_voltage(&mut self, volts: f64) -> Result<(), InstrumentError>;

    /// Constant-current setpoint in amperes
    fn constant_current(&mut self) -> Result<f64, InstrumentError>;
    /// Write the constant-current setpoint in amperes
    fn set_constant_current(&mut self, amps: f64) -> Result<(), InstrumentError>;

    /// Constant-resistance setpoint in ohms
    fn constant_resistance(&mut self) -> Result<f64, InstrumentError>;
    /// Write the constant-resistance setpoint in ohms
    fn set_constant_resistance(&mut self, ohms: f64) -> Result<(), InstrumentError>;

    /// Constant-power setpoint in watts
    fn constant_power(&mut self) -> Result<f64, InstrumentError>;
    /// Write the constant-power setpoint in watts
    fn set_constant_power(&mut self, watts: f64) -> Result<(), InstrumentError>;

    /// Measured input voltage in volts
    fn voltage(&mut self) -> Result<f64, InstrumentError>;
    /// Measured input current in amperes
    fn current(&mut self) -> Result<f64, InstrumentError>;
    /// Measured input power in watts
    fn power(&mut self) -> Result<f64, InstrumentError>;

    /// Setpoint stored for `mode`
    fn setpoint(&mut self, mode: InstrumentMode) -> Result<f64, InstrumentError> {
        match mode {
            InstrumentMode::ConstantVoltage => self.constant_voltage(),
            InstrumentMode::ConstantCurrent => self.constant_current(),
            InstrumentMode::ConstantResistance => self.constant_resistance(),
            InstrumentMode::ConstantPower => self.constant_power(),
        }
    }

    /// Write the setpoint for `mode`, then make `mode` active.
    fn configure(&mut self, mode: InstrumentMode, value: f64) -> Result<(), InstrumentError> {
        match mode {
            InstrumentMode::ConstantVoltage => self.set_constant_voltage(value)?,
            InstrumentMode::ConstantCurrent => self.set_constant_current(value)?,
            InstrumentMode::ConstantResistance => self.set_constant_resistance(value)?,
            InstrumentMode::ConstantPower => self.set_constant_power(value)?,
        }
        self.set_mode(mode)
    }
}
