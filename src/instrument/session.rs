use std::io::{BufRead, BufReader, ErrorKind, Read, Write};
use std::time::Duration;

use log::debug;

use super::protocol::{self, FUNCTION_QUERY, IDENTIFY, INPUT_QUERY};
use super::{ElectronicLoad, InstrumentError, InstrumentMode, Unit};

/// Read and write timeout applied to every round trip.
pub const IO_TIMEOUT: Duration = Duration::from_secs(1);

/// Serial session type used by the command-line tool.
pub type SerialSession = Session<Box<dyn serialport::SerialPort>>;

/// An open connection to the load.
///
/// Every getter is a live round trip; nothing is cached. The underlying
/// transport is released by [`Session::close`] or on drop, whichever comes first.
pub struct Session<P: Read + Write> {
    name: String,
    link: Option<BufReader<P>>,
}

impl SerialSession {
    /// Open `port` at `baud` with the 1 s read/write timeout.
    pub fn connect(port: &str, baud: u32) -> Result<Self, InstrumentError> {
        let handle = serialport::new(port, baud)
            .timeout(IO_TIMEOUT)
            .open()
            .map_err(|source| InstrumentError::Connection {
                port: port.to_string(),
                source,
            })?;

        debug!("Opened {} at {} baud", port, baud);
        Ok(Self::new(port, handle))
    }
}

impl<P: Read + Write> Session<P> {
    /// Wrap an already opened transport.
    pub fn new(name: impl Into<String>, transport: P) -> Self {
        Self {
            name: name.into(),
            link: Some(BufReader::new(transport)),
        }
    }

    /// Name of the port this session talks to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the transport is still held.
    pub fn is_open(&self) -> bool {
        self.link.is_some()
    }

    /// Release the transport. Calling this more than once is a no-op.
    pub fn close(&mut self) {
        if let Some(mut link) = self.link.take() {
            if let Err(e) = link.get_mut().flush() {
                debug!("Flush on close of {} failed: {}", self.name, e);
            }
            debug!("Closed {}", self.name);
        }
    }

    fn link(&mut self) -> Result<&mut BufReader<P>, InstrumentError> {
        self.link.as_mut().ok_or(InstrumentError::Closed)
    }

    /// Send one command line without waiting for an answer.
    fn command(&mut self, command: &str) -> Result<(), InstrumentError> {
        debug!("-> {}", command);
        let port = self.link()?.get_mut();
        let written = port
            .write_all(format!("{command}\n").as_bytes())
            .and_then(|()| port.flush());

        match written {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::TimedOut => Err(InstrumentError::Timeout {
                command: command.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Send a query and read one response line.
    fn query(&mut self, command: &str) -> Result<String, InstrumentError> {
        self.command(command)?;

        let mut line = Vec::with_capacity(32);
        let timeout = || InstrumentError::Timeout {
            command: command.to_string(),
        };

        match self.link()?.read_until(b'\n', &mut line) {
            Ok(0) => return Err(timeout()),
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::TimedOut => return Err(timeout()),
            Err(e) => return Err(e.into()),
        }

        let response = String::from_utf8(line)
            .map_err(|e| InstrumentError::MalformedResponse {
                command: command.to_string(),
                response: String::from_utf8_lossy(e.as_bytes()).trim().to_string(),
            })?
            .trim()
            .to_string();

        debug!("<- {}", response);
        if response.is_empty() {
            return Err(timeout());
        }
        Ok(response)
    }

    fn query_quantity(&mut self, command: &str, unit: Unit) -> Result<f64, InstrumentError> {
        let response = self.query(command)?;
        protocol::parse_quantity(command, &response, unit)
    }

    fn read_setpoint(&mut self, mode: InstrumentMode) -> Result<f64, InstrumentError> {
        self.query_quantity(&protocol::setpoint_query(mode), mode.unit())
    }

    fn write_setpoint(&mut self, mode: InstrumentMode, value: f64) -> Result<(), InstrumentError> {
        self.command(&protocol::setpoint_command(mode, value))
    }
}

impl<P: Read + Write> Drop for Session<P> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<P: Read + Write> ElectronicLoad for Session<P> {
    fn id(&mut self) -> Result<String, InstrumentError> {
        self.query(IDENTIFY)
    }

    fn enabled(&mut self) -> Result<bool, InstrumentError> {
        let response = self.query(INPUT_QUERY)?;
        protocol::parse_input_state(&response)
    }

    fn set_enabled(&mut self, enabled: bool) -> Result<(), InstrumentError> {
        self.command(&protocol::input_command(enabled))
    }

    fn mode(&mut self) -> Result<InstrumentMode, InstrumentError> {
        self.query(FUNCTION_QUERY)?.parse()
    }

    fn set_mode(&mut self, mode: InstrumentMode) -> Result<(), InstrumentError> {
        self.command(&protocol::function_command(mode))
    }

    fn constant_voltage(&mut self) -> Result<f64, InstrumentError> {
        self.read_setpoint(InstrumentMode::ConstantVoltage)
    }

    fn set_constant_voltage(&mut self, volts: f64) -> Result<(), InstrumentError> {
        self.write_setpoint(InstrumentMode::ConstantVoltage, volts)
    }

    fn constant_current(&mut self) -> Result<f64, InstrumentError> {
        self.read_setpoint(InstrumentMode::ConstantCurrent)
    }

    fn set_constant_current(&mut self, amps: f64) -> Result<(), InstrumentError> {
        self.write_setpoint(InstrumentMode::ConstantCurrent, amps)
    }

    fn constant_resistance(&mut self) -> Result<f64, InstrumentError> {
        self.read_setpoint(InstrumentMode::ConstantResistance)
    }

    fn set_constant_resistance(&mut self, ohms: f64) -> Result<(), InstrumentError> {
        self.write_setpoint(InstrumentMode::ConstantResistance, ohms)
    }

    fn constant_power(&mut self) -> Result<f64, InstrumentError> {
        self.read_setpoint(InstrumentMode::ConstantPower)
    }

    fn set_constant_power(&mut self, watts: f64) -> Result<(), InstrumentError> {
        self.write_setpoint(InstrumentMode::ConstantPower, watts)
    }

    fn voltage(&mut self) -> Result<f64, InstrumentError> {
        self.query_quantity(protocol::MEASURE_VOLTAGE, Unit::Volt)
    }

    fn current(&mut self) -> Result<f64, InstrumentError> {
        self.query_quantity(protocol::MEASURE_CURRENT, Unit::Ampere)
    }

    fn power(&mut self) -> Result<f64, InstrumentError> {
        self.query_quantity(protocol::MEASURE_POWER, Unit::Watt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Transport that replays canned instrument output and records what was sent.
    struct ScriptedPort {
        replies: Cursor<Vec<u8>>,
        sent: Vec<u8>,
    }

    impl ScriptedPort {
        fn new(replies: &str) -> Self {
            Self {
                replies: Cursor::new(replies.as_bytes().to_vec()),
                sent: Vec::new(),
            }
        }
    }

    impl Read for ScriptedPort {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.replies.read(buf)
        }
    }

    impl Write for ScriptedPort {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.sent.write(buf)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn sent(session: &mut Session<ScriptedPort>) -> String {
        let port = session.link.as_mut().unwrap().get_mut();
        String::from_utf8(port.sent.clone()).unwrap()
    }

    #[test]
    fn test_measurements_round_trip() {
        let mut session = Session::new("sim", ScriptedPort::new("12.34V\n0.500A\r\n6.17W\n"));

        assert_eq!(session.voltage().unwrap(), 12.34);
        assert_eq!(session.current().unwrap(), 0.5);
        assert_eq!(session.power().unwrap(), 6.17);
        assert_eq!(sent(&mut session), ":MEAS:VOLT?\n:MEAS:CURR?\n:MEAS:POW?\n");
    }

    #[test]
    fn test_setters_send_commands_without_reading() {
        let mut session = Session::new("sim", ScriptedPort::new(""));

        session.set_constant_power(2.5).unwrap();
        session.set_mode(InstrumentMode::ConstantPower).unwrap();
        session.set_enabled(true).unwrap();

        assert_eq!(sent(&mut session), ":POW 2.5W\n:FUNC CW\n:INP ON\n");
    }

    #[test]
    fn test_mode_and_state_queries() {
        let mut session = Session::new("sim", ScriptedPort::new("CW\nOFF\n10.00OHM\nKORAD KEL103 V3.30 SN:0001\n"));

        assert_eq!(session.mode().unwrap(), InstrumentMode::ConstantPower);
        assert!(!session.enabled().unwrap());
        assert_eq!(session.constant_resistance().unwrap(), 10.0);
        assert_eq!(session.id().unwrap(), "KORAD KEL103 V3.30 SN:0001");
    }

    #[test]
    fn test_missing_response_is_timeout() {
        let mut session = Session::new("sim", ScriptedPort::new(""));

        let err = session.voltage().unwrap_err();
        assert!(matches!(err, InstrumentError::Timeout { ref command } if command == ":MEAS:VOLT?"));
        assert!(err.is_protocol());
    }

    #[test]
    fn test_unknown_mode_is_protocol_error() {
        let mut session = Session::new("sim", ScriptedPort::new("XX\n"));

        let err = session.mode().unwrap_err();
        assert!(matches!(err, InstrumentError::UnknownMode(_)));
        assert!(err.is_protocol());
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut session = Session::new("sim", ScriptedPort::new("1.0V\n"));

        session.close();
        session.close();

        assert!(!session.is_open());
        assert!(matches!(session.voltage(), Err(InstrumentError::Closed)));
    }
}
