use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use log::debug;
use std::path::PathBuf;

use korad_load::battery::CancellationToken;
use korad_load::instrument::{InstrumentMode, SerialSession};

mod config;
mod load;
mod ports;

use config::Config;

/// Baud rate used when neither flag, environment nor config file sets one.
pub const DEFAULT_SERIAL_SPEED: u32 = 115_200;

/// KORAD Electronic Load Utility
#[derive(Parser)]
#[command(name = "load")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Diagnostic log verbosity (-d for info, -dd for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    debug: u8,

    /// Serial port the load is attached to
    #[arg(long, env = "SERIAL_PORT", global = true, value_name = "SERIAL-PORT")]
    serial_port: Option<String>,

    /// Serial speed in baud [default: 115200]
    #[arg(long, env = "SERIAL_SPEED", global = true, value_name = "SERIAL-SPEED")]
    serial_speed: Option<u32>,

    /// Load connection settings and battery-test defaults from a TOML file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display type and serial number from load
    Id,

    /// Enable the load; start drawing current
    Enable,

    /// Disable the load; stop drawing current
    Disable,

    /// Show configuration status and measurements
    Status,

    /// Set constant voltage mode for <VOLTAGE> volts
    ConstantVoltage {
        #[arg(value_name = "VOLTAGE")]
        volts: f64,
    },

    /// Set constant current mode for <CURRENT> amps
    ConstantCurrent {
        #[arg(value_name = "CURRENT")]
        amps: f64,
    },

    /// Set constant resistance mode for <RESISTANCE> ohms
    ConstantResistance {
        #[arg(value_name = "RESISTANCE")]
        ohms: f64,
    },

    /// Set constant power mode for <POWER> watts
    ConstantPower {
        #[arg(value_name = "POWER")]
        watts: f64,
    },

    /// Start battery test
    BatteryTest(BatteryTestArgs),

    /// List serial ports the load could be attached to
    Ports,
}

/// Options of the battery-test command.
#[derive(Args, Debug)]
pub struct BatteryTestArgs {
    /// Stop test and disable load when voltage drops below <VOLTAGE>
    #[arg(long, value_name = "VOLTAGE")]
    cutoff_voltage: Option<f64>,

    /// Stop test and disable load after <SECONDS> seconds
    #[arg(long, value_name = "SECONDS")]
    cutoff_seconds: Option<u64>,

    /// Do not automatically stop the test (can be dangerous)
    #[arg(long)]
    no_cutoff: bool,

    /// Draw a constant current of <CURRENT> amps
    #[arg(long, value_name = "CURRENT")]
    constant_current: Option<f64>,

    /// Draw a constant power of <POWER> watts
    #[arg(long, value_name = "POWER")]
    constant_power: Option<f64>,

    /// Read new sample every <SECONDS> seconds [default: 5]
    #[arg(long, value_name = "SECONDS")]
    sampling_interval: Option<f64>,

    /// Save report in <NAME>.csv and <NAME>.png [default: report]
    #[arg(long, value_name = "NAME")]
    file_base_name: Option<String>,

    /// Print measurements to console every <sampling-interval> seconds
    #[arg(long)]
    verbose: bool,
}

impl Cli {
    /// Number of `-d` flags given
    pub fn verbosity(&self) -> u8 {
        self.debug
    }

    /// Whether Ctrl-C should stop the command gracefully rather than exit.
    pub fn is_cancellable(&self) -> bool {
        matches!(self.command, Commands::BatteryTest(_))
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

/// Route Ctrl-C to `cancel` for cancellable commands; exit immediately otherwise.
pub fn install_interrupt_handler(cancellable: bool, cancel: CancellationToken) -> Result<()> {
    ctrlc::set_handler(move || {
        if cancellable {
            cancel.cancel();
        } else {
            std::process::exit(0);
        }
    })
    .context("Failed to install Ctrl-C handler")
}

/// Rendered help of the battery-test command, shown on configuration errors.
pub fn battery_test_usage() -> String {
    let mut command = Cli::command();
    match command.find_subcommand_mut("battery-test") {
        Some(subcommand) => subcommand.render_help().to_string(),
        None => command.render_usage().to_string(),
    }
}

/// Where and how fast to talk to the load.
#[derive(Debug, Clone, PartialEq)]
struct Connection {
    port: String,
    speed: u32,
}

impl Connection {
    fn resolve(port: Option<String>, speed: Option<u32>, config: &Config) -> Result<Self> {
        let port = port
            .or_else(|| config.connection.serial_port.clone())
            .context("No serial port given: pass --serial-port or set SERIAL_PORT")?;
        let speed = speed
            .or(config.connection.serial_speed)
            .unwrap_or(DEFAULT_SERIAL_SPEED);

        Ok(Self { port, speed })
    }

    /// Open a session, run `f` on it, and close it on every path.
    fn with_session<T>(&self, f: impl FnOnce(&mut SerialSession) -> Result<T>) -> Result<T> {
        let mut session = SerialSession::connect(&self.port, self.speed)
            .with_context(|| format!("Failed to connect to load on {}", self.port))?;
        debug!("Connected to {} at {} baud", session.name(), self.speed);

        let result = f(&mut session);
        session.close();
        result
    }
}

/// Run the parsed command.
pub fn dispatch(cli: Cli, cancel: &CancellationToken) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    let Cli {
        serial_port,
        serial_speed,
        command,
        ..
    } = cli;
    let connect = || Connection::resolve(serial_port, serial_speed, &config);

    match command {
        Commands::Ports => ports::run(),
        Commands::BatteryTest(args) => {
            // Validated before the port is opened so a bad combination never touches the load.
            let test_config = battery_test::options(&args, &config)?;
            connect()?.with_session(|session| battery_test::run(session, test_config, cancel))
        }
        Commands::Id => connect()?.with_session(load::id),
        Commands::Enable => connect()?.with_session(|session| load::set_enabled(session, true)),
        Commands::Disable => connect()?.with_session(|session| load::set_enabled(session, false)),
        Commands::Status => connect()?.with_session(load::status),
        Commands::ConstantVoltage { volts } => connect()?
            .with_session(|session| load::configure(session, InstrumentMode::ConstantVoltage, volts)),
        Commands::ConstantCurrent { amps } => connect()?
            .with_session(|session| load::configure(session, InstrumentMode::ConstantCurrent, amps)),
        Commands::ConstantResistance { ohms } => connect()?.with_session(|session| {
            load::configure(session, InstrumentMode::ConstantResistance, ohms)
        }),
        Commands::ConstantPower { watts } => connect()?
            .with_session(|session| load::configure(session, InstrumentMode::ConstantPower, watts)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_battery_test_flags_parse() {
        let cli = Cli::try_parse_from([
            "load",
            "--serial-port",
            "/dev/ttyACM0",
            "battery-test",
            "--constant-current",
            "1.0",
            "--cutoff-seconds",
            "2",
            "--sampling-interval",
            "1",
            "--verbose",
        ])
        .unwrap();

        assert!(cli.is_cancellable());
        assert_eq!(cli.serial_port.as_deref(), Some("/dev/ttyACM0"));
        match cli.command {
            Commands::BatteryTest(args) => {
                assert_eq!(args.constant_current, Some(1.0));
                assert_eq!(args.cutoff_seconds, Some(2));
                assert_eq!(args.sampling_interval, Some(1.0));
                assert!(args.verbose);
                assert!(!args.no_cutoff);
            }
            _ => panic!("expected battery-test"),
        }
    }

    #[test]
    fn test_other_commands_are_not_cancellable() {
        let cli = Cli::try_parse_from(["load", "status"]).unwrap();
        assert!(!cli.is_cancellable());
    }

    #[test]
    fn test_connection_precedence() {
        let config = Config::from_str(
            "[connection]\nserial_port = \"/dev/ttyUSB9\"\nserial_speed = 9600\n",
        )
        .unwrap();

        let from_file = Connection::resolve(None, None, &config).unwrap();
        assert_eq!(from_file.port, "/dev/ttyUSB9");
        assert_eq!(from_file.speed, 9600);

        let from_flags =
            Connection::resolve(Some("/dev/ttyACM0".to_string()), Some(57600), &config).unwrap();
        assert_eq!(from_flags.port, "/dev/ttyACM0");
        assert_eq!(from_flags.speed, 57600);

        let defaults = Connection::resolve(Some("COM3".to_string()), None, &Config::default()).unwrap();
        assert_eq!(defaults.speed, DEFAULT_SERIAL_SPEED);

        assert!(Connection::resolve(None, None, &Config::default()).is_err());
    }

    #[test]
    fn test_battery_test_usage_mentions_flags() {
        let usage = battery_test_usage();
        assert!(usage.contains("--cutoff-voltage"));
        assert!(usage.contains("--constant-power"));
        assert!(usage.contains("--file-base-name"));
    }
}
