//! # KORAD Electronic Load Utility
//!
//! A command-line tool for controlling a KORAD programmable electronic load
//! over its serial port and running battery-discharge tests.
//!
//! ## Usage
//!
//! ```bash
//! # Show what the load is doing
//! load --serial-port /dev/ttyACM0 status
//!
//! # Discharge at 1 A until the cell drops below 3.0 V, sampling every 10 s
//! load battery-test --constant-current 1.0 --cutoff-voltage 3.0 --sampling-interval 10
//! ```

use anyhow::Result;
use clap::Parser;

use korad_load::battery::{CancellationToken, ConfigError};

mod cli;

use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    cli::init_logging(cli.verbosity());

    let cancel = CancellationToken::new();
    cli::install_interrupt_handler(cli.is_cancellable(), cancel.clone())?;

    match cli::dispatch(cli, &cancel) {
        Err(err) if err.downcast_ref::<ConfigError>().is_some() => {
            eprintln!("Error: {}\n", err);
            eprintln!("{}", cli::battery_test_usage());
            std::process::exit(2);
        }
        other => other,
    }
}
