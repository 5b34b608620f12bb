use anyhow::{Context, Result};

use korad_load::instrument::available_ports;

/// List serial ports as `<device>: <description>`
pub fn run() -> Result<()> {
    let ports = available_ports().context("Failed to enumerate serial ports")?;

    if ports.is_empty() {
        println!("No serial ports found");
    }
    for port in ports {
        println!("{}: {}", port.device, port.description);
    }
    Ok(())
}
