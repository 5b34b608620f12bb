use anyhow::{Context, Result};
use log::info;

use korad_load::instrument::{ElectronicLoad, InstrumentMode, SerialSession, Status};

/// Print the identification string
pub fn id(session: &mut SerialSession) -> Result<()> {
    let id = session.id().context("Failed to read instrument id")?;
    println!("{}", id);
    Ok(())
}

/// Switch the load input on or off
pub fn set_enabled(session: &mut SerialSession, enabled: bool) -> Result<()> {
    session
        .set_enabled(enabled)
        .with_context(|| format!("Failed to {} load", if enabled { "enable" } else { "disable" }))?;
    info!("Load {}", if enabled { "enabled" } else { "disabled" });
    Ok(())
}

/// Print mode, setpoint, enable state and measurements
pub fn status(session: &mut SerialSession) -> Result<()> {
    let status = Status::read(session).context("Failed to read load status")?;
    println!("{}", status);
    Ok(())
}

/// Write the setpoint for `mode` and make it active
pub fn configure(session: &mut SerialSession, mode: InstrumentMode, value: f64) -> Result<()> {
    session
        .configure(mode, value)
        .with_context(|| format!("Failed to set {} {}", mode, value))?;
    info!("{} set to {} {}", mode, value, mode.unit().symbol());
    Ok(())
}
