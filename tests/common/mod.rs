//! Shared fixtures for integration tests: a simulated load, a manual clock,
//! a chart renderer that records instead of drawing, and a wire-level
//! instrument simulator for exercising the serial session.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use korad_load::battery::{CancellationToken, Clock, TestOptions};
use korad_load::instrument::{ElectronicLoad, InstrumentError, InstrumentMode};
use korad_load::report::{ChartRenderer, ReportError, SummaryChart};
use tempfile::TempDir;

/// In-memory load returning scripted (voltage, current, power) readings.
///
/// Each sample reads voltage first; the sample counter advances on that read.
/// When the script runs out the last reading repeats.
pub struct SimulatedLoad {
    readings: Vec<(f64, f64, f64)>,
    samples_taken: usize,
    pub enabled: bool,
    pub enable_history: Vec<bool>,
    pub mode: InstrumentMode,
    pub setpoints: Vec<(InstrumentMode, f64)>,
    pub fail_on_sample: Option<usize>,
    pub fail_disable: bool,
    pub cancel_on_sample: Option<(usize, CancellationToken)>,
    pub calls: usize,
}

impl SimulatedLoad {
    pub fn constant(voltage: f64, current: f64, power: f64) -> Self {
        Self::scripted(vec![(voltage, current, power)])
    }

    pub fn scripted(readings: Vec<(f64, f64, f64)>) -> Self {
        assert!(!readings.is_empty());
        Self {
            readings,
            samples_taken: 0,
            enabled: false,
            enable_history: Vec::new(),
            mode: InstrumentMode::ConstantVoltage,
            setpoints: Vec::new(),
            fail_on_sample: None,
            fail_disable: false,
            cancel_on_sample: None,
            calls: 0,
        }
    }

    pub fn samples_taken(&self) -> usize {
        self.samples_taken
    }

    fn current_reading(&self) -> (f64, f64, f64) {
        let index = self
            .samples_taken
            .saturating_sub(1)
            .min(self.readings.len() - 1);
        self.readings[index]
    }

    fn setpoint_of(&self, mode: InstrumentMode) -> f64 {
        self.setpoints
            .iter()
            .rev()
            .find(|(m, _)| *m == mode)
            .map(|(_, v)| *v)
            .unwrap_or(0.0)
    }
}

impl ElectronicLoad for SimulatedLoad {
    fn id(&mut self) -> Result<String, InstrumentError> {
        self.calls += 1;
        Ok("SIMULATED KEL103".to_string())
    }

    fn enabled(&mut self) -> Result<bool, InstrumentError> {
        self.calls += 1;
        Ok(self.enabled)
    }

    fn set_enabled(&mut self, enabled: bool) -> Result<(), InstrumentError> {
        self.calls += 1;
        self.enable_history.push(enabled);
        if !enabled && self.fail_disable {
            return Err(InstrumentError::Timeout {
                command: ":INP OFF".to_string(),
            });
        }
        self.enabled = enabled;
        Ok(())
    }

    fn mode(&mut self) -> Result<InstrumentMode, InstrumentError> {
        self.calls += 1;
        Ok(self.mode)
    }

    fn set_mode(&mut self, mode: InstrumentMode) -> Result<(), InstrumentError> {
        self.calls += 1;
        self.mode = mode;
        Ok(())
    }

    fn constant_voltage(&mut self) -> Result<f64, InstrumentError> {
        self.calls += 1;
        Ok(self.setpoint_of(InstrumentMode::ConstantVoltage))
    }

    fn set_constant_voltage(&mut self, volts: f64) -> Result<(), InstrumentError> {
        self.calls += 1;
        self.setpoints.push((InstrumentMode::ConstantVoltage, volts));
        Ok(())
    }

    fn constant_current(&mut self) -> Result<f64, InstrumentError> {
        self.calls += 1;
        Ok(self.setpoint_of(InstrumentMode::ConstantCurrent))
    }

    fn set_constant_current(&mut self, amps: f64) -> Result<(), InstrumentError> {
        self.calls += 1;
        self.setpoints.push((InstrumentMode::ConstantCurrent, amps));
        Ok(())
    }

    fn constant_resistance(&mut self) -> Result<f64, InstrumentError> {
        self.calls += 1;
        Ok(self.setpoint_of(InstrumentMode::ConstantResistance))
    }

    fn set_constant_resistance(&mut self, ohms: f64) -> Result<(), InstrumentError> {
        self.calls += 1;
        self.setpoints.push((InstrumentMode::ConstantResistance, ohms));
        Ok(())
    }

    fn constant_power(&mut self) -> Result<f64, InstrumentError> {
        self.calls += 1;
        Ok(self.setpoint_of(InstrumentMode::ConstantPower))
    }

    fn set_constant_power(&mut self, watts: f64) -> Result<(), InstrumentError> {
        self.calls += 1;
        self.setpoints.push((InstrumentMode::ConstantPower, watts));
        Ok(())
    }

    fn voltage(&mut self) -> Result<f64, InstrumentError> {
        self.calls += 1;
        if self.fail_on_sample == Some(self.samples_taken) {
            return Err(InstrumentError::Timeout {
                command: ":MEAS:VOLT?".to_string(),
            });
        }
        if let Some((sample, token)) = &self.cancel_on_sample {
            if *sample == self.samples_taken {
                token.cancel();
            }
        }
        self.samples_taken += 1;
        Ok(self.current_reading().0)
    }

    fn current(&mut self) -> Result<f64, InstrumentError> {
        self.calls += 1;
        Ok(self.current_reading().1)
    }

    fn power(&mut self) -> Result<f64, InstrumentError> {
        self.calls += 1;
        Ok(self.current_reading().2)
    }
}

/// Virtual time that only moves when the loop sleeps.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }

    fn sleep(&self, period: Duration, _cancel: &CancellationToken) {
        self.now.set(self.now.get() + period);
    }
}

/// Renderer that keeps the charts it was asked to draw.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    pub charts: Rc<RefCell<Vec<(SummaryChart, PathBuf)>>>,
}

impl RecordingRenderer {
    pub fn rendered(&self) -> Vec<(SummaryChart, PathBuf)> {
        self.charts.borrow().clone()
    }
}

impl ChartRenderer for RecordingRenderer {
    fn render(&self, chart: &SummaryChart, path: &Path) -> Result<(), ReportError> {
        self.charts
            .borrow_mut()
            .push((chart.clone(), path.to_path_buf()));
        Ok(())
    }
}

/// Options writing their artifacts under `dir` as `<dir>/report.{csv,png}`.
pub fn options_in(dir: &TempDir) -> TestOptions {
    TestOptions {
        sampling_interval: 1.0,
        file_base_name: dir.path().join("report").to_string_lossy().into_owned(),
        ..Default::default()
    }
}

/// Byte-level stand-in for the instrument: parses command lines written to it
/// and queues the replies a real load would send.
pub struct WireSimulator {
    pending: VecDeque<u8>,
    partial: Vec<u8>,
    pub enabled: bool,
    pub mode: &'static str,
    pub current_setpoint: f64,
    pub power_setpoint: f64,
    pub voltage: f64,
    pub log: Rc<RefCell<Vec<String>>>,
}

impl WireSimulator {
    pub fn new(voltage: f64) -> Self {
        Self {
            pending: VecDeque::new(),
            partial: Vec::new(),
            enabled: false,
            mode: "CV",
            current_setpoint: 0.0,
            power_setpoint: 0.0,
            voltage,
            log: Rc::default(),
        }
    }

    fn reply(&mut self, text: String) {
        self.pending.extend(text.bytes());
        self.pending.push_back(b'\n');
    }

    fn drawn_current(&self) -> f64 {
        if !self.enabled {
            0.0
        } else if self.mode == "CW" {
            self.power_setpoint / self.voltage
        } else {
            self.current_setpoint
        }
    }

    fn handle(&mut self, line: &str) {
        self.log.borrow_mut().push(line.to_string());
        let current = self.drawn_current();

        match line {
            "*IDN?" => self.reply("KORAD KEL103 V3.30 SN:00000001".to_string()),
            ":INP?" => self.reply(if self.enabled { "ON" } else { "OFF" }.to_string()),
            ":INP ON" => self.enabled = true,
            ":INP OFF" => self.enabled = false,
            ":FUNC?" => self.reply(self.mode.to_string()),
            ":CURR?" => self.reply(format!("{:.3}A", self.current_setpoint)),
            ":POW?" => self.reply(format!("{:.2}W", self.power_setpoint)),
            ":MEAS:VOLT?" => self.reply(format!("{:.2}V", self.voltage)),
            ":MEAS:CURR?" => self.reply(format!("{:.3}A", current)),
            ":MEAS:POW?" => self.reply(format!("{:.2}W", current * self.voltage)),
            other => {
                if let Some(token) = other.strip_prefix(":FUNC ") {
                    self.mode = match token {
                        "CV" => "CV",
                        "CC" => "CC",
                        "CR" => "CR",
                        _ => "CW",
                    };
                } else if let Some(value) = other.strip_prefix(":CURR ") {
                    self.current_setpoint = value.trim_end_matches('A').parse().unwrap();
                } else if let Some(value) = other.strip_prefix(":POW ") {
                    self.power_setpoint = value.trim_end_matches('W').parse().unwrap();
                }
            }
        }
    }
}

impl Read for WireSimulator {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = buf.len().min(self.pending.len());
        for slot in buf.iter_mut().take(n) {
            *slot = self.pending.pop_front().unwrap();
        }
        Ok(n)
    }
}

impl Write for WireSimulator {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for &byte in buf {
            if byte == b'\n' {
                let line = String::from_utf8(std::mem::take(&mut self.partial)).unwrap();
                self.handle(&line);
            } else {
                self.partial.push(byte);
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
