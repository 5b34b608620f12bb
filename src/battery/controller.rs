use std::fmt;
use std::io::Write;
use std::path::PathBuf;

use chrono::{DateTime, Local};
use log::{debug, info, warn};

use super::{
    accumulator, sampler, stop, BatteryTestError, CancellationToken, Clock, Measurement,
    RunningTotals, StopReason, SystemClock, TestConfig, TestOptions,
};
use crate::instrument::ElectronicLoad;
use crate::report::{self, ChartRenderer, CsvSink, PlottersRenderer};

/// Outcome of a completed battery test
#[derive(Debug, Clone, PartialEq)]
pub struct TestResult {
    /// Condition that ended the run
    pub stop_reason: StopReason,
    /// Number of samples recorded
    pub total_samples: usize,
    /// Charge and energy at the last sample
    pub final_totals: RunningTotals,
    /// Wall-clock time the load was enabled
    pub started_at: DateTime<Local>,
    /// Time-series CSV
    pub csv_path: PathBuf,
    /// Summary chart
    pub chart_path: PathBuf,
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Battery test started {} stopped ({}) after {} samples: {}",
            self.started_at.format("%Y-%m-%d %H:%M:%S"),
            self.stop_reason,
            self.total_samples,
            self.final_totals
        )
    }
}

/// Series and totals gathered while the load was enabled
struct Discharge {
    series: Vec<Measurement>,
    totals: RunningTotals,
    stop_reason: StopReason,
    started_at: DateTime<Local>,
}

/// Console line echoed for each sample in verbose mode.
pub fn progress_line(measurement: &Measurement, totals: &RunningTotals) -> String {
    format!(
        "{} s: {:.2} V, {:.2} A, {:.2} W, {:.2} Ah, {:.2} Wh",
        measurement.elapsed_seconds,
        measurement.voltage,
        measurement.current,
        measurement.power,
        totals.ampere_hours(),
        totals.watt_hours()
    )
}

/// Drives one battery-discharge run against an [`ElectronicLoad`].
pub struct BatteryTestController<C = SystemClock, R = PlottersRenderer> {
    config: TestConfig,
    clock: C,
    renderer: R,
}

impl BatteryTestController {
    /// Controller using the wall clock and the PNG renderer
    pub fn new(config: TestConfig) -> Self {
        Self {
            config,
            clock: SystemClock::new(),
            renderer: PlottersRenderer::default(),
        }
    }
}

impl<C: Clock, R: ChartRenderer> BatteryTestController<C, R> {
    /// Replace the time source
    pub fn with_clock<C2: Clock>(self, clock: C2) -> BatteryTestController<C2, R> {
        BatteryTestController {
            config: self.config,
            clock,
            renderer: self.renderer,
        }
    }

    /// Replace the chart renderer
    pub fn with_renderer<R2: ChartRenderer>(self, renderer: R2) -> BatteryTestController<C, R2> {
        BatteryTestController {
            config: self.config,
            clock: self.clock,
            renderer,
        }
    }

    /// Configuration this controller runs
    pub fn config(&self) -> &TestConfig {
        &self.config
    }

    /// Run the test to completion.
    ///
    /// Once the load has been enabled it is disabled exactly once on every
    /// exit path, before any error is returned and before the chart is drawn.
    pub fn run<L: ElectronicLoad + ?Sized>(
        &self,
        load: &mut L,
        cancel: &CancellationToken,
    ) -> Result<TestResult, BatteryTestError> {
        let config = &self.config;
        info!(
            "Starting battery test: {}, sampling every {} s",
            config.rate(),
            config.sampling_interval()
        );

        load.configure(config.rate().mode(), config.rate().value())?;
        let mut sink = CsvSink::create(config.csv_path())?;

        let discharge = self.discharge(load, &mut sink, cancel);
        let disabled = load.set_enabled(false);

        if config.verbose() {
            println!();
        }

        let discharge = match (discharge, disabled) {
            (Ok(discharge), Ok(())) => discharge,
            (Ok(_), Err(e)) => return Err(e.into()),
            (Err(e), Ok(())) => return Err(e),
            (Err(e), Err(disable_err)) => {
                warn!("Failed to disable load after error: {}", disable_err);
                return Err(e);
            }
        };
        info!("Load disabled: {}", discharge.stop_reason);

        let total_samples = sink.finish()?;
        report::finalize(
            &self.renderer,
            &discharge.series,
            config,
            &discharge.totals,
            &config.chart_path(),
        )?;

        Ok(TestResult {
            stop_reason: discharge.stop_reason,
            total_samples,
            final_totals: discharge.totals,
            started_at: discharge.started_at,
            csv_path: config.csv_path(),
            chart_path: config.chart_path(),
        })
    }

    /// Enable the load and sample until a stop condition fires.
    fn discharge<L: ElectronicLoad + ?Sized>(
        &self,
        load: &mut L,
        sink: &mut CsvSink,
        cancel: &CancellationToken,
    ) -> Result<Discharge, BatteryTestError> {
        let config = &self.config;
        let mut series = Vec::new();
        let mut totals = RunningTotals::default();

        load.set_enabled(true)?;
        let started_at = Local::now();
        let t0 = self.clock.now();

        let stop_reason = loop {
            if cancel.is_cancelled() {
                break StopReason::UserCancelled;
            }

            let elapsed = self.clock.now().saturating_sub(t0).as_secs();
            let measurement = sampler::sample(load, elapsed)?;
            sink.append(&measurement)?;
            totals = accumulator::integrate(totals, &measurement, config.sampling_interval());
            series.push(measurement);

            debug!("Sample {:?}, totals {:?}", measurement, totals);
            if config.verbose() {
                print!("{}    \r", progress_line(&measurement, &totals));
                // Console echo is best effort.
                let _ = std::io::stdout().flush();
            }

            if let Some(reason) =
                stop::evaluate(config, elapsed, measurement.voltage, cancel.is_cancelled())
            {
                break reason;
            }

            self.clock.sleep(config.sampling_period(), cancel);
        };

        Ok(Discharge {
            series,
            totals,
            stop_reason,
            started_at,
        })
    }
}

/// Validate `options` and run a battery test on the wall clock with PNG output.
///
/// Fails with [`BatteryTestError::Config`] before touching the instrument if
/// the options are inconsistent.
pub fn run_battery_test<L: ElectronicLoad + ?Sized>(
    load: &mut L,
    options: &TestOptions,
    cancel: &CancellationToken,
) -> Result<TestResult, BatteryTestError> {
    let config = options.validate()?;
    BatteryTestController::new(config).run(load, cancel)
}
