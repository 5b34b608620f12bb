use std::fmt;

use super::Measurement;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Charge and energy drawn so far in a run
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningTotals {
    /// Integrated current, A·s
    pub charge_coulombs: f64,
    /// Integrated power, W·s
    pub energy_joules: f64,
}

impl RunningTotals {
    /// Charge in ampere-hours
    pub fn ampere_hours(&self) -> f64 {
        self.charge_coulombs / SECONDS_PER_HOUR
    }

    /// Energy in watt-hours
    pub fn watt_hours(&self) -> f64 {
        self.energy_joules / SECONDS_PER_HOUR
    }
}

impl fmt::Display for RunningTotals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} Ah, {:.2} Wh", self.ampere_hours(), self.watt_hours())
    }
}

/// Add one sample's contribution, using the configured interval as timestep.
///
/// Negative readings contribute nothing, so totals never decrease. The totals
/// equal the plain sum of `reading * interval` only while every reading is
/// non-negative.
pub fn integrate(totals: RunningTotals, measurement: &Measurement, interval_seconds: f64) -> RunningTotals {
    RunningTotals {
        charge_coulombs: totals.charge_coulombs + measurement.current.max(0.0) * interval_seconds,
        energy_joules: totals.energy_joules + measurement.power.max(0.0) * interval_seconds,
    }
}
