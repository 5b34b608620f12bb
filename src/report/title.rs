use crate::battery::{DischargeRate, RunningTotals};

/// Format an hour-based quantity as `x.xx <unit>h`, or `N m<unit>h` below 1.0.
///
/// The milli form truncates toward zero.
pub fn format_hours(value: f64, unit: &str) -> String {
    if value >= 1.0 {
        format!("{value:.2} {unit}h")
    } else {
        format!("{} m{unit}h", (value * 1000.0) as i64)
    }
}

/// Title of the summary chart, e.g. `Constant Current 1.0 A: 850 mAh, 3.12 Wh`.
pub fn chart_title(rate: &DischargeRate, totals: &RunningTotals) -> String {
    format!(
        "{}: {}, {}",
        rate,
        format_hours(totals.ampere_hours(), "A"),
        format_hours(totals.watt_hours(), "W")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_milli_form_below_one() {
        assert_eq!(format_hours(0.85, "A"), "850 mAh");
        assert_eq!(format_hours(0.0, "W"), "0 mWh");
        assert_eq!(format_hours(0.9999, "A"), "999 mAh");
    }

    #[test]
    fn test_unit_form_at_and_above_one() {
        assert_eq!(format_hours(1.0, "A"), "1.00 Ah");
        assert_eq!(format_hours(1.2, "A"), "1.20 Ah");
        assert_eq!(format_hours(12.346, "W"), "12.35 Wh");
    }

    #[test]
    fn test_chart_title() {
        let totals = RunningTotals {
            charge_coulombs: 0.85 * 3600.0,
            energy_joules: 3.5 * 3600.0,
        };
        assert_eq!(
            chart_title(&DischargeRate::ConstantCurrent(0.5), &totals),
            "Constant Current 0.5 A: 850 mAh, 3.50 Wh"
        );
        assert_eq!(
            chart_title(&DischargeRate::ConstantPower(2.0), &RunningTotals::default()),
            "Constant Power 2.0 W: 0 mAh, 0 mWh"
        );
    }
}
