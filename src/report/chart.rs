use std::ops::Range;
use std::path::Path;

use plotters::prelude::*;
use plotters::series::DashedLineSeries;

use super::ReportError;

/// Everything needed to draw the end-of-run chart
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryChart {
    /// Chart caption
    pub title: String,
    /// X-axis description
    pub x_label: String,
    /// Y-axis description
    pub y_label: String,
    /// (elapsed seconds, voltage) pairs in recording order
    pub points: Vec<(u64, f64)>,
}

impl SummaryChart {
    fn x_range(&self) -> Range<f64> {
        let last = self.points.iter().map(|&(t, _)| t).max().unwrap_or(0);
        0.0..(last.max(1) as f64)
    }

    fn y_range(&self) -> Range<f64> {
        let (min, max) = self
            .points
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(_, v)| {
                (lo.min(v), hi.max(v))
            });

        if !min.is_finite() || !max.is_finite() {
            return 0.0..1.0;
        }

        let pad = if max > min { 0.1 * (max - min) } else { 0.5 };
        (min - pad)..(max + pad)
    }
}

/// Draws a [`SummaryChart`] to an image file
pub trait ChartRenderer {
    /// Render `chart` to `path`, replacing any existing file.
    fn render(&self, chart: &SummaryChart, path: &Path) -> Result<(), ReportError>;
}

/// PNG renderer built on `plotters`' bitmap backend
#[derive(Debug, Clone)]
pub struct PlottersRenderer {
    /// Image width in pixels (default: 1024)
    pub width: u32,
    /// Image height in pixels (default: 768)
    pub height: u32,
    /// Voltage trace color (default: BLUE)
    pub line_color: RGBColor,
    /// Number of dotted grid cells along each axis (default: 10)
    pub grid_divisions: u32,
}

impl Default for PlottersRenderer {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            line_color: BLUE,
            grid_divisions: 10,
        }
    }
}

fn chart_error<E: std::fmt::Display>(err: E) -> ReportError {
    ReportError::Chart(err.to_string())
}

fn grid_positions(range: &Range<f64>, divisions: u32) -> Vec<f64> {
    let span = range.end - range.start;
    (0..=divisions)
        .map(|i| range.start + span * f64::from(i) / f64::from(divisions.max(1)))
        .collect()
}

impl ChartRenderer for PlottersRenderer {
    fn render(&self, chart: &SummaryChart, path: &Path) -> Result<(), ReportError> {
        let root = BitMapBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE).map_err(chart_error)?;

        let x_range = chart.x_range();
        let y_range = chart.y_range();

        let mut ctx = ChartBuilder::on(&root)
            .caption(&chart.title, ("sans-serif", 24).into_font())
            .margin(15)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(x_range.clone(), y_range.clone())
            .map_err(chart_error)?;

        // Axes and labels only; the grid is drawn dotted below.
        ctx.configure_mesh()
            .disable_mesh()
            .x_desc(chart.x_label.as_str())
            .y_desc(chart.y_label.as_str())
            .draw()
            .map_err(chart_error)?;

        let grid_style = BLACK.mix(0.3).stroke_width(1);
        for x in grid_positions(&x_range, self.grid_divisions) {
            ctx.draw_series(DashedLineSeries::new(
                [(x, y_range.start), (x, y_range.end)],
                2,
                4,
                grid_style,
            ))
            .map_err(chart_error)?;
        }
        for y in grid_positions(&y_range, self.grid_divisions) {
            ctx.draw_series(DashedLineSeries::new(
                [(x_range.start, y), (x_range.end, y)],
                2,
                4,
                grid_style,
            ))
            .map_err(chart_error)?;
        }

        ctx.draw_series(LineSeries::new(
            chart.points.iter().map(|&(t, v)| (t as f64, v)),
            self.line_color.stroke_width(2),
        ))
        .map_err(chart_error)?;

        root.present().map_err(chart_error)?;
        Ok(())
    }
}
