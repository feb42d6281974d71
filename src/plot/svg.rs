//! SVG rendering through `plotters`.

use std::path::PathBuf;

use plotters::prelude::*;
use tracing::info;

use super::{ErrorBarPlot, PlotRenderer};
use crate::error::BackendError;

/// Writes the chart to an SVG file.
#[derive(Debug, Clone)]
pub struct SvgPlot {
    pub path: PathBuf,
    pub size: (u32, u32),
}

impl SvgPlot {
    pub fn new(path: impl Into<PathBuf>, size: (u32, u32)) -> Self {
        Self {
            path: path.into(),
            size,
        }
    }
}

impl PlotRenderer for SvgPlot {
    fn render(&self, plot: &ErrorBarPlot) -> Result<(), BackendError> {
        if plot.points.is_empty() {
            info!("no categories to plot");
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let (min_x, max_x) = padded(plot.x_range());
        let (min_y, max_y) = padded(plot.y_range());

        let root_area = SVGBackend::new(&self.path, self.size).into_drawing_area();
        root_area.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root_area)
            .margin(25)
            .caption(&plot.title, ("sans-serif", 20))
            .x_label_area_size(50)
            .y_label_area_size(50)
            .build_cartesian_2d(min_x..max_x, min_y..max_y)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc(plot.x_label.as_str())
            .y_desc(plot.y_label.as_str())
            .draw()?;

        let series_points: Vec<(f64, f64)> = plot.points.iter().map(|p| (p.x, p.y)).collect();
        chart.draw_series(LineSeries::new(series_points.clone(), &BLUE))?;
        chart.draw_series(
            series_points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 4, BLUE.filled())),
        )?;
        chart.draw_series(plot.points.iter().map(|p| {
            ErrorBar::new_vertical(
                p.x,
                p.y - p.error.below,
                p.y,
                p.y + p.error.above,
                BLUE.filled(),
                8,
            )
        }))?;

        root_area.present()?;
        info!(path = %self.path.display(), points = plot.points.len(), "wrote log-odds plot");
        Ok(())
    }
}

/// Widen a range by 5% so markers sit inside the frame; a single value gets a unit span.
fn padded((lo, hi): (f64, f64)) -> (f64, f64) {
    if hi > lo {
        let pad = (hi - lo) * 0.05;
        (lo - pad, hi + pad)
    } else {
        (lo - 0.5, hi + 0.5)
    }
}
