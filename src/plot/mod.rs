//! Plot preparation: category midpoints, error-bar magnitudes and the
//! rendering seam.

pub mod svg;

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, BackendError, Result};

pub use svg::SvgPlot;

/// Midpoint of each interval defined by consecutive boundaries.
pub fn midpoints(breaks: &[f64]) -> Vec<f64> {
    breaks
        .windows(2)
        .map(|pair| (pair[0] + pair[1]) / 2.0)
        .collect()
}

/// Distances from a point estimate down to its lower bound and up to its upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErrorBar {
    pub below: f64,
    pub above: f64,
}

/// Convert absolute bounds into the non-negative magnitudes error-bar plots expect.
pub fn error_bars(points: &[f64], lower: &[f64], upper: &[f64]) -> Result<Vec<ErrorBar>> {
    if points.len() != lower.len() || points.len() != upper.len() {
        return Err(AnalysisError::InvalidInterval {
            category: points.len().min(lower.len()).min(upper.len()),
        });
    }
    points
        .iter()
        .zip(lower.iter().zip(upper))
        .enumerate()
        .map(|(category, (point, (lo, hi)))| {
            let bar = ErrorBar {
                below: point - lo,
                above: hi - point,
            };
            if bar.below >= 0.0 && bar.above >= 0.0 {
                Ok(bar)
            } else {
                Err(AnalysisError::InvalidInterval { category })
            }
        })
        .collect()
}

/// One plotted category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotPoint {
    pub x: f64,
    pub y: f64,
    pub error: ErrorBar,
}

/// A line chart with vertical error bars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBarPlot {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<PlotPoint>,
}

impl ErrorBarPlot {
    pub fn x_range(&self) -> (f64, f64) {
        span(self.points.iter().map(|p| p.x))
    }

    pub fn y_range(&self) -> (f64, f64) {
        let (lo, _) = span(self.points.iter().map(|p| p.y - p.error.below));
        let (_, hi) = span(self.points.iter().map(|p| p.y + p.error.above));
        (lo, hi)
    }
}

fn span(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)))
}

/// Draws an [`ErrorBarPlot`].
pub trait PlotRenderer {
    fn render(&self, plot: &ErrorBarPlot) -> Result<(), BackendError>;
}
