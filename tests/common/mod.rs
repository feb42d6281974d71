//! Shared fixtures and test doubles.
#![allow(dead_code)]

use std::{cell::{Cell, RefCell}, rc::Rc};

use logodds_explorer::{
    categorise::BreakpointProvider,
    error::{BackendError, Result},
    estimate::{FittedTerm, LinfaLogit, ModelFrame, RegressionEngine},
    plot::{ErrorBarPlot, PlotRenderer},
};
use polars::prelude::*;

/// Deterministic stand-in for a natural-breaks backend: equal-count classes
/// over the sorted values, bounded by the observed minimum and maximum.
pub struct SortedQuantileBreaks;

impl BreakpointProvider for SortedQuantileBreaks {
    fn breaks(&self, values: &[f64], categories: usize) -> Result<Vec<f64>, BackendError> {
        if values.is_empty() {
            return Err("no values".into());
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let n = sorted.len();
        let mut breaks = vec![sorted[0]];
        for class in 1..categories {
            breaks.push(sorted[(class * n / categories).saturating_sub(1)]);
        }
        breaks.push(sorted[n - 1]);
        Ok(breaks)
    }
}

/// Wraps the linfa engine and counts how often it is asked to fit.
pub struct CountingEngine {
    pub calls: Rc<Cell<usize>>,
    inner: LinfaLogit,
}

impl CountingEngine {
    pub fn new() -> (Self, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        (
            Self {
                calls: calls.clone(),
                inner: LinfaLogit::default(),
            },
            calls,
        )
    }
}

impl RegressionEngine for CountingEngine {
    fn fit_logit(&self, model: &ModelFrame) -> Result<Vec<FittedTerm>> {
        self.calls.set(self.calls.get() + 1);
        self.inner.fit_logit(model)
    }
}

/// Keeps every plot it is asked to render.
#[derive(Clone, Default)]
pub struct RecordingPlot {
    pub plots: Rc<RefCell<Vec<ErrorBarPlot>>>,
}

impl PlotRenderer for RecordingPlot {
    fn render(&self, plot: &ErrorBarPlot) -> Result<(), BackendError> {
        self.plots.borrow_mut().push(plot.clone());
        Ok(())
    }
}

/// `rows` observations with the predictor spread evenly over `[0, 100)` and
/// every third row a case.
pub fn uniform_frame(rows: usize) -> DataFrame {
    let exposure: Vec<f64> = (0..rows).map(|i| i as f64 * 100.0 / rows as f64).collect();
    let outcome: Vec<i32> = (0..rows).map(|i| i32::from(i % 3 == 0)).collect();
    DataFrame::new(vec![
        Series::new("died".into(), outcome),
        Series::new("age years".into(), exposure),
    ])
    .unwrap()
}

/// Predictor stored as text with a few `missing` cells.
pub fn frame_with_sentinel() -> DataFrame {
    df! {
        "case" => [1i32, 0, 0, 1, 0, 1, 0, 0, 1, 0, 1, 0],
        "dose" => ["1.0", "2.0", "missing", "4.0", "5.0", "6.0", "missing", "8.0", "9.0", "10.0", "11.0", "12.0"],
    }
    .unwrap()
}
