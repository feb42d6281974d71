//! End-to-end orchestration: categorise, tabulate odds, fit standard errors,
//! build intervals and hand the log-odds curve to the plotting backend.

use polars::prelude::{DataFrame, NamedFrom, PolarsResult, Series};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::{
    categorise::{BreakpointProvider, Breaks, CategoriseOptions, Categoriser, Method, DEFAULT_SAMPLE_SIZE},
    error::{AnalysisError, Result},
    estimate::{self, CategoryKey, RegressionEngine},
    interval::{self, Interval},
    odds,
    plot::{self, ErrorBarPlot, PlotPoint, PlotRenderer},
};

/// Suffix appended to the predictor name to form the category column.
pub const CATEGORY_SUFFIX: &str = "cat";

pub const PLOT_TITLE: &str = "Log-odds against mid-points of category";

/// Category column name derived from the predictor: spaces become underscores.
pub fn default_category_column(predictor: &str) -> String {
    format!("{}_{CATEGORY_SUFFIX}", predictor.replace(' ', "_"))
}

/// Analysis options. Every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogOddsConfig {
    /// Outcome value marking a case.
    pub case_value: String,
    /// Sentinel marking a missing predictor value.
    pub missing: String,
    pub categories: usize,
    /// Name of the new category column; derived from the predictor when absent.
    pub category_column: Option<String>,
    pub method: Method,
    pub alpha: f64,
    /// Category the odds ratios are computed against.
    pub baseline: i64,
    pub sample_size: usize,
    pub sample_seed: Option<u64>,
    /// Log intermediate tables at `info` instead of `debug`.
    pub verbose: bool,
}

impl Default for LogOddsConfig {
    fn default() -> Self {
        Self {
            case_value: "1".to_string(),
            missing: "missing".to_string(),
            categories: 5,
            category_column: None,
            method: Method::NaturalBreaks,
            alpha: 0.05,
            baseline: 1,
            sample_size: DEFAULT_SAMPLE_SIZE,
            sample_seed: None,
            verbose: false,
        }
    }
}

/// Collaborators available to the pipeline, resolved once at start-up.
pub struct Backends {
    pub natural_breaks: Option<Box<dyn BreakpointProvider>>,
    pub regression: Box<dyn RegressionEngine>,
    pub plot: Option<Box<dyn PlotRenderer>>,
}

impl Backends {
    pub fn new(regression: Box<dyn RegressionEngine>) -> Self {
        Self {
            natural_breaks: None,
            regression,
            plot: None,
        }
    }

    pub fn with_natural_breaks(mut self, provider: Box<dyn BreakpointProvider>) -> Self {
        self.natural_breaks = Some(provider);
        self
    }

    pub fn with_plot(mut self, renderer: Box<dyn PlotRenderer>) -> Self {
        self.plot = Some(renderer);
        self
    }
}

/// Results for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryResult {
    pub category: i64,
    pub cases: u64,
    pub non_cases: u64,
    pub odds: f64,
    pub odds_ratio: Option<f64>,
    pub odds_ratio_ci: Option<Interval>,
    pub log_odds: Option<f64>,
    pub std_err: Option<f64>,
    pub ci: Option<Interval>,
    pub midpoint: Option<f64>,
}

/// Per-category results ordered by category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogOddsTable {
    pub category_column: String,
    pub alpha: f64,
    pub breaks: Breaks,
    pub rows: Vec<CategoryResult>,
}

impl LogOddsTable {
    pub fn row(&self, category: i64) -> Option<&CategoryResult> {
        self.rows.iter().find(|row| row.category == category)
    }

    /// Log-odds against midpoints for every row with an interval.
    pub fn plot(&self) -> Result<ErrorBarPlot> {
        let plotted: Vec<(f64, f64, Interval)> = self
            .rows
            .iter()
            .filter_map(|row| Some((row.midpoint?, row.log_odds?, row.ci?)))
            .collect();
        let ys: Vec<f64> = plotted.iter().map(|(_, y, _)| *y).collect();
        let lower: Vec<f64> = plotted.iter().map(|(_, _, ci)| ci.lower).collect();
        let upper: Vec<f64> = plotted.iter().map(|(_, _, ci)| ci.upper).collect();
        let bars = plot::error_bars(&ys, &lower, &upper)?;

        Ok(ErrorBarPlot {
            title: PLOT_TITLE.to_string(),
            x_label: self.category_column.clone(),
            y_label: "Log odds".to_string(),
            points: plotted
                .iter()
                .zip(bars)
                .map(|((x, y, _), error)| PlotPoint { x: *x, y: *y, error })
                .collect(),
        })
    }

    pub fn to_frame(&self) -> PolarsResult<DataFrame> {
        let rows = &self.rows;
        DataFrame::new(vec![
            Series::new("category".into(), rows.iter().map(|r| r.category).collect::<Vec<_>>()),
            Series::new("cases".into(), rows.iter().map(|r| r.cases).collect::<Vec<_>>()),
            Series::new("non_cases".into(), rows.iter().map(|r| r.non_cases).collect::<Vec<_>>()),
            Series::new("odds".into(), rows.iter().map(|r| r.odds).collect::<Vec<_>>()),
            Series::new("odds_ratio".into(), rows.iter().map(|r| r.odds_ratio).collect::<Vec<_>>()),
            Series::new(
                "or_lower".into(),
                rows.iter().map(|r| r.odds_ratio_ci.map(|ci| ci.lower)).collect::<Vec<_>>(),
            ),
            Series::new(
                "or_upper".into(),
                rows.iter().map(|r| r.odds_ratio_ci.map(|ci| ci.upper)).collect::<Vec<_>>(),
            ),
            Series::new("log_odds".into(), rows.iter().map(|r| r.log_odds).collect::<Vec<_>>()),
            Series::new("std_err".into(), rows.iter().map(|r| r.std_err).collect::<Vec<_>>()),
            Series::new(
                "ci_lower".into(),
                rows.iter().map(|r| r.ci.map(|ci| ci.lower)).collect::<Vec<_>>(),
            ),
            Series::new(
                "ci_upper".into(),
                rows.iter().map(|r| r.ci.map(|ci| ci.upper)).collect::<Vec<_>>(),
            ),
            Series::new("midpoint".into(), rows.iter().map(|r| r.midpoint).collect::<Vec<_>>()),
        ])
    }
}

/// Runs the log-odds exploration against a fixed set of backends.
pub struct LogOddsPipeline {
    backends: Backends,
}

impl LogOddsPipeline {
    pub fn new(backends: Backends) -> Self {
        Self { backends }
    }

    /// Explore `outcome` against the continuous `predictor`.
    ///
    /// Returns `Ok(None)` when the predictor could not be categorised with the
    /// configured backends; nothing downstream runs in that case.
    #[instrument(skip(self, frame, config), fields(method = %config.method))]
    pub fn run(
        &self,
        frame: &DataFrame,
        outcome: &str,
        predictor: &str,
        config: &LogOddsConfig,
    ) -> Result<Option<LogOddsTable>> {
        let z = interval::critical_value(config.alpha)?;
        let category_column = config
            .category_column
            .clone()
            .unwrap_or_else(|| default_category_column(predictor));

        let options = CategoriseOptions {
            column: predictor.to_string(),
            missing: config.missing.clone(),
            categories: config.categories,
            new_column: category_column.clone(),
            method: config.method.clone(),
            sample_size: config.sample_size,
            sample_seed: config.sample_seed,
            verbose: config.verbose,
        };
        let categoriser = Categoriser::new(self.backends.natural_breaks.as_deref());
        let Some(categorised) = categoriser.categorise(frame, &options)? else {
            warn!(predictor, "categorisation unavailable; no results produced");
            return Ok(None);
        };

        let odds_rows = odds::odds_ratio(
            &categorised.frame,
            outcome,
            &config.case_value,
            &category_column,
            config.baseline,
            config.alpha,
        )?;

        let std_errors = estimate::log_odds_std_errors(
            self.backends.regression.as_ref(),
            &categorised.frame,
            outcome,
            &config.case_value,
            &category_column,
            config.verbose,
        )?;

        let midpoints = categorised.breaks.midpoints();
        let rows: Vec<CategoryResult> = odds_rows
            .into_iter()
            .map(|row| {
                let log_odds = row.log_odds();
                let std_err = std_errors.get(&CategoryKey::Index(row.category)).copied();
                let ci = log_odds
                    .zip(std_err)
                    .map(|(estimate, se)| Interval::around(estimate, se, z));
                let midpoint = usize::try_from(row.category)
                    .ok()
                    .and_then(|idx| midpoints.get(idx).copied());
                CategoryResult {
                    category: row.category,
                    cases: row.cases,
                    non_cases: row.non_cases,
                    odds: row.odds,
                    odds_ratio: row.odds_ratio,
                    odds_ratio_ci: row.odds_ratio_ci,
                    log_odds,
                    std_err,
                    ci,
                    midpoint,
                }
            })
            .collect();

        let table = LogOddsTable {
            category_column,
            alpha: config.alpha,
            breaks: categorised.breaks,
            rows,
        };

        if config.verbose {
            info!("odds ratio table\n{}", table.to_frame()?);
        } else {
            debug!(rows = table.rows.len(), "assembled log-odds table");
        }

        if let Some(renderer) = &self.backends.plot {
            let chart = table.plot()?;
            renderer
                .render(&chart)
                .map_err(|err| AnalysisError::backend("plot", err))?;
        }

        Ok(Some(table))
    }
}
