//! Discretise a continuous column into ordered categories.

pub mod breaks;

use std::{fmt, str::FromStr};

use polars::prelude::{DataFrame, NamedFrom, Series};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    data,
    error::{AnalysisError, Result},
};

pub use breaks::{BreakpointProvider, Breaks};

/// Default number of values used to estimate natural breaks on large series.
pub const DEFAULT_SAMPLE_SIZE: usize = 1000;

/// Strategy used to derive category boundaries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Method {
    /// Boundaries from the natural-breaks provider.
    #[default]
    NaturalBreaks,
    /// Equal-width bins over the observed range.
    Quantile,
    /// Caller-supplied boundaries.
    Cutoffs(Vec<f64>),
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::NaturalBreaks => write!(f, "natural-breaks"),
            Method::Quantile => write!(f, "quantile"),
            Method::Cutoffs(values) => write!(f, "cutoffs{values:?}"),
        }
    }
}

impl FromStr for Method {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "natural-breaks" | "jenks" => Ok(Method::NaturalBreaks),
            "quantile" => Ok(Method::Quantile),
            _ => Err(AnalysisError::UnknownMethod(s.to_string())),
        }
    }
}

/// Inputs for a single categorisation.
#[derive(Debug, Clone)]
pub struct CategoriseOptions {
    pub column: String,
    pub missing: String,
    pub categories: usize,
    pub new_column: String,
    pub method: Method,
    pub sample_size: usize,
    pub sample_seed: Option<u64>,
    pub verbose: bool,
}

/// A frame with its new category column and the boundaries that produced it.
#[derive(Debug, Clone)]
pub struct Categorised {
    pub frame: DataFrame,
    pub breaks: Breaks,
    pub column: String,
}

/// Applies a [`Method`] using whichever boundary backends are available.
pub struct Categoriser<'a> {
    natural_breaks: Option<&'a dyn BreakpointProvider>,
}

impl<'a> Categoriser<'a> {
    pub fn new(natural_breaks: Option<&'a dyn BreakpointProvider>) -> Self {
        Self { natural_breaks }
    }

    /// Categorise `options.column`, returning a new frame.
    ///
    /// `Ok(None)` means the method cannot run with the configured backends;
    /// the input frame is left untouched and a warning is emitted.
    pub fn categorise(&self, frame: &DataFrame, options: &CategoriseOptions) -> Result<Option<Categorised>> {
        if options.categories < 2 {
            return Err(AnalysisError::TooFewCategories(options.categories));
        }
        let values = data::continuous_values(frame, &options.column, &options.missing)?;
        let observed: Vec<f64> = values.iter().flatten().copied().collect();

        let breaks = match &options.method {
            Method::NaturalBreaks => {
                let Some(provider) = self.natural_breaks else {
                    warn!(
                        column = %options.column,
                        "natural-breaks backend not available; the variable has not been categorised"
                    );
                    return Ok(None);
                };
                ensure_observed(&observed, &options.column)?;
                breaks::natural_breaks(
                    provider,
                    &observed,
                    options.categories,
                    options.sample_size,
                    options.sample_seed,
                )?
            }
            Method::Quantile => {
                ensure_observed(&observed, &options.column)?;
                breaks::equal_width(&observed, options.categories)?
            }
            Method::Cutoffs(cutoffs) => {
                let categories = cutoffs.len().saturating_sub(1);
                if categories != options.categories {
                    debug!(
                        requested = options.categories,
                        categories, "cut-offs override the requested category count"
                    );
                }
                if categories < 2 {
                    return Err(AnalysisError::TooFewCategories(categories));
                }
                Breaks::new(cutoffs.clone(), categories)?
            }
        };

        if options.verbose {
            info!(method = %options.method, breaks = ?breaks.as_slice(), "category boundaries");
        } else {
            debug!(method = %options.method, breaks = ?breaks.as_slice(), "category boundaries");
        }

        let labels: Vec<Option<i64>> = values
            .iter()
            .map(|value| value.and_then(|v| breaks.bin(v)))
            .collect();
        let mut categorised = frame.clone();
        categorised.with_column(Series::new(options.new_column.as_str().into(), labels))?;

        Ok(Some(Categorised {
            frame: categorised,
            breaks,
            column: options.new_column.clone(),
        }))
    }
}

fn ensure_observed(observed: &[f64], column: &str) -> Result<()> {
    if observed.is_empty() {
        return Err(AnalysisError::NoObservations(column.to_string()));
    }
    Ok(())
}
