//! Category boundaries and the natural-breaks collaborator.

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use serde::Serialize;

use crate::error::{AnalysisError, BackendError, Result};

/// Relative widening applied to the outer boundaries.
const OUTER_MARGIN: f64 = 0.001;

/// Computes natural-breaks boundaries for a series.
///
/// Implementations return `categories + 1` ordered values whose first and last
/// entries are the smallest and largest observations.
pub trait BreakpointProvider {
    fn breaks(&self, values: &[f64], categories: usize) -> Result<Vec<f64>, BackendError>;
}

impl<F> BreakpointProvider for F
where
    F: Fn(&[f64], usize) -> Result<Vec<f64>, BackendError>,
{
    fn breaks(&self, values: &[f64], categories: usize) -> Result<Vec<f64>, BackendError> {
        self(values, categories)
    }
}

/// Validated, strictly increasing category boundaries.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Breaks(Vec<f64>);

impl Breaks {
    /// Validate `values` as the boundaries of `categories` intervals.
    pub fn new(values: Vec<f64>, categories: usize) -> Result<Self> {
        if values.len() != categories + 1 {
            return Err(AnalysisError::InvalidBreaks(format!(
                "expected {} boundaries for {categories} categories, got {}",
                categories + 1,
                values.len()
            )));
        }
        if let Some(bad) = values.iter().find(|value| !value.is_finite()) {
            return Err(AnalysisError::InvalidBreaks(format!(
                "boundary {bad} is not finite"
            )));
        }
        if let Some(pair) = values.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(AnalysisError::InvalidBreaks(format!(
                "boundaries must be strictly increasing, found {} then {}",
                pair[0], pair[1]
            )));
        }
        Ok(Self(values))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn categories(&self) -> usize {
        self.0.len() - 1
    }

    pub fn first(&self) -> f64 {
        self.0[0]
    }

    pub fn last(&self) -> f64 {
        self.0[self.0.len() - 1]
    }

    /// Ordinal label of `value`, or `None` outside `[first, last]`.
    ///
    /// Intervals are right-closed `(b[i], b[i+1]]` except the first, which also
    /// includes its lower edge.
    pub fn bin(&self, value: f64) -> Option<i64> {
        if value.is_nan() || value < self.first() || value > self.last() {
            return None;
        }
        let below = self.0.partition_point(|edge| *edge < value);
        Some(below.saturating_sub(1) as i64)
    }

    /// Interval midpoints, one per category.
    pub fn midpoints(&self) -> Vec<f64> {
        crate::plot::midpoints(&self.0)
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.0
    }
}

/// Move `value` away from the data by the outer margin.
pub(crate) fn widen_low(value: f64) -> f64 {
    value - OUTER_MARGIN * value.abs()
}

pub(crate) fn widen_high(value: f64) -> f64 {
    value + OUTER_MARGIN * value.abs()
}

pub(crate) fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), value| {
            (lo.min(*value), hi.max(*value))
        })
}

/// Draw `size` values without replacement; seeded draws are reproducible.
pub(crate) fn sample(values: &[f64], size: usize, seed: Option<u64>) -> Vec<f64> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    values.choose_multiple(&mut rng, size).copied().collect()
}

/// Natural-breaks boundaries for the full series, estimated from a sample when
/// the series is longer than `sample_size`.
pub(crate) fn natural_breaks(
    provider: &dyn BreakpointProvider,
    values: &[f64],
    categories: usize,
    sample_size: usize,
    seed: Option<u64>,
) -> Result<Breaks> {
    if values.len() <= sample_size {
        let raw = provider
            .breaks(values, categories)
            .map_err(|err| AnalysisError::backend("natural-breaks", err))?;
        return Breaks::new(raw, categories);
    }

    let drawn = sample(values, sample_size, seed);
    let mut raw = provider
        .breaks(&drawn, categories)
        .map_err(|err| AnalysisError::backend("natural-breaks", err))?;
    // the sample may miss the extremes of the full series
    let (lo, hi) = min_max(values);
    if let Some(first) = raw.first_mut() {
        *first = widen_low(lo);
    }
    if let Some(last) = raw.last_mut() {
        *last = widen_high(hi);
    }
    Breaks::new(raw, categories)
}

/// Equal-width boundaries over the observed range.
///
/// The lowest edge is pulled down by 0.1% of the range; a constant series is
/// widened by 0.1% of its magnitude on both sides.
pub(crate) fn equal_width(values: &[f64], categories: usize) -> Result<Breaks> {
    let (mut lo, mut hi) = min_max(values);
    let constant = lo == hi;
    if constant {
        let pad = if lo == 0.0 { OUTER_MARGIN } else { OUTER_MARGIN * lo.abs() };
        lo -= pad;
        hi += pad;
    }
    let step = (hi - lo) / categories as f64;
    let mut raw: Vec<f64> = (0..=categories).map(|idx| lo + step * idx as f64).collect();
    raw[categories] = hi;
    if !constant {
        raw[0] -= (hi - lo) * OUTER_MARGIN;
    }
    Breaks::new(raw, categories)
}
