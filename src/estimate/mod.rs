//! Per-category log-odds standard errors from a no-intercept logistic model.
//!
//! The model is `outcome ~ C(predictor) - 1`: one indicator per category and
//! no constant, so every coefficient is the log-odds of that category rather
//! than a contrast against a reference level.

pub mod logistic;
pub mod precomputed;

use std::{collections::BTreeMap, fmt, str::FromStr};

use once_cell::sync::Lazy;
use polars::prelude::DataFrame;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    data,
    error::{AnalysisError, Result},
};

pub use logistic::LinfaLogit;
pub use precomputed::PrecomputedTerms;

/// Standard error of each category's log-odds.
pub type StdErrors = BTreeMap<CategoryKey, f64>;

/// Identifier of a category level as reported by a regression engine.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryKey {
    Index(i64),
    Label(String),
}

impl CategoryKey {
    /// Integer when the token parses as one, otherwise the token itself.
    pub fn parse(token: &str) -> Self {
        token
            .trim()
            .parse::<i64>()
            .map(Self::Index)
            .unwrap_or_else(|_| Self::Label(token.to_string()))
    }

    /// Re-apply the integer coercion to textual keys.
    pub fn normalised(self) -> Self {
        match self {
            Self::Label(label) => Self::parse(&label),
            index => index,
        }
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "{index}"),
            Self::Label(label) => f.write_str(label),
        }
    }
}

/// A model term `variable[level]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub variable: String,
    pub level: CategoryKey,
}

impl Term {
    pub fn new(variable: impl Into<String>, level: CategoryKey) -> Self {
        Self {
            variable: variable.into(),
            level,
        }
    }

    /// Whether the term belongs to `predictor`, written bare or as `C(predictor)`.
    pub fn refers_to(&self, predictor: &str) -> bool {
        self.variable == predictor
            || self
                .variable
                .strip_prefix("C(")
                .and_then(|rest| rest.strip_suffix(')'))
                .is_some_and(|inner| inner == predictor)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.variable, self.level)
    }
}

impl FromStr for Term {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        static PATTERN: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"^(?P<variable>.*)\[(?P<level>\w+)\]$").expect("valid regex")
        });
        let captures = PATTERN
            .captures(s.trim())
            .ok_or_else(|| AnalysisError::MalformedTerm(s.to_string()))?;
        Ok(Self {
            variable: captures["variable"].to_string(),
            level: CategoryKey::parse(&captures["level"]),
        })
    }
}

/// One fitted coefficient and its standard error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedTerm {
    pub term: Term,
    pub estimate: f64,
    pub std_error: f64,
}

/// Rows usable for the model: outcome and category both present.
#[derive(Debug, Clone)]
pub struct ModelFrame {
    pub outcome: String,
    pub predictor: String,
    /// Case indicator per row.
    pub cases: Vec<bool>,
    /// Sorted distinct category levels.
    pub levels: Vec<i64>,
    /// Position in `levels` for each row.
    pub level_index: Vec<usize>,
}

impl ModelFrame {
    pub fn from_frame(frame: &DataFrame, outcome: &str, case_value: &str, predictor: &str) -> Result<Self> {
        let flags = data::case_indicator(frame, outcome, case_value)?;
        let labels = data::category_labels(frame, predictor)?;
        let rows: Vec<(bool, i64)> = flags
            .into_iter()
            .zip(labels)
            .filter_map(|(flag, label)| Some((flag?, label?)))
            .collect();

        let mut levels: Vec<i64> = rows.iter().map(|(_, label)| *label).collect();
        levels.sort_unstable();
        levels.dedup();

        let mut cases = Vec::with_capacity(rows.len());
        let mut level_index = Vec::with_capacity(rows.len());
        for (flag, label) in rows {
            cases.push(flag);
            // levels is sorted and holds every label
            level_index.push(levels.partition_point(|level| *level < label));
        }

        Ok(Self {
            outcome: outcome.to_string(),
            predictor: predictor.to_string(),
            cases,
            levels,
            level_index,
        })
    }

    pub fn rows(&self) -> usize {
        self.cases.len()
    }

    /// `(cases, non_cases)` for each entry of `levels`.
    pub fn level_counts(&self) -> Vec<(u64, u64)> {
        let mut counts = vec![(0u64, 0u64); self.levels.len()];
        for (case, level) in self.cases.iter().zip(&self.level_index) {
            if *case {
                counts[*level].0 += 1;
            } else {
                counts[*level].1 += 1;
            }
        }
        counts
    }
}

/// Fits `outcome ~ C(predictor) - 1` with a binomial family and logit link.
pub trait RegressionEngine {
    fn fit_logit(&self, model: &ModelFrame) -> Result<Vec<FittedTerm>>;
}

/// Fit the no-intercept model and key each standard error by category.
pub fn log_odds_std_errors(
    engine: &dyn RegressionEngine,
    frame: &DataFrame,
    outcome: &str,
    case_value: &str,
    predictor: &str,
    verbose: bool,
) -> Result<StdErrors> {
    let model = ModelFrame::from_frame(frame, outcome, case_value, predictor)?;
    if model.rows() == 0 {
        return Err(AnalysisError::NoObservations(predictor.to_string()));
    }

    let terms = engine.fit_logit(&model)?;
    let mut std_errors = StdErrors::new();
    for fitted in terms {
        if !fitted.term.refers_to(predictor) {
            return Err(AnalysisError::MalformedTerm(fitted.term.to_string()));
        }
        if !fitted.std_error.is_finite() || fitted.std_error <= 0.0 {
            return Err(AnalysisError::NonConvergence(format!(
                "term {} has standard error {}",
                fitted.term, fitted.std_error
            )));
        }
        if verbose {
            info!(term = %fitted.term, estimate = fitted.estimate, std_error = fitted.std_error, "fitted term");
        } else {
            debug!(term = %fitted.term, estimate = fitted.estimate, std_error = fitted.std_error, "fitted term");
        }
        std_errors.insert(fitted.term.level.normalised(), fitted.std_error);
    }

    for level in &model.levels {
        if !std_errors.contains_key(&CategoryKey::Index(*level)) {
            warn!(category = *level, predictor, "no fitted term for category");
        }
    }
    Ok(std_errors)
}
