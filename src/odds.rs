//! Odds and odds ratios per category against a baseline category.

use std::collections::BTreeMap;

use polars::prelude::DataFrame;
use serde::Serialize;

use crate::{
    data,
    error::{AnalysisError, Result},
    interval::{critical_value, Interval},
};

/// Counts and odds for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OddsRow {
    pub category: i64,
    pub cases: u64,
    pub non_cases: u64,
    /// `cases / non_cases`; infinite when there are no non-cases.
    pub odds: f64,
    /// `None` for the baseline category.
    pub odds_ratio: Option<f64>,
    pub odds_ratio_ci: Option<Interval>,
}

impl OddsRow {
    /// Natural log of the odds, defined only with at least one case and one non-case.
    pub fn log_odds(&self) -> Option<f64> {
        (self.cases > 0 && self.non_cases > 0).then(|| self.odds.ln())
    }
}

/// Tabulate cases and non-cases by category and compare each category's odds
/// with those of `baseline`.
pub fn odds_ratio(
    frame: &DataFrame,
    case_column: &str,
    case_value: &str,
    risk_factor_column: &str,
    baseline: i64,
    alpha: f64,
) -> Result<Vec<OddsRow>> {
    let z = critical_value(alpha)?;
    let flags = data::case_indicator(frame, case_column, case_value)?;
    let labels = data::category_labels(frame, risk_factor_column)?;

    let mut counts: BTreeMap<i64, (u64, u64)> = BTreeMap::new();
    for (flag, label) in flags.into_iter().zip(labels) {
        if let (Some(flag), Some(label)) = (flag, label) {
            let entry = counts.entry(label).or_default();
            if flag {
                entry.0 += 1;
            } else {
                entry.1 += 1;
            }
        }
    }

    let &(base_cases, base_non_cases) = counts
        .get(&baseline)
        .ok_or(AnalysisError::MissingBaseline(baseline))?;

    let rows = counts
        .into_iter()
        .map(|(category, (cases, non_cases))| {
            let (odds_ratio, odds_ratio_ci) = if category == baseline {
                (None, None)
            } else {
                let (ratio, interval) = odds_ratio_with_ci(
                    cases as f64,
                    non_cases as f64,
                    base_cases as f64,
                    base_non_cases as f64,
                    z,
                );
                (Some(ratio), Some(interval))
            };
            OddsRow {
                category,
                cases,
                non_cases,
                odds: cases as f64 / non_cases as f64,
                odds_ratio,
                odds_ratio_ci,
            }
        })
        .collect();
    Ok(rows)
}

/// Odds ratio of `a/b` against `c/d` with its Woolf interval at critical value `z`.
///
/// The interval uses the Haldane correction when any cell is empty; the ratio
/// itself is uncorrected.
pub fn odds_ratio_with_ci(a: f64, b: f64, c: f64, d: f64, z: f64) -> (f64, Interval) {
    let ratio = (a / b) / (c / d);
    let (a, b, c, d) = continuity_correct(a, b, c, d);
    let log_ratio = ((a / b) / (c / d)).ln();
    let variance = (1.0 / a) + (1.0 / b) + (1.0 / c) + (1.0 / d);
    (ratio, Interval::around(log_ratio, variance.sqrt(), z).exp())
}

fn continuity_correct(a: f64, b: f64, c: f64, d: f64) -> (f64, f64, f64, f64) {
    if [a, b, c, d].iter().any(|&x| x == 0.0) {
        (a + 0.5, b + 0.5, c + 0.5, d + 0.5)
    } else {
        (a, b, c, d)
    }
}
