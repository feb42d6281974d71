//! Two-sided normal-approximation (Wald) confidence intervals.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

use crate::error::{AnalysisError, Result};

/// Closed interval `[lower, upper]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub lower: f64,
    pub upper: f64,
}

impl Interval {
    /// `estimate ± z * std_error`.
    pub fn around(estimate: f64, std_error: f64, z: f64) -> Self {
        Self {
            lower: estimate - z * std_error,
            upper: estimate + z * std_error,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }

    /// Map both bounds through `exp`, e.g. from log-odds to odds.
    pub fn exp(self) -> Self {
        Self {
            lower: self.lower.exp(),
            upper: self.upper.exp(),
        }
    }
}

pub fn validate_alpha(alpha: f64) -> Result<f64> {
    if alpha > 0.0 && alpha < 1.0 {
        Ok(alpha)
    } else {
        Err(AnalysisError::InvalidAlpha(alpha))
    }
}

/// Standard normal quantile `Φ⁻¹(1 - alpha/2)`.
pub fn critical_value(alpha: f64) -> Result<f64> {
    let alpha = validate_alpha(alpha)?;
    let normal = Normal::new(0.0, 1.0)
        .map_err(|err| AnalysisError::backend("normal distribution", err.to_string().into()))?;
    Ok(normal.inverse_cdf(1.0 - alpha / 2.0))
}

/// Wald interval for a log-odds estimate.
pub fn wald(log_odds: f64, std_error: f64, alpha: f64) -> Result<Interval> {
    let z = critical_value(alpha)?;
    Ok(Interval::around(log_odds, std_error, z))
}
