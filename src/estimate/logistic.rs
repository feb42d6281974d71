//! Logistic fit delegated to `linfa-logistic`.

use linfa::{dataset::DatasetBase, prelude::Fit};
use linfa_logistic::LogisticRegression;
use ndarray::{Array1, Array2};
use tracing::debug;

use super::{CategoryKey, FittedTerm, ModelFrame, RegressionEngine, Term};
use crate::error::{AnalysisError, Result};

/// Unpenalised, intercept-free logistic regression on a one-hot design.
///
/// Standard errors come from the inverse Fisher information at the fitted
/// coefficients. Indicator columns never overlap, so the information matrix
/// is diagonal with entries `n_j * p_j * (1 - p_j)`.
#[derive(Debug, Clone)]
pub struct LinfaLogit {
    pub max_iterations: u64,
    pub gradient_tolerance: f64,
    /// Largest accepted `|cases - expected cases|` per row of a level.
    pub score_tolerance: f64,
}

impl Default for LinfaLogit {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            gradient_tolerance: 1e-8,
            score_tolerance: 1e-3,
        }
    }
}

impl RegressionEngine for LinfaLogit {
    fn fit_logit(&self, model: &ModelFrame) -> Result<Vec<FittedTerm>> {
        let counts = model.level_counts();
        for (level, (cases, non_cases)) in model.levels.iter().zip(&counts) {
            if *cases == 0 || *non_cases == 0 {
                return Err(AnalysisError::NonConvergence(format!(
                    "category {level} of `{}` has {cases} cases and {non_cases} non-cases (perfect separation)",
                    model.predictor
                )));
            }
        }

        let mut design = Array2::<f64>::zeros((model.rows(), model.levels.len()));
        for (row, level) in model.level_index.iter().enumerate() {
            design[[row, *level]] = 1.0;
        }
        let targets: Array1<i32> = model.cases.iter().map(|case| i32::from(*case)).collect();

        // linfa labels the more frequent outcome as positive; start from the
        // per-level logits expressed in that orientation.
        let start_sign = if cases_are_positive(&model.cases) { 1.0 } else { -1.0 };
        let initial: Array1<f64> = counts
            .iter()
            .map(|(cases, non_cases)| start_sign * (*cases as f64 / *non_cases as f64).ln())
            .collect();
        let dataset = DatasetBase::new(design, targets);

        let fitted = LogisticRegression::default()
            .with_intercept(false)
            .alpha(0.0_f64)
            .max_iterations(self.max_iterations)
            .gradient_tolerance(self.gradient_tolerance)
            .initial_params(initial)
            .fit(&dataset)
            .map_err(|err| AnalysisError::backend("regression", err.to_string().into()))?;
        let params = fitted.params();
        let sign = if fitted.labels().pos.class == 1 { 1.0 } else { -1.0 };

        let mut terms = Vec::with_capacity(model.levels.len());
        for ((level, (cases, non_cases)), theta) in model.levels.iter().zip(&counts).zip(params.iter()) {
            let estimate = sign * theta;
            let rows = (cases + non_cases) as f64;
            let p = sigmoid(estimate);
            let score = *cases as f64 - rows * p;
            if !estimate.is_finite() || score.abs() > self.score_tolerance * rows {
                return Err(AnalysisError::NonConvergence(format!(
                    "category {level} of `{}` stopped with score {score:.3e} after at most {} iterations",
                    model.predictor, self.max_iterations
                )));
            }
            let std_error = (rows * p * (1.0 - p)).recip().sqrt();
            debug!(category = *level, estimate, std_error, "logit coefficient");
            terms.push(FittedTerm {
                term: Term::new(model.predictor.clone(), CategoryKey::Index(*level)),
                estimate,
                std_error,
            });
        }
        Ok(terms)
    }
}

fn sigmoid(value: f64) -> f64 {
    1.0 / (1.0 + (-value).exp())
}

/// Mirrors linfa's class labelling: the larger class is positive and a tie
/// goes to the class seen first.
fn cases_are_positive(cases: &[bool]) -> bool {
    let positives = cases.iter().filter(|case| **case).count();
    let negatives = cases.len() - positives;
    positives > negatives || (positives == negatives && cases.first() == Some(&true))
}
