//! Error types shared by the analysis layer.

use polars::prelude::PolarsError;
use thiserror::Error;

/// Failure reported by an external collaborator (breakpoints, regression, plotting).
pub type BackendError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while categorising, fitting or assembling results.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("column `{0}` not found in dataset")]
    MissingColumn(String),

    #[error("column `{column}` holds non-numeric value `{value}`")]
    NonNumeric { column: String, value: String },

    #[error("column `{0}` has no observations left after removing missing values")]
    NoObservations(String),

    #[error("at least two categories are required, got {0}")]
    TooFewCategories(usize),

    #[error("invalid category boundaries: {0}")]
    InvalidBreaks(String),

    #[error("significance level must lie strictly between 0 and 1, got {0}")]
    InvalidAlpha(f64),

    #[error("unknown categorisation method `{0}`; use `natural-breaks` or `quantile`")]
    UnknownMethod(String),

    #[error("malformed model term `{0}`")]
    MalformedTerm(String),

    #[error("logistic model did not converge: {0}")]
    NonConvergence(String),

    #[error("baseline category {0} is not present in the data")]
    MissingBaseline(i64),

    #[error("interval for category {category} does not contain its point estimate")]
    InvalidInterval { category: usize },

    #[error("{backend} backend failed")]
    Backend {
        backend: &'static str,
        #[source]
        source: BackendError,
    },

    #[error(transparent)]
    Polars(#[from] PolarsError),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AnalysisError {
    pub(crate) fn backend(backend: &'static str, source: BackendError) -> Self {
        Self::Backend { backend, source }
    }
}

pub type Result<T, E = AnalysisError> = std::result::Result<T, E>;
