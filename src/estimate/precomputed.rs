//! Coefficients produced by an external regression tool.

use std::{fs::File, io::Read, path::Path};

use serde::Deserialize;
use tracing::{debug, info};

use super::{FittedTerm, ModelFrame, RegressionEngine, Term};
use crate::error::Result;

#[derive(Debug, Deserialize)]
struct TermRecord {
    term: String,
    estimate: f64,
    std_error: f64,
}

/// Serves a fixed set of terms, e.g. a `term,estimate,std_error` CSV exported
/// from another statistics package with labels such as `C(age_cat)[2]`.
#[derive(Debug, Clone, Default)]
pub struct PrecomputedTerms {
    terms: Vec<FittedTerm>,
}

impl PrecomputedTerms {
    pub fn new(terms: Vec<FittedTerm>) -> Self {
        Self { terms }
    }

    /// Parse CSV rows; every `term` label must have the form `variable[level]`.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::Reader::from_reader(reader);
        let mut terms = Vec::new();
        for record in rdr.deserialize() {
            let record: TermRecord = record?;
            let term: Term = record.term.parse()?;
            terms.push(FittedTerm {
                term,
                estimate: record.estimate,
                std_error: record.std_error,
            });
        }
        Ok(Self { terms })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let engine = Self::from_reader(File::open(path)?)?;
        info!(path = %path.display(), terms = engine.terms.len(), "loaded precomputed terms");
        Ok(engine)
    }

    pub fn terms(&self) -> &[FittedTerm] {
        &self.terms
    }
}

impl RegressionEngine for PrecomputedTerms {
    fn fit_logit(&self, model: &ModelFrame) -> Result<Vec<FittedTerm>> {
        debug!(rows = model.rows(), levels = model.levels.len(), "using precomputed terms");
        Ok(self.terms.clone())
    }
}
