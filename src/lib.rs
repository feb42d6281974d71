//! Explore the log-odds of a binary outcome across categories of a continuous
//! risk factor.

pub mod categorise;
pub mod config;
pub mod data;
pub mod error;
pub mod estimate;
pub mod interval;
pub mod logging;
pub mod odds;
pub mod pipeline;
pub mod plot;

pub use error::{AnalysisError, Result};
pub use pipeline::{Backends, LogOddsConfig, LogOddsPipeline, LogOddsTable};
