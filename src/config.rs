//! Runtime configuration utilities for logodds-explorer.

use std::{
    env,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::Deserialize;

/// Application configuration resolved from `.env` and defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Root folder for result tables and plots.
    pub outputs_dir: PathBuf,
    /// Seed for the natural-breaks sample on large inputs.
    pub sample_seed: Option<u64>,
    /// Plot size in pixels.
    pub plot_size: (u32, u32),
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let outputs_dir = env::var("LOGODDS_OUTPUTS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./outputs"));
        let sample_seed = match env::var("LOGODDS_SAMPLE_SEED") {
            Ok(raw) => Some(
                raw.trim()
                    .parse()
                    .with_context(|| format!("parsing LOGODDS_SAMPLE_SEED={raw}"))?,
            ),
            Err(_) => None,
        };
        let plot_width = env::var("LOGODDS_PLOT_WIDTH")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(800);
        let plot_height = env::var("LOGODDS_PLOT_HEIGHT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(600);

        std::fs::create_dir_all(&outputs_dir).context("creating outputs dir")?;

        Ok(Self {
            outputs_dir,
            sample_seed,
            plot_size: (plot_width, plot_height),
        })
    }

    /// Convenience helper for derived output path segments.
    pub fn join_output<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.outputs_dir.join(path)
    }
}
