//! Command-line interface wiring for logodds-explorer.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};

use logodds_explorer::{categorise::Method, config::Settings};

pub mod categorise;
pub mod explore;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(author, version, about = "Log-odds exploration of a continuous risk factor", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Dispatch the selected sub-command.
    pub fn dispatch(self, settings: Settings) -> Result<()> {
        match self.command {
            Commands::Explore(args) => explore::run(args, settings),
            Commands::Categorise(args) => categorise::run(args, settings),
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Categorise the predictor, fit the model and plot log-odds by category.
    Explore(explore::Args),
    /// Only categorise the predictor and write the augmented dataset.
    Categorise(categorise::Args),
}

/// Categorisation strategy selectable on the command line.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum MethodArg {
    /// Natural breaks; needs a breakpoint backend, which this binary does not bundle.
    NaturalBreaks,
    /// Equal-width bins over the observed range.
    Quantile,
    /// Boundaries given with `--cutoffs`.
    Cutoffs,
}

/// Options shared by every command that categorises the predictor.
#[derive(Debug, Clone, ClapArgs)]
pub struct CategoryArgs {
    /// Input CSV with a header row.
    #[arg(long)]
    pub input: PathBuf,
    /// Continuous predictor column.
    #[arg(long)]
    pub predictor: String,
    /// Value marking a missing predictor cell.
    #[arg(long, default_value = "missing")]
    pub missing: String,
    /// Number of categories.
    #[arg(long, default_value_t = 5)]
    pub categories: usize,
    /// Name of the new category column (default: predictor with `_cat`).
    #[arg(long)]
    pub category_column: Option<String>,
    /// Categorisation method; `natural-breaks` needs a breakpoint provider from
    /// the library API, so this binary only warns and writes nothing.
    #[arg(long, default_value = "quantile", value_enum)]
    pub method: MethodArg,
    /// Comma separated boundaries for `--method cutoffs`.
    #[arg(long, value_delimiter = ',')]
    pub cutoffs: Vec<f64>,
    /// Seed for sampling large inputs (overrides LOGODDS_SAMPLE_SEED).
    #[arg(long)]
    pub seed: Option<u64>,
    /// Log intermediate results.
    #[arg(long)]
    pub verbose: bool,
}

impl CategoryArgs {
    pub fn method(&self) -> Result<Method> {
        match self.method {
            MethodArg::NaturalBreaks => Ok(Method::NaturalBreaks),
            MethodArg::Quantile => Ok(Method::Quantile),
            MethodArg::Cutoffs if self.cutoffs.is_empty() => {
                bail!("--method cutoffs requires --cutoffs")
            }
            MethodArg::Cutoffs => Ok(Method::Cutoffs(self.cutoffs.clone())),
        }
    }
}
