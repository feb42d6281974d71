//! CLI entry-point for categorising the predictor only.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tracing::{instrument, warn};

use logodds_explorer::{
    categorise::{CategoriseOptions, Categoriser, DEFAULT_SAMPLE_SIZE},
    config::Settings,
    data,
    pipeline::default_category_column,
};

use crate::cli::CategoryArgs;

/// Args for the `categorise` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    #[command(flatten)]
    pub category: CategoryArgs,
    /// Output CSV (default: outputs/categorised.csv).
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[instrument(skip(settings))]
pub fn run(args: Args, settings: Settings) -> Result<()> {
    let frame = data::read_csv(&args.category.input)
        .with_context(|| format!("reading {}", args.category.input.display()))?;
    let options = CategoriseOptions {
        column: args.category.predictor.clone(),
        missing: args.category.missing.clone(),
        categories: args.category.categories,
        new_column: args
            .category
            .category_column
            .clone()
            .unwrap_or_else(|| default_category_column(&args.category.predictor)),
        method: args.category.method()?,
        sample_size: DEFAULT_SAMPLE_SIZE,
        sample_seed: args.category.seed.or(settings.sample_seed),
        verbose: args.category.verbose,
    };

    let Some(mut categorised) = Categoriser::new(None).categorise(&frame, &options)? else {
        warn!("the predictor was not categorised; nothing written");
        return Ok(());
    };

    let out_path = args
        .out
        .clone()
        .unwrap_or_else(|| settings.join_output("categorised.csv"));
    data::write_csv(&mut categorised.frame, &out_path)?;
    println!("{}: {:?}", categorised.column, categorised.breaks.as_slice());
    Ok(())
}
