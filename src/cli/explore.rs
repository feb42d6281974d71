//! CLI entry-point for the full log-odds exploration.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tracing::{info, instrument, warn};

use logodds_explorer::{
    config::Settings,
    data,
    estimate::{LinfaLogit, PrecomputedTerms, RegressionEngine},
    pipeline::{Backends, LogOddsConfig, LogOddsPipeline},
    plot::SvgPlot,
};

use crate::cli::CategoryArgs;

/// Args for the `explore` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    #[command(flatten)]
    pub category: CategoryArgs,
    /// Binary outcome column.
    #[arg(long)]
    pub outcome: String,
    /// Outcome value marking a case.
    #[arg(long, default_value = "1")]
    pub case_value: String,
    /// Category used as the odds-ratio baseline.
    #[arg(long, default_value_t = 1)]
    pub baseline: i64,
    /// Significance level of the confidence intervals.
    #[arg(long, default_value_t = 0.05)]
    pub alpha: f64,
    /// CSV of `term,estimate,std_error` from an external model instead of fitting here.
    #[arg(long)]
    pub terms: Option<PathBuf>,
    /// Results CSV (default: outputs/logodds.csv).
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Plot SVG (default: outputs/logodds.svg).
    #[arg(long)]
    pub plot: Option<PathBuf>,
    /// Skip rendering the plot.
    #[arg(long)]
    pub no_plot: bool,
    /// Print the results as JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

impl Args {
    fn config(&self, settings: &Settings) -> Result<LogOddsConfig> {
        Ok(LogOddsConfig {
            case_value: self.case_value.clone(),
            missing: self.category.missing.clone(),
            categories: self.category.categories,
            category_column: self.category.category_column.clone(),
            method: self.category.method()?,
            alpha: self.alpha,
            baseline: self.baseline,
            sample_seed: self.category.seed.or(settings.sample_seed),
            verbose: self.category.verbose,
            ..LogOddsConfig::default()
        })
    }
}

#[instrument(skip(settings))]
pub fn run(args: Args, settings: Settings) -> Result<()> {
    let config = args.config(&settings)?;
    let frame = data::read_csv(&args.category.input)
        .with_context(|| format!("reading {}", args.category.input.display()))?;

    let regression: Box<dyn RegressionEngine> = match &args.terms {
        Some(path) => Box::new(
            PrecomputedTerms::from_path(path)
                .with_context(|| format!("reading model terms from {}", path.display()))?,
        ),
        None => Box::new(LinfaLogit::default()),
    };
    let mut backends = Backends::new(regression);
    if !args.no_plot {
        let path = args
            .plot
            .clone()
            .unwrap_or_else(|| settings.join_output("logodds.svg"));
        backends = backends.with_plot(Box::new(SvgPlot::new(path, settings.plot_size)));
    }

    let pipeline = LogOddsPipeline::new(backends);
    let Some(table) = pipeline.run(&frame, &args.outcome, &args.category.predictor, &config)? else {
        warn!("no results: the predictor was not categorised");
        return Ok(());
    };

    let mut results = table.to_frame()?;
    let out_path = args
        .out
        .clone()
        .unwrap_or_else(|| settings.join_output("logodds.csv"));
    data::write_csv(&mut results, &out_path)?;
    info!(path = %out_path.display(), categories = table.rows.len(), "exploration finished");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&table)?);
    } else {
        println!("{results}");
    }
    Ok(())
}
