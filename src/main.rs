//! Entry point wiring CLI dispatch to the analysis pipeline.

mod cli;

use anyhow::Result;
use cli::Cli;
use logodds_explorer::{config::Settings, logging};
use tracing::{info, instrument};

#[instrument]
fn main() -> Result<()> {
    logging::init_tracing()?;
    let cli = Cli::parse();
    let settings = Settings::load()?;

    info!(?cli, "starting command");
    cli.dispatch(settings)
}
