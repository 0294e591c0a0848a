#![allow(clippy::exit)]

mod cli;
mod commands;
mod context;
mod output;
mod timing;

use anyhow::Result;
use clap::Parser as _;
use tracing::debug;

use crate::cli::{Cli, Commands};
use crate::commands::{generate_completions, run_dashboard, run_status};
use crate::context::build_state_ctx;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with timing support
    timing::init_tracing(cli.verbose, cli.timing);

    let config = cli.business_config();
    debug!(api = %config.api_url(), "Using backend");

    match cli.command {
        Commands::Dashboard { username } => run_dashboard(build_state_ctx(config), username).await,
        Commands::Status => run_status(build_state_ctx(config)).await,
        Commands::Completions { shell } => {
            generate_completions(shell);
            Ok(())
        }
    }
}
