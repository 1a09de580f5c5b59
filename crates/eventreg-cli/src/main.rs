use anyhow::{Result, anyhow};
use clap::Parser;

use eventreg_cli::cli::{Cli, Commands};
use eventreg_cli::config::loader;
use eventreg_cli::output::print_error;
use eventreg_cli::{commands, observability};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = loader::load_config(cli.config.as_deref()).map_err(|e| anyhow!(e))?;

    observability::init_tracing_with_level(&config.logging.level);
    if cli.verbose {
        observability::apply_logging_level("debug");
    }
    tracing::debug!(backend = ?config.store.backend, "Configuration loaded");

    match &cli.command {
        Commands::Preview(args) => commands::preview::preview(&args.request, cli.format)?,
        Commands::Reconcile(args) => {
            commands::reconcile::reconcile(&config, args, cli.format).await?;
        }
        Commands::Summarize(args) => commands::summarize::summarize(
            &args.outcome,
            args.had_existing,
            args.unregistered,
            cli.format,
        )?,
        Commands::Config => commands::show_config(&config)?,
    }

    Ok(())
}
