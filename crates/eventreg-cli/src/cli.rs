use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "eventreg")]
#[command(about = "Reconcile a parent's event registrations with their selection")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (defaults to ./eventreg.toml when present)
    #[arg(short, long, global = true, env = "EVENTREG_CONFIG")]
    pub config: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Log at debug level regardless of configuration
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the cancellations and registrations a request would cause
    Preview(PreviewArgs),
    /// Apply a request against the configured store
    Reconcile(ReconcileArgs),
    /// Render the message for a saved outcome
    Summarize(SummarizeArgs),
    /// Show the effective configuration
    Config,
}

#[derive(clap::Args)]
pub struct PreviewArgs {
    /// Path to a reconciliation request (JSON)
    #[arg(long)]
    pub request: PathBuf,
}

#[derive(clap::Args)]
pub struct ReconcileArgs {
    /// Path to a reconciliation request (JSON)
    #[arg(long)]
    pub request: PathBuf,
    /// Authenticated parent id (overrides the request's actor)
    #[arg(long, env = "EVENTREG_ACTOR")]
    pub actor: Option<String>,
    /// Replace the request's existing registrations with the store's listing
    #[arg(long)]
    pub fetch_existing: bool,
    /// Use a throwaway in-memory store seeded with the request's registrations
    #[arg(long)]
    pub memory: bool,
    /// Write the outcome JSON to this file
    #[arg(long)]
    pub save_outcome: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct SummarizeArgs {
    /// Path to a saved outcome (JSON)
    #[arg(long)]
    pub outcome: PathBuf,
    /// The parent had registrations before the run
    #[arg(long)]
    pub had_existing: bool,
    /// Number of registrations removed; defaults to the outcome's successful cancellations
    #[arg(long)]
    pub unregistered: Option<usize>,
}
