use std::path::Path;

use anyhow::Result;
use eventreg_core::{ReconciliationOutcome, summarize as render};

use crate::cli::OutputFormat;
use crate::commands::read_json;
use crate::output::{print_json, print_summary};

pub fn summarize(
    outcome_path: &Path,
    had_existing: bool,
    unregistered: Option<usize>,
    format: OutputFormat,
) -> Result<()> {
    let outcome: ReconciliationOutcome = read_json(outcome_path)?;
    let unregistered = unregistered.unwrap_or_else(|| outcome.successful_cancellations());
    let message = render(&outcome, had_existing, unregistered);
    match format {
        OutputFormat::Json => print_json(&message)?,
        OutputFormat::Text => print_summary(&message),
    }
    Ok(())
}
