use std::path::Path;

use anyhow::Result;
use eventreg_core::ReconciliationRequest;
use eventreg_engine::Reconciler;

use crate::cli::OutputFormat;
use crate::commands::read_json;
use crate::output::{print_diff, print_json};

pub fn preview(request_path: &Path, format: OutputFormat) -> Result<()> {
    let request: ReconciliationRequest = read_json(request_path)?;
    let diff = Reconciler::preview(&request);
    match format {
        OutputFormat::Json => print_json(&diff)?,
        OutputFormat::Text => print_diff(&diff, |id| {
            request
                .child(id)
                .map(|c| c.display_name())
                .unwrap_or_else(|| id.to_string())
        }),
    }
    Ok(())
}
