use std::fs;
use std::sync::Arc;

use anyhow::{Context, Result};
use eventreg_core::{ActorId, ReconciliationOutcome, ReconciliationRequest, SummaryMessage, summarize};
use eventreg_db_memory::InMemoryRegistrationStore;
use eventreg_engine::Reconciler;
use eventreg_http::HttpRegistrationStore;
use eventreg_storage::DynRegistrationStore;
use serde::Serialize;

use crate::cli::{OutputFormat, ReconcileArgs};
use crate::commands::read_json;
use crate::config::{AppConfig, StoreBackend};
use crate::output::{print_json, print_outcome, print_success, print_summary};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReconcileReport<'a> {
    outcome: &'a ReconciliationOutcome,
    message: &'a SummaryMessage,
}

pub async fn reconcile(config: &AppConfig, args: &ReconcileArgs, format: OutputFormat) -> Result<()> {
    let mut request: ReconciliationRequest = read_json(&args.request)?;
    if let Some(actor) = &args.actor {
        request.actor = Some(ActorId::new(actor.as_str()));
    }

    let store = build_store(config, args.memory, &request).await?;
    let reconciler = Reconciler::new(store);

    if args.fetch_existing {
        request.existing = reconciler
            .existing_for(request.actor.as_ref(), &request.event.id)
            .await
            .context("Failed to fetch existing registrations")?;
    }

    let had_existing = request.existing.iter().any(|r| r.is_active());
    let outcome = reconciler.reconcile(&request).await?;
    let message = summarize(&outcome, had_existing, outcome.successful_cancellations());

    if let Some(path) = &args.save_outcome {
        let json = serde_json::to_string_pretty(&outcome)?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write outcome to {}", path.display()))?;
    }

    match format {
        OutputFormat::Json => print_json(&ReconcileReport {
            outcome: &outcome,
            message: &message,
        })?,
        OutputFormat::Text => {
            print_outcome(&outcome);
            print_summary(&message);
            if let Some(path) = &args.save_outcome {
                print_success(&format!("Outcome saved to {}", path.display()));
            }
        }
    }
    Ok(())
}

/// Picks the backend. The in-memory store starts with the request's existing
/// registrations so cancellations have something to act on.
async fn build_store(
    config: &AppConfig,
    force_memory: bool,
    request: &ReconciliationRequest,
) -> Result<DynRegistrationStore> {
    if force_memory || config.store.backend == StoreBackend::Memory {
        let store = InMemoryRegistrationStore::new();
        for registration in &request.existing {
            store.seed(&request.event.id, registration.clone()).await;
        }
        tracing::debug!(seeded = request.existing.len(), "Using in-memory store");
        return Ok(Arc::new(store));
    }

    let store = HttpRegistrationStore::new(&config.store.http)
        .context("Failed to create HTTP registration store")?;
    tracing::debug!(base_url = %config.store.http.base_url, "Using HTTP store");
    Ok(Arc::new(store))
}
