use anyhow::Result;
use colored::Colorize;
use eventreg_core::{
    CancellationStatus, DiffResult, ReconciliationOutcome, RegistrationState, SummaryMessage, Tone,
};
use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::Style;

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Prints a summary message colored by its tone.
pub fn print_summary(message: &SummaryMessage) {
    let text = message.text.as_str();
    match message.tone {
        Tone::Success => println!("{} {}", "✓".green(), text),
        Tone::Partial => println!("{} {}", "!".yellow(), text.yellow()),
        Tone::Failure => println!("{} {}", "✗".red(), text.red()),
        Tone::Info => println!("{} {}", "i".cyan(), text),
    }
}

pub fn print_diff(diff: &DiffResult, child_name: impl Fn(&eventreg_core::ChildId) -> String) {
    if diff.is_noop() && diff.already_registered.is_empty() {
        println!("No registrations to update.");
        return;
    }
    let mut builder = Builder::default();
    builder.push_record(["Action", "Child", "Registration"]);
    for registration in &diff.to_cancel {
        builder.push_record([
            "cancel".to_string(),
            registration.child_name.clone(),
            registration.id.to_string(),
        ]);
    }
    for id in &diff.to_register {
        builder.push_record(["register".to_string(), child_name(id), "-".to_string()]);
    }
    for id in &diff.already_registered {
        builder.push_record(["keep".to_string(), child_name(id), "-".to_string()]);
    }
    let table = builder.build().with(Style::rounded()).to_string();
    println!("{table}");
    println!(
        "{} to cancel, {} to register, {} unchanged",
        diff.to_cancel.len(),
        diff.to_register.len(),
        diff.already_registered.len()
    );
}

pub fn print_outcome(outcome: &ReconciliationOutcome) {
    println!("{} {}", "Event:".cyan(), outcome.event_name.cyan());

    let rows = outcome_rows(outcome);
    if !rows.is_empty() {
        let mut builder = Builder::default();
        builder.push_record(["Child", "Action", "Result"]);
        for row in rows {
            builder.push_record(row);
        }
        let table = builder.build().with(Style::rounded()).to_string();
        println!("{table}");
    }

    for error in &outcome.validation_errors {
        println!("{} missing {}", "-".yellow(), error.field());
    }
}

fn outcome_rows(outcome: &ReconciliationOutcome) -> Vec<[String; 3]> {
    let cancellations = outcome.cancellations.iter().map(|c| {
        let result = match &c.status {
            CancellationStatus::Cancelled => "cancelled".to_string(),
            CancellationStatus::Failed { reason } => format!("failed: {reason}"),
        };
        [c.registration.child_name.clone(), "cancel".into(), result]
    });
    let registrations = outcome.registrations.iter().map(|r| {
        let result = match &r.state {
            RegistrationState::Registered {
                registration_id, ..
            } => format!("registered ({registration_id})"),
            RegistrationState::AlreadyRegistered => "already registered".to_string(),
            RegistrationState::Failed { failure } => failure.to_string(),
        };
        [r.child_name.clone(), "register".into(), result]
    });
    cancellations.chain(registrations).collect()
}
