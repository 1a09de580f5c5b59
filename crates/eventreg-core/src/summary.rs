//! User-facing summary of a reconciliation outcome.
//!
//! This is the only place outcome details become prose. It names affected
//! children and never surfaces raw transport errors.

use serde::{Deserialize, Serialize};

use crate::outcome::{
    OutcomeKind, ReconciliationOutcome, RegistrationFailure, RegistrationResult,
    RegistrationState,
};

/// How the message should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Success,
    Partial,
    Failure,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryMessage {
    pub text: String,
    pub tone: Tone,
    /// A confirmation went out for at least one new registration
    pub notification_sent: bool,
}

const RETRY_HINT: &str = "Please try again or contact support.";

/// Renders an outcome as a single message.
///
/// `had_existing_registrations` distinguishes a first registration from an
/// update; `unregistered_count` is how many registrations were removed.
pub fn summarize(
    outcome: &ReconciliationOutcome,
    had_existing_registrations: bool,
    unregistered_count: usize,
) -> SummaryMessage {
    let mut sentences: Vec<String> = Vec::new();
    let failed_removals: Vec<&str> = outcome
        .failed_cancellations()
        .map(|c| c.registration.child_name.as_str())
        .collect();

    let tone = match outcome.kind {
        OutcomeKind::NoChanges => {
            sentences.push("No registrations to update.".to_string());
            if failed_removals.is_empty() {
                Tone::Info
            } else {
                sentences.push(failed_removal_sentence(&failed_removals));
                Tone::Failure
            }
        }
        OutcomeKind::Removed => {
            if outcome.current_registrations.is_empty() {
                sentences.push(format!(
                    "All registrations for {} have been removed.",
                    outcome.event_name
                ));
            } else {
                sentences.push(format!(
                    "{} removed.",
                    count_noun(unregistered_count, "registration")
                ));
            }
            if failed_removals.is_empty() {
                Tone::Success
            } else {
                sentences.push(failed_removal_sentence(&failed_removals));
                Tone::Partial
            }
        }
        OutcomeKind::ValidationFailed => {
            let fields: Vec<&str> = outcome.validation_errors.iter().map(|e| e.field()).collect();
            sentences.push(format!(
                "Please complete the following before registering: {}.",
                fields.join(", ")
            ));
            sentences.push("No new registrations were created.".to_string());
            if unregistered_count > 0 {
                sentences.push(format!(
                    "{} removed.",
                    count_noun(unregistered_count, "registration")
                ));
            }
            if !failed_removals.is_empty() {
                sentences.push(failed_removal_sentence(&failed_removals));
            }
            Tone::Failure
        }
        OutcomeKind::Applied => applied_sentences(
            outcome,
            had_existing_registrations,
            unregistered_count,
            &failed_removals,
            &mut sentences,
        ),
    };

    SummaryMessage {
        text: sentences.join(" "),
        tone,
        notification_sent: outcome.notification_sent,
    }
}

fn applied_sentences(
    outcome: &ReconciliationOutcome,
    had_existing_registrations: bool,
    unregistered_count: usize,
    failed_removals: &[&str],
    sentences: &mut Vec<String>,
) -> Tone {
    let successes: Vec<&str> = outcome.successes().map(|r| r.child_name.as_str()).collect();
    let failures: Vec<String> = outcome.failures().map(failure_label).collect();

    if successes.is_empty() {
        if unregistered_count > 0 {
            sentences.push(format!(
                "{} removed.",
                count_noun(unregistered_count, "registration")
            ));
        }
        sentences.push(format!(
            "Registration failed for {}. {RETRY_HINT}",
            join_names(&failures)
        ));
        if !failed_removals.is_empty() {
            sentences.push(failed_removal_sentence(failed_removals));
        }
        return if unregistered_count > 0 {
            Tone::Partial
        } else {
            Tone::Failure
        };
    }

    let single = successes.len() == 1;
    let names = join_names(&successes);
    let event = &outcome.event_name;
    let sentence = if !had_existing_registrations {
        let verb = if single { "has" } else { "have" };
        format!("{names} {verb} been registered for {event}.")
    } else {
        let verb = if single { "is" } else { "are" };
        if unregistered_count > 0 {
            format!(
                "Registration updated: {names} {verb} registered for {event}, and {} removed.",
                count_noun(unregistered_count, "registration")
            )
        } else {
            format!("Registration updated: {names} {verb} registered for {event}.")
        }
    };
    sentences.push(sentence);

    if !failures.is_empty() {
        sentences.push(format!(
            "We couldn't register {}. {RETRY_HINT}",
            join_names(&failures)
        ));
    }
    // A child the parent deselected may still be registered.
    if !failed_removals.is_empty() {
        sentences.push(failed_removal_sentence(failed_removals));
    }

    let new_registrations: Vec<&RegistrationResult> = outcome.new_registrations().collect();
    if !new_registrations.is_empty() {
        let notified = new_registrations.iter().any(|r| {
            matches!(
                r.state,
                RegistrationState::Registered {
                    notification_sent: true,
                    ..
                }
            )
        });
        if notified {
            match outcome.notification_channel {
                Some(channel) => {
                    sentences.push(format!("A confirmation has been sent by {channel}."))
                }
                None => sentences.push("A confirmation has been sent.".to_string()),
            }
        } else {
            sentences.push("You'll receive a confirmation if notifications are enabled.".into());
        }
    }

    if failures.is_empty() && failed_removals.is_empty() {
        Tone::Success
    } else {
        Tone::Partial
    }
}

fn failed_removal_sentence(names: &[&str]) -> String {
    format!("We couldn't remove {}. {RETRY_HINT}", join_names(names))
}

fn failure_label(result: &RegistrationResult) -> String {
    match &result.state {
        RegistrationState::Failed {
            failure: RegistrationFailure::IneligibleAge { error, .. },
        } => format!("{} ({error})", result.child_name),
        _ => result.child_name.clone(),
    }
}

fn count_noun(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// "A", "A and B", "A, B, and C".
fn join_names<S: AsRef<str>>(names: &[S]) -> String {
    match names {
        [] => String::new(),
        [one] => one.as_ref().to_string(),
        [a, b] => format!("{} and {}", a.as_ref(), b.as_ref()),
        [rest @ .., last] => {
            let head: Vec<&str> = rest.iter().map(|n| n.as_ref()).collect();
            format!("{}, and {}", head.join(", "), last.as_ref())
        }
    }
}
