//! Per-item results and the aggregated outcome of a reconciliation run.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::eligibility::EligibilityError;
use crate::id::{ChildId, EventId, RegistrationId};
use crate::model::{ExistingRegistration, NotificationChannel};

/// A required field missing before new registrations can be created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValidationError {
    #[error("emergency contact first name is required")]
    MissingContactFirstName,

    #[error("emergency contact last name is required")]
    MissingContactLastName,

    #[error("emergency contact phone or email is required")]
    MissingContactMethod,

    #[error("the liability waiver must be accepted")]
    WaiverNotAccepted,

    #[error("the event policy must be accepted")]
    PolicyNotAccepted,
}

impl ValidationError {
    /// Short field label for user-facing lists.
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingContactFirstName => "emergency contact first name",
            Self::MissingContactLastName => "emergency contact last name",
            Self::MissingContactMethod => "emergency contact phone or email",
            Self::WaiverNotAccepted => "liability waiver",
            Self::PolicyNotAccepted => "event policy",
        }
    }
}

/// Result of cancelling one existing registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum CancellationStatus {
    Cancelled,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancellationResult {
    pub registration: ExistingRegistration,
    pub status: CancellationStatus,
}

impl CancellationResult {
    pub fn is_success(&self) -> bool {
        matches!(self.status, CancellationStatus::Cancelled)
    }
}

/// Why a child could not be registered.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RegistrationFailure {
    #[error("{child_name} is not eligible: {error}")]
    #[serde(rename_all = "camelCase")]
    IneligibleAge {
        child_name: String,
        error: EligibilityError,
    },

    #[error("registration failed: {reason}")]
    RegistrationFailed { reason: String },
}

/// Result of registering one selected child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum RegistrationState {
    /// Newly created in this run
    #[serde(rename_all = "camelCase")]
    Registered {
        registration_id: RegistrationId,
        notification_sent: bool,
    },
    /// Matched an existing registration; no call was made
    AlreadyRegistered,
    Failed { failure: RegistrationFailure },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResult {
    pub child_id: ChildId,
    pub child_name: String,
    pub state: RegistrationState,
}

impl RegistrationResult {
    /// Registered now or already registered.
    pub fn is_success(&self) -> bool {
        !self.is_failure()
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.state, RegistrationState::Failed { .. })
    }

    pub fn is_new(&self) -> bool {
        matches!(self.state, RegistrationState::Registered { .. })
    }
}

/// Overall shape of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OutcomeKind {
    /// Nothing was cancelled and nothing needed registering
    NoChanges,
    /// Registrations were cancelled and nothing needed registering
    Removed,
    /// Registrations were needed but required fields were missing
    ValidationFailed,
    /// Registration calls were issued
    Applied,
}

/// Complete result of a reconciliation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationOutcome {
    pub event_id: EventId,
    pub event_name: String,
    pub kind: OutcomeKind,
    #[serde(default)]
    pub cancellations: Vec<CancellationResult>,
    #[serde(default)]
    pub registrations: Vec<RegistrationResult>,
    #[serde(default)]
    pub validation_errors: Vec<ValidationError>,
    /// Replacement for the caller's view of current registrations
    #[serde(default)]
    pub current_registrations: Vec<ExistingRegistration>,
    /// Any new registration reported a dispatched confirmation
    #[serde(default)]
    pub notification_sent: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_channel: Option<NotificationChannel>,
}

impl ReconciliationOutcome {
    pub fn successful_cancellations(&self) -> usize {
        self.cancellations.iter().filter(|c| c.is_success()).count()
    }

    pub fn failed_cancellations(&self) -> impl Iterator<Item = &CancellationResult> {
        self.cancellations.iter().filter(|c| !c.is_success())
    }

    pub fn successes(&self) -> impl Iterator<Item = &RegistrationResult> {
        self.registrations.iter().filter(|r| r.is_success())
    }

    pub fn failures(&self) -> impl Iterator<Item = &RegistrationResult> {
        self.registrations.iter().filter(|r| r.is_failure())
    }

    pub fn new_registrations(&self) -> impl Iterator<Item = &RegistrationResult> {
        self.registrations.iter().filter(|r| r.is_new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str, state: RegistrationState) -> RegistrationResult {
        RegistrationResult {
            child_id: ChildId::new(name.to_lowercase()),
            child_name: name.to_string(),
            state,
        }
    }

    #[test]
    fn test_result_predicates() {
        let new = result(
            "Cam",
            RegistrationState::Registered {
                registration_id: RegistrationId::new("r9"),
                notification_sent: true,
            },
        );
        let skip = result("Amy", RegistrationState::AlreadyRegistered);
        let failed = result(
            "Dee",
            RegistrationState::Failed {
                failure: RegistrationFailure::RegistrationFailed {
                    reason: "timeout".into(),
                },
            },
        );

        assert!(new.is_success() && new.is_new());
        assert!(skip.is_success() && !skip.is_new());
        assert!(failed.is_failure() && !failed.is_success());
    }

    #[test]
    fn test_failure_display_names_child_and_bound() {
        let failure = RegistrationFailure::IneligibleAge {
            child_name: "Dee Park".into(),
            error: EligibilityError::BelowMinimum { age: 3, min_age: 5 },
        };
        assert_eq!(
            failure.to_string(),
            "Dee Park is not eligible: age 3 is below the minimum age of 5"
        );
    }

    #[test]
    fn test_outcome_serializes_camel_case() {
        let outcome = ReconciliationOutcome {
            event_id: EventId::new("evt"),
            event_name: "Camp".into(),
            kind: OutcomeKind::NoChanges,
            cancellations: vec![CancellationResult {
                registration: ExistingRegistration::new("r1", "Bo Lee"),
                status: CancellationStatus::Failed {
                    reason: "boom".into(),
                },
            }],
            registrations: vec![],
            validation_errors: vec![ValidationError::WaiverNotAccepted],
            current_registrations: vec![],
            notification_sent: false,
            notification_channel: None,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["kind"], "noChanges");
        assert_eq!(json["cancellations"][0]["status"]["state"], "failed");
        assert_eq!(json["validationErrors"][0], "waiverNotAccepted");

        let back: ReconciliationOutcome = serde_json::from_value(json).unwrap();
        assert_eq!(back, outcome);
    }
}
