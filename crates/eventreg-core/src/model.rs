//! Data model consumed by the reconciliation engine.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::id::{ActorId, ChildId, EventId, RegistrationId};
use crate::identity::normalize;

/// A participant profile owned by a parent account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Child {
    pub id: ChildId,
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    /// Allergy and medical notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allergies: Option<String>,
    /// Prior experience with the activity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Child {
    pub fn new(
        id: impl Into<ChildId>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        age: i32,
    ) -> Self {
        Self {
            id: id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            age,
            grade: None,
            allergies: None,
            experience: None,
            notes: None,
        }
    }

    /// "first last", as stored on registrations.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    pub fn normalized_name(&self) -> String {
        normalize(&self.display_name())
    }
}

/// Registration record status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    #[default]
    Registered,
    Pending,
    Waitlisted,
    Cancelled,
}

/// A registration that currently exists for the event being reconciled.
///
/// `child_name` is free text and is the only link back to a [`Child`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExistingRegistration {
    pub id: RegistrationId,
    pub child_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_contact_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_contact_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
    #[serde(default)]
    pub status: RegistrationStatus,
}

impl ExistingRegistration {
    pub fn new(id: impl Into<RegistrationId>, child_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            child_name: child_name.into(),
            emergency_contact_name: None,
            emergency_contact_phone: None,
            special_requests: None,
            status: RegistrationStatus::Registered,
        }
    }

    pub fn normalized_name(&self) -> String {
        normalize(&self.child_name)
    }

    /// False for records that were already cancelled; those neither block
    /// a new registration nor need cancelling.
    pub fn is_active(&self) -> bool {
        self.status != RegistrationStatus::Cancelled
    }
}

/// Channel a confirmation can be delivered through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationChannel {
    Email,
    Sms,
}

impl NotificationChannel {
    /// Wording used in user-facing messages.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Sms => "text message",
        }
    }
}

impl fmt::Display for NotificationChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Emergency contact shared by every registration created in one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyContact {
    pub first_name: String,
    pub last_name: String,
    /// Phone number or email address
    pub phone_or_email: String,
}

impl EmergencyContact {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        phone_or_email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            phone_or_email: phone_or_email.into(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    /// Channel implied by the contact string.
    pub fn channel(&self) -> NotificationChannel {
        if self.phone_or_email.contains('@') {
            NotificationChannel::Email
        } else {
            NotificationChannel::Sms
        }
    }
}

/// Event attributes used during reconciliation.
///
/// Capacity and price are carried for callers but not enforced here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_age: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_age: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub price: f64,
}

impl Event {
    pub fn new(id: impl Into<EventId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            min_age: None,
            max_age: None,
            capacity: None,
            price: 0.0,
        }
    }

    pub fn with_age_range(mut self, min_age: Option<i32>, max_age: Option<i32>) -> Self {
        self.min_age = min_age;
        self.max_age = max_age;
        self
    }
}

/// The two acknowledgements a parent must accept before registering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Acknowledgements {
    #[serde(default)]
    pub waiver_accepted: bool,
    #[serde(default)]
    pub policy_accepted: bool,
}

impl Acknowledgements {
    pub fn accepted() -> Self {
        Self {
            waiver_accepted: true,
            policy_accepted: true,
        }
    }
}

/// Complete, immutable input of one reconciliation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationRequest {
    /// Authenticated parent, `None` when the caller is anonymous
    #[serde(default)]
    pub actor: Option<ActorId>,
    pub event: Event,
    /// Children the parent wants registered, in selection order
    #[serde(default)]
    pub desired: IndexSet<ChildId>,
    /// Every child of the parent, for lookup
    #[serde(default)]
    pub children: Vec<Child>,
    /// Registrations that currently exist for this parent and event
    #[serde(default)]
    pub existing: Vec<ExistingRegistration>,
    #[serde(default)]
    pub emergency_contact: EmergencyContact,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub wants_food: bool,
    #[serde(default)]
    pub acknowledgements: Acknowledgements,
}

impl ReconciliationRequest {
    pub fn new(event: Event) -> Self {
        Self {
            actor: None,
            event,
            desired: IndexSet::new(),
            children: Vec::new(),
            existing: Vec::new(),
            emergency_contact: EmergencyContact::default(),
            notes: String::new(),
            wants_food: false,
            acknowledgements: Acknowledgements::default(),
        }
    }

    pub fn child(&self, id: &ChildId) -> Option<&Child> {
        self.children.iter().find(|c| &c.id == id)
    }
}
