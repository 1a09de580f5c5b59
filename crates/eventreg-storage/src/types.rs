//! Payloads exchanged with a registration store.

use eventreg_core::{ChildId, EmergencyContact, EventId, RegistrationId};
use serde::{Deserialize, Serialize};

/// Body of a create-registration call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationPayload {
    pub event_id: EventId,
    pub child_id: ChildId,
    /// Display name; this is what later runs match on
    pub child_name: String,
    pub child_age: i32,
    pub age_group: String,
    pub emergency_contact: EmergencyContact,
    /// Child fields and run notes joined by newlines
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
    #[serde(default)]
    pub wants_food: bool,
}

/// Response of a successful create-registration call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedRegistration {
    pub registration_id: RegistrationId,
    /// Whether the store dispatched a confirmation notification
    #[serde(default)]
    pub notification_sent: bool,
}
