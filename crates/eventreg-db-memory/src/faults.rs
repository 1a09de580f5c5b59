//! Failure injection and call journaling for the in-memory store.

use std::collections::HashMap;

use eventreg_core::{RegistrationId, normalize};
use time::OffsetDateTime;

/// Store operation kind recorded in the journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    List,
    Cancel,
    Create,
}

/// Whether a journal entry marks the start or the end of a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallPhase {
    Started,
    Finished,
}

/// One journal entry.
#[derive(Debug, Clone)]
pub struct CallRecord {
    pub kind: CallKind,
    pub phase: CallPhase,
    /// Registration id for cancels, child name for creates, event id for lists
    pub subject: String,
    pub at: OffsetDateTime,
}

/// Failures to inject, keyed by what the call is about.
#[derive(Debug, Default, Clone)]
pub(crate) struct FaultPlan {
    cancellations: HashMap<RegistrationId, String>,
    /// Keyed by normalized child name
    registrations: HashMap<String, String>,
    listing: Option<String>,
}

impl FaultPlan {
    pub(crate) fn fail_cancellation(&mut self, id: RegistrationId, message: String) {
        self.cancellations.insert(id, message);
    }

    pub(crate) fn fail_registration(&mut self, child_name: &str, message: String) {
        self.registrations.insert(normalize(child_name), message);
    }

    pub(crate) fn fail_listing(&mut self, message: String) {
        self.listing = Some(message);
    }

    pub(crate) fn cancellation_fault(&self, id: &RegistrationId) -> Option<&str> {
        self.cancellations.get(id).map(String::as_str)
    }

    pub(crate) fn registration_fault(&self, child_name: &str) -> Option<&str> {
        self.registrations
            .get(&normalize(child_name))
            .map(String::as_str)
    }

    pub(crate) fn listing_fault(&self) -> Option<&str> {
        self.listing.as_deref()
    }
}
