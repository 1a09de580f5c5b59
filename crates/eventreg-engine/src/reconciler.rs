//! Reconciliation orchestrator.
//!
//! A run moves a parent's registrations for one event to the desired
//! selection:
//! 1. check preconditions (the only fatal failures)
//! 2. diff the selection against the existing registrations
//! 3. cancel every deselected registration concurrently and wait for all
//! 4. stop if nothing needs registering, or if required fields are missing
//! 5. check each remaining child's age against the event's bounds
//! 6. create the eligible registrations concurrently and wait for all
//!
//! Cancellations are never rolled back by later failures. Callers must not
//! run two reconciliations for the same parent and event at once.

use std::collections::HashSet;

use eventreg_core::{
    ActorId, CancellationResult, CancellationStatus, Child, ChildId, DiffResult, EventId,
    ExistingRegistration, OutcomeKind, ReconciliationOutcome, ReconciliationRequest,
    RegistrationFailure, RegistrationId, RegistrationResult, RegistrationState,
    RegistrationStatus, validate_eligibility,
};
use eventreg_storage::{DynRegistrationStore, RegistrationPayload};
use tracing::{debug, info, warn};

use crate::error::{PreconditionViolation, ReconcileError};
use crate::payload::build_payload;
use crate::settle::settle_all;
use crate::validation::validate_required_fields;

pub struct Reconciler {
    store: DynRegistrationStore,
}

impl Reconciler {
    pub fn new(store: DynRegistrationStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &DynRegistrationStore {
        &self.store
    }

    /// Loads the parent's current registrations for an event.
    pub async fn existing_for(
        &self,
        actor: Option<&ActorId>,
        event_id: &EventId,
    ) -> Result<Vec<ExistingRegistration>, ReconcileError> {
        if actor.is_none_or(|a| a.is_blank()) {
            return Err(PreconditionViolation::Unauthenticated.into());
        }
        if event_id.is_blank() {
            return Err(PreconditionViolation::MissingEvent.into());
        }
        Ok(self.store.list_registrations(event_id).await?)
    }

    /// Computes the mutations a run would apply, without calling the store.
    pub fn preview(request: &ReconciliationRequest) -> DiffResult {
        DiffResult::for_request(request)
    }

    /// Runs one reconciliation.
    ///
    /// # Errors
    ///
    /// Only precondition violations are returned as errors, before any call
    /// is made. Every per-item failure is captured in the outcome.
    #[tracing::instrument(skip_all, fields(event_id = %request.event.id, backend = self.store.backend_name()))]
    pub async fn reconcile(
        &self,
        request: &ReconciliationRequest,
    ) -> Result<ReconciliationOutcome, ReconcileError> {
        check_preconditions(request)?;

        let validation_errors = validate_required_fields(request);
        let diff = DiffResult::for_request(request);
        info!(
            desired = request.desired.len(),
            existing = request.existing.len(),
            to_cancel = diff.to_cancel.len(),
            to_register = diff.to_register.len(),
            already_registered = diff.already_registered.len(),
            "Reconciling registrations"
        );

        let cancellations = self.cancel_all(diff.to_cancel.clone()).await;
        let cancelled: HashSet<&RegistrationId> = cancellations
            .iter()
            .filter(|c| c.is_success())
            .map(|c| &c.registration.id)
            .collect();
        let mut current: Vec<ExistingRegistration> = request
            .existing
            .iter()
            .filter(|r| r.is_active() && !cancelled.contains(&r.id))
            .cloned()
            .collect();
        let removed = cancelled.len();

        let mut registrations: Vec<RegistrationResult> = diff
            .already_registered
            .iter()
            .map(|id| {
                debug!(child_id = %id, "Already registered, skipping");
                RegistrationResult {
                    child_id: id.clone(),
                    child_name: child_name(request, id),
                    state: RegistrationState::AlreadyRegistered,
                }
            })
            .collect();

        let mut outcome = ReconciliationOutcome {
            event_id: request.event.id.clone(),
            event_name: request.event.name.clone(),
            kind: OutcomeKind::NoChanges,
            cancellations: Vec::new(),
            registrations: Vec::new(),
            validation_errors: Vec::new(),
            current_registrations: Vec::new(),
            notification_sent: false,
            notification_channel: None,
        };

        // An empty selection never has anything to register.
        if diff.to_register.is_empty() {
            outcome.kind = if removed > 0 {
                OutcomeKind::Removed
            } else {
                OutcomeKind::NoChanges
            };
        } else if !validation_errors.is_empty() {
            warn!(
                missing = validation_errors.len(),
                "Required fields missing, no registrations created"
            );
            outcome.kind = OutcomeKind::ValidationFailed;
            outcome.validation_errors = validation_errors;
        } else {
            outcome.kind = OutcomeKind::Applied;

            let mut eligible: Vec<&Child> = Vec::new();
            for id in &diff.to_register {
                let Some(child) = request.child(id) else {
                    continue;
                };
                match validate_eligibility(child.age, request.event.min_age, request.event.max_age)
                {
                    Ok(()) => eligible.push(child),
                    Err(error) => {
                        warn!(child = %child.display_name(), %error, "Child not eligible");
                        registrations.push(RegistrationResult {
                            child_id: child.id.clone(),
                            child_name: child.display_name(),
                            state: RegistrationState::Failed {
                                failure: RegistrationFailure::IneligibleAge {
                                    child_name: child.display_name(),
                                    error,
                                },
                            },
                        });
                    }
                }
            }

            let payloads: Vec<RegistrationPayload> = eligible
                .into_iter()
                .map(|child| build_payload(request, child))
                .collect();
            let contact = &request.emergency_contact;

            for (payload, state) in self.create_all(payloads).await {
                if let RegistrationState::Registered {
                    registration_id,
                    notification_sent,
                } = &state
                {
                    outcome.notification_sent |= *notification_sent;
                    current.push(ExistingRegistration {
                        id: registration_id.clone(),
                        child_name: payload.child_name.clone(),
                        emergency_contact_name: Some(contact.full_name()),
                        emergency_contact_phone: Some(contact.phone_or_email.clone()),
                        special_requests: payload.special_requests.clone(),
                        status: RegistrationStatus::Registered,
                    });
                }
                registrations.push(RegistrationResult {
                    child_id: payload.child_id,
                    child_name: payload.child_name,
                    state,
                });
            }

            if outcome.notification_sent {
                outcome.notification_channel = Some(contact.channel());
            }
        }

        registrations.sort_by_key(|r| request.desired.get_index_of(&r.child_id));
        outcome.cancellations = cancellations;
        outcome.registrations = registrations;
        outcome.current_registrations = current;

        info!(
            kind = ?outcome.kind,
            cancelled = removed,
            cancel_failed = outcome.failed_cancellations().count(),
            registered = outcome.new_registrations().count(),
            failed = outcome.failures().count(),
            notification_sent = outcome.notification_sent,
            "Reconciliation finished"
        );
        Ok(outcome)
    }

    /// Cancels every registration and waits for all of them.
    async fn cancel_all(&self, to_cancel: Vec<ExistingRegistration>) -> Vec<CancellationResult> {
        let store = &self.store;
        settle_all(to_cancel, |registration| {
            let id = registration.id.clone();
            async move { store.cancel_registration(&id).await }
        })
        .await
        .into_iter()
        .map(|settled| {
            let registration = settled.key;
            let status = match settled.result {
                Ok(()) => CancellationStatus::Cancelled,
                Err(e) if e.is_not_found() => {
                    debug!(registration_id = %registration.id, "Registration already gone");
                    CancellationStatus::Cancelled
                }
                Err(e) => {
                    warn!(
                        registration_id = %registration.id,
                        child = %registration.child_name,
                        error = %e,
                        category = %e.category(),
                        "Cancellation failed"
                    );
                    CancellationStatus::Failed {
                        reason: e.to_string(),
                    }
                }
            };
            CancellationResult {
                registration,
                status,
            }
        })
        .collect()
    }

    /// Creates every registration and waits for all of them.
    async fn create_all(
        &self,
        payloads: Vec<RegistrationPayload>,
    ) -> Vec<(RegistrationPayload, RegistrationState)> {
        let store = &self.store;
        settle_all(payloads, |payload| {
            let payload = payload.clone();
            async move { store.create_registration(&payload).await }
        })
        .await
        .into_iter()
        .map(|settled| {
            let state = match settled.result {
                Ok(created) => RegistrationState::Registered {
                    registration_id: created.registration_id,
                    notification_sent: created.notification_sent,
                },
                Err(e) => {
                    warn!(
                        child = %settled.key.child_name,
                        error = %e,
                        category = %e.category(),
                        "Registration failed"
                    );
                    RegistrationState::Failed {
                        failure: RegistrationFailure::RegistrationFailed {
                            reason: e.to_string(),
                        },
                    }
                }
            };
            (settled.key, state)
        })
        .collect()
    }
}

fn check_preconditions(request: &ReconciliationRequest) -> Result<(), PreconditionViolation> {
    if request.actor.as_ref().is_none_or(|a| a.is_blank()) {
        return Err(PreconditionViolation::Unauthenticated);
    }
    if request.event.id.is_blank() {
        return Err(PreconditionViolation::MissingEvent);
    }
    if let Some(unknown) = request.desired.iter().find(|id| request.child(id).is_none()) {
        return Err(PreconditionViolation::UnknownChild(unknown.clone()));
    }
    Ok(())
}

fn child_name(request: &ReconciliationRequest, id: &ChildId) -> String {
    request
        .child(id)
        .map(Child::display_name)
        .unwrap_or_else(|| id.to_string())
}
