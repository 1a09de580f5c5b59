//! End-to-end reconciliation runs against the in-memory store.

use std::sync::Arc;
use std::time::Duration;

use eventreg_core::{
    Acknowledgements, ActorId, CancellationStatus, Child, ChildId, EmergencyContact, Event,
    ExistingRegistration, NotificationChannel, OutcomeKind, ReconciliationRequest,
    RegistrationFailure, RegistrationState, RegistrationStatus, Tone, ValidationError, summarize,
};
use eventreg_db_memory::{CallKind, CallPhase, InMemoryRegistrationStore, MemoryStoreOptions};
use eventreg_engine::{PreconditionViolation, ReconcileError, Reconciler};

const EVENT: &str = "evt-spring";

fn children() -> Vec<Child> {
    vec![
        Child::new("amy", "Amy", "Lee", 8),
        Child::new("bo", "Bo", "Lee", 10),
        Child::new("cam", "Cam", "Lee", 9),
        Child::new("dee", "Dee", "Lee", 3),
    ]
}

fn request(desired: &[&str], existing: &[(&str, &str)]) -> ReconciliationRequest {
    let mut request = ReconciliationRequest::new(
        Event::new(EVENT, "Spring Camp").with_age_range(Some(5), Some(12)),
    );
    request.actor = Some(ActorId::new("parent-1"));
    request.children = children();
    request.desired = desired.iter().map(|id| ChildId::new(*id)).collect();
    request.existing = existing
        .iter()
        .map(|(id, name)| ExistingRegistration::new(*id, *name))
        .collect();
    request.emergency_contact = EmergencyContact::new("Pat", "Lee", "pat@example.org");
    request.acknowledgements = Acknowledgements::accepted();
    request
}

async fn seeded_store(
    options: MemoryStoreOptions,
    existing: &[(&str, &str)],
) -> Arc<InMemoryRegistrationStore> {
    let store = Arc::new(InMemoryRegistrationStore::with_options(options));
    for (id, name) in existing {
        store
            .seed(&EVENT.into(), ExistingRegistration::new(*id, *name))
            .await;
    }
    store
}

fn reconciler(store: &Arc<InMemoryRegistrationStore>) -> Reconciler {
    Reconciler::new(store.clone())
}

#[tokio::test]
async fn test_mixed_update() {
    let existing = [("r-amy", "Amy Lee"), ("r-bo", "Bo Lee")];
    let store = seeded_store(MemoryStoreOptions::default(), &existing).await;
    let req = request(&["amy", "cam"], &existing);

    let outcome = reconciler(&store).reconcile(&req).await.unwrap();

    assert_eq!(outcome.kind, OutcomeKind::Applied);
    assert_eq!(outcome.cancellations.len(), 1);
    assert_eq!(outcome.cancellations[0].registration.id.as_str(), "r-bo");
    assert!(outcome.cancellations[0].is_success());

    assert_eq!(outcome.registrations.len(), 2);
    assert_eq!(outcome.registrations[0].child_name, "Amy Lee");
    assert_eq!(outcome.registrations[0].state, RegistrationState::AlreadyRegistered);
    assert!(outcome.registrations[1].is_new());

    assert_eq!(store.call_count(CallKind::Cancel).await, 1);
    assert_eq!(store.call_count(CallKind::Create).await, 1);

    let names: Vec<&str> = outcome
        .current_registrations
        .iter()
        .map(|r| r.child_name.as_str())
        .collect();
    assert_eq!(names, vec!["Amy Lee", "Cam Lee"]);
    let cam = &outcome.current_registrations[1];
    assert_eq!(cam.emergency_contact_name.as_deref(), Some("Pat Lee"));
    assert_eq!(cam.status, RegistrationStatus::Registered);

    assert!(outcome.notification_sent);
    assert_eq!(outcome.notification_channel, Some(NotificationChannel::Email));

    let message = summarize(&outcome, true, 1);
    assert_eq!(message.tone, Tone::Success);
    assert_eq!(
        message.text,
        "Registration updated: Amy Lee and Cam Lee are registered for Spring Camp, and 1 registration removed. \
         A confirmation has been sent by email."
    );
}

#[tokio::test]
async fn test_ineligible_sibling_does_not_block_others() {
    let store = seeded_store(MemoryStoreOptions::default(), &[]).await;
    let req = request(&["dee", "cam"], &[]);

    let outcome = reconciler(&store).reconcile(&req).await.unwrap();

    assert_eq!(outcome.kind, OutcomeKind::Applied);
    assert_eq!(outcome.registrations.len(), 2);
    let dee = &outcome.registrations[0];
    assert_eq!(dee.child_name, "Dee Lee");
    match &dee.state {
        RegistrationState::Failed {
            failure: RegistrationFailure::IneligibleAge { error, .. },
        } => assert_eq!(error.limit(), Some(5)),
        other => panic!("unexpected state: {other:?}"),
    }
    assert!(outcome.registrations[1].is_new());

    // Only the eligible child reaches the store.
    assert_eq!(store.call_count(CallKind::Create).await, 1);

    let message = summarize(&outcome, false, 0);
    assert_eq!(message.tone, Tone::Partial);
    assert!(message.text.starts_with("Cam Lee has been registered for Spring Camp."));
    assert!(message.text.contains("Dee Lee (age 3 is below the minimum age of 5)"));
}

#[tokio::test]
async fn test_empty_selection_removes_everything() {
    let existing = [("r-amy", "Amy Lee"), ("r-bo", "Bo Lee")];
    let store = seeded_store(MemoryStoreOptions::default(), &existing).await;
    let mut req = request(&[], &existing);
    // Required fields are irrelevant when nothing is registered.
    req.emergency_contact = EmergencyContact::default();
    req.acknowledgements = Acknowledgements::default();

    let outcome = reconciler(&store).reconcile(&req).await.unwrap();

    assert_eq!(outcome.kind, OutcomeKind::Removed);
    assert_eq!(outcome.successful_cancellations(), 2);
    assert!(outcome.validation_errors.is_empty());
    assert!(outcome.current_registrations.is_empty());
    assert_eq!(store.call_count(CallKind::Create).await, 0);

    let message = summarize(&outcome, true, 2);
    assert_eq!(message.text, "All registrations for Spring Camp have been removed.");
}

#[tokio::test]
async fn test_empty_selection_with_every_cancel_failing() {
    let existing = [("r-amy", "Amy Lee"), ("r-bo", "Bo Lee")];
    let store = seeded_store(MemoryStoreOptions::default(), &existing).await;
    store.fail_cancellation("r-amy", "locked").await;
    store.fail_cancellation("r-bo", "locked").await;
    let req = request(&[], &existing);

    let outcome = reconciler(&store).reconcile(&req).await.unwrap();

    assert_eq!(outcome.kind, OutcomeKind::NoChanges);
    assert_eq!(outcome.failed_cancellations().count(), 2);
    assert_eq!(outcome.current_registrations.len(), 2);
    assert!(matches!(
        outcome.cancellations[0].status,
        CancellationStatus::Failed { .. }
    ));

    let message = summarize(&outcome, true, 0);
    assert_eq!(message.tone, Tone::Failure);
    assert!(message.text.contains("We couldn't remove Amy Lee and Bo Lee."));
}

#[tokio::test]
async fn test_failed_cancel_does_not_stop_registration() {
    let existing = [("r-amy", "Amy Lee"), ("r-bo", "Bo Lee"), ("r-dee", "Dee Lee")];
    let store = seeded_store(MemoryStoreOptions::default(), &existing).await;
    store.fail_cancellation("r-bo", "HTTP 503").await;
    let req = request(&["cam"], &existing);

    let outcome = reconciler(&store).reconcile(&req).await.unwrap();

    assert_eq!(outcome.kind, OutcomeKind::Applied);
    assert_eq!(store.call_count(CallKind::Cancel).await, 3);
    assert_eq!(outcome.successful_cancellations(), 2);
    let failed: Vec<&str> = outcome
        .failed_cancellations()
        .map(|c| c.registration.id.as_str())
        .collect();
    assert_eq!(failed, vec!["r-bo"]);

    assert_eq!(outcome.new_registrations().count(), 1);
    let names: Vec<&str> = outcome
        .current_registrations
        .iter()
        .map(|r| r.child_name.as_str())
        .collect();
    assert_eq!(names, vec!["Bo Lee", "Cam Lee"]);

    let remaining = store.records(&EVENT.into()).await;
    let bo = remaining
        .iter()
        .find(|r| r.registration.id.as_str() == "r-bo")
        .unwrap();
    assert_eq!(bo.registration.status, RegistrationStatus::Registered);

    let message = summarize(&outcome, true, outcome.successful_cancellations());
    assert_eq!(message.tone, Tone::Partial);
    assert_eq!(
        message.text,
        "Registration updated: Cam Lee is registered for Spring Camp, and 2 registrations removed. \
         We couldn't remove Bo Lee. Please try again or contact support. \
         A confirmation has been sent by email."
    );
}

#[tokio::test]
async fn test_unchanged_selection_makes_no_calls() {
    let existing = [("r-amy", "Amy Lee")];
    let store = seeded_store(MemoryStoreOptions::default(), &existing).await;
    let req = request(&["amy"], &[("r-amy", "  amy   LEE ")]);

    let outcome = reconciler(&store).reconcile(&req).await.unwrap();

    assert_eq!(outcome.kind, OutcomeKind::NoChanges);
    assert!(outcome.cancellations.is_empty());
    assert_eq!(outcome.registrations.len(), 1);
    assert_eq!(outcome.registrations[0].state, RegistrationState::AlreadyRegistered);
    assert!(store.journal().await.is_empty());
}

#[tokio::test]
async fn test_reselecting_after_cancellation_registers_again() {
    let store = seeded_store(MemoryStoreOptions::default(), &[]).await;
    let mut req = request(&["amy"], &[("r-amy", "Amy Lee")]);
    req.existing[0].status = RegistrationStatus::Cancelled;

    let outcome = reconciler(&store).reconcile(&req).await.unwrap();

    assert_eq!(outcome.kind, OutcomeKind::Applied);
    assert!(outcome.cancellations.is_empty());
    assert_eq!(outcome.registrations.len(), 1);
    assert!(outcome.registrations[0].is_new());
    assert_eq!(store.call_count(CallKind::Create).await, 1);

    let current: Vec<(&str, RegistrationStatus)> = outcome
        .current_registrations
        .iter()
        .map(|r| (r.child_name.as_str(), r.status))
        .collect();
    assert_eq!(current, vec![("Amy Lee", RegistrationStatus::Registered)]);

    let message = summarize(&outcome, false, 0);
    assert_eq!(
        message.text,
        "Amy Lee has been registered for Spring Camp. A confirmation has been sent by email."
    );
}

#[tokio::test]
async fn test_validation_failure_still_cancels() {
    let existing = [("r-bo", "Bo Lee")];
    let store = seeded_store(MemoryStoreOptions::default(), &existing).await;
    let mut req = request(&["cam"], &existing);
    req.emergency_contact.phone_or_email = " ".into();
    req.acknowledgements.waiver_accepted = false;

    let outcome = reconciler(&store).reconcile(&req).await.unwrap();

    assert_eq!(outcome.kind, OutcomeKind::ValidationFailed);
    assert_eq!(
        outcome.validation_errors,
        vec![
            ValidationError::MissingContactMethod,
            ValidationError::WaiverNotAccepted,
        ]
    );
    assert_eq!(outcome.successful_cancellations(), 1);
    assert!(outcome.registrations.is_empty());
    assert_eq!(store.call_count(CallKind::Create).await, 0);

    let message = summarize(&outcome, true, 1);
    assert_eq!(message.tone, Tone::Failure);
    assert!(message.text.ends_with("No new registrations were created. 1 registration removed."));
}

#[tokio::test]
async fn test_precondition_violations_make_no_calls() {
    let existing = [("r-amy", "Amy Lee")];
    let store = seeded_store(MemoryStoreOptions::default(), &existing).await;

    let mut anonymous = request(&[], &existing);
    anonymous.actor = None;
    let err = reconciler(&store).reconcile(&anonymous).await.unwrap_err();
    assert!(err.is_unauthenticated());

    let unknown = request(&["amy", "zed"], &existing);
    let err = reconciler(&store).reconcile(&unknown).await.unwrap_err();
    assert!(matches!(
        err,
        ReconcileError::Precondition(PreconditionViolation::UnknownChild(ref id)) if id.as_str() == "zed"
    ));

    let mut no_event = request(&["amy"], &existing);
    no_event.event.id = "".into();
    let err = reconciler(&store).reconcile(&no_event).await.unwrap_err();
    assert!(matches!(
        err,
        ReconcileError::Precondition(PreconditionViolation::MissingEvent)
    ));

    assert!(store.journal().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_cancellations_finish_before_registrations_start() {
    let existing = [("r-amy", "Amy Lee"), ("r-bo", "Bo Lee")];
    let options = MemoryStoreOptions {
        latency: Some(Duration::from_millis(50)),
        ..MemoryStoreOptions::default()
    };
    let store = seeded_store(options, &existing).await;
    let req = request(&["cam", "amy"], &[("r-bo", "Bo Lee"), ("r-dee", "Dee Lee")]);

    let outcome = reconciler(&store).reconcile(&req).await.unwrap();
    assert_eq!(outcome.cancellations.len(), 2);
    assert_eq!(outcome.new_registrations().count(), 2);

    let journal = store.journal().await;
    let last_cancel_finished = journal
        .iter()
        .rposition(|r| r.kind == CallKind::Cancel && r.phase == CallPhase::Finished)
        .unwrap();
    let first_create_started = journal
        .iter()
        .position(|r| r.kind == CallKind::Create && r.phase == CallPhase::Started)
        .unwrap();
    assert!(last_cancel_finished < first_create_started);

    // Calls within a phase overlap.
    assert!(store.peak_in_flight() >= 2);

    // Results follow selection order, not completion order.
    let names: Vec<&str> = outcome
        .registrations
        .iter()
        .map(|r| r.child_name.as_str())
        .collect();
    assert_eq!(names, vec!["Cam Lee", "Amy Lee"]);
}

#[tokio::test]
async fn test_payload_carries_age_group_and_special_requests() {
    let store = seeded_store(MemoryStoreOptions::default(), &[]).await;
    let mut req = request(&["bo"], &[]);
    req.notes = "Pickup by grandma".into();
    req.wants_food = true;
    if let Some(bo) = req.children.iter_mut().find(|c| c.id.as_str() == "bo") {
        bo.allergies = Some("Peanuts".into());
        bo.experience = Some("   ".into());
    }

    reconciler(&store).reconcile(&req).await.unwrap();

    let records = store.records(&EVENT.into()).await;
    assert_eq!(records.len(), 1);
    let payload = records[0].payload.as_ref().unwrap();
    assert_eq!(payload.child_age, 10);
    assert_eq!(payload.age_group, "10-12 years");
    assert_eq!(
        payload.special_requests.as_deref(),
        Some("Peanuts\nPickup by grandma")
    );
    assert!(payload.wants_food);
    assert_eq!(payload.emergency_contact.full_name(), "Pat Lee");
}

#[tokio::test]
async fn test_notifications_disabled() {
    let options = MemoryStoreOptions {
        send_notifications: false,
        ..MemoryStoreOptions::default()
    };
    let store = seeded_store(options, &[]).await;
    let mut req = request(&["amy"], &[]);
    req.emergency_contact.phone_or_email = "555-0100".into();

    let outcome = reconciler(&store).reconcile(&req).await.unwrap();

    assert!(!outcome.notification_sent);
    assert_eq!(outcome.notification_channel, None);
    let message = summarize(&outcome, false, 0);
    assert!(message.text.ends_with("You'll receive a confirmation if notifications are enabled."));
}

#[tokio::test]
async fn test_store_failure_on_create() {
    let store = seeded_store(MemoryStoreOptions::default(), &[]).await;
    store.fail_registration("cam lee", "event is full").await;
    let mut req = request(&["amy", "cam"], &[]);
    req.emergency_contact.phone_or_email = "555-0100".into();

    let outcome = reconciler(&store).reconcile(&req).await.unwrap();

    assert_eq!(outcome.successes().count(), 1);
    let cam = &outcome.registrations[1];
    match &cam.state {
        RegistrationState::Failed {
            failure: RegistrationFailure::RegistrationFailed { reason },
        } => assert!(reason.contains("event is full")),
        other => panic!("unexpected state: {other:?}"),
    }
    assert_eq!(outcome.current_registrations.len(), 1);
    assert_eq!(outcome.notification_channel, Some(NotificationChannel::Sms));

    let message = summarize(&outcome, false, 0);
    assert_eq!(message.tone, Tone::Partial);
    assert!(message.text.contains("We couldn't register Cam Lee."));
    assert!(message.text.contains("A confirmation has been sent by text message."));
}

#[tokio::test]
async fn test_existing_for_lists_active_registrations() {
    let existing = [("r-amy", "Amy Lee"), ("r-bo", "Bo Lee")];
    let store = seeded_store(MemoryStoreOptions::default(), &existing).await;
    let reconciler = reconciler(&store);
    let actor = ActorId::new("parent-1");

    let listed = reconciler
        .existing_for(Some(&actor), &EVENT.into())
        .await
        .unwrap();
    assert_eq!(listed.len(), 2);

    let err = reconciler.existing_for(None, &EVENT.into()).await.unwrap_err();
    assert!(err.is_unauthenticated());

    store.fail_listing("connection reset").await;
    let err = reconciler
        .existing_for(Some(&actor), &EVENT.into())
        .await
        .unwrap_err();
    assert!(matches!(err, ReconcileError::Storage(_)));
}
