//! In-memory `RegistrationStore` backend.
//!
//! Records live in a single locked vector. Every call is journaled with its
//! start and finish so ordering and overlap can be asserted on.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use eventreg_core::{EventId, ExistingRegistration, RegistrationId, RegistrationStatus};
use eventreg_storage::{CreatedRegistration, RegistrationPayload, RegistrationStore, StorageError};
use time::OffsetDateTime;
use tokio::sync::{Mutex, RwLock};

use crate::faults::{CallKind, CallPhase, CallRecord, FaultPlan};

/// Behavior knobs for the in-memory backend.
#[derive(Debug, Clone)]
pub struct MemoryStoreOptions {
    /// Value reported as `notification_sent` for every created registration.
    pub send_notifications: bool,
    /// Artificial delay applied to every call, to make overlap observable.
    pub latency: Option<Duration>,
}

impl Default for MemoryStoreOptions {
    fn default() -> Self {
        Self {
            send_notifications: true,
            latency: None,
        }
    }
}

/// A registration as held by the store.
#[derive(Debug, Clone)]
pub struct StoredRegistration {
    pub event_id: EventId,
    pub registration: ExistingRegistration,
    /// Payload it was created from; `None` for seeded records
    pub payload: Option<RegistrationPayload>,
    pub created_at: OffsetDateTime,
}

/// In-memory registration store.
///
/// Cancelled registrations stay in the store with status `cancelled` and are
/// hidden from listings. Failures can be injected per registration id or per
/// child name, and every call is journaled so tests can assert on ordering
/// and overlap.
#[derive(Debug)]
pub struct InMemoryRegistrationStore {
    records: Arc<RwLock<Vec<StoredRegistration>>>,
    faults: RwLock<FaultPlan>,
    journal: Mutex<Vec<CallRecord>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    options: MemoryStoreOptions,
}

impl InMemoryRegistrationStore {
    pub fn new() -> Self {
        Self::with_options(MemoryStoreOptions::default())
    }

    pub fn with_options(options: MemoryStoreOptions) -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
            faults: RwLock::new(FaultPlan::default()),
            journal: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
            options,
        }
    }

    /// Inserts a registration directly, bypassing the journal.
    pub async fn seed(&self, event_id: &EventId, registration: ExistingRegistration) {
        self.records.write().await.push(StoredRegistration {
            event_id: event_id.clone(),
            registration,
            payload: None,
            created_at: OffsetDateTime::now_utc(),
        });
    }

    /// All records for an event, cancelled ones included.
    pub async fn records(&self, event_id: &EventId) -> Vec<StoredRegistration> {
        self.records
            .read()
            .await
            .iter()
            .filter(|r| &r.event_id == event_id)
            .cloned()
            .collect()
    }

    /// Makes every cancellation of `id` fail with `message`.
    pub async fn fail_cancellation(&self, id: impl Into<RegistrationId>, message: impl Into<String>) {
        self.faults
            .write()
            .await
            .fail_cancellation(id.into(), message.into());
    }

    /// Makes every registration of a child with this name fail with `message`.
    pub async fn fail_registration(&self, child_name: &str, message: impl Into<String>) {
        self.faults
            .write()
            .await
            .fail_registration(child_name, message.into());
    }

    /// Makes listing fail with `message`.
    pub async fn fail_listing(&self, message: impl Into<String>) {
        self.faults.write().await.fail_listing(message.into());
    }

    pub async fn journal(&self) -> Vec<CallRecord> {
        self.journal.lock().await.clone()
    }

    /// Number of calls of `kind` issued so far.
    pub async fn call_count(&self, kind: CallKind) -> usize {
        self.journal
            .lock()
            .await
            .iter()
            .filter(|r| r.kind == kind && r.phase == CallPhase::Started)
            .count()
    }

    /// Highest number of calls that were in flight at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    async fn record(&self, kind: CallKind, phase: CallPhase, subject: &str) {
        self.journal.lock().await.push(CallRecord {
            kind,
            phase,
            subject: subject.to_string(),
            at: OffsetDateTime::now_utc(),
        });
    }

    async fn begin(&self, kind: CallKind, subject: &str) {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        self.record(kind, CallPhase::Started, subject).await;
        if let Some(latency) = self.options.latency {
            tokio::time::sleep(latency).await;
        }
    }

    async fn finish(&self, kind: CallKind, subject: &str) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.record(kind, CallPhase::Finished, subject).await;
    }

    async fn list_inner(&self, event_id: &EventId) -> Result<Vec<ExistingRegistration>, StorageError> {
        if let Some(message) = self.faults.read().await.listing_fault() {
            return Err(StorageError::connection_error(message));
        }
        Ok(self
            .records
            .read()
            .await
            .iter()
            .filter(|r| {
                &r.event_id == event_id && r.registration.is_active()
            })
            .map(|r| r.registration.clone())
            .collect())
    }

    async fn cancel_inner(&self, registration_id: &RegistrationId) -> Result<(), StorageError> {
        if let Some(message) = self.faults.read().await.cancellation_fault(registration_id) {
            return Err(StorageError::rejected(None, message));
        }
        let mut records = self.records.write().await;
        let Some(record) = records.iter_mut().find(|r| {
            &r.registration.id == registration_id && r.registration.is_active()
        }) else {
            return Err(StorageError::not_found(registration_id.as_str()));
        };
        record.registration.status = RegistrationStatus::Cancelled;
        tracing::debug!(registration_id = %registration_id, "Registration cancelled");
        Ok(())
    }

    async fn create_inner(
        &self,
        payload: &RegistrationPayload,
    ) -> Result<CreatedRegistration, StorageError> {
        if let Some(message) = self.faults.read().await.registration_fault(&payload.child_name) {
            return Err(StorageError::rejected(None, message));
        }
        let id = RegistrationId::new(format!("reg-{}", uuid::Uuid::new_v4()));
        let registration = ExistingRegistration {
            id: id.clone(),
            child_name: payload.child_name.clone(),
            emergency_contact_name: Some(payload.emergency_contact.full_name()),
            emergency_contact_phone: Some(payload.emergency_contact.phone_or_email.clone()),
            special_requests: payload.special_requests.clone(),
            status: RegistrationStatus::Registered,
        };
        self.records.write().await.push(StoredRegistration {
            event_id: payload.event_id.clone(),
            registration,
            payload: Some(payload.clone()),
            created_at: OffsetDateTime::now_utc(),
        });
        tracing::debug!(registration_id = %id, child = %payload.child_name, "Registration created");
        Ok(CreatedRegistration {
            registration_id: id,
            notification_sent: self.options.send_notifications,
        })
    }
}

impl Default for InMemoryRegistrationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RegistrationStore for InMemoryRegistrationStore {
    async fn list_registrations(
        &self,
        event_id: &EventId,
    ) -> Result<Vec<ExistingRegistration>, StorageError> {
        self.begin(CallKind::List, event_id.as_str()).await;
        let result = self.list_inner(event_id).await;
        self.finish(CallKind::List, event_id.as_str()).await;
        result
    }

    async fn cancel_registration(
        &self,
        registration_id: &RegistrationId,
    ) -> Result<(), StorageError> {
        self.begin(CallKind::Cancel, registration_id.as_str()).await;
        let result = self.cancel_inner(registration_id).await;
        self.finish(CallKind::Cancel, registration_id.as_str()).await;
        result
    }

    async fn create_registration(
        &self,
        payload: &RegistrationPayload,
    ) -> Result<CreatedRegistration, StorageError> {
        self.begin(CallKind::Create, &payload.child_name).await;
        let result = self.create_inner(payload).await;
        self.finish(CallKind::Create, &payload.child_name).await;
        result
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
