//! The registration store contract.

use async_trait::async_trait;
use eventreg_core::{EventId, ExistingRegistration, RegistrationId};

use crate::error::StorageError;
use crate::types::{CreatedRegistration, RegistrationPayload};

/// Remote collaborator the reconciliation engine mutates registrations
/// through. Implementations must be thread-safe (`Send + Sync`).
///
/// The caller is implicit: a store is constructed for one authenticated
/// parent and only sees that parent's registrations.
///
/// # Example
///
/// ```ignore
/// use eventreg_storage::{RegistrationStore, StorageError};
///
/// async fn registered_names(
///     store: &dyn RegistrationStore,
///     event_id: &EventId,
/// ) -> Result<Vec<String>, StorageError> {
///     let existing = store.list_registrations(event_id).await?;
///     Ok(existing.into_iter().map(|r| r.child_name).collect())
/// }
/// ```
#[async_trait]
pub trait RegistrationStore: Send + Sync {
    /// Lists the caller's current registrations for an event.
    ///
    /// # Errors
    ///
    /// Returns an error for infrastructure issues.
    async fn list_registrations(
        &self,
        event_id: &EventId,
    ) -> Result<Vec<ExistingRegistration>, StorageError>;

    /// Cancels one registration.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the registration is already gone;
    /// callers treat that as success.
    async fn cancel_registration(&self, registration_id: &RegistrationId)
        -> Result<(), StorageError>;

    /// Creates one registration.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Rejected` when the store refuses the payload.
    async fn create_registration(
        &self,
        payload: &RegistrationPayload,
    ) -> Result<CreatedRegistration, StorageError>;

    /// Returns the name of this backend for logging.
    fn backend_name(&self) -> &'static str;
}
