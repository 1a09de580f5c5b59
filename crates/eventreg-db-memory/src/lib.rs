//! In-memory registration store for eventreg.
//!
//! This crate provides an in-memory implementation of the
//! `RegistrationStore` trait from `eventreg-storage`. Besides serving as a
//! lightweight backend it can inject failures and journals every call.
//!
//! # Example
//!
//! ```ignore
//! use eventreg_db_memory::InMemoryRegistrationStore;
//! use eventreg_storage::RegistrationStore;
//!
//! let store = InMemoryRegistrationStore::new();
//! store.fail_cancellation("reg-2", "locked by admin").await;
//! let existing = store.list_registrations(&event_id).await?;
//! ```

pub mod faults;
pub mod store;

pub use eventreg_storage::{RegistrationStore, StorageError};

pub use faults::{CallKind, CallPhase, CallRecord};
pub use store::{InMemoryRegistrationStore, MemoryStoreOptions, StoredRegistration};

/// Creates a new shareable in-memory store.
pub fn create_memory_store() -> eventreg_storage::DynRegistrationStore {
    std::sync::Arc::new(InMemoryRegistrationStore::new())
}
