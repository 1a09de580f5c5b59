//! # eventreg-storage
//!
//! Abstraction over wherever registrations live.
//!
//! This crate defines the [`RegistrationStore`] trait and the types that
//! cross it. It does not contain any implementations - those are provided
//! by separate crates (`eventreg-db-memory`, `eventreg-http`).
//!
//! ## Implementing a backend
//!
//! ```ignore
//! use async_trait::async_trait;
//! use eventreg_storage::{CreatedRegistration, RegistrationPayload, RegistrationStore, StorageError};
//!
//! struct MyStore;
//!
//! #[async_trait]
//! impl RegistrationStore for MyStore {
//!     async fn create_registration(
//!         &self,
//!         payload: &RegistrationPayload,
//!     ) -> Result<CreatedRegistration, StorageError> {
//!         // Implementation
//!     }
//!     // ... other methods
//! }
//! ```

mod error;
mod traits;
mod types;

pub use error::{ErrorCategory, StorageError};
pub use traits::RegistrationStore;
pub use types::{CreatedRegistration, RegistrationPayload};

/// Type alias for a storage result.
pub type StorageResult<T> = Result<T, StorageError>;

/// Type alias for a shared store trait object.
pub type DynRegistrationStore = std::sync::Arc<dyn RegistrationStore>;
