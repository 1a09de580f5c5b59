//! # eventreg-engine
//!
//! Drives a reconciliation run against a [`RegistrationStore`]: precondition
//! checks, the cancellation barrier, eligibility filtering and the
//! registration barrier. Per-item failures never abort a run; they are
//! collected into the [`ReconciliationOutcome`].
//!
//! ```ignore
//! use eventreg_engine::Reconciler;
//!
//! let reconciler = Reconciler::new(store);
//! let outcome = reconciler.reconcile(&request).await?;
//! let message = eventreg_core::summarize(&outcome, had_existing, 0);
//! ```
//!
//! [`RegistrationStore`]: eventreg_storage::RegistrationStore
//! [`ReconciliationOutcome`]: eventreg_core::ReconciliationOutcome

pub mod error;
pub mod payload;
pub mod reconciler;
pub mod settle;
pub mod validation;

pub use error::{PreconditionViolation, ReconcileError};
pub use payload::{build_payload, special_requests};
pub use reconciler::Reconciler;
pub use settle::{Settled, settle_all};
pub use validation::validate_required_fields;
