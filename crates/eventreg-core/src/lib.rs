//! # eventreg-core
//!
//! Pure building blocks of registration reconciliation: the data model,
//! name normalization, age eligibility, the registration diff and the
//! outcome summarizer. Nothing in this crate performs I/O.

pub mod diff;
pub mod eligibility;
pub mod id;
pub mod identity;
pub mod model;
pub mod outcome;
pub mod summary;

pub use diff::{DiffResult, diff};
pub use eligibility::{
    AgeBound, EligibilityError, MAX_CHILD_AGE, MIN_CHILD_AGE, age_group_of, validate_eligibility,
};
pub use id::{ActorId, ChildId, EventId, RegistrationId};
pub use identity::{normalize, same_person};
pub use model::{
    Acknowledgements, Child, EmergencyContact, Event, ExistingRegistration, NotificationChannel,
    ReconciliationRequest, RegistrationStatus,
};
pub use outcome::{
    CancellationResult, CancellationStatus, OutcomeKind, ReconciliationOutcome,
    RegistrationFailure, RegistrationResult, RegistrationState, ValidationError,
};
pub use summary::{SummaryMessage, Tone, summarize};
