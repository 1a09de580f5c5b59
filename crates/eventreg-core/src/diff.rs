//! Registration diffing.
//!
//! Computes which existing registrations must be cancelled and which selected
//! children still need a registration. Registrations are matched to children
//! by normalized display name; with duplicate names the first match in
//! iteration order wins.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::id::ChildId;
use crate::model::{Child, ExistingRegistration, ReconciliationRequest};

/// Mutations required to move from the existing registrations to the
/// desired selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffResult {
    /// Present remotely, no longer selected
    pub to_cancel: Vec<ExistingRegistration>,
    /// Selected, not yet registered
    pub to_register: Vec<ChildId>,
    /// Selected and already registered; needs no call
    pub already_registered: Vec<ChildId>,
}

impl DiffResult {
    /// Builds the child lookup from a request and diffs it.
    pub fn for_request(request: &ReconciliationRequest) -> Self {
        let children: HashMap<ChildId, Child> = request
            .children
            .iter()
            .map(|c| (c.id.clone(), c.clone()))
            .collect();
        diff(&request.desired, &children, &request.existing)
    }

    /// True when neither cancellations nor registrations are needed.
    pub fn is_noop(&self) -> bool {
        self.to_cancel.is_empty() && self.to_register.is_empty()
    }
}

/// Pure diff of the desired selection against existing registrations.
///
/// Desired ids missing from `children` cannot be named and are ignored.
/// Registrations already marked cancelled are treated as absent.
pub fn diff(
    desired: &IndexSet<ChildId>,
    children: &HashMap<ChildId, Child>,
    existing: &[ExistingRegistration],
) -> DiffResult {
    let selected: Vec<(&ChildId, String)> = desired
        .iter()
        .filter_map(|id| match children.get(id) {
            Some(child) => Some((id, child.normalized_name())),
            None => {
                tracing::debug!(child_id = %id, "Selected child not found, ignoring");
                None
            }
        })
        .collect();

    let active: Vec<&ExistingRegistration> = existing.iter().filter(|r| r.is_active()).collect();
    let existing_names: Vec<String> = active.iter().map(|r| r.normalized_name()).collect();

    let to_cancel = active
        .iter()
        .copied()
        .zip(&existing_names)
        .filter(|(_, name)| !selected.iter().any(|(_, selected_name)| selected_name == *name))
        .map(|(registration, _)| registration.clone())
        .collect();

    let mut result = DiffResult {
        to_cancel,
        ..DiffResult::default()
    };

    for (id, name) in &selected {
        if existing_names.iter().any(|existing_name| existing_name == name) {
            result.already_registered.push((*id).clone());
        } else {
            result.to_register.push((*id).clone());
        }
    }

    result
}
