//! Construction of create-registration payloads.

use eventreg_core::{Child, ReconciliationRequest, age_group_of};
use eventreg_storage::RegistrationPayload;

/// Joins the child's allergy, experience and notes fields with the run's
/// notes, one per line. Blank segments are dropped; `None` if nothing is
/// left.
pub fn special_requests(child: &Child, run_notes: &str) -> Option<String> {
    let segments: Vec<&str> = [
        child.allergies.as_deref(),
        child.experience.as_deref(),
        child.notes.as_deref(),
        Some(run_notes),
    ]
    .into_iter()
    .flatten()
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .collect();

    if segments.is_empty() {
        None
    } else {
        Some(segments.join("\n"))
    }
}

pub fn build_payload(request: &ReconciliationRequest, child: &Child) -> RegistrationPayload {
    RegistrationPayload {
        event_id: request.event.id.clone(),
        child_id: child.id.clone(),
        child_name: child.display_name(),
        child_age: child.age,
        age_group: age_group_of(child.age),
        emergency_contact: request.emergency_contact.clone(),
        special_requests: special_requests(child, &request.notes),
        wants_food: request.wants_food,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventreg_core::{EmergencyContact, Event};

    #[test]
    fn test_special_requests_drops_blank_segments() {
        let mut child = Child::new("c", "Cam", "Lee", 9);
        assert_eq!(special_requests(&child, ""), None);
        assert_eq!(special_requests(&child, "   "), None);

        child.allergies = Some("peanuts".into());
        child.experience = Some("  ".into());
        child.notes = Some(" shy at first ".into());
        assert_eq!(
            special_requests(&child, "vegetarian lunch"),
            Some("peanuts\nshy at first\nvegetarian lunch".to_string())
        );
    }

    #[test]
    fn test_build_payload() {
        let mut request = ReconciliationRequest::new(Event::new("evt-1", "Camp"));
        request.emergency_contact = EmergencyContact::new("Pat", "Lee", "555-0100");
        request.wants_food = true;
        let child = Child::new("cam", "Cam", "Lee", 9);

        let payload = build_payload(&request, &child);
        assert_eq!(payload.child_name, "Cam Lee");
        assert_eq!(payload.age_group, "7-9 years");
        assert_eq!(payload.emergency_contact.phone_or_email, "555-0100");
        assert_eq!(payload.special_requests, None);
        assert!(payload.wants_food);
    }
}
