use eventreg_core::{ReconciliationRequest, ValidationError};

/// Required-field checks for new registrations. Cancellations never depend
/// on these.
pub fn validate_required_fields(request: &ReconciliationRequest) -> Vec<ValidationError> {
    let contact = &request.emergency_contact;
    let mut errors = Vec::new();
    if contact.first_name.trim().is_empty() {
        errors.push(ValidationError::MissingContactFirstName);
    }
    if contact.last_name.trim().is_empty() {
        errors.push(ValidationError::MissingContactLastName);
    }
    if contact.phone_or_email.trim().is_empty() {
        errors.push(ValidationError::MissingContactMethod);
    }
    if !request.acknowledgements.waiver_accepted {
        errors.push(ValidationError::WaiverNotAccepted);
    }
    if !request.acknowledgements.policy_accepted {
        errors.push(ValidationError::PolicyNotAccepted);
    }
    errors
}
