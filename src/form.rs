use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use thiserror::Error;

/// Untrusted contact form payload as it arrives over the wire.
///
/// Every field is optional here; `validate` decides what is acceptable.
/// The `honeypot` field is hidden from real users, so any non-blank value
/// marks an automated submission.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawSubmission {
    pub company_name: Option<String>,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub project_details: Option<String>,
    pub honeypot: Option<String>,
}

/// A validated, trimmed contact request. The honeypot never survives
/// validation, so it has no field here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    pub company_name: String,
    pub contact_person: String,
    pub email: String,
    pub project_details: String,
}

/// Rejection reasons, in the order the rules are applied.
///
/// The messages are user-facing and shown verbatim in the form UI, so they
/// must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid submission detected")]
    SpamDetected,

    #[error("All fields are required")]
    MissingField,

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Project details must be at least 10 characters")]
    ProjectDetailsTooShort,

    #[error("Company name must be at least 2 characters")]
    CompanyNameTooShort,

    #[error("Contact person name must be at least 2 characters")]
    ContactPersonTooShort,
}

static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid")
    })
}

/// Validate a raw submission into a trimmed `ContactSubmission`.
///
/// Pure and idempotent. The rules run in a fixed order and the first failing
/// rule determines the reported reason, which is user-observable:
///
/// 1. non-blank honeypot → spam
/// 2. any required field absent or empty → missing field
/// 3. trim all fields
/// 4. email pattern
/// 5. project details ≥ 10 chars
/// 6. company name ≥ 2 chars
/// 7. contact person ≥ 2 chars
pub fn validate(raw: &RawSubmission) -> Result<ContactSubmission, ValidationError> {
    if let Some(honeypot) = &raw.honeypot {
        if !honeypot.trim().is_empty() {
            return Err(ValidationError::SpamDetected);
        }
    }

    let (company_name, contact_person, email, project_details) = match (
        non_empty(&raw.company_name),
        non_empty(&raw.contact_person),
        non_empty(&raw.email),
        non_empty(&raw.project_details),
    ) {
        (Some(c), Some(p), Some(e), Some(d)) => (c, p, e, d),
        _ => return Err(ValidationError::MissingField),
    };

    let company_name = company_name.trim();
    let contact_person = contact_person.trim();
    let email = email.trim();
    let project_details = project_details.trim();

    if !email_regex().is_match(email) {
        return Err(ValidationError::InvalidEmail);
    }

    if project_details.chars().count() < 10 {
        return Err(ValidationError::ProjectDetailsTooShort);
    }

    if company_name.chars().count() < 2 {
        return Err(ValidationError::CompanyNameTooShort);
    }

    if contact_person.chars().count() < 2 {
        return Err(ValidationError::ContactPersonTooShort);
    }

    Ok(ContactSubmission {
        company_name: company_name.to_string(),
        contact_person: contact_person.to_string(),
        email: email.to_string(),
        project_details: project_details.to_string(),
    })
}

/// A field counts as present only if it exists and is non-empty before
/// trimming. Whitespace-only values pass this gate and fail a length rule
/// later instead.
fn non_empty(field: &Option<String>) -> Option<&str> {
    match field.as_deref() {
        Some("") | None => None,
        Some(v) => Some(v),
    }
}
