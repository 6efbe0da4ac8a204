//! Request and template identifier validation.
//!
//! Both identifiers are embedded verbatim in filesystem paths (cache
//! entries and per-job files), so they are restricted to a filesystem-safe
//! charset before a job is accepted.

use crate::error::CoreError;

/// Maximum length of a request or template identifier.
const MAX_ID_LEN: usize = 128;

/// Validate an identifier that will become part of a filesystem path.
///
/// Rules:
/// - Must not be empty.
/// - Must not exceed `MAX_ID_LEN` characters.
/// - Must contain only alphanumeric, hyphen, underscore, or dot characters.
/// - Must not be `.` or `..`.
pub fn validate_identifier(label: &str, value: &str) -> Result<(), CoreError> {
    if value.is_empty() {
        return Err(CoreError::Validation(format!(
            "{label} must not be empty"
        )));
    }
    if value.len() > MAX_ID_LEN {
        return Err(CoreError::Validation(format!(
            "{label} must not exceed {MAX_ID_LEN} characters"
        )));
    }
    if !value
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        return Err(CoreError::Validation(format!(
            "{label} may only contain alphanumeric, hyphen, underscore, or dot characters"
        )));
    }
    if value == "." || value == ".." {
        return Err(CoreError::Validation(format!(
            "{label} must not be a relative path component"
        )));
    }
    Ok(())
}

/// Validate a caller-assigned request id.
pub fn validate_request_id(value: &str) -> Result<(), CoreError> {
    validate_identifier("requestId", value)
}

/// Validate a template cache key.
pub fn validate_template_id(value: &str) -> Result<(), CoreError> {
    validate_identifier("templateId", value)
}

/// Validate that a callback URL is non-empty and starts with `http`.
pub fn validate_callback_url(url: &str) -> Result<(), CoreError> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "callbackUrl must not be empty".to_string(),
        ));
    }
    if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
        return Err(CoreError::Validation(format!(
            "callbackUrl must start with http:// or https://, got: '{trimmed}'"
        )));
    }
    Ok(())
}
