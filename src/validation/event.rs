use crate::error::{AppError, Result};

/// The maximum length of an event name, in characters.
pub const MAX_EVENT_NAME_CHARS: usize = 120;

/// Validates an event name.
///
/// # Arguments
///
/// * `name` - The event name, already trimmed.
///
/// # Returns
///
/// A `Result<()>` indicating whether the name is valid.
pub fn validate_event_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(AppError::Validation(
            "Event name cannot be empty".to_string(),
        ));
    }

    if name.chars().count() > MAX_EVENT_NAME_CHARS {
        return Err(AppError::Validation(format!(
            "Event name must be at most {} characters",
            MAX_EVENT_NAME_CHARS
        )));
    }

    if name.chars().any(char::is_control) {
        return Err(AppError::Validation(
            "Event name cannot contain control characters".to_string(),
        ));
    }

    Ok(())
}
