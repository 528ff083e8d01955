use chrono::NaiveDate;

use crate::{
    error::Result,
    models::event::{Event, NewEvent},
    repositories::store::Store,
    state::AppState,
    validation::event::validate_event_name,
};

/// Creates a new event.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `created_by` - The ID of the admin creating the event.
/// * `name` - The name of the event.
/// * `event_date` - The day of the event.
///
/// # Returns
///
/// A `Result` containing the created `Event`.
pub async fn create_event<S: Store>(
    state: &AppState<S>,
    created_by: i64,
    name: &str,
    event_date: NaiveDate,
) -> Result<Event> {
    let name = name.trim();
    validate_event_name(name)?;

    let event = state
        .store
        .create_event(NewEvent {
            name: name.to_string(),
            event_date,
            created_by,
        })
        .await?;

    tracing::info!("📅 Event {} created by user {}", event.id, created_by);
    Ok(event)
}
