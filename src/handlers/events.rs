use axum::{
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    Extension, Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::{
    error::{AppError, Result},
    models::session::AuthenticatedSession,
    repositories::store::Store,
    services::events as event_service,
    state::AppState,
};

/// The request payload for event creation.
#[derive(Deserialize, Debug)]
pub struct CreateEventRequest {
    pub name: String,
    /// `YYYY-MM-DD`.
    pub event_date: NaiveDate,
}

/// Handles event creation.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `session` - The admin's session.
/// * `payload` - The request payload.
///
/// # Returns
///
/// A `201 Created` response carrying the stored event.
pub async fn create_event<S: Store>(
    State(state): State<AppState<S>>,
    Extension(session): Extension<AuthenticatedSession>,
    Json(payload): Json<CreateEventRequest>,
) -> Result<Response> {
    let event =
        event_service::create_event(&state, session.user_id, &payload.name, payload.event_date)
            .await?;

    let body = sonic_rs::to_string(&event)
        .map_err(|e| AppError::Internal(format!("Failed to serialize event: {}", e)))?;

    Ok((
        StatusCode::CREATED,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response())
}
