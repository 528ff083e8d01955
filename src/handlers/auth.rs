use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Extension,
};
use serde::Deserialize;
use tower_cookies::Cookies;

use crate::{
    cookies::removal_cookie,
    error::Result,
    handlers::redirect::found,
    models::session::AuthenticatedSession,
    repositories::store::Store,
    services::auth::{self as auth_service, SessionStatus},
    state::AppState,
};

/// The query string the identity provider appends to the callback.
#[derive(Deserialize, Debug)]
pub struct CallbackParams {
    pub ticket: Option<String>,
}

/// Starts a login.
///
/// A request that already carries a valid session goes straight to the
/// dashboard; anything else is sent to the identity provider.
pub async fn login<S: Store>(State(state): State<AppState<S>>, cookies: Cookies) -> Response {
    match auth_service::check_session(&state, &cookies).await {
        SessionStatus::Active(session) => {
            tracing::debug!("🔁 User {} already signed in", session.user_id);
            found(&state.config.routes.dashboard)
        }
        SessionStatus::Absent(_) => {
            tracing::debug!("➡️ Redirecting to CAS login");
            found(&state.cas_login_url)
        }
    }
}

/// Handles the identity provider's callback.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `cookies` - The response cookie jar.
/// * `params` - The callback query, carrying the service ticket.
///
/// # Returns
///
/// A redirect to the dashboard carrying the new session cookie.
pub async fn cas_callback<S: Store>(
    State(state): State<AppState<S>>,
    cookies: Cookies,
    Query(params): Query<CallbackParams>,
) -> Result<Response> {
    let ticket = params.ticket.unwrap_or_default();
    let issued = auth_service::complete_login(&state, &ticket).await?;

    tracing::info!("✅ User logged in: {}", issued.user.id);
    cookies.add(issued.cookie);

    Ok(found(&state.config.routes.dashboard))
}

/// Logs the current user out.
///
/// The cookie is cleared even when deleting the session row fails.
pub async fn logout<S: Store>(
    State(state): State<AppState<S>>,
    cookies: Cookies,
    Extension(session): Extension<AuthenticatedSession>,
) -> impl IntoResponse {
    match state.store.delete_session(&session.token).await {
        Ok(()) => tracing::info!("👋 User {} logged out", session.user_id),
        Err(e) => tracing::error!("❌ Failed to delete session for user {}: {}", session.user_id, e),
    }

    cookies.add(removal_cookie(state.session_codec.name()));
    found(&state.config.routes.landing)
}
