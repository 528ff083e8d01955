use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_cookies::Cookies;

use crate::{
    cookies::removal_cookie,
    error::AppError,
    handlers::redirect::found,
    models::session::AuthenticatedSession,
    repositories::store::Store,
    services::auth::{self as auth_service, SessionStatus},
    state::AppState,
};

/// A middleware that requires a valid session to be present.
///
/// On success the request carries an [`AuthenticatedSession`] extension. On
/// any failure the session cookie is cleared and the client is sent to the
/// landing page.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `cookies` - The request cookies.
/// * `request` - The incoming request.
/// * `next` - The next middleware in the chain.
///
/// # Returns
///
/// A `Response`.
pub async fn require_auth<S: Store>(
    State(state): State<AppState<S>>,
    cookies: Cookies,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    tracing::debug!("🔐 Checking authentication...");

    match auth_service::check_session(&state, &cookies).await {
        SessionStatus::Active(session) => {
            tracing::debug!("✅ User authenticated: {}", session.user_id);
            request
                .extensions_mut()
                .insert(AuthenticatedSession::from(&session));
            next.run(request).await
        }
        SessionStatus::Absent(reason) => {
            tracing::debug!("❌ No valid session ({:?}), redirecting to landing", reason);
            cookies.add(removal_cookie(state.session_codec.name()));
            found(&state.config.routes.landing)
        }
    }
}

/// A middleware that requires the authenticated user to be an admin.
///
/// Must run after [`require_auth`]. Without an attached session it fails
/// closed with 401. It never redirects.
pub async fn require_admin<S: Store>(
    State(state): State<AppState<S>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let Some(session) = request.extensions().get::<AuthenticatedSession>().cloned() else {
        tracing::warn!("❌ Admin check without an authenticated session");
        return AppError::NotAdmin.into_response();
    };

    match state.store.user_for_session(&session.token).await {
        Ok(Some(user)) if user.is_admin => {
            tracing::debug!("✅ Admin access granted: {}", user.id);
            next.run(request).await
        }
        Ok(_) => {
            tracing::warn!("❌ User {} is not an admin", session.user_id);
            AppError::NotAdmin.into_response()
        }
        Err(e) => e.into_response(),
    }
}
