use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
};

use crate::{repositories::store::Store, state::AppState};

/// Serves the landing page.
pub async fn landing<S: Store>(State(state): State<AppState<S>>) -> Html<String> {
    Html(format!(
        concat!(
            "<!doctype html>\n",
            "<html><head><meta charset=\"utf-8\"><title>Photos</title></head>\n",
            "<body><h1>Photos</h1><p><a href=\"{login}\">Sign in</a></p></body></html>\n",
        ),
        login = state.config.routes.login,
    ))
}

/// Serves the dashboard. Only reachable behind `require_auth`.
pub async fn dashboard<S: Store>(State(state): State<AppState<S>>) -> Html<String> {
    Html(format!(
        concat!(
            "<!doctype html>\n",
            "<html><head><meta charset=\"utf-8\"><title>Dashboard</title></head>\n",
            "<body><h1>Dashboard</h1><p><a href=\"{logout}\">Sign out</a></p></body></html>\n",
        ),
        logout = state.config.routes.logout,
    ))
}

/// Fallback for unknown routes.
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Html("<!doctype html>\n<html><body><h1>404</h1><p>Page not found</p></body></html>\n"),
    )
}
