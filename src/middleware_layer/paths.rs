use axum::{
    extract::Request,
    http::{Method, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Collapses repeated slashes and drops trailing ones. `/` stays `/`.
pub fn clean_path(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    format!("/{}", segments.join("/"))
}

/// Redirects requests whose path is not in clean form to the cleaned path.
///
/// `GET` and `HEAD` get `301`; other methods get `308` so the body is resent.
pub async fn redirect_slashes(req: Request, next: Next) -> Response {
    let path = req.uri().path();
    let cleaned = clean_path(path);
    if cleaned == path {
        return next.run(req).await;
    }

    let location = match req.uri().query() {
        Some(query) => format!("{}?{}", cleaned, query),
        None => cleaned,
    };
    let status = if req.method() == Method::GET || req.method() == Method::HEAD {
        StatusCode::MOVED_PERMANENTLY
    } else {
        StatusCode::PERMANENT_REDIRECT
    };

    tracing::debug!("↪️ Redirecting {} to {}", path, location);
    (status, [(header::LOCATION, location)]).into_response()
}
