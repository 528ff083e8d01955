use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

/// Builds a `302 Found` response pointing at `location`.
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}
