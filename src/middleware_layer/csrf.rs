use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderValue, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;
use tower_cookies::Cookies;

use crate::{
    cookies::token_cookie,
    crypto::{envelope::CsrfCookie, token::generate_csrf_token},
    error::AppError,
    repositories::store::Store,
    state::AppState,
};

fn is_safe(method: &Method) -> bool {
    method == Method::GET || method == Method::HEAD || method == Method::OPTIONS
}

/// A middleware that verifies the CSRF token.
///
/// Safe requests get a sealed CSRF cookie (minted if missing) and the raw
/// token in the configured response header. Unsafe requests must echo that
/// token in the same header.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `cookies` - The request cookies.
/// * `req` - The incoming request.
/// * `next` - The next middleware in the chain.
///
/// # Returns
///
/// A `Response`.
pub async fn verify_csrf<S: Store>(
    State(state): State<AppState<S>>,
    cookies: Cookies,
    req: Request<Body>,
    next: Next,
) -> Response {
    let settings = &state.config.csrf;

    let current = cookies
        .get(&settings.token.cookie_name)
        .and_then(|c| state.csrf_codec.decode::<CsrfCookie>(c.value()).ok())
        .map(|payload| payload.csrf_token)
        .filter(|token| !token.is_empty());

    if is_safe(req.method()) {
        let token = match current {
            Some(token) => token,
            None => {
                let token = generate_csrf_token();
                let sealed = match state.csrf_codec.encode(&CsrfCookie {
                    csrf_token: token.clone(),
                }) {
                    Ok(sealed) => sealed,
                    Err(e) => return e.into_response(),
                };
                cookies.add(token_cookie(&settings.token, sealed));
                tracing::debug!("🔐 Issued new CSRF cookie");
                token
            }
        };

        let mut response = next.run(req).await;
        if let Ok(value) = HeaderValue::from_str(&token) {
            response
                .headers_mut()
                .insert(settings.header_name.clone(), value);
        }
        return response;
    }

    let Some(expected) = current else {
        tracing::warn!("❌ CSRF: cookie missing or invalid");
        return AppError::Csrf("Missing CSRF token cookie".to_string()).into_response();
    };

    let provided = match req.headers().get(&settings.header_name) {
        Some(value) => match value.to_str() {
            Ok(v) => v.to_string(),
            Err(_) => {
                tracing::warn!("❌ CSRF: header has an invalid format");
                return AppError::Csrf("Invalid CSRF token format".to_string()).into_response();
            }
        },
        None => {
            tracing::warn!("❌ CSRF: header {} missing", settings.header_name);
            return AppError::Csrf("Missing CSRF token header".to_string()).into_response();
        }
    };

    if !bool::from(provided.as_bytes().ct_eq(expected.as_bytes())) {
        tracing::warn!("❌ CSRF: tokens do not match");
        return AppError::Csrf("CSRF token mismatch".to_string()).into_response();
    }

    tracing::debug!("✅ CSRF token valid");
    next.run(req).await
}
