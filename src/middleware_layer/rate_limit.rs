use std::sync::Arc;

use axum::Router;
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder};

use crate::error::{AppError, Result};

/// Seconds after which one login attempt is replenished.
pub const LOGIN_REPLENISH_SECS: u64 = 6;

/// Attempts a single client IP may make in a burst.
pub const LOGIN_BURST: u32 = 10;

/// Seconds after which one request of the global budget is replenished.
pub const GLOBAL_REPLENISH_SECS: u64 = 1;

/// Requests a single client IP may make in a burst, on any route.
pub const GLOBAL_BURST: u32 = 60;

/// Limits every route of `router` per client IP.
///
/// The key is the peer address, so the server must be started with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
fn per_ip_limit<S>(router: Router<S>, replenish_secs: u64, burst: u32) -> Result<Router<S>>
where
    S: Clone + Send + Sync + 'static,
{
    let conf = GovernorConfigBuilder::default()
        .per_second(replenish_secs)
        .burst_size(burst)
        .use_headers()
        .finish()
        .ok_or_else(|| AppError::Internal("Invalid rate limit configuration".to_string()))?;

    Ok(router.layer(GovernorLayer::new(Arc::new(conf))))
}

/// Limits the login and callback routes.
///
/// # Arguments
///
/// * `router` - The login and callback routes.
///
/// # Returns
///
/// A `Result` containing the limited router.
pub fn limit_login_attempts<S>(router: Router<S>) -> Result<Router<S>>
where
    S: Clone + Send + Sync + 'static,
{
    tracing::info!(
        "🚦 Login rate limit: burst {}, one attempt every {}s",
        LOGIN_BURST,
        LOGIN_REPLENISH_SECS
    );
    per_ip_limit(router, LOGIN_REPLENISH_SECS, LOGIN_BURST)
}

/// Applies the looser limit shared by all routes.
pub fn limit_all_requests<S>(router: Router<S>) -> Result<Router<S>>
where
    S: Clone + Send + Sync + 'static,
{
    tracing::info!(
        "🚦 Global rate limit: burst {}, one request every {}s",
        GLOBAL_BURST,
        GLOBAL_REPLENISH_SECS
    );
    per_ip_limit(router, GLOBAL_REPLENISH_SECS, GLOBAL_BURST)
}
