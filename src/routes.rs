use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
};
use tower_cookies::CookieManagerLayer;
use tower_http::{
    compression::CompressionLayer,
    limit::RequestBodyLimitLayer,
    services::{ServeDir, ServeFile},
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::{
    error::Result,
    handlers,
    middleware_layer::{
        self,
        rate_limit::{limit_all_requests, limit_login_attempts},
    },
    repositories::store::Store,
    state::AppState,
};

/// Builds the application router.
///
/// # Arguments
///
/// * `state` - The application state.
///
/// # Returns
///
/// A `Result` containing the `Router`, ready to be served.
pub fn router<S: Store>(state: AppState<S>) -> Result<Router> {
    let routes = state.config.routes.clone();
    let server = state.config.server.clone();

    let login_routes = limit_login_attempts(
        Router::new()
            .route(&routes.login, get(handlers::auth::login::<S>))
            .route(&routes.cas_callback, get(handlers::auth::cas_callback::<S>)),
    )?;

    let protected_routes = Router::new()
        .route(&routes.dashboard, get(handlers::pages::dashboard::<S>))
        .route(&routes.logout, get(handlers::auth::logout::<S>))
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::auth::require_auth::<S>,
        ));

    let admin_routes = Router::new()
        .route(&routes.events, post(handlers::events::create_event::<S>))
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::auth::require_admin::<S>,
        ))
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::auth::require_auth::<S>,
        ));

    let app = Router::new()
        .route(&routes.landing, get(handlers::pages::landing::<S>))
        .route_service(
            &routes.favicon,
            ServeFile::new(server.assets_dir.join("favicon.ico")),
        )
        .merge(login_routes)
        .merge(protected_routes)
        .merge(admin_routes)
        .nest_service(&routes.assets, ServeDir::new(&server.assets_dir))
        .fallback(handlers::pages::not_found)
        .layer(from_fn_with_state(
            state.clone(),
            middleware_layer::csrf::verify_csrf::<S>,
        ))
        .layer(from_fn(middleware_layer::paths::redirect_slashes))
        .with_state(state);

    let app = limit_all_requests(app)?
        .layer(CookieManagerLayer::new())
        .layer(RequestBodyLimitLayer::new(server.max_body_bytes))
        .layer(TimeoutLayer::new(server.request_timeout))
        .layer(CompressionLayer::new())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(false))
                .on_request(DefaultOnRequest::default().level(Level::DEBUG))
                .on_response(DefaultOnResponse::default().level(Level::DEBUG))
                .on_failure(DefaultOnFailure::default().level(Level::ERROR)),
        );

    Ok(app)
}
