use std::sync::Arc;

use crate::config::Config;
use crate::crypto::envelope::CookieCodec;
use crate::error::Result;
use crate::repositories::store::Store;
use crate::services::cas::CasClient;

/// The application's state.
#[derive(Clone)]
pub struct AppState<S> {
    /// Sessions, users and events.
    pub store: S,
    /// The application's configuration.
    pub config: Arc<Config>,
    /// The identity provider client.
    pub cas: CasClient,
    /// Seals the session cookie.
    pub session_codec: CookieCodec,
    /// Seals the CSRF cookie.
    pub csrf_codec: CookieCodec,
    /// `{cas}/login?service={callback}`, computed once.
    pub cas_login_url: Arc<str>,
}

impl<S: Store> AppState<S> {
    /// Creates a new `AppState`.
    ///
    /// # Arguments
    ///
    /// * `config` - The application's configuration.
    /// * `store` - The storage backend.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `AppState`.
    pub fn new(config: Config, store: S) -> Result<Self> {
        let cas = CasClient::new(&config.cas.base_url, config.cas.http_timeout)?;
        tracing::info!("✅ CAS client initialized for {}", config.cas.base_url);

        let session_codec = CookieCodec::new(
            &config.session.token.cookie_name,
            config.session.token.secret.clone(),
        );
        let csrf_codec = CookieCodec::new(
            &config.csrf.token.cookie_name,
            config.csrf.token.secret.clone(),
        );

        let cas_login_url = Arc::from(cas.login_url(&config.cas_callback_url()));

        Ok(AppState {
            store,
            config: Arc::new(config),
            cas,
            session_codec,
            csrf_codec,
            cas_login_url,
        })
    }
}
