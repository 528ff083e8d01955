use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use http::HeaderName;
use tower_cookies::cookie::SameSite;

use crate::crypto::secret::SecretKey;

/// Upper bound for cookie and session lifetimes (ten years).
pub const MAX_TOKEN_AGE_SECS: i64 = 10 * 365 * 24 * 60 * 60;

/// The application's configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub database: DatabaseSettings,
    pub server: ServerSettings,
    pub cas: CasSettings,
    pub session: SessionSettings,
    pub csrf: CsrfSettings,
    pub routes: Routes,
}

/// PostgreSQL connection settings.
#[derive(Clone, Debug)]
pub struct DatabaseSettings {
    /// The URL of the PostgreSQL database.
    pub url: String,
    /// The maximum number of pooled connections.
    pub max_connections: usize,
}

/// HTTP server settings.
#[derive(Clone, Debug)]
pub struct ServerSettings {
    pub addr: SocketAddr,
    /// Deadline applied to every request.
    pub request_timeout: Duration,
    pub max_body_bytes: usize,
    /// Directory served under the assets route.
    pub assets_dir: PathBuf,
}

/// Identity provider settings.
#[derive(Clone, Debug)]
pub struct CasSettings {
    /// Base URL of the CAS server, e.g. `https://cas.example.org/cas`.
    pub base_url: String,
    /// Public base URL of this service, used to build the callback URL.
    pub service_base_url: String,
    /// Timeout of the outbound ticket-validation call.
    pub http_timeout: Duration,
}

/// Cookie settings shared by the session and CSRF tokens.
#[derive(Clone, Debug)]
pub struct TokenSettings {
    pub secret: SecretKey,
    pub cookie_name: String,
    pub max_age_secs: i64,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
}

/// Session cookie settings.
#[derive(Clone, Debug)]
pub struct SessionSettings {
    pub token: TokenSettings,
}

/// CSRF cookie settings.
#[derive(Clone, Debug)]
pub struct CsrfSettings {
    pub token: TokenSettings,
    /// Header that must echo the CSRF token on unsafe requests.
    pub header_name: HeaderName,
}

/// The application's route paths.
#[derive(Clone, Debug)]
pub struct Routes {
    pub landing: String,
    pub favicon: String,
    pub login: String,
    pub cas_callback: String,
    pub dashboard: String,
    pub logout: String,
    pub events: String,
    pub assets: String,
}

impl Default for Routes {
    fn default() -> Self {
        Self {
            landing: "/".to_string(),
            favicon: "/favicon.ico".to_string(),
            login: "/login".to_string(),
            cas_callback: "/cas".to_string(),
            dashboard: "/dashboard".to_string(),
            logout: "/logout".to_string(),
            events: "/events".to_string(),
            assets: "/assets".to_string(),
        }
    }
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Creates a new `Config` from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database = DatabaseSettings {
            url: lookup("DATABASE_URL").context("DATABASE_URL must be set")?,
            max_connections: parse_or(&lookup, "DB_POOL_MAX_SIZE", 16)?,
        };

        let server = ServerSettings {
            addr: parse_or(&lookup, "SERVER_ADDR", SocketAddr::from(([127, 0, 0, 1], 8080)))?,
            request_timeout: Duration::from_secs(parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 12)?),
            max_body_bytes: parse_or(&lookup, "MAX_BODY_BYTES", 4096)?,
            assets_dir: PathBuf::from(lookup("ASSETS_DIR").unwrap_or_else(|| "assets".to_string())),
        };

        let cas = CasSettings {
            base_url: lookup("CAS_BASE_URL")
                .unwrap_or_else(|| "http://127.0.0.1:3000/cas".to_string())
                .trim_end_matches('/')
                .to_string(),
            service_base_url: lookup("SERVICE_BASE_URL")
                .unwrap_or_else(|| "http://127.0.0.1:8080".to_string())
                .trim_end_matches('/')
                .to_string(),
            http_timeout: Duration::from_secs(parse_or(&lookup, "CAS_HTTP_TIMEOUT_SECS", 6)?),
        };

        let session = SessionSettings {
            token: TokenSettings {
                secret: secret_or_generate(&lookup, "SESSION_SECRET")?,
                cookie_name: lookup("SESSION_COOKIE_NAME")
                    .unwrap_or_else(|| "session_token".to_string()),
                max_age_secs: parse_or(&lookup, "SESSION_MAX_AGE_SECS", 3600)?,
                secure: parse_or(&lookup, "SESSION_COOKIE_SECURE", true)?,
                http_only: true,
                same_site: SameSite::Strict,
            },
        };

        let header_name = lookup("CSRF_HEADER_NAME").unwrap_or_else(|| "X-CSRF-TOKEN".to_string());
        let csrf = CsrfSettings {
            token: TokenSettings {
                secret: secret_or_generate(&lookup, "CSRF_SECRET")?,
                cookie_name: lookup("CSRF_COOKIE_NAME").unwrap_or_else(|| "csrf_token".to_string()),
                max_age_secs: parse_or(&lookup, "CSRF_MAX_AGE_SECS", 600)?,
                secure: parse_or(&lookup, "CSRF_COOKIE_SECURE", true)?,
                http_only: true,
                same_site: SameSite::Strict,
            },
            header_name: HeaderName::from_str(&header_name)
                .with_context(|| format!("Invalid CSRF_HEADER_NAME: {}", header_name))?,
        };

        if session.token.cookie_name == csrf.token.cookie_name {
            anyhow::bail!("SESSION_COOKIE_NAME and CSRF_COOKIE_NAME must differ");
        }
        for (key, secs) in [
            ("SESSION_MAX_AGE_SECS", session.token.max_age_secs),
            ("CSRF_MAX_AGE_SECS", csrf.token.max_age_secs),
        ] {
            if !(1..=MAX_TOKEN_AGE_SECS).contains(&secs) {
                anyhow::bail!("{} must be between 1 and {}", key, MAX_TOKEN_AGE_SECS);
            }
        }

        Ok(Self {
            database,
            server,
            cas,
            session,
            csrf,
            routes: Routes::default(),
        })
    }

    /// The URL the identity provider redirects back to, and the `service`
    /// value sent on ticket validation.
    pub fn cas_callback_url(&self) -> String {
        format!("{}{}", self.cas.service_base_url, self.routes.cas_callback)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid {}", key)),
        None => Ok(default),
    }
}

fn secret_or_generate<F>(lookup: &F, key: &str) -> Result<SecretKey>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => SecretKey::from_hex(&raw)
            .with_context(|| format!("{} must be 32 bytes of hex (generate with: openssl rand -hex 32)", key)),
        None => {
            tracing::warn!("⚠️ {} not set, using a random secret (cookies won't survive a restart)", key);
            Ok(SecretKey::generate())
        }
    }
}
