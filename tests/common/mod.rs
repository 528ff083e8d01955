//! Shared fixtures: a router over `MemoryStore` wired to a mock CAS server.

#![allow(dead_code)]

pub mod mock_cas;

use std::collections::HashMap;
use std::net::SocketAddr;

use axum::{
    Router,
    body::Body,
    extract::ConnectInfo,
    http::{Request, Response, header},
};
use tokio::task::JoinHandle;
use tower::ServiceExt;
use tower_cookies::Cookie;

use photos_portal::{
    config::Config,
    crypto::envelope::SessionCookie,
    models::user::{BusinessCategory, NewUser, User},
    repositories::{
        memory::MemoryStore,
        store::{SessionRepository, UserRepository},
    },
    routes,
    state::AppState,
};

use mock_cas::{MockCasState, start_mock_cas_server};

pub const SERVICE_BASE_URL: &str = "http://portal.test";
pub const SESSION_SECRET: &str =
    "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";
pub const CSRF_SECRET: &str =
    "f0e0d0c0b0a090807060504030201000f1e1d1c1b1a191817161514131211101";

pub struct TestApp {
    pub router: Router,
    pub state: AppState<MemoryStore>,
    pub store: MemoryStore,
    pub cas_base_url: String,
    pub cas: MockCasState,
    _cas_handle: JoinHandle<()>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(&[]).await
    }

    /// Like [`TestApp::spawn`], with extra environment entries.
    pub async fn spawn_with(overrides: &[(&'static str, &str)]) -> Self {
        let (cas_base_url, handle, cas) = start_mock_cas_server().await;

        let mut vars = HashMap::new();
        vars.insert("DATABASE_URL", "postgres://portal@localhost/unused".to_string());
        vars.insert("CAS_BASE_URL", cas_base_url.clone());
        vars.insert("SERVICE_BASE_URL", SERVICE_BASE_URL.to_string());
        vars.insert("SESSION_SECRET", SESSION_SECRET.to_string());
        vars.insert("CSRF_SECRET", CSRF_SECRET.to_string());
        for (key, value) in overrides {
            vars.insert(*key, value.to_string());
        }
        let config = Config::from_lookup(|key| vars.get(key).cloned()).unwrap();

        let store = MemoryStore::new();
        let state = AppState::new(config, store.clone()).unwrap();
        let router = routes::router(state.clone()).unwrap();

        Self {
            router,
            state,
            store,
            cas_base_url,
            cas,
            _cas_handle: handle,
        }
    }

    /// Sends `request` through the router as if from a local client.
    pub async fn send(&self, mut request: Request<Body>) -> Response<Body> {
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 40000))));
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    /// Creates a user with a live session and returns it with its `Cookie` header value.
    pub async fn sign_in(&self, email: &str, admin: bool) -> (User, String) {
        let user = self
            .store
            .upsert_user(NewUser {
                email: email.to_string(),
                full_name: "Test User".to_string(),
                department_number: "ICM 1A".to_string(),
                business_category: BusinessCategory::Student,
            })
            .await
            .unwrap();
        self.store.set_admin(user.id, admin).await.unwrap();

        let token = format!("token-for-{}", user.id);
        self.store.create_session(&token, user.id).await.unwrap();

        (user, self.session_cookie_header(&token))
    }

    /// Seals `token` into a `Cookie` header value.
    pub fn session_cookie_header(&self, token: &str) -> String {
        let sealed = self
            .state
            .session_codec
            .encode(&SessionCookie {
                session_token: token.to_string(),
            })
            .unwrap();
        format!("{}={}", self.state.session_codec.name(), sealed)
    }

    pub fn session_cookie_name(&self) -> &str {
        self.state.session_codec.name()
    }

    pub fn csrf_cookie_name(&self) -> &str {
        self.state.csrf_codec.name()
    }
}

/// Finds the `Set-Cookie` entry for `name`.
pub fn set_cookie(response: &Response<Body>, name: &str) -> Option<Cookie<'static>> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| Cookie::parse(value.to_string()).ok())
        .find(|cookie| cookie.name() == name)
}

pub fn location(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
