//! Storage seams used by the orchestrator, middleware and handlers.
//!
//! Every method is a single atomic operation from the caller's point of view.
//! `PgStore` backs them with PostgreSQL; `MemoryStore` keeps them in process.

use std::future::Future;

use deadpool_postgres::Pool;

use crate::{
    error::Result,
    models::{
        event::{Event, NewEvent},
        session::Session,
        user::{NewUser, User},
    },
    repositories::{event as event_repo, session as session_repo, user as user_repo},
};

/// Persistence of (session token → user, creation time).
pub trait SessionRepository: Send + Sync {
    /// Looks up a session by token.
    fn get_session(&self, token: &str) -> impl Future<Output = Result<Option<Session>>> + Send;

    /// Persists a new session created now.
    fn create_session(
        &self,
        token: &str,
        user_id: i64,
    ) -> impl Future<Output = Result<Session>> + Send;

    /// Deletes a session. Deleting an unknown token is not an error.
    fn delete_session(&self, token: &str) -> impl Future<Output = Result<()>> + Send;
}

/// Persistence of users.
pub trait UserRepository: Send + Sync {
    /// Inserts the user, or returns the existing row with the same email.
    fn upsert_user(&self, user: NewUser) -> impl Future<Output = Result<User>> + Send;

    /// Finds the user owning a session token.
    fn user_for_session(&self, token: &str) -> impl Future<Output = Result<Option<User>>> + Send;
}

/// Persistence of events.
pub trait EventRepository: Send + Sync {
    fn create_event(&self, event: NewEvent) -> impl Future<Output = Result<Event>> + Send;
}

/// Everything the application needs from storage.
pub trait Store: SessionRepository + UserRepository + EventRepository + Clone + 'static {}

impl<T> Store for T where T: SessionRepository + UserRepository + EventRepository + Clone + 'static {}

/// PostgreSQL-backed store.
#[derive(Clone)]
pub struct PgStore {
    pool: Pool,
}

impl PgStore {
    /// Creates a new `PgStore` over a connection pool.
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

impl SessionRepository for PgStore {
    async fn get_session(&self, token: &str) -> Result<Option<Session>> {
        session_repo::find_by_token(&self.pool, token).await
    }

    async fn create_session(&self, token: &str, user_id: i64) -> Result<Session> {
        session_repo::create_session(&self.pool, token, user_id).await
    }

    async fn delete_session(&self, token: &str) -> Result<()> {
        session_repo::delete_by_token(&self.pool, token).await
    }
}

impl UserRepository for PgStore {
    async fn upsert_user(&self, user: NewUser) -> Result<User> {
        user_repo::upsert_user(&self.pool, &user).await
    }

    async fn user_for_session(&self, token: &str) -> Result<Option<User>> {
        user_repo::find_by_session_token(&self.pool, token).await
    }
}

impl EventRepository for PgStore {
    async fn create_event(&self, event: NewEvent) -> Result<Event> {
        event_repo::create_event(&self.pool, &event).await
    }
}
