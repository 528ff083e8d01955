//! In-process store with the same semantics as `PgStore`.
//!
//! Used by the integration tests and handy for local runs without PostgreSQL.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::{
    error::{AppError, Result},
    models::{
        event::{Event, NewEvent},
        session::Session,
        user::{NewUser, User},
    },
    repositories::store::{EventRepository, SessionRepository, UserRepository},
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    sessions: HashMap<String, Session>,
    events: Vec<Event>,
}

/// A thread-safe, in-memory store.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    /// Creates a new, empty `MemoryStore`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a session with an explicit creation time.
    pub async fn insert_session_at(&self, token: &str, user_id: i64, created_at: DateTime<Utc>) -> Session {
        let session = Session {
            token: token.to_string(),
            user_id,
            created_at,
        };
        self.tables
            .lock()
            .await
            .sessions
            .insert(token.to_string(), session.clone());
        session
    }

    /// Sets the admin flag of a user.
    pub async fn set_admin(&self, user_id: i64, is_admin: bool) -> Result<()> {
        let mut tables = self.tables.lock().await;
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or(AppError::NotFound)?;
        user.is_admin = is_admin;
        Ok(())
    }

    pub async fn users(&self) -> Vec<User> {
        self.tables.lock().await.users.clone()
    }

    pub async fn sessions(&self) -> Vec<Session> {
        self.tables.lock().await.sessions.values().cloned().collect()
    }

    pub async fn events(&self) -> Vec<Event> {
        self.tables.lock().await.events.clone()
    }
}

impl SessionRepository for MemoryStore {
    async fn get_session(&self, token: &str) -> Result<Option<Session>> {
        Ok(self.tables.lock().await.sessions.get(token).cloned())
    }

    async fn create_session(&self, token: &str, user_id: i64) -> Result<Session> {
        let mut tables = self.tables.lock().await;

        if !tables.users.iter().any(|u| u.id == user_id) {
            return Err(AppError::Internal(format!("Unknown user: {}", user_id)));
        }
        if tables.sessions.contains_key(token) {
            return Err(AppError::Internal("Duplicate session token".to_string()));
        }

        let session = Session {
            token: token.to_string(),
            user_id,
            created_at: Utc::now(),
        };
        tables.sessions.insert(token.to_string(), session.clone());
        Ok(session)
    }

    async fn delete_session(&self, token: &str) -> Result<()> {
        self.tables.lock().await.sessions.remove(token);
        Ok(())
    }
}

impl UserRepository for MemoryStore {
    async fn upsert_user(&self, user: NewUser) -> Result<User> {
        let mut tables = self.tables.lock().await;

        if let Some(existing) = tables.users.iter().find(|u| u.email == user.email) {
            return Ok(existing.clone());
        }

        let stored = User {
            id: tables.users.len() as i64 + 1,
            email: user.email,
            full_name: user.full_name,
            department_number: user.department_number,
            business_category: user.business_category,
            is_admin: false,
        };
        tables.users.push(stored.clone());
        Ok(stored)
    }

    async fn user_for_session(&self, token: &str) -> Result<Option<User>> {
        let tables = self.tables.lock().await;
        let user = tables
            .sessions
            .get(token)
            .and_then(|session| tables.users.iter().find(|u| u.id == session.user_id))
            .cloned();
        Ok(user)
    }
}

impl EventRepository for MemoryStore {
    async fn create_event(&self, event: NewEvent) -> Result<Event> {
        let mut tables = self.tables.lock().await;
        let stored = Event {
            id: tables.events.len() as i64 + 1,
            name: event.name,
            event_date: event.event_date,
            created_by: event.created_by,
            created_at: Utc::now(),
        };
        tables.events.push(stored.clone());
        Ok(stored)
    }
}
