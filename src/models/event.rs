use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Represents an event created by an administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// The unique identifier for the event.
    pub id: i64,
    /// The name of the event.
    pub name: String,
    /// The day the event takes place.
    pub event_date: NaiveDate,
    /// The ID of the user who created the event.
    pub created_by: i64,
    /// The timestamp when the event was created.
    pub created_at: DateTime<Utc>,
}

/// The attributes needed to insert an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub name: String,
    pub event_date: NaiveDate,
    pub created_by: i64,
}
