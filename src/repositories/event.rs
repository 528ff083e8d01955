use deadpool_postgres::Pool;
use tokio_postgres::Row;

use crate::{
    error::{AppError, Result},
    models::event::{Event, NewEvent},
};

/// A helper function to map a `tokio_postgres::Row` to an `Event`.
fn row_to_event(row: &Row) -> Result<Event> {
    Ok(Event {
        id: row.try_get("id").map_err(|_| AppError::MissingData("id".to_string()))?,
        name: row.try_get("name").map_err(|_| AppError::MissingData("name".to_string()))?,
        event_date: row.try_get("event_date").map_err(|_| AppError::MissingData("event_date".to_string()))?,
        created_by: row.try_get("created_by").map_err(|_| AppError::MissingData("created_by".to_string()))?,
        created_at: row.try_get("created_at").map_err(|_| AppError::MissingData("created_at".to_string()))?,
    })
}

/// Creates a new event in the database.
///
/// # Arguments
///
/// * `pool` - The database connection pool.
/// * `event` - The event to insert.
///
/// # Returns
///
/// A `Result` containing the created `Event`.
pub async fn create_event(pool: &Pool, event: &NewEvent) -> Result<Event> {
    let client = pool.get().await?;
    let row = client
        .query_one(
            r#"
            INSERT INTO events (name, event_date, created_by)
            VALUES ($1, $2, $3)
            RETURNING id, name, event_date, created_by, created_at
            "#,
            &[&event.name, &event.event_date, &event.created_by],
        )
        .await?;
    row_to_event(&row)
}
