use deadpool_postgres::Pool;
use tokio_postgres::Row;

use crate::{
    error::{AppError, Result},
    models::session::Session,
};

/// A helper function to map a `tokio_postgres::Row` to a `Session`.
fn row_to_session(row: &Row) -> Result<Session> {
    Ok(Session {
        token: row.try_get("session_token").map_err(|_| AppError::MissingData("session_token".to_string()))?,
        user_id: row.try_get("user_id").map_err(|_| AppError::MissingData("user_id".to_string()))?,
        created_at: row.try_get("creation_date").map_err(|_| AppError::MissingData("creation_date".to_string()))?,
    })
}

/// Finds a session by its token.
pub async fn find_by_token(pool: &Pool, token: &str) -> Result<Option<Session>> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            SELECT session_token, user_id, creation_date
            FROM sessions
            WHERE session_token = $1
            "#,
            &[&token],
        )
        .await?;
    row.map(|r| row_to_session(&r)).transpose()
}

/// Creates a new session for a user, timestamped by the database.
pub async fn create_session(pool: &Pool, token: &str, user_id: i64) -> Result<Session> {
    let client = pool.get().await?;
    let row = client
        .query_one(
            r#"
            INSERT INTO sessions (session_token, user_id)
            VALUES ($1, $2)
            RETURNING session_token, user_id, creation_date
            "#,
            &[&token, &user_id],
        )
        .await?;
    row_to_session(&row)
}

/// Deletes a session by its token.
pub async fn delete_by_token(pool: &Pool, token: &str) -> Result<()> {
    let client = pool.get().await?;
    client
        .execute(
            r#"
            DELETE FROM sessions
            WHERE session_token = $1
            "#,
            &[&token],
        )
        .await?;
    Ok(())
}
