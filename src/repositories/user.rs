use deadpool_postgres::Pool;
use tokio_postgres::Row;

use crate::{
    error::{AppError, Result},
    models::user::{NewUser, User},
};

/// A helper function to map a `tokio_postgres::Row` to a `User`.
fn row_to_user(row: &Row) -> Result<User> {
    Ok(User {
        id: row.try_get("id").map_err(|_| AppError::MissingData("id".to_string()))?,
        email: row.try_get("email").map_err(|_| AppError::MissingData("email".to_string()))?,
        full_name: row.try_get("full_name").map_err(|_| AppError::MissingData("full_name".to_string()))?,
        department_number: row.try_get("department_number").map_err(|_| AppError::MissingData("department_number".to_string()))?,
        business_category: row.try_get("business_category").map_err(|_| AppError::MissingData("business_category".to_string()))?,
        is_admin: row.try_get("is_admin").map_err(|_| AppError::MissingData("is_admin".to_string()))?,
    })
}

/// Inserts a user, or matches the existing one with the same email.
///
/// Runs in a single transaction; the `UNIQUE (email)` constraint makes
/// concurrent logins of the same identity converge on one row. An existing
/// row is returned as stored.
///
/// # Arguments
///
/// * `pool` - The database connection pool.
/// * `user` - The identity attributes asserted by the provider.
///
/// # Returns
///
/// A `Result` containing the stored `User`.
pub async fn upsert_user(pool: &Pool, user: &NewUser) -> Result<User> {
    let mut client = pool.get().await?;
    let transaction = client.transaction().await?;

    let row = transaction
        .query_one(
            r#"
            INSERT INTO users (email, full_name, department_number, business_category)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (email) DO UPDATE SET email = EXCLUDED.email
            RETURNING id, email, full_name, department_number, business_category, is_admin
            "#,
            &[
                &user.email,
                &user.full_name,
                &user.department_number,
                &user.business_category,
            ],
        )
        .await?;
    let stored = row_to_user(&row)?;

    transaction.commit().await?;

    tracing::debug!("👤 User upserted: {}", stored.id);
    Ok(stored)
}

/// Finds the user owning a session token.
pub async fn find_by_session_token(pool: &Pool, token: &str) -> Result<Option<User>> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            SELECT u.id, u.email, u.full_name, u.department_number, u.business_category, u.is_admin
            FROM users u
            JOIN sessions s ON s.user_id = u.id
            WHERE s.session_token = $1
            "#,
            &[&token],
        )
        .await?;
    row.map(|r| row_to_user(&r)).transpose()
}
