//! Recipe owners.

use crate::error::DatabaseError;
use crate::types::UserId;
use crate::{Error, Result};

use super::{Database, NewUser, User};

impl Database {
    /// Insert a user, returning its id
    pub async fn insert_user(&self, user: &NewUser) -> Result<UserId> {
        let now = chrono::Utc::now().timestamp();

        let result = sqlx::query(
            "INSERT INTO users (email, display_name, created_at) VALUES (?, ?, ?)",
        )
        .bind(&user.email)
        .bind(&user.display_name)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => Error::Database(
                DatabaseError::ConstraintViolation(format!("email {} already in use", user.email)),
            ),
            e => Error::Database(DatabaseError::QueryFailed(format!(
                "Failed to insert user: {}",
                e
            ))),
        })?;

        Ok(UserId(result.last_insert_rowid()))
    }

    /// Get a user by id
    pub async fn get_user(&self, id: UserId) -> Result<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT id, email, display_name, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            Error::Database(DatabaseError::QueryFailed(format!(
                "Failed to get user: {}",
                e
            )))
        })
    }

    /// Get a user by email
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT id, email, display_name, created_at FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            Error::Database(DatabaseError::QueryFailed(format!(
                "Failed to get user by email: {}",
                e
            )))
        })
    }
}
