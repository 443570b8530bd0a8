//! Users repository.
//!
//! Registration and profile management are out of scope; users are fetched
//! to verify ownership and resolve notification contacts.

use sqlx::{postgres::PgRow, Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::User,
};

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

pub(crate) fn map_user(row: &PgRow) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        phone: row.get("phone"),
        is_librarian: row.get("is_librarian"),
    }
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        let row = sqlx::query("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))?;

        Ok(map_user(&row))
    }
}
