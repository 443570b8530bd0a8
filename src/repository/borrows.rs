//! Borrows repository for physical book checkouts.
//!
//! Borrows are normalized rows indexed on (user_id, returned_date), so
//! per-user and overdue lookups are single queries.

use chrono::{DateTime, Duration, Utc};
use sqlx::{postgres::PgRow, Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::borrow::Borrow,
};

#[derive(Clone)]
pub struct BorrowsRepository {
    pool: Pool<Postgres>,
}

pub(crate) fn map_borrow(row: &PgRow) -> Borrow {
    Borrow {
        id: row.get("id"),
        user_id: row.get("user_id"),
        book_id: row.get("book_id"),
        book_title: row.get("book_title"),
        start_date: row.get("start_date"),
        due_date: row.get("due_date"),
        nb_extensions: row.get("nb_extensions"),
        returned_date: row.get("returned_date"),
    }
}

impl BorrowsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get borrow by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Borrow> {
        let row = sqlx::query("SELECT * FROM borrows WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Borrow with id {} not found", id)))?;

        Ok(map_borrow(&row))
    }

    /// Create a borrow with the given loan window. Availability is checked
    /// against the book quantity inside the same transaction.
    pub async fn create(
        &self,
        user_id: i32,
        book_id: i32,
        now: DateTime<Utc>,
        loan_days: i64,
    ) -> AppResult<Borrow> {
        let mut tx = self.pool.begin().await?;

        let book_row = sqlx::query("SELECT title, quantity FROM books WHERE id = $1 FOR UPDATE")
            .bind(book_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", book_id)))?;

        let title: String = book_row.get("title");
        let quantity: i32 = book_row.get("quantity");

        let out: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM borrows WHERE book_id = $1 AND returned_date IS NULL",
        )
        .bind(book_id)
        .fetch_one(&mut *tx)
        .await?;

        if out >= quantity as i64 {
            return Err(AppError::Conflict(format!(
                "No copies of \"{}\" available",
                title
            )));
        }

        let due_date = now + Duration::days(loan_days);

        let row = sqlx::query(
            r#"
            INSERT INTO borrows (user_id, book_id, book_title, start_date, due_date, nb_extensions)
            VALUES ($1, $2, $3, $4, $5, 0)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .bind(&title)
        .bind(now)
        .bind(due_date)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(map_borrow(&row))
    }

    /// Stamp the return date on an open borrow. The open check and the
    /// update share one transaction under a row lock, so a borrow is
    /// returned at most once even under concurrent requests.
    pub async fn mark_returned(&self, id: i32, now: DateTime<Utc>) -> AppResult<Borrow> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query("SELECT * FROM borrows WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Borrow with id {} not found", id)))?;

        if map_borrow(&row).returned_date.is_some() {
            return Err(AppError::InvalidState(format!(
                "Borrow {} is already returned",
                id
            )));
        }

        let row = sqlx::query("UPDATE borrows SET returned_date = $1 WHERE id = $2 RETURNING *")
            .bind(now)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(map_borrow(&row))
    }

    /// Push the due date out by `days` and count the extension
    pub async fn extend(&self, id: i32, days: i64) -> AppResult<Borrow> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query("SELECT * FROM borrows WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Borrow with id {} not found", id)))?;

        if map_borrow(&row).returned_date.is_some() {
            return Err(AppError::InvalidState(format!(
                "Cannot extend returned borrow {}",
                id
            )));
        }

        let row = sqlx::query(
            r#"
            UPDATE borrows
            SET due_date = due_date + make_interval(days => $1::int),
                nb_extensions = nb_extensions + 1
            WHERE id = $2
            RETURNING *
            "#,
        )
        .bind(days as i32)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(map_borrow(&row))
    }

    /// Open borrows for a user
    pub async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<Borrow>> {
        let rows = sqlx::query(
            "SELECT * FROM borrows WHERE user_id = $1 AND returned_date IS NULL ORDER BY due_date",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_borrow).collect())
    }

    /// All open borrows past their due date
    pub async fn list_overdue(&self, now: DateTime<Utc>) -> AppResult<Vec<Borrow>> {
        let rows = sqlx::query(
            "SELECT * FROM borrows WHERE returned_date IS NULL AND due_date < $1 ORDER BY due_date",
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_borrow).collect())
    }
}
