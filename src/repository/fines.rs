//! Fines repository

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{postgres::PgRow, Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::fine::{Fine, FineStatus},
};

#[derive(Clone)]
pub struct FinesRepository {
    pool: Pool<Postgres>,
}

pub(crate) fn map_fine(row: &PgRow) -> Fine {
    let status: String = row.get("status");
    Fine {
        id: row.get("id"),
        user_id: row.get("user_id"),
        book_id: row.get("book_id"),
        book_title: row.get("book_title"),
        due_date: row.get("due_date"),
        amount: row.get("amount"),
        days_overdue: row.get("days_overdue"),
        status: FineStatus::from(status.as_str()),
        payment_reference: row.get("payment_reference"),
        created_date: row.get("created_date"),
        last_updated: row.get("last_updated"),
    }
}

impl FinesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get fine by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Fine> {
        let row = sqlx::query("SELECT * FROM fines WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Fine with id {} not found", id)))?;

        Ok(map_fine(&row))
    }

    /// Record a PENDING fine for a late return
    pub async fn create(
        &self,
        user_id: i32,
        book_id: Option<i32>,
        book_title: &str,
        due_date: DateTime<Utc>,
        amount: Decimal,
        days_overdue: i32,
        now: DateTime<Utc>,
    ) -> AppResult<Fine> {
        let row = sqlx::query(
            r#"
            INSERT INTO fines
                (user_id, book_id, book_title, due_date, amount, days_overdue,
                 status, created_date, last_updated)
            VALUES ($1, $2, $3, $4, $5, $6, 'PENDING', $7, $7)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .bind(book_title)
        .bind(due_date)
        .bind(amount)
        .bind(days_overdue)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(map_fine(&row))
    }

    /// Fines for a user, newest first
    pub async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<Fine>> {
        let rows =
            sqlx::query("SELECT * FROM fines WHERE user_id = $1 ORDER BY created_date DESC")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.iter().map(map_fine).collect())
    }

    /// Settle a PENDING fine. A fine that is already PAID is rejected and
    /// left unchanged.
    pub async fn mark_paid(
        &self,
        id: i32,
        reference: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Fine> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query("SELECT * FROM fines WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Fine with id {} not found", id)))?;

        let fine = map_fine(&row);
        if fine.status != FineStatus::Pending {
            return Err(AppError::InvalidState(format!(
                "Fine {} is already paid",
                id
            )));
        }

        let row = sqlx::query(
            r#"
            UPDATE fines
            SET status = 'PAID', payment_reference = $1, last_updated = $2
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(reference)
        .bind(now)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(map_fine(&row))
    }
}
