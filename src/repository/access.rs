//! Access records repository.
//!
//! Creation paths run inside a single transaction covering the
//! check-existing / insert-record / insert-payment sequence, so two
//! concurrent requests for the same (user, item, access type) cannot both
//! create a record.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{postgres::PgRow, Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::{
        access::{AccessRecord, AccessStatus, AccessType},
        payment::PaymentRequest,
    },
};

use super::payments::map_payment;

/// Outcome of a creation attempt: the race loser gets the winner's record
pub enum AccessCreation {
    Existing(AccessRecord),
    Created(AccessRecord),
}

/// Paid-path creation outcome
pub enum PaidAccessCreation {
    Existing(AccessRecord),
    Created {
        access: AccessRecord,
        payment: PaymentRequest,
    },
}

#[derive(Clone)]
pub struct AccessRepository {
    pool: Pool<Postgres>,
}

pub(crate) fn map_access(row: &PgRow) -> AccessRecord {
    let access_type: String = row.get("access_type");
    let status: String = row.get("status");
    AccessRecord {
        id: row.get("id"),
        user_id: row.get("user_id"),
        item_id: row.get("item_id"),
        access_type: match access_type.as_str() {
            "DOWNLOAD" => AccessType::Download,
            _ => AccessType::OnlineReading,
        },
        status: AccessStatus::from(status.as_str()),
        payment_amount: row.get("payment_amount"),
        access_start_date: row.get("access_start_date"),
        access_end_date: row.get("access_end_date"),
        payment_reference: row.get("payment_reference"),
        created_date: row.get("created_date"),
    }
}

const FIND_ACTIVE_SQL: &str = r#"
    SELECT * FROM access_records
    WHERE user_id = $1 AND item_id = $2 AND access_type = $3
      AND status = 'ACTIVE' AND access_end_date > $4
    ORDER BY access_end_date DESC
    LIMIT 1
"#;

impl AccessRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get access record by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<AccessRecord> {
        let row = sqlx::query("SELECT * FROM access_records WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Access record with id {} not found", id)))?;

        Ok(map_access(&row))
    }

    /// Find an unexpired ACTIVE record for (user, item, access type).
    /// Expired or cancelled prior records do not count.
    pub async fn find_valid_active(
        &self,
        user_id: i32,
        item_id: i32,
        access_type: AccessType,
        now: DateTime<Utc>,
    ) -> AppResult<Option<AccessRecord>> {
        let row = sqlx::query(FIND_ACTIVE_SQL)
            .bind(user_id)
            .bind(item_id)
            .bind(access_type.as_str())
            .bind(now)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| map_access(&r)))
    }

    /// List all access records for a user, newest first
    pub async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<AccessRecord>> {
        let rows = sqlx::query(
            "SELECT * FROM access_records WHERE user_id = $1 ORDER BY created_date DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_access).collect())
    }

    /// Create an immediately ACTIVE record (free path). The existence check
    /// and the insert share one transaction.
    pub async fn create_active(
        &self,
        user_id: i32,
        item_id: i32,
        access_type: AccessType,
        amount: Decimal,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        payment_reference: &str,
    ) -> AppResult<AccessCreation> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query(&format!("{} FOR UPDATE", FIND_ACTIVE_SQL))
            .bind(user_id)
            .bind(item_id)
            .bind(access_type.as_str())
            .bind(start)
            .fetch_optional(&mut *tx)
            .await?;

        if let Some(row) = existing {
            tx.commit().await?;
            return Ok(AccessCreation::Existing(map_access(&row)));
        }

        let row = sqlx::query(
            r#"
            INSERT INTO access_records
                (user_id, item_id, access_type, status, payment_amount,
                 access_start_date, access_end_date, payment_reference, created_date)
            VALUES ($1, $2, $3, 'ACTIVE', $4, $5, $6, $7, $5)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(item_id)
        .bind(access_type.as_str())
        .bind(amount)
        .bind(start)
        .bind(end)
        .bind(payment_reference)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(AccessCreation::Created(map_access(&row)))
    }

    /// Create a PENDING record plus its payment request (paid path).
    /// Check, record insert and payment insert commit or roll back together.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_pending_with_payment(
        &self,
        user_id: i32,
        item_id: i32,
        access_type: AccessType,
        amount: Decimal,
        start: DateTime<Utc>,
        access_end: DateTime<Utc>,
        token_data: &str,
        payment_expires_at: DateTime<Utc>,
    ) -> AppResult<PaidAccessCreation> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query(&format!("{} FOR UPDATE", FIND_ACTIVE_SQL))
            .bind(user_id)
            .bind(item_id)
            .bind(access_type.as_str())
            .bind(start)
            .fetch_optional(&mut *tx)
            .await?;

        if let Some(row) = existing {
            tx.commit().await?;
            return Ok(PaidAccessCreation::Existing(map_access(&row)));
        }

        let access_row = sqlx::query(
            r#"
            INSERT INTO access_records
                (user_id, item_id, access_type, status, payment_amount,
                 access_start_date, access_end_date, created_date)
            VALUES ($1, $2, $3, 'PENDING', $4, $5, $6, $5)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(item_id)
        .bind(access_type.as_str())
        .bind(amount)
        .bind(start)
        .bind(access_end)
        .fetch_one(&mut *tx)
        .await?;

        let access = map_access(&access_row);

        let payment_row = sqlx::query(
            r#"
            INSERT INTO payment_requests
                (user_id, access_id, amount, token_data, status, created_date, expires_at)
            VALUES ($1, $2, $3, $4, 'PENDING', $5, $6)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(access.id)
        .bind(amount)
        .bind(token_data)
        .bind(start)
        .bind(payment_expires_at)
        .fetch_one(&mut *tx)
        .await?;

        let payment = map_payment(&payment_row);

        tx.commit().await?;
        Ok(PaidAccessCreation::Created { access, payment })
    }
}
