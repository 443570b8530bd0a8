//! Payment requests repository.
//!
//! Confirmation pairs the payment transition with the activation of its
//! access record in one transaction; there is never a committed state
//! where the payment is COMPLETED but access is not ACTIVE.

use chrono::{DateTime, Utc};
use sqlx::{postgres::PgRow, Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::{
        access::AccessRecord,
        payment::{PaymentRequest, PaymentStatus},
    },
};

use super::access::map_access;

#[derive(Clone)]
pub struct PaymentsRepository {
    pool: Pool<Postgres>,
}

pub(crate) fn map_payment(row: &PgRow) -> PaymentRequest {
    let status: String = row.get("status");
    PaymentRequest {
        id: row.get("id"),
        user_id: row.get("user_id"),
        access_id: row.get("access_id"),
        amount: row.get("amount"),
        token_data: row.get("token_data"),
        status: PaymentStatus::from(status.as_str()),
        payment_reference: row.get("payment_reference"),
        created_date: row.get("created_date"),
        expires_at: row.get("expires_at"),
    }
}

impl PaymentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get payment request by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<PaymentRequest> {
        let row = sqlx::query("SELECT * FROM payment_requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Payment request with id {} not found", id))
            })?;

        Ok(map_payment(&row))
    }

    /// Confirm a PENDING, unexpired payment request and activate its access
    /// record as one atomic transition. An expired or non-PENDING request is
    /// rejected and left unchanged (an expired one has its stored status
    /// stamped EXPIRED on the way out).
    pub async fn confirm(
        &self,
        id: i32,
        reference: &str,
        now: DateTime<Utc>,
    ) -> AppResult<(PaymentRequest, AccessRecord)> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query("SELECT * FROM payment_requests WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Payment request with id {} not found", id))
            })?;

        let payment = map_payment(&row);

        if payment.status != PaymentStatus::Pending {
            return Err(AppError::InvalidState(format!(
                "Payment request {} is {}, not PENDING",
                id,
                payment.status.as_str()
            )));
        }

        if payment.is_expired(now) {
            sqlx::query("UPDATE payment_requests SET status = 'EXPIRED' WHERE id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            tx.commit().await?;
            return Err(AppError::InvalidState(format!(
                "Payment request {} has expired; re-initiate the access request",
                id
            )));
        }

        let payment_row = sqlx::query(
            r#"
            UPDATE payment_requests
            SET status = 'COMPLETED', payment_reference = $1
            WHERE id = $2
            RETURNING *
            "#,
        )
        .bind(reference)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        let access_row = sqlx::query(
            r#"
            UPDATE access_records
            SET status = 'ACTIVE', payment_reference = $1
            WHERE id = $2
            RETURNING *
            "#,
        )
        .bind(reference)
        .bind(payment.access_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok((map_payment(&payment_row), map_access(&access_row)))
    }
}
