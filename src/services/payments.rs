//! Payment request lifecycle.
//!
//! PENDING -> {COMPLETED, EXPIRED, FAILED}, all terminal. Expiry is
//! computed from the stored timestamp on every read, never by a timer.
//! Confirmation authorization is an external boundary (operator action or
//! provider callback); this service only enforces the state machine.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    config::PaymentsConfig,
    error::AppResult,
    models::{
        access::AccessRecord,
        payment::{PaymentRequest, PaymentStatus},
    },
    repository::Repository,
    services::notifications::NotificationDispatcher,
};

/// Build the scannable UPI payload for a payment request. Downstream code
/// treats the result as an opaque blob.
pub fn build_token_payload(config: &PaymentsConfig, amount: Decimal, note: &str) -> String {
    format!(
        "upi://pay?pa={}&pn={}&am={}&cu={}&tn={}",
        config.upi_id, config.merchant_name, amount, config.currency, note
    )
}

/// Lazily computed view of a payment request's state
#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentStatusReport {
    /// "completed", "expired" or "pending"
    pub status: String,
    pub message: String,
}

#[derive(Clone)]
pub struct PaymentsService {
    repository: Repository,
    notifications: NotificationDispatcher,
}

impl PaymentsService {
    pub fn new(repository: Repository, notifications: NotificationDispatcher) -> Self {
        Self {
            repository,
            notifications,
        }
    }

    /// Get a payment request by ID
    pub async fn get(&self, payment_id: i32) -> AppResult<PaymentRequest> {
        self.repository.payments.get_by_id(payment_id).await
    }

    /// Current state of a payment request, with expiry evaluated now
    pub async fn status(&self, payment_id: i32) -> AppResult<PaymentStatusReport> {
        let payment = self.repository.payments.get_by_id(payment_id).await?;
        let now = Utc::now();

        let report = if payment.status == PaymentStatus::Completed {
            PaymentStatusReport {
                status: "completed".to_string(),
                message: "Payment verified successfully".to_string(),
            }
        } else if payment.status != PaymentStatus::Pending || payment.is_expired(now) {
            PaymentStatusReport {
                status: "expired".to_string(),
                message: "Payment request has expired; please try again".to_string(),
            }
        } else {
            PaymentStatusReport {
                status: "pending".to_string(),
                message: "Payment is still pending".to_string(),
            }
        };

        Ok(report)
    }

    /// Confirm a payment and activate the linked access record atomically.
    /// Rejected with InvalidState when the request is expired or no longer
    /// PENDING; a COMPLETED request never reverts.
    pub async fn confirm(
        &self,
        payment_id: i32,
        reference: Option<String>,
    ) -> AppResult<(PaymentRequest, AccessRecord)> {
        let now = Utc::now();
        let reference =
            reference.unwrap_or_else(|| format!("MANUAL_{}", now.format("%Y%m%d%H%M%S")));

        let (payment, access) = self
            .repository
            .payments
            .confirm(payment_id, &reference, now)
            .await?;

        tracing::info!(
            payment_id,
            access_id = access.id,
            %reference,
            "Payment confirmed, access activated"
        );

        // Best-effort, after commit
        if let Ok(user) = self.repository.users.get_by_id(payment.user_id).await {
            let title = self
                .repository
                .items
                .get_by_id(access.item_id)
                .await
                .map(|i| i.title)
                .unwrap_or_else(|_| "your digital book".to_string());
            self.notifications
                .payment_success(&user, payment.amount, &title, &reference)
                .await;
            self.notifications
                .access_granted(
                    &user,
                    &title,
                    access.access_type.as_str(),
                    access.access_end_date,
                )
                .await;
        }

        Ok((payment, access))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_payload_carries_merchant_amount_and_note() {
        let config = PaymentsConfig::default();
        let token = build_token_payload(&config, Decimal::new(5000, 2), "Digital Book Access");

        assert_eq!(
            token,
            "upi://pay?pa=readops@paytm&pn=ReadOps Library&am=50.00&cu=INR&tn=Digital Book Access"
        );
    }
}
