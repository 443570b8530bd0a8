//! Payment request model.
//!
//! A payment request is a pending charge tied 1:1 to a PENDING access
//! record. It carries an opaque scannable token payload and an absolute
//! expiry; expiry is computed on read, never by a timer. COMPLETED is
//! terminal.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Payment request lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Expired,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Completed => "COMPLETED",
            PaymentStatus::Failed => "FAILED",
            PaymentStatus::Expired => "EXPIRED",
        }
    }
}

impl From<&str> for PaymentStatus {
    fn from(s: &str) -> Self {
        match s {
            "PENDING" => PaymentStatus::Pending,
            "COMPLETED" => PaymentStatus::Completed,
            "FAILED" => PaymentStatus::Failed,
            _ => PaymentStatus::Expired,
        }
    }
}

/// QR payment request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentRequest {
    pub id: i32,
    pub user_id: i32,
    pub access_id: i32,
    pub amount: Decimal,
    /// Opaque scannable payload; never parsed downstream
    pub token_data: String,
    pub status: PaymentStatus,
    pub payment_reference: Option<String>,
    pub created_date: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl PaymentRequest {
    /// Expiry is a pure function of the stored timestamp: monotonic in `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn request(expires_at: DateTime<Utc>) -> PaymentRequest {
        PaymentRequest {
            id: 1,
            user_id: 1,
            access_id: 1,
            amount: Decimal::new(5000, 2),
            token_data: "upi://pay?pa=readops@paytm".to_string(),
            status: PaymentStatus::Pending,
            payment_reference: None,
            created_date: expires_at - Duration::minutes(30),
            expires_at,
        }
    }

    #[test]
    fn not_expired_before_deadline() {
        let now = Utc::now();
        let req = request(now + Duration::minutes(30));

        assert!(!req.is_expired(now));
        assert!(!req.is_expired(now + Duration::minutes(30)));
        assert!(req.is_expired(now + Duration::minutes(30) + Duration::seconds(1)));
    }

    #[test]
    fn expiry_is_monotonic_in_now() {
        let now = Utc::now();
        let req = request(now + Duration::minutes(30));

        // Once expired at some instant, it stays expired at every later one
        let mut t = now;
        let mut seen_expired = false;
        for _ in 0..120 {
            let expired = req.is_expired(t);
            if seen_expired {
                assert!(expired);
            }
            seen_expired = expired;
            t = t + Duration::minutes(1);
        }
        assert!(seen_expired);
    }
}
