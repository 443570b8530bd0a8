//! Late-return fine model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Fine lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FineStatus {
    Pending,
    Paid,
}

impl FineStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FineStatus::Pending => "PENDING",
            FineStatus::Paid => "PAID",
        }
    }
}

impl From<&str> for FineStatus {
    fn from(s: &str) -> Self {
        match s {
            "PAID" => FineStatus::Paid,
            _ => FineStatus::Pending,
        }
    }
}

/// Fine imposed for a late return
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Fine {
    pub id: i32,
    pub user_id: i32,
    pub book_id: Option<i32>,
    pub book_title: String,
    pub due_date: DateTime<Utc>,
    pub amount: Decimal,
    pub days_overdue: i32,
    pub status: FineStatus,
    pub payment_reference: Option<String>,
    pub created_date: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

/// Fine ladder: a base amount for the first overdue period, plus the same
/// amount again for every additional started period of `step_days` beyond
/// the first day.
pub fn fine_amount(days_overdue: i64, base: Decimal, step_days: i64) -> Decimal {
    if days_overdue <= 0 {
        return Decimal::ZERO;
    }
    let additional_periods = (days_overdue - 1) / step_days;
    base + base * Decimal::from(additional_periods)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Decimal {
        Decimal::new(500, 2) // 5.00
    }

    #[test]
    fn no_fine_when_not_overdue() {
        assert_eq!(fine_amount(0, base(), 5), Decimal::ZERO);
        assert_eq!(fine_amount(-3, base(), 5), Decimal::ZERO);
    }

    #[test]
    fn base_fine_for_first_period() {
        for days in 1..=5 {
            assert_eq!(fine_amount(days, base(), 5), Decimal::new(500, 2));
        }
    }

    #[test]
    fn fine_grows_per_started_period() {
        assert_eq!(fine_amount(6, base(), 5), Decimal::new(1000, 2));
        assert_eq!(fine_amount(10, base(), 5), Decimal::new(1000, 2));
        assert_eq!(fine_amount(11, base(), 5), Decimal::new(1500, 2));
        assert_eq!(fine_amount(21, base(), 5), Decimal::new(2500, 2));
    }
}
