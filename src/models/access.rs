//! Digital access record model.
//!
//! An access record grants one user time-bounded rights (online reading or
//! download) to one digital book. Validity is evaluated lazily from the
//! stored window on every read; nothing mutates status on a timer, so a row
//! may still read ACTIVE after its window elapsed until the next check.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;

/// Kind of access granted to a digital book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessType {
    OnlineReading,
    Download,
}

impl AccessType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessType::OnlineReading => "ONLINE_READING",
            AccessType::Download => "DOWNLOAD",
        }
    }

    /// Parse an access type argument, rejecting anything but the two
    /// recognized values
    pub fn parse(s: &str) -> Result<Self, AppError> {
        match s {
            "ONLINE_READING" => Ok(AccessType::OnlineReading),
            "DOWNLOAD" => Ok(AccessType::Download),
            other => Err(AppError::InvalidAccessType(format!(
                "Unknown access type '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for AccessType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Access record lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessStatus {
    Pending,
    Active,
    Expired,
    Cancelled,
}

impl AccessStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessStatus::Pending => "PENDING",
            AccessStatus::Active => "ACTIVE",
            AccessStatus::Expired => "EXPIRED",
            AccessStatus::Cancelled => "CANCELLED",
        }
    }
}

impl From<&str> for AccessStatus {
    fn from(s: &str) -> Self {
        match s {
            "PENDING" => AccessStatus::Pending,
            "ACTIVE" => AccessStatus::Active,
            "CANCELLED" => AccessStatus::Cancelled,
            _ => AccessStatus::Expired,
        }
    }
}

/// Digital book access record
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AccessRecord {
    pub id: i32,
    pub user_id: i32,
    pub item_id: i32,
    pub access_type: AccessType,
    pub status: AccessStatus,
    pub payment_amount: Decimal,
    pub access_start_date: DateTime<Utc>,
    pub access_end_date: DateTime<Utc>,
    pub payment_reference: Option<String>,
    pub created_date: DateTime<Utc>,
}

impl AccessRecord {
    /// Whether this record grants access at `now`. Lazy expiry: a record
    /// past its window is invalid here even if the stored status still
    /// reads ACTIVE.
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        self.status == AccessStatus::Active && now < self.access_end_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(status: AccessStatus, end: DateTime<Utc>) -> AccessRecord {
        AccessRecord {
            id: 1,
            user_id: 1,
            item_id: 1,
            access_type: AccessType::OnlineReading,
            status,
            payment_amount: Decimal::ZERO,
            access_start_date: end - Duration::days(5),
            access_end_date: end,
            payment_reference: None,
            created_date: end - Duration::days(5),
        }
    }

    #[test]
    fn active_record_is_valid_until_window_end() {
        let now = Utc::now();
        let rec = record(AccessStatus::Active, now + Duration::days(5));

        assert!(rec.is_valid(now));
        assert!(rec.is_valid(now + Duration::days(5) - Duration::seconds(1)));
        assert!(!rec.is_valid(now + Duration::days(5)));
        assert!(!rec.is_valid(now + Duration::days(6)));
    }

    #[test]
    fn non_active_statuses_are_never_valid() {
        let now = Utc::now();
        for status in [
            AccessStatus::Pending,
            AccessStatus::Expired,
            AccessStatus::Cancelled,
        ] {
            let rec = record(status, now + Duration::days(5));
            assert!(!rec.is_valid(now));
        }
    }

    #[test]
    fn parse_rejects_unknown_access_type() {
        assert_eq!(
            AccessType::parse("ONLINE_READING").unwrap(),
            AccessType::OnlineReading
        );
        assert_eq!(AccessType::parse("DOWNLOAD").unwrap(), AccessType::Download);
        assert!(AccessType::parse("STREAMING").is_err());
        assert!(AccessType::parse("download").is_err());
    }
}
