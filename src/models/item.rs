//! Digital book (catalog entry) model and related types.
//!
//! The catalog is owned by an external collaborator; this subsystem only
//! reads items and their price points.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Digital book classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookKind {
    Religious,
    Educational,
    Literature,
    Technical,
    Other,
}

impl BookKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookKind::Religious => "RELIGIOUS",
            BookKind::Educational => "EDUCATIONAL",
            BookKind::Literature => "LITERATURE",
            BookKind::Technical => "TECHNICAL",
            BookKind::Other => "OTHER",
        }
    }
}

impl From<&str> for BookKind {
    fn from(s: &str) -> Self {
        match s {
            "RELIGIOUS" => BookKind::Religious,
            "EDUCATIONAL" => BookKind::Educational,
            "LITERATURE" => BookKind::Literature,
            "TECHNICAL" => BookKind::Technical,
            _ => BookKind::Other,
        }
    }
}

impl std::fmt::Display for BookKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Digital book catalog entry
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DigitalItem {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub description: String,
    pub kind: BookKind,
    pub category: String,
    pub online_reading_price: Decimal,
    pub download_price: Decimal,
    pub is_free: bool,
    pub is_active: bool,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
}

impl DigitalItem {
    /// Price for a given access type; free items always cost zero
    pub fn price_for(&self, access_type: super::AccessType) -> Decimal {
        if self.is_free {
            return Decimal::ZERO;
        }
        match access_type {
            super::AccessType::OnlineReading => self.online_reading_price,
            super::AccessType::Download => self.download_price,
        }
    }
}

/// Catalog list filters
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ItemQuery {
    /// Substring match on category
    pub category: Option<String>,
    /// Exact kind filter
    pub kind: Option<BookKind>,
    /// Only free books
    pub free_only: Option<bool>,
}
