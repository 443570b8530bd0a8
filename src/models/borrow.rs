//! Physical borrow model.
//!
//! Borrows are first-class rows with a foreign key to the user, replacing
//! the legacy per-user embedded list. Overdue detection is a query over
//! these rows, not a scan of every user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A physical book checkout
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Borrow {
    pub id: i32,
    pub user_id: i32,
    pub book_id: i32,
    /// Title snapshot, kept even if the catalog entry is removed
    pub book_title: String,
    pub start_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub nb_extensions: i16,
    pub returned_date: Option<DateTime<Utc>>,
}

impl Borrow {
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.returned_date.is_none() && now > self.due_date
    }

    /// Whole days past the due date, zero when not overdue
    pub fn days_overdue(&self, now: DateTime<Utc>) -> i64 {
        if now <= self.due_date {
            return 0;
        }
        (now - self.due_date).num_days()
    }
}

/// Create borrow request
#[derive(Debug, Deserialize)]
pub struct CreateBorrow {
    pub user_id: i32,
    pub book_id: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn overdue_only_after_due_date_and_while_unreturned() {
        let now = Utc::now();
        let mut borrow = Borrow {
            id: 1,
            user_id: 1,
            book_id: 1,
            book_title: "Bhagavad Gita".to_string(),
            start_date: now - Duration::days(10),
            due_date: now - Duration::days(3),
            nb_extensions: 0,
            returned_date: None,
        };

        assert!(borrow.is_overdue(now));
        assert_eq!(borrow.days_overdue(now), 3);

        borrow.returned_date = Some(now);
        assert!(!borrow.is_overdue(now));
    }

    #[test]
    fn not_overdue_before_due_date() {
        let now = Utc::now();
        let borrow = Borrow {
            id: 1,
            user_id: 1,
            book_id: 1,
            book_title: "Ramayana".to_string(),
            start_date: now,
            due_date: now + Duration::days(7),
            nb_extensions: 0,
            returned_date: None,
        };

        assert!(!borrow.is_overdue(now));
        assert_eq!(borrow.days_overdue(now), 0);
    }
}
