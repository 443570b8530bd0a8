//! Notification dispatcher.
//!
//! Fan-out to the configured email and SMS sinks on state transitions.
//! Delivery is best-effort and at-most-once: each channel reports success
//! or failure independently, SMS is skipped (not failed) when the user has
//! no phone number, and channel failures are logged and swallowed — they
//! never roll back the transition that triggered them. Callers dispatch
//! after their transaction has committed.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::{error::AppResult, models::fine::Fine, models::User};

/// Outbound email channel
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmailSink: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()>;
}

/// Outbound SMS channel
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SmsSink: Send + Sync {
    async fn send(&self, to: &str, body: &str) -> AppResult<()>;
}

#[derive(Clone)]
pub struct NotificationDispatcher {
    email: Arc<dyn EmailSink>,
    sms: Arc<dyn SmsSink>,
}

impl NotificationDispatcher {
    pub fn new(email: Arc<dyn EmailSink>, sms: Arc<dyn SmsSink>) -> Self {
        Self { email, sms }
    }

    /// Digital access granted (free item or confirmed payment)
    pub async fn access_granted(
        &self,
        user: &User,
        book_title: &str,
        access_type: &str,
        valid_until: DateTime<Utc>,
    ) -> bool {
        let subject = format!("Access granted: {}", book_title);
        let body = format!(
            "Hello {},\n\n\
             Your {} access to \"{}\" is now active.\n\
             It is valid until {}.\n\n\
             Happy reading!\nReadOps Library",
            user.username,
            access_type,
            book_title,
            valid_until.format("%Y-%m-%d %H:%M UTC"),
        );
        let sms = format!(
            "ReadOps: {} access to \"{}\" active until {}.",
            access_type,
            book_title,
            valid_until.format("%Y-%m-%d"),
        );
        self.deliver(user, &subject, &body, &sms).await
    }

    /// Payment completed
    pub async fn payment_success(
        &self,
        user: &User,
        amount: Decimal,
        book_title: &str,
        reference: &str,
    ) -> bool {
        let subject = "Payment received".to_string();
        let body = format!(
            "Hello {},\n\n\
             We received your payment of Rs. {} for \"{}\".\n\
             Reference: {}\n\n\
             Thank you,\nReadOps Library",
            user.username, amount, book_title, reference,
        );
        let sms = format!(
            "ReadOps: payment of Rs. {} received for \"{}\" (ref {}).",
            amount, book_title, reference,
        );
        self.deliver(user, &subject, &body, &sms).await
    }

    /// Fine imposed on a late return
    pub async fn fine_imposed(&self, user: &User, fine: &Fine) -> bool {
        let subject = format!("Fine imposed: {}", fine.book_title);
        let body = format!(
            "Hello {},\n\n\
             A fine of Rs. {} has been imposed for returning \"{}\" \
             {} day(s) late (due {}).\n\
             Please settle it at your earliest convenience.\n\n\
             ReadOps Library",
            user.username,
            fine.amount,
            fine.book_title,
            fine.days_overdue,
            fine.due_date.format("%Y-%m-%d"),
        );
        let sms = format!(
            "ReadOps: fine of Rs. {} for \"{}\" returned {} day(s) late.",
            fine.amount, fine.book_title, fine.days_overdue,
        );
        self.deliver(user, &subject, &body, &sms).await
    }

    /// Due-date reminder for an open borrow
    pub async fn due_date_reminder(
        &self,
        user: &User,
        book_title: &str,
        due_date: DateTime<Utc>,
        days_remaining: i64,
    ) -> bool {
        let subject = format!("Return reminder: {}", book_title);
        let body = format!(
            "Hello {},\n\n\
             \"{}\" is due on {} ({} day(s) remaining).\n\
             Return or extend it in time to avoid a fine.\n\n\
             ReadOps Library",
            user.username,
            book_title,
            due_date.format("%Y-%m-%d"),
            days_remaining,
        );
        let sms = format!(
            "ReadOps: \"{}\" is due {} ({} day(s) left).",
            book_title,
            due_date.format("%Y-%m-%d"),
            days_remaining,
        );
        self.deliver(user, &subject, &body, &sms).await
    }

    /// Overdue notice for an open borrow past its due date
    pub async fn overdue(&self, user: &User, book_title: &str, due_date: DateTime<Utc>) -> bool {
        let subject = format!("Overdue: {}", book_title);
        let body = format!(
            "Hello {},\n\n\
             \"{}\" was due on {} and has not been returned.\n\
             Please return it as soon as possible; fines accrue per overdue period.\n\n\
             ReadOps Library",
            user.username,
            book_title,
            due_date.format("%Y-%m-%d"),
        );
        let sms = format!(
            "ReadOps: \"{}\" was due {}. Please return it.",
            book_title,
            due_date.format("%Y-%m-%d"),
        );
        self.deliver(user, &subject, &body, &sms).await
    }

    /// Attempt every applicable channel; result is the AND of the attempts.
    /// A missing phone number skips SMS without counting as a failure.
    async fn deliver(&self, user: &User, subject: &str, body: &str, sms_body: &str) -> bool {
        let mut ok = match self.email.send(&user.email, subject, body).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(user = %user.username, "Email notification failed: {}", e);
                false
            }
        };

        if let Some(phone) = user.sms_contact() {
            ok &= match self.sms.send(phone, sms_body).await {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(user = %user.username, "SMS notification failed: {}", e);
                    false
                }
            };
        }

        ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use mockall::predicate::*;

    fn user(phone: Option<&str>) -> User {
        User {
            id: 1,
            username: "asha".to_string(),
            email: "asha@example.org".to_string(),
            phone: phone.map(|p| p.to_string()),
            is_librarian: false,
        }
    }

    #[tokio::test]
    async fn both_channels_attempted_when_phone_present() {
        let mut email = MockEmailSink::new();
        email
            .expect_send()
            .with(eq("asha@example.org"), always(), always())
            .times(1)
            .returning(|_, _, _| Ok(()));

        let mut sms = MockSmsSink::new();
        sms.expect_send()
            .with(eq("919876543210"), always())
            .times(1)
            .returning(|_, _| Ok(()));

        let dispatcher = NotificationDispatcher::new(Arc::new(email), Arc::new(sms));
        let ok = dispatcher
            .access_granted(
                &user(Some("919876543210")),
                "Bhagavad Gita",
                "ONLINE_READING",
                Utc::now(),
            )
            .await;

        assert!(ok);
    }

    #[tokio::test]
    async fn sms_skipped_without_phone_and_not_counted_as_failure() {
        let mut email = MockEmailSink::new();
        email.expect_send().times(1).returning(|_, _, _| Ok(()));

        let mut sms = MockSmsSink::new();
        sms.expect_send().times(0);

        let dispatcher = NotificationDispatcher::new(Arc::new(email), Arc::new(sms));
        let ok = dispatcher
            .payment_success(&user(None), Decimal::new(5000, 2), "Gita", "MANUAL_1")
            .await;

        assert!(ok);
    }

    #[tokio::test]
    async fn channel_failure_is_swallowed_and_reported_in_result() {
        let mut email = MockEmailSink::new();
        email
            .expect_send()
            .times(1)
            .returning(|_, _, _| Err(AppError::Internal("smtp down".to_string())));

        let mut sms = MockSmsSink::new();
        sms.expect_send().times(1).returning(|_, _| Ok(()));

        let dispatcher = NotificationDispatcher::new(Arc::new(email), Arc::new(sms));
        // Does not propagate the error; the overall result is just false
        let ok = dispatcher
            .overdue(&user(Some("919876543210")), "Gita", Utc::now())
            .await;

        assert!(!ok);
    }
}
