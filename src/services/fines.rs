//! Fines service

use chrono::Utc;

use crate::{
    error::AppResult,
    models::fine::Fine,
    repository::Repository,
    services::notifications::NotificationDispatcher,
};

#[derive(Clone)]
pub struct FinesService {
    repository: Repository,
    notifications: NotificationDispatcher,
}

impl FinesService {
    pub fn new(repository: Repository, notifications: NotificationDispatcher) -> Self {
        Self {
            repository,
            notifications,
        }
    }

    /// Fines for a user
    pub async fn list_user_fines(&self, user_id: i32) -> AppResult<Vec<Fine>> {
        self.repository.users.get_by_id(user_id).await?;
        self.repository.fines.list_for_user(user_id).await
    }

    /// Settle a PENDING fine. Paying twice is rejected with InvalidState.
    pub async fn pay(&self, fine_id: i32, reference: Option<String>) -> AppResult<Fine> {
        let now = Utc::now();
        let reference =
            reference.unwrap_or_else(|| format!("FINE_{}", now.format("%Y%m%d%H%M%S")));

        let fine = self.repository.fines.mark_paid(fine_id, &reference, now).await?;

        tracing::info!(fine_id, %reference, "Fine settled");

        // Best-effort, after commit
        if let Ok(user) = self.repository.users.get_by_id(fine.user_id).await {
            self.notifications
                .payment_success(&user, fine.amount, &fine.book_title, &reference)
                .await;
        }

        Ok(fine)
    }
}
