//! Physical borrowing service.
//!
//! Borrow windows and extensions come from configuration; a late return
//! imposes a fine computed by the ladder in `models::fine`.

use chrono::Utc;

use crate::{
    config::BorrowingConfig,
    error::AppResult,
    models::{
        borrow::{Borrow, CreateBorrow},
        fine::{fine_amount, Fine},
    },
    repository::Repository,
    services::notifications::NotificationDispatcher,
};

#[derive(Clone)]
pub struct BorrowsService {
    repository: Repository,
    config: BorrowingConfig,
    notifications: NotificationDispatcher,
}

impl BorrowsService {
    pub fn new(
        repository: Repository,
        config: BorrowingConfig,
        notifications: NotificationDispatcher,
    ) -> Self {
        Self {
            repository,
            config,
            notifications,
        }
    }

    /// Borrow a physical book
    pub async fn borrow(&self, request: CreateBorrow) -> AppResult<Borrow> {
        // Verify user exists
        self.repository.users.get_by_id(request.user_id).await?;
        self.repository
            .borrows
            .create(
                request.user_id,
                request.book_id,
                Utc::now(),
                self.config.loan_days,
            )
            .await
    }

    /// Return a borrowed book. A late return creates a PENDING fine and
    /// notifies the user.
    pub async fn return_borrow(&self, borrow_id: i32) -> AppResult<(Borrow, Option<Fine>)> {
        let now = Utc::now();
        let borrow = self.repository.borrows.mark_returned(borrow_id, now).await?;

        let days_overdue = borrow.days_overdue(now);
        if days_overdue <= 0 {
            return Ok((borrow, None));
        }

        let amount = fine_amount(days_overdue, self.config.fine_base, self.config.fine_step_days);
        let fine = self
            .repository
            .fines
            .create(
                borrow.user_id,
                Some(borrow.book_id),
                &borrow.book_title,
                borrow.due_date,
                amount,
                days_overdue as i32,
                now,
            )
            .await?;

        tracing::info!(
            borrow_id,
            fine_id = fine.id,
            days_overdue,
            %amount,
            "Fine imposed for late return"
        );

        // Best-effort, after commit
        if let Ok(user) = self.repository.users.get_by_id(borrow.user_id).await {
            self.notifications.fine_imposed(&user, &fine).await;
        }

        Ok((borrow, Some(fine)))
    }

    /// Extend a borrow by the configured number of days
    pub async fn extend(&self, borrow_id: i32) -> AppResult<Borrow> {
        self.repository
            .borrows
            .extend(borrow_id, self.config.extension_days)
            .await
    }

    /// Open borrows for a user
    pub async fn list_user_borrows(&self, user_id: i32) -> AppResult<Vec<Borrow>> {
        self.repository.users.get_by_id(user_id).await?;
        self.repository.borrows.list_for_user(user_id).await
    }

    /// All overdue borrows
    pub async fn list_overdue(&self) -> AppResult<Vec<Borrow>> {
        self.repository.borrows.list_overdue(Utc::now()).await
    }

    /// Send an overdue notice for every open borrow past its due date.
    /// Returns (delivered, attempted); delivery failures only lower the
    /// first count.
    pub async fn remind_overdue(&self) -> AppResult<(usize, usize)> {
        let overdue = self.repository.borrows.list_overdue(Utc::now()).await?;

        let mut delivered = 0;
        for borrow in &overdue {
            let user = match self.repository.users.get_by_id(borrow.user_id).await {
                Ok(user) => user,
                Err(e) => {
                    tracing::warn!(borrow_id = borrow.id, "Skipping overdue notice: {}", e);
                    continue;
                }
            };
            if self
                .notifications
                .overdue(&user, &borrow.book_title, borrow.due_date)
                .await
            {
                delivered += 1;
            }
        }

        Ok((delivered, overdue.len()))
    }
}
