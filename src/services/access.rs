//! Digital access request handling.
//!
//! Implements the access lifecycle: idempotent return of an existing valid
//! grant, immediate activation for free items, or a PENDING record plus a
//! payment request for paid ones. The access window starts at request time
//! regardless of when payment eventually completes.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;

use crate::{
    config::PaymentsConfig,
    error::{AppError, AppResult},
    models::{
        access::{AccessRecord, AccessType},
        payment::PaymentRequest,
    },
    repository::{
        access::{AccessCreation, PaidAccessCreation},
        Repository,
    },
    services::{notifications::NotificationDispatcher, payments},
};

/// Payment reference recorded on free grants
const FREE_ACCESS_REFERENCE: &str = "FREE_ACCESS";

/// Result of an access request. `AlreadyActive` is the idempotent
/// short-circuit, not an error.
#[derive(Debug)]
pub enum AccessOutcome {
    /// An unexpired ACTIVE record already covers this request
    AlreadyActive(AccessRecord),
    /// Access granted immediately (free item)
    Granted(AccessRecord),
    /// A PENDING record was created; payment must complete to activate it
    PaymentRequired {
        access: AccessRecord,
        payment: PaymentRequest,
    },
}

#[derive(Clone)]
pub struct AccessService {
    repository: Repository,
    config: PaymentsConfig,
    notifications: NotificationDispatcher,
}

impl AccessService {
    pub fn new(
        repository: Repository,
        config: PaymentsConfig,
        notifications: NotificationDispatcher,
    ) -> Self {
        Self {
            repository,
            config,
            notifications,
        }
    }

    /// Request access to a digital book for a user
    pub async fn request_access(
        &self,
        user_id: i32,
        item_id: i32,
        access_type: AccessType,
    ) -> AppResult<AccessOutcome> {
        let now = Utc::now();
        let user = self.repository.users.get_by_id(user_id).await?;
        let item = self.repository.items.get_active(item_id).await?;

        // Fast path; the creation transaction re-checks under a row lock
        if let Some(existing) = self
            .repository
            .access
            .find_valid_active(user_id, item_id, access_type, now)
            .await?
        {
            return Ok(AccessOutcome::AlreadyActive(existing));
        }

        let price = item.price_for(access_type);

        if item.is_free || price.is_zero() {
            // Free catalog entries get the long window; a zero-priced access
            // type on a paid entry gets the standard paid window
            let days = if item.is_free {
                self.config.free_access_days
            } else {
                self.config.paid_access_days
            };
            let end = now + Duration::days(days);

            let record = match self
                .repository
                .access
                .create_active(
                    user_id,
                    item_id,
                    access_type,
                    Decimal::ZERO,
                    now,
                    end,
                    FREE_ACCESS_REFERENCE,
                )
                .await?
            {
                AccessCreation::Existing(record) => return Ok(AccessOutcome::AlreadyActive(record)),
                AccessCreation::Created(record) => record,
            };

            // Best-effort, after commit
            self.notifications
                .access_granted(&user, &item.title, access_type.as_str(), record.access_end_date)
                .await;

            return Ok(AccessOutcome::Granted(record));
        }

        let access_end = now + Duration::days(self.config.paid_access_days);
        let expires_at = now + Duration::minutes(self.config.expiry_minutes);
        let note = format!("Digital Book Access - {}", item.title);
        let token = payments::build_token_payload(&self.config, price, &note);

        match self
            .repository
            .access
            .create_pending_with_payment(
                user_id, item_id, access_type, price, now, access_end, &token, expires_at,
            )
            .await?
        {
            PaidAccessCreation::Existing(record) => Ok(AccessOutcome::AlreadyActive(record)),
            PaidAccessCreation::Created { access, payment } => {
                Ok(AccessOutcome::PaymentRequired { access, payment })
            }
        }
    }

    /// Gate used by the reader and download endpoints: a valid ACTIVE
    /// record is required
    pub async fn authorize(
        &self,
        user_id: i32,
        item_id: i32,
        access_type: AccessType,
    ) -> AppResult<AccessRecord> {
        let now = Utc::now();
        self.repository.items.get_active(item_id).await?;

        self.repository
            .access
            .find_valid_active(user_id, item_id, access_type, now)
            .await?
            .ok_or_else(|| {
                AppError::AccessNotValid(format!(
                    "No valid {} access for this book; purchase access first",
                    access_type.as_str()
                ))
            })
    }

    /// A user's full access history
    pub async fn list_user_access(&self, user_id: i32) -> AppResult<Vec<AccessRecord>> {
        self.repository.users.get_by_id(user_id).await?;
        self.repository.access.list_for_user(user_id).await
    }
}
