//! Business logic services

pub mod access;
pub mod borrows;
pub mod catalog;
pub mod email;
pub mod fines;
pub mod notifications;
pub mod payments;
pub mod sms;

use std::sync::Arc;

use crate::{config::AppConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub access: access::AccessService,
    pub payments: payments::PaymentsService,
    pub borrows: borrows::BorrowsService,
    pub fines: fines::FinesService,
    pub notifications: notifications::NotificationDispatcher,
}

impl Services {
    /// Create all services with the given repository. The notification
    /// sinks are injected here so the dispatcher stays testable in
    /// isolation.
    pub fn new(repository: Repository, config: &AppConfig) -> Self {
        let email = Arc::new(email::EmailService::new(config.email.clone()));
        let sms = Arc::new(sms::SmsService::new(config.sms.clone()));
        let notifications = notifications::NotificationDispatcher::new(email, sms);

        Self {
            catalog: catalog::CatalogService::new(repository.clone()),
            access: access::AccessService::new(
                repository.clone(),
                config.payments.clone(),
                notifications.clone(),
            ),
            payments: payments::PaymentsService::new(repository.clone(), notifications.clone()),
            borrows: borrows::BorrowsService::new(
                repository.clone(),
                config.borrowing.clone(),
                notifications.clone(),
            ),
            fines: fines::FinesService::new(repository, notifications.clone()),
            notifications,
        }
    }
}
