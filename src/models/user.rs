//! User model.
//!
//! Registration and authentication live outside this subsystem; users are
//! read here only to resolve notification contacts and ownership.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Library member
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    /// Optional; SMS notifications are skipped when absent
    pub phone: Option<String>,
    pub is_librarian: bool,
}

impl User {
    /// Contact used for SMS delivery, if any
    pub fn sms_contact(&self) -> Option<&str> {
        self.phone.as_deref().filter(|p| !p.is_empty())
    }
}
