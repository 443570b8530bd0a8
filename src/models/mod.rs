//! Data models for ReadOps

pub mod access;
pub mod borrow;
pub mod fine;
pub mod item;
pub mod payment;
pub mod user;

// Re-export commonly used types
pub use access::{AccessRecord, AccessStatus, AccessType};
pub use borrow::Borrow;
pub use fine::{Fine, FineStatus};
pub use item::DigitalItem;
pub use payment::{PaymentRequest, PaymentStatus};
pub use user::User;
