//! API handlers for ReadOps REST endpoints.
//!
//! Authentication is an external boundary (reverse proxy / gateway);
//! handlers take the acting user ID explicitly.

pub mod access;
pub mod borrows;
pub mod fines;
pub mod health;
pub mod items;
pub mod openapi;
pub mod payments;
