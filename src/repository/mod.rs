//! Repository layer for database operations

pub mod access;
pub mod borrows;
pub mod fines;
pub mod items;
pub mod payments;
pub mod users;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub items: items::ItemsRepository,
    pub users: users::UsersRepository,
    pub access: access::AccessRepository,
    pub payments: payments::PaymentsRepository,
    pub borrows: borrows::BorrowsRepository,
    pub fines: fines::FinesRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            items: items::ItemsRepository::new(pool.clone()),
            users: users::UsersRepository::new(pool.clone()),
            access: access::AccessRepository::new(pool.clone()),
            payments: payments::PaymentsRepository::new(pool.clone()),
            borrows: borrows::BorrowsRepository::new(pool.clone()),
            fines: fines::FinesRepository::new(pool.clone()),
            pool,
        }
    }
}
