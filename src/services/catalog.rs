//! Digital catalog service (read-only)

use crate::{
    error::AppResult,
    models::item::{DigitalItem, ItemQuery},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List active digital books with filters
    pub async fn list_items(&self, query: &ItemQuery) -> AppResult<Vec<DigitalItem>> {
        self.repository.items.list(query).await
    }

    /// Get an active digital book by ID
    pub async fn get_item(&self, id: i32) -> AppResult<DigitalItem> {
        self.repository.items.get_active(id).await
    }
}
