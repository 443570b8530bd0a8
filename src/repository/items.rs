//! Digital book catalog repository.
//!
//! Read-only from this subsystem's perspective; catalog management is an
//! external collaborator.

use sqlx::{postgres::PgRow, Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::item::{BookKind, DigitalItem, ItemQuery},
};

#[derive(Clone)]
pub struct ItemsRepository {
    pool: Pool<Postgres>,
}

pub(crate) fn map_item(row: &PgRow) -> DigitalItem {
    let kind: String = row.get("kind");
    DigitalItem {
        id: row.get("id"),
        title: row.get("title"),
        author: row.get("author"),
        description: row.get("description"),
        kind: BookKind::from(kind.as_str()),
        category: row.get("category"),
        online_reading_price: row.get("online_reading_price"),
        download_price: row.get("download_price"),
        is_free: row.get("is_free"),
        is_active: row.get("is_active"),
        created_date: row.get("created_date"),
        updated_date: row.get("updated_date"),
    }
}

impl ItemsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get a digital book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<DigitalItem> {
        let row = sqlx::query("SELECT * FROM digital_items WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Digital book with id {} not found", id)))?;

        Ok(map_item(&row))
    }

    /// Get a digital book by ID, treating inactive entries as absent
    pub async fn get_active(&self, id: i32) -> AppResult<DigitalItem> {
        let item = self.get_by_id(id).await?;
        if !item.is_active {
            return Err(AppError::NotFound(format!(
                "Digital book with id {} not found",
                id
            )));
        }
        Ok(item)
    }

    /// List active digital books with optional filters
    pub async fn list(&self, query: &ItemQuery) -> AppResult<Vec<DigitalItem>> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM digital_items
            WHERE is_active = TRUE
              AND ($1::text IS NULL OR category ILIKE '%' || $1 || '%')
              AND ($2::text IS NULL OR kind = $2)
              AND (NOT $3 OR is_free)
            ORDER BY title
            "#,
        )
        .bind(&query.category)
        .bind(query.kind.map(|k| k.as_str()))
        .bind(query.free_only.unwrap_or(false))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_item).collect())
    }
}
