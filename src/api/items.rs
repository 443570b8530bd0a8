//! Digital catalog endpoints (read-only)

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::item::{DigitalItem, ItemQuery},
};

/// List active digital books
#[utoipa::path(
    get,
    path = "/digital-books",
    tag = "catalog",
    params(ItemQuery),
    responses(
        (status = 200, description = "Active digital books", body = Vec<DigitalItem>)
    )
)]
pub async fn list_items(
    State(state): State<crate::AppState>,
    Query(query): Query<ItemQuery>,
) -> AppResult<Json<Vec<DigitalItem>>> {
    let items = state.services.catalog.list_items(&query).await?;
    Ok(Json(items))
}

/// Get a digital book by ID
#[utoipa::path(
    get,
    path = "/digital-books/{id}",
    tag = "catalog",
    params(
        ("id" = i32, Path, description = "Digital book ID")
    ),
    responses(
        (status = 200, description = "Digital book details", body = DigitalItem),
        (status = 404, description = "Book not found or inactive")
    )
)]
pub async fn get_item(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<DigitalItem>> {
    let item = state.services.catalog.get_item(id).await?;
    Ok(Json(item))
}
