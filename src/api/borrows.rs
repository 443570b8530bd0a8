//! Physical borrowing endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{borrow::Borrow, fine::Fine},
};

/// Create borrow request
#[derive(Deserialize, ToSchema)]
pub struct CreateBorrowRequest {
    pub user_id: i32,
    pub book_id: i32,
}

/// Return response; `fine` is present when the return was late
#[derive(Serialize, ToSchema)]
pub struct ReturnResponse {
    pub borrow: Borrow,
    pub fine: Option<Fine>,
    pub message: String,
}

/// Overdue reminder dispatch summary
#[derive(Serialize, ToSchema)]
pub struct RemindersResponse {
    pub delivered: usize,
    pub attempted: usize,
}

/// Borrow a physical book
#[utoipa::path(
    post,
    path = "/borrows",
    tag = "borrows",
    request_body = CreateBorrowRequest,
    responses(
        (status = 201, description = "Book borrowed", body = Borrow),
        (status = 404, description = "User or book not found"),
        (status = 409, description = "No copies available")
    )
)]
pub async fn create_borrow(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateBorrowRequest>,
) -> AppResult<(StatusCode, Json<Borrow>)> {
    let borrow = state
        .services
        .borrows
        .borrow(crate::models::borrow::CreateBorrow {
            user_id: request.user_id,
            book_id: request.book_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(borrow)))
}

/// Return a borrowed book; a late return imposes a fine
#[utoipa::path(
    post,
    path = "/borrows/{id}/return",
    tag = "borrows",
    params(
        ("id" = i32, Path, description = "Borrow ID")
    ),
    responses(
        (status = 200, description = "Book returned", body = ReturnResponse),
        (status = 404, description = "Borrow not found"),
        (status = 409, description = "Already returned")
    )
)]
pub async fn return_borrow(
    State(state): State<crate::AppState>,
    Path(borrow_id): Path<i32>,
) -> AppResult<Json<ReturnResponse>> {
    let (borrow, fine) = state.services.borrows.return_borrow(borrow_id).await?;

    let message = match &fine {
        Some(fine) => format!(
            "Book returned {} day(s) late; fine of Rs. {} imposed",
            fine.days_overdue, fine.amount
        ),
        None => "Book returned on time".to_string(),
    };

    Ok(Json(ReturnResponse {
        borrow,
        fine,
        message,
    }))
}

/// Extend a borrow's due date
#[utoipa::path(
    post,
    path = "/borrows/{id}/extend",
    tag = "borrows",
    params(
        ("id" = i32, Path, description = "Borrow ID")
    ),
    responses(
        (status = 200, description = "Due date extended", body = Borrow),
        (status = 404, description = "Borrow not found"),
        (status = 409, description = "Already returned")
    )
)]
pub async fn extend_borrow(
    State(state): State<crate::AppState>,
    Path(borrow_id): Path<i32>,
) -> AppResult<Json<Borrow>> {
    let borrow = state.services.borrows.extend(borrow_id).await?;
    Ok(Json(borrow))
}

/// Open borrows for a user
#[utoipa::path(
    get,
    path = "/users/{id}/borrows",
    tag = "borrows",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User's open borrows", body = Vec<Borrow>),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_borrows(
    State(state): State<crate::AppState>,
    Path(user_id): Path<i32>,
) -> AppResult<Json<Vec<Borrow>>> {
    let borrows = state.services.borrows.list_user_borrows(user_id).await?;
    Ok(Json(borrows))
}

/// All open borrows past their due date
#[utoipa::path(
    get,
    path = "/borrows/overdue",
    tag = "borrows",
    responses(
        (status = 200, description = "Overdue borrows", body = Vec<Borrow>)
    )
)]
pub async fn list_overdue(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<Borrow>>> {
    let borrows = state.services.borrows.list_overdue().await?;
    Ok(Json(borrows))
}

/// Send overdue notices for every open borrow past its due date
#[utoipa::path(
    post,
    path = "/borrows/overdue/remind",
    tag = "borrows",
    responses(
        (status = 200, description = "Dispatch summary", body = RemindersResponse)
    )
)]
pub async fn remind_overdue(
    State(state): State<crate::AppState>,
) -> AppResult<Json<RemindersResponse>> {
    let (delivered, attempted) = state.services.borrows.remind_overdue().await?;
    Ok(Json(RemindersResponse {
        delivered,
        attempted,
    }))
}
