//! Digital access endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{access::AccessRecord, payment::PaymentRequest, AccessType},
    services::access::AccessOutcome,
};

/// Access request body
#[derive(Deserialize, ToSchema)]
pub struct AccessRequest {
    /// Acting user ID
    pub user_id: i32,
    /// "ONLINE_READING" or "DOWNLOAD"
    pub access_type: String,
}

/// Access request outcome
#[derive(Serialize, ToSchema)]
pub struct AccessResponse {
    /// "already_active", "granted" or "payment_required"
    pub status: String,
    pub message: String,
    pub access: AccessRecord,
    /// Present only when payment is required
    pub payment: Option<PaymentRequest>,
}

/// Body for the reader/download gates
#[derive(Deserialize, ToSchema)]
pub struct AuthorizeRequest {
    pub user_id: i32,
}

/// Gate response with the record that grants access
#[derive(Serialize, ToSchema)]
pub struct AuthorizeResponse {
    pub access: AccessRecord,
    pub message: String,
}

/// Request access to a digital book
#[utoipa::path(
    post,
    path = "/digital-books/{id}/access",
    tag = "access",
    params(
        ("id" = i32, Path, description = "Digital book ID")
    ),
    request_body = AccessRequest,
    responses(
        (status = 200, description = "An active record already covers this request", body = AccessResponse),
        (status = 201, description = "Access granted or payment request created", body = AccessResponse),
        (status = 400, description = "Invalid access type"),
        (status = 404, description = "Book or user not found")
    )
)]
pub async fn request_access(
    State(state): State<crate::AppState>,
    Path(item_id): Path<i32>,
    Json(request): Json<AccessRequest>,
) -> AppResult<(StatusCode, Json<AccessResponse>)> {
    let access_type = AccessType::parse(&request.access_type)?;

    let outcome = state
        .services
        .access
        .request_access(request.user_id, item_id, access_type)
        .await?;

    let (status, response) = match outcome {
        AccessOutcome::AlreadyActive(access) => (
            StatusCode::OK,
            AccessResponse {
                status: "already_active".to_string(),
                message: "You already have active access to this book".to_string(),
                access,
                payment: None,
            },
        ),
        AccessOutcome::Granted(access) => (
            StatusCode::CREATED,
            AccessResponse {
                status: "granted".to_string(),
                message: "Free access granted".to_string(),
                access,
                payment: None,
            },
        ),
        AccessOutcome::PaymentRequired { access, payment } => (
            StatusCode::CREATED,
            AccessResponse {
                status: "payment_required".to_string(),
                message: "Scan the payment token to complete the purchase".to_string(),
                access,
                payment: Some(payment),
            },
        ),
    };

    Ok((status, Json(response)))
}

/// List a user's digital access records
#[utoipa::path(
    get,
    path = "/users/{id}/digital-access",
    tag = "access",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Access history, newest first", body = Vec<AccessRecord>),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_access(
    State(state): State<crate::AppState>,
    Path(user_id): Path<i32>,
) -> AppResult<Json<Vec<AccessRecord>>> {
    let records = state.services.access.list_user_access(user_id).await?;
    Ok(Json(records))
}

/// Open a digital book in the online reader
#[utoipa::path(
    post,
    path = "/digital-books/{id}/read",
    tag = "access",
    params(
        ("id" = i32, Path, description = "Digital book ID")
    ),
    request_body = AuthorizeRequest,
    responses(
        (status = 200, description = "Reading authorized", body = AuthorizeResponse),
        (status = 403, description = "No valid online-reading access"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn read_book(
    State(state): State<crate::AppState>,
    Path(item_id): Path<i32>,
    Json(request): Json<AuthorizeRequest>,
) -> AppResult<Json<AuthorizeResponse>> {
    let access = state
        .services
        .access
        .authorize(request.user_id, item_id, AccessType::OnlineReading)
        .await?;

    Ok(Json(AuthorizeResponse {
        access,
        message: "Reading authorized".to_string(),
    }))
}

/// Authorize a digital book download
#[utoipa::path(
    post,
    path = "/digital-books/{id}/download",
    tag = "access",
    params(
        ("id" = i32, Path, description = "Digital book ID")
    ),
    request_body = AuthorizeRequest,
    responses(
        (status = 200, description = "Download authorized", body = AuthorizeResponse),
        (status = 403, description = "No valid download access"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn download_book(
    State(state): State<crate::AppState>,
    Path(item_id): Path<i32>,
    Json(request): Json<AuthorizeRequest>,
) -> AppResult<Json<AuthorizeResponse>> {
    let access = state
        .services
        .access
        .authorize(request.user_id, item_id, AccessType::Download)
        .await?;

    Ok(Json(AuthorizeResponse {
        access,
        message: "Download authorized".to_string(),
    }))
}
