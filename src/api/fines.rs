//! Fine endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{error::AppResult, models::fine::Fine};

/// Fine payment body; the reference is generated when omitted
#[derive(Deserialize, ToSchema)]
pub struct PayFineRequest {
    /// External payment reference
    pub reference: Option<String>,
}

/// Fines for a user
#[utoipa::path(
    get,
    path = "/users/{id}/fines",
    tag = "fines",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User's fines, newest first", body = Vec<Fine>),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_fines(
    State(state): State<crate::AppState>,
    Path(user_id): Path<i32>,
) -> AppResult<Json<Vec<Fine>>> {
    let fines = state.services.fines.list_user_fines(user_id).await?;
    Ok(Json(fines))
}

/// Settle a pending fine
#[utoipa::path(
    post,
    path = "/fines/{id}/pay",
    tag = "fines",
    params(
        ("id" = i32, Path, description = "Fine ID")
    ),
    request_body = PayFineRequest,
    responses(
        (status = 200, description = "Fine settled", body = Fine),
        (status = 404, description = "Fine not found"),
        (status = 409, description = "Fine already paid")
    )
)]
pub async fn pay_fine(
    State(state): State<crate::AppState>,
    Path(fine_id): Path<i32>,
    Json(request): Json<PayFineRequest>,
) -> AppResult<Json<Fine>> {
    let fine = state.services.fines.pay(fine_id, request.reference).await?;
    Ok(Json(fine))
}
