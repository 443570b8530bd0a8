//! Payment request endpoints.
//!
//! The confirm endpoint is invoked by an external authorization boundary
//! (operator action or payment-provider callback); it is not authenticated
//! here.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{access::AccessRecord, payment::PaymentRequest},
    services::payments::PaymentStatusReport,
};

/// Confirmation body; the reference is generated when omitted
#[derive(Deserialize, ToSchema)]
pub struct ConfirmPaymentRequest {
    /// External payment reference
    pub reference: Option<String>,
}

/// Confirmation response
#[derive(Serialize, ToSchema)]
pub struct ConfirmPaymentResponse {
    pub payment: PaymentRequest,
    pub access: AccessRecord,
    pub message: String,
}

/// Get a payment request
#[utoipa::path(
    get,
    path = "/payments/{id}",
    tag = "payments",
    params(
        ("id" = i32, Path, description = "Payment request ID")
    ),
    responses(
        (status = 200, description = "Payment request with token payload", body = PaymentRequest),
        (status = 404, description = "Payment request not found")
    )
)]
pub async fn get_payment(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<PaymentRequest>> {
    let payment = state.services.payments.get(id).await?;
    Ok(Json(payment))
}

/// Current payment state, expiry evaluated at read time
#[utoipa::path(
    get,
    path = "/payments/{id}/status",
    tag = "payments",
    params(
        ("id" = i32, Path, description = "Payment request ID")
    ),
    responses(
        (status = 200, description = "completed, expired or pending", body = PaymentStatusReport),
        (status = 404, description = "Payment request not found")
    )
)]
pub async fn payment_status(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<PaymentStatusReport>> {
    let report = state.services.payments.status(id).await?;
    Ok(Json(report))
}

/// Confirm a payment and activate the linked access record
#[utoipa::path(
    post,
    path = "/payments/{id}/confirm",
    tag = "payments",
    params(
        ("id" = i32, Path, description = "Payment request ID")
    ),
    request_body = ConfirmPaymentRequest,
    responses(
        (status = 200, description = "Payment completed, access active", body = ConfirmPaymentResponse),
        (status = 404, description = "Payment request not found"),
        (status = 409, description = "Request is expired or not pending")
    )
)]
pub async fn confirm_payment(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    Json(request): Json<ConfirmPaymentRequest>,
) -> AppResult<Json<ConfirmPaymentResponse>> {
    let (payment, access) = state.services.payments.confirm(id, request.reference).await?;

    Ok(Json(ConfirmPaymentResponse {
        payment,
        access,
        message: "Payment confirmed and access activated".to_string(),
    }))
}
