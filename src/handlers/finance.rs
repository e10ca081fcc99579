// src/handlers/finance.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{PermPayments, RequirePermission},
    },
    models::finance::{PaymentFilter, RegisterPaymentPayload},
};

// POST /api/payments
pub async fn register_payment(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermPayments>,
    Json(payload): Json<RegisterPaymentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let payment = app_state.finance_service.register_payment(payload).await?;

    Ok((StatusCode::CREATED, Json(payment)))
}

// GET /api/payments
pub async fn list_payments(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermPayments>,
    Query(filter): Query<PaymentFilter>,
) -> Result<impl IntoResponse, AppError> {
    let payments = app_state.finance_service.list_payments(&filter).await?;
    Ok((StatusCode::OK, Json(payments)))
}

// GET /api/payments/summary
pub async fn payment_summary(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermPayments>,
) -> Result<impl IntoResponse, AppError> {
    let summary = app_state.finance_service.summary().await?;
    Ok((StatusCode::OK, Json(summary)))
}

// DELETE /api/payments/{payment_id}
pub async fn delete_payment(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermPayments>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(payment_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .finance_service
        .delete_payment(&user, &payment_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
