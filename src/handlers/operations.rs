// src/handlers/operations.rs

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
        rbac::{PermOrders, PermReceivedOrders, RequirePermission},
    },
    models::operations::{CreateOrderPayload, OrderFilter, UpdateOrderStatusPayload},
};

// =============================================================================
//  1. LABORATÓRIO (administrador / assistente)
// =============================================================================

// POST /api/orders
pub async fn create_order(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermOrders>,
    Json(payload): Json<CreateOrderPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let order = app_state.operation_service.create_order(payload).await?;

    Ok((StatusCode::CREATED, Json(order)))
}

// GET /api/orders
pub async fn list_orders(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermOrders>,
    Query(filter): Query<OrderFilter>,
) -> Result<impl IntoResponse, AppError> {
    let orders = app_state.operation_service.list_orders(&filter).await?;
    Ok((StatusCode::OK, Json(orders)))
}

// =============================================================================
//  2. PROVEDOR (ordens recebidas)
// =============================================================================

// GET /api/provider/orders
pub async fn list_received_orders(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermReceivedOrders>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let view = app_state.operation_service.list_provider_orders(&user).await?;
    Ok((StatusCode::OK, Json(view)))
}

// PATCH /api/provider/orders/{order_id}/status
pub async fn update_order_status(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermReceivedOrders>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(order_id): Path<String>,
    Json(payload): Json<UpdateOrderStatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    let order = app_state
        .operation_service
        .update_status(&user, &order_id, payload)
        .await?;

    Ok((StatusCode::OK, Json(order)))
}
