// src/handlers/crm.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::{PermOrders, PermProviders, RequirePermission},
    models::crm::{CreateProviderPayload, ProviderFilter, ProviderStatus},
};

// POST /api/providers
pub async fn create_provider(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermProviders>,
    Json(payload): Json<CreateProviderPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let provider = app_state.crm_service.create_provider(payload).await?;

    Ok((StatusCode::CREATED, Json(provider)))
}

// GET /api/providers
pub async fn list_providers(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermProviders>,
    Query(filter): Query<ProviderFilter>,
) -> Result<impl IntoResponse, AppError> {
    let providers = app_state.crm_service.list_providers(&filter).await?;
    Ok((StatusCode::OK, Json(providers)))
}

// GET /api/orders/providers
// Quem cria ordens precisa escolher um provedor ativo, mesmo sem gerir o cadastro.
pub async fn list_active_providers(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermOrders>,
) -> Result<impl IntoResponse, AppError> {
    let filter = ProviderFilter {
        status: Some(ProviderStatus::Active),
    };
    let providers = app_state.crm_service.list_providers(&filter).await?;
    Ok((StatusCode::OK, Json(providers)))
}
