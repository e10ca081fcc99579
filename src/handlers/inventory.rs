// src/handlers/inventory.rs

use axum::{
    extract::{Path, State},
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
        rbac::{PermMaterials, RequirePermission},
    },
    models::inventory::SaveMaterialPayload,
};

// GET /api/materials
pub async fn list_materials(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermMaterials>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let materials = app_state.inventory_service.list_own(&user).await?;
    Ok((StatusCode::OK, Json(materials)))
}

// POST /api/materials
pub async fn create_material(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermMaterials>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<SaveMaterialPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let material = app_state.inventory_service.create(&user, payload).await?;

    Ok((StatusCode::CREATED, Json(material)))
}

// PUT /api/materials/{material_id}
pub async fn update_material(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermMaterials>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(material_id): Path<String>,
    Json(payload): Json<SaveMaterialPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let material = app_state
        .inventory_service
        .update(&user, &material_id, payload)
        .await?;

    Ok((StatusCode::OK, Json(material)))
}
