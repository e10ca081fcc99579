// src/handlers/audit.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::{PermAudit, RequirePermission},
    models::audit::AuditFilter,
};

// GET /api/audit-logs
pub async fn list_audit_logs(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermAudit>,
    Query(filter): Query<AuditFilter>,
) -> Result<impl IntoResponse, AppError> {
    let page = app_state.audit_service.list(&filter).await?;
    Ok((StatusCode::OK, Json(page)))
}
