// src/handlers/statistics.rs

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{PermProviderStatistics, PermStatistics, RequirePermission},
    },
    models::statistics::{ComparisonQuery, Period},
    services::statistics_service::StatisticsService,
};

/// Completa os parâmetros ausentes com mês corrente / mês anterior.
pub fn resolve_periods(
    service: &StatisticsService,
    query: &ComparisonQuery,
    now: DateTime<Utc>,
) -> Result<(Period, Period), AppError> {
    let (default1, default2) = service.default_periods(now);

    let period1 = Period::new(
        query.month1.unwrap_or(default1.month),
        query.year1.unwrap_or(default1.year),
    )
    .ok_or(AppError::InvalidPeriod)?;
    let period2 = Period::new(
        query.month2.unwrap_or(default2.month),
        query.year2.unwrap_or(default2.year),
    )
    .ok_or(AppError::InvalidPeriod)?;

    Ok((period1, period2))
}

// GET /api/statistics/compare
pub async fn compare_periods(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermStatistics>,
    Query(query): Query<ComparisonQuery>,
) -> Result<impl IntoResponse, AppError> {
    query.validate()?;

    let service = &app_state.statistics_service;
    let (period1, period2) = resolve_periods(service, &query, Utc::now())?;
    let comparison = service.compare(period1, period2).await?;

    Ok((StatusCode::OK, Json(comparison)))
}

// GET /api/statistics/export
pub async fn export_report(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermStatistics>,
    Query(query): Query<ComparisonQuery>,
) -> Result<impl IntoResponse, AppError> {
    query.validate()?;

    let service = &app_state.statistics_service;
    let now = Utc::now();
    let (period1, period2) = resolve_periods(service, &query, now)?;
    let (file_name, report) = service.export(period1, period2, now).await?;

    let body = serde_json::to_string_pretty(&report)?;
    tracing::info!("📤 Relatório exportado: {}", file_name);

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        body,
    ))
}

// GET /api/statistics/provider
pub async fn provider_statistics(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermProviderStatistics>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let stats = app_state.statistics_service.for_provider(&user).await?;
    Ok((StatusCode::OK, Json(stats)))
}
