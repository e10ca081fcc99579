// src/services/audit_service.rs

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::AuditRepository,
    models::audit::{AuditFilter, AuditLog, AuditLogPage, NewAuditEntry},
};

#[derive(Clone)]
pub struct AuditService {
    repo: Arc<dyn AuditRepository>,
}

impl AuditService {
    pub fn new(repo: Arc<dyn AuditRepository>) -> Self {
        Self { repo }
    }

    pub async fn record(&self, entry: NewAuditEntry) -> Result<AuditLog, AppError> {
        let log = AuditLog {
            id: Uuid::new_v4().to_string(),
            user_id: entry.user_id,
            user_name: entry.user_name,
            action: entry.action.to_string(),
            details: entry.details,
            timestamp: Utc::now(),
        };

        self.repo.append(log.clone()).await?;
        tracing::info!("📝 Auditoria: {} ({})", log.action, log.details);

        Ok(log)
    }

    pub async fn list(&self, filter: &AuditFilter) -> Result<AuditLogPage, AppError> {
        let logs = self.repo.snapshot().await?;
        Ok(filter_logs(logs, filter))
    }
}

// `total` e `uniqueActions` consideram o registro inteiro, não só o filtrado.
pub fn filter_logs(mut logs: Vec<AuditLog>, filter: &AuditFilter) -> AuditLogPage {
    let total = logs.len();

    let mut unique_actions: Vec<String> = Vec::new();
    for log in &logs {
        if !unique_actions.contains(&log.action) {
            unique_actions.push(log.action.clone());
        }
    }

    let search = filter
        .search
        .as_deref()
        .map(str::to_lowercase)
        .unwrap_or_default();

    logs.retain(|log| {
        let matches_search = search.is_empty()
            || log.user_name.to_lowercase().contains(&search)
            || log.action.to_lowercase().contains(&search)
            || log.details.to_lowercase().contains(&search);
        let matches_action = match filter.action.as_deref() {
            None | Some("all") => true,
            Some(action) => log.action == action,
        };
        matches_search && matches_action
    });

    logs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    AuditLogPage {
        total,
        unique_actions,
        logs,
    }
}
