// src/models/audit.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const ACTION_DELETE_PAYMENT: &str = "Eliminar Pago";
pub const ACTION_UPDATE_ORDER_STATUS: &str = "Actualizar Estado de Orden";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub action: String,
    pub details: String,
    pub timestamp: DateTime<Utc>,
}

// O que os serviços informam; id e timestamp são preenchidos na gravação.
#[derive(Debug, Clone)]
pub struct NewAuditEntry {
    pub user_id: String,
    pub user_name: String,
    pub action: &'static str,
    pub details: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct AuditFilter {
    pub search: Option<String>,
    pub action: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogPage {
    pub total: usize,
    pub unique_actions: Vec<String>,
    pub logs: Vec<AuditLog>,
}
