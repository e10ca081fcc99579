// src/models/operations.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::common::serde_utils::{all_or, optional_calendar_date};

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    #[serde(rename = "pendiente")]
    Pending,
    #[serde(rename = "en_proceso")]
    InProcess,
    #[serde(rename = "completada")]
    Completed,
    #[serde(rename = "entregada")]
    Delivered,
    #[serde(rename = "cancelada")]
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pendiente",
            OrderStatus::InProcess => "en_proceso",
            OrderStatus::Completed => "completada",
            OrderStatus::Delivered => "entregada",
            OrderStatus::Cancelled => "cancelada",
        }
    }

    /// Entregada e cancelada são estados finais.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        *self == next || !self.is_terminal()
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Fórmula óptica ---

// Os valores são guardados exatamente como digitados no formulário ("+1.25", "-0.50", "180").
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct EyePrescription {
    #[validate(length(max = 16))]
    pub sphere: String,
    #[validate(length(max = 16))]
    pub cylinder: String,
    #[validate(length(max = 16))]
    pub axis: String,
    #[validate(length(max = 16))]
    pub addition: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct OpticalFormula {
    /// Olho direito
    #[validate(nested)]
    pub od: EyePrescription,
    /// Olho esquerdo
    #[validate(nested)]
    pub oi: EyePrescription,
}

// --- Ordem de trabalho ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub order_number: String,
    #[serde(default)]
    pub provider_id: String,
    #[serde(default)]
    pub provider_name: String,
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub client_document: String,
    #[serde(default)]
    pub optical_formula: OpticalFormula,
    #[serde(default)]
    pub lens_type: String,
    #[serde(default)]
    pub treatment: String,
    #[serde(default)]
    pub total_amount: Decimal,
    #[serde(default, deserialize_with = "optional_calendar_date")]
    pub estimated_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "optional_calendar_date")]
    pub estimated_delivery_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub observations: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Número visível da ordem: `ORD-` + últimos cinco dígitos do epoch em milissegundos.
    pub fn number_for(created_at: DateTime<Utc>) -> String {
        let millis = created_at.timestamp_millis().rem_euclid(100_000);
        format!("ORD-{millis:05}")
    }
}

// --- Payloads ---

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderPayload {
    #[validate(length(min = 1, message = "required"))]
    pub provider_id: String,

    #[validate(length(min = 1, max = 120, message = "required"))]
    pub client_name: String,

    #[serde(default)]
    #[validate(length(max = 32))]
    pub client_document: String,

    #[serde(default)]
    #[validate(nested)]
    pub optical_formula: OpticalFormula,

    #[serde(default = "default_lens_type")]
    #[validate(length(min = 1, message = "required"))]
    pub lens_type: String,

    #[serde(default)]
    pub treatment: String,

    pub total_amount: Decimal,

    #[serde(default, deserialize_with = "optional_calendar_date")]
    pub estimated_date: Option<NaiveDate>,

    #[serde(default)]
    #[validate(length(max = 1000))]
    pub observations: String,
}

fn default_lens_type() -> String {
    "monofocal".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderStatusPayload {
    pub status: OrderStatus,
    #[serde(default, deserialize_with = "optional_calendar_date")]
    pub estimated_delivery_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OrderFilter {
    pub search: Option<String>,
    #[serde(default, deserialize_with = "all_or")]
    pub status: Option<OrderStatus>,
}

// Lista de ordens recebidas pelo provedor, com os contadores do topo da tela.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderOrdersView {
    pub pending_orders: usize,
    pub in_progress_orders: usize,
    pub completed_orders: usize,
    pub orders: Vec<Order>,
}
