// src/models/finance.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::common::serde_utils::{optional_calendar_date, CalendarDate};

// --- Enums ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Transferencia,
    Efectivo,
    Cheque,
    Tarjeta,
}

// --- Structs ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,

    // Vínculo com a ordem (número e provedor denormalizados no momento do registro)
    pub order_id: String,
    #[serde(default)]
    pub order_number: String,
    #[serde(default)]
    pub provider_name: String,

    pub amount: Decimal,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub reference: String,

    pub payment_date: CalendarDate,
    #[serde(default)]
    pub receipt_url: Option<String>,

    pub created_at: DateTime<Utc>,
}

// --- Payloads ---

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPaymentPayload {
    #[validate(length(min = 1, message = "required"))]
    pub order_id: String,

    pub amount: Decimal,

    #[serde(default)]
    pub payment_method: PaymentMethod,

    #[serde(default)]
    #[validate(length(max = 120))]
    pub reference: String,

    // Sem data, vale o dia de hoje.
    #[serde(default, deserialize_with = "optional_calendar_date")]
    pub payment_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PaymentFilter {
    pub search: Option<String>,
}

// Cards do topo da tela de pagamentos
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSummary {
    pub total_paid: Decimal,
    pub paid_today: Decimal,
    pub paid_this_month: Decimal,
}
