// src/models/inventory.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialKind {
    Lente,
    Tratamiento,
    Armazon,
}

// Material de catálogo mantido por um provedor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: MaterialKind,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub description: String,
    pub provider_id: String,
    #[serde(default)]
    pub provider_name: String,
    pub created_at: DateTime<Utc>,
}

impl Material {
    /// Valor do estoque (preço × quantidade).
    pub fn stock_value(&self) -> Decimal {
        self.price.saturating_mul(Decimal::from(self.stock))
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SaveMaterialPayload {
    #[validate(length(min = 1, max = 120, message = "required"))]
    pub name: String,

    #[serde(rename = "type")]
    pub kind: MaterialKind,

    pub price: Decimal,

    #[validate(range(min = 0, max = 1_000_000_000, message = "Stock fuera de rango"))]
    pub stock: i64,

    #[serde(default)]
    #[validate(length(max = 500))]
    pub description: String,
}
