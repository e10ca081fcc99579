// src/models/crm.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::common::serde_utils::all_or;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderStatus {
    #[default]
    Active,
    Inactive,
}

// Laboratório / fornecedor que recebe as ordens de trabalho
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub contact_person: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub service_type: String,
    #[serde(default)]
    pub status: ProviderStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProviderPayload {
    #[validate(length(min = 1, max = 120, message = "required"))]
    pub name: String,

    #[serde(default)]
    pub contact_person: String,

    #[serde(default)]
    pub phone: String,

    #[serde(default)]
    #[validate(email(message = "El correo electrónico es inválido."))]
    pub email: Option<String>,

    #[serde(default)]
    pub service_type: String,

    #[serde(default)]
    pub status: ProviderStatus,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProviderFilter {
    #[serde(default, deserialize_with = "all_or")]
    pub status: Option<ProviderStatus>,
}
