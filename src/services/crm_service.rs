// src/services/crm_service.rs

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ProviderRepository,
    models::crm::{CreateProviderPayload, Provider, ProviderFilter},
};

#[derive(Clone)]
pub struct CrmService {
    repo: Arc<dyn ProviderRepository>,
}

impl CrmService {
    pub fn new(repo: Arc<dyn ProviderRepository>) -> Self {
        Self { repo }
    }

    pub async fn create_provider(&self, payload: CreateProviderPayload) -> Result<Provider, AppError> {
        let provider = Provider {
            id: Uuid::new_v4().to_string(),
            name: payload.name,
            contact_person: payload.contact_person,
            phone: payload.phone,
            email: payload.email.unwrap_or_default(),
            service_type: payload.service_type,
            status: payload.status,
            created_at: Utc::now(),
        };

        let provider = self.repo.insert(provider).await?;
        tracing::info!("🏭 Proveedor '{}' cadastrado", provider.name);

        Ok(provider)
    }

    pub async fn list_providers(&self, filter: &ProviderFilter) -> Result<Vec<Provider>, AppError> {
        let providers = self.repo.snapshot().await?;
        Ok(providers
            .into_iter()
            .filter(|p| filter.status.is_none_or(|s| p.status == s))
            .collect())
    }
}
