// src/services/inventory_service.rs

use std::sync::Arc;

use chrono::Utc;

use crate::{
    common::{error::AppError, money::is_accepted_amount},
    db::MaterialRepository,
    models::{
        auth::CurrentUser,
        inventory::{Material, SaveMaterialPayload},
    },
};

#[derive(Clone)]
pub struct InventoryService {
    repo: Arc<dyn MaterialRepository>,
}

impl InventoryService {
    pub fn new(repo: Arc<dyn MaterialRepository>) -> Self {
        Self { repo }
    }

    pub async fn list_own(&self, provider: &CurrentUser) -> Result<Vec<Material>, AppError> {
        let materials = self.repo.snapshot().await?;
        Ok(materials
            .into_iter()
            .filter(|m| m.provider_id == provider.id)
            .collect())
    }

    pub async fn create(
        &self,
        provider: &CurrentUser,
        payload: SaveMaterialPayload,
    ) -> Result<Material, AppError> {
        if !is_accepted_amount(payload.price) {
            return Err(AppError::InvalidAmount);
        }

        let now = Utc::now();
        let material = Material {
            id: format!("material-{}", now.timestamp_millis()),
            name: payload.name,
            kind: payload.kind,
            price: payload.price,
            stock: payload.stock,
            description: payload.description,
            provider_id: provider.id.clone(),
            provider_name: provider.name.clone(),
            created_at: now,
        };

        self.repo.save(material).await
    }

    /// Atualiza um material do próprio provedor; de outro provedor conta como inexistente.
    pub async fn update(
        &self,
        provider: &CurrentUser,
        material_id: &str,
        payload: SaveMaterialPayload,
    ) -> Result<Material, AppError> {
        if !is_accepted_amount(payload.price) {
            return Err(AppError::InvalidAmount);
        }

        let existing = self
            .list_own(provider)
            .await?
            .into_iter()
            .find(|m| m.id == material_id)
            .ok_or(AppError::MaterialNotFound)?;

        let material = Material {
            name: payload.name,
            kind: payload.kind,
            price: payload.price,
            stock: payload.stock,
            description: payload.description,
            ..existing
        };

        self.repo.save(material).await
    }
}
