// src/db/inventory_repo.rs

use async_trait::async_trait;

use crate::{
    common::error::AppError,
    db::store::{Collection, Collections},
    models::inventory::Material,
};

#[async_trait]
pub trait MaterialRepository: Send + Sync {
    async fn snapshot(&self) -> Result<Vec<Material>, AppError>;

    /// Insere ou substitui pelo id.
    async fn save(&self, material: Material) -> Result<Material, AppError>;
}

#[derive(Clone)]
pub struct InventoryRepository {
    collections: Collections,
}

impl InventoryRepository {
    pub fn new(collections: Collections) -> Self {
        Self { collections }
    }
}

#[async_trait]
impl MaterialRepository for InventoryRepository {
    async fn snapshot(&self) -> Result<Vec<Material>, AppError> {
        self.collections.load(Collection::Materials).await
    }

    async fn save(&self, material: Material) -> Result<Material, AppError> {
        self.collections
            .update(Collection::Materials, move |materials: &mut Vec<Material>| {
                match materials.iter_mut().find(|m| m.id == material.id) {
                    Some(existing) => *existing = material.clone(),
                    None => materials.push(material.clone()),
                }
                Ok(material)
            })
            .await
    }
}
