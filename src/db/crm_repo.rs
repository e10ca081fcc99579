// src/db/crm_repo.rs

use async_trait::async_trait;

use crate::{
    common::error::AppError,
    db::store::{Collection, Collections},
    models::crm::Provider,
};

#[async_trait]
pub trait ProviderRepository: Send + Sync {
    async fn snapshot(&self) -> Result<Vec<Provider>, AppError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Provider>, AppError>;

    async fn insert(&self, provider: Provider) -> Result<Provider, AppError>;
}

#[derive(Clone)]
pub struct CrmRepository {
    collections: Collections,
}

impl CrmRepository {
    pub fn new(collections: Collections) -> Self {
        Self { collections }
    }
}

#[async_trait]
impl ProviderRepository for CrmRepository {
    async fn snapshot(&self) -> Result<Vec<Provider>, AppError> {
        self.collections.load(Collection::Providers).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Provider>, AppError> {
        let providers: Vec<Provider> = self.collections.load(Collection::Providers).await?;
        Ok(providers.into_iter().find(|p| p.id == id))
    }

    async fn insert(&self, provider: Provider) -> Result<Provider, AppError> {
        self.collections
            .update(Collection::Providers, move |providers: &mut Vec<Provider>| {
                providers.push(provider.clone());
                Ok(provider)
            })
            .await
    }
}
