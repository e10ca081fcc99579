// src/db/audit_repo.rs

use async_trait::async_trait;

use crate::{
    common::error::AppError,
    db::store::{Collection, Collections},
    models::audit::AuditLog,
};

#[async_trait]
pub trait AuditRepository: Send + Sync {
    async fn snapshot(&self) -> Result<Vec<AuditLog>, AppError>;

    async fn append(&self, log: AuditLog) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct StoredAuditRepository {
    collections: Collections,
}

impl StoredAuditRepository {
    pub fn new(collections: Collections) -> Self {
        Self { collections }
    }
}

#[async_trait]
impl AuditRepository for StoredAuditRepository {
    async fn snapshot(&self) -> Result<Vec<AuditLog>, AppError> {
        self.collections.load(Collection::AuditLogs).await
    }

    async fn append(&self, log: AuditLog) -> Result<(), AppError> {
        self.collections
            .update(Collection::AuditLogs, move |logs: &mut Vec<AuditLog>| {
                logs.push(log);
                Ok(())
            })
            .await
    }
}
