// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use chrono::FixedOffset;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{
        CollectionStore, Collections, CrmRepository, FinanceRepository, InventoryRepository,
        OperationsRepository, PgCollectionStore, StoredAuditRepository,
    },
    services::{
        audit_service::AuditService, auth::AuthService, crm_service::CrmService,
        finance_service::FinanceService, inventory_service::InventoryService,
        operation_service::OperationService, statistics_service::StatisticsService,
    },
};

// Configuração lida do ambiente (.env em desenvolvimento)
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    /// Fuso usado no calendário dos relatórios.
    pub report_offset: FixedOffset,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let db_max_connections = match env::var("DB_MAX_CONNECTIONS") {
            Ok(raw) => raw.parse().context("DB_MAX_CONNECTIONS inválido")?,
            Err(_) => 5,
        };

        let offset_minutes: i32 = match env::var("REPORT_UTC_OFFSET_MINUTES") {
            Ok(raw) => raw.parse().context("REPORT_UTC_OFFSET_MINUTES inválido")?,
            Err(_) => 0,
        };
        let report_offset = FixedOffset::east_opt(offset_minutes * 60)
            .context("REPORT_UTC_OFFSET_MINUTES fora do intervalo")?;

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr,
            db_max_connections,
            report_offset,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub operation_service: OperationService,
    pub finance_service: FinanceService,
    pub inventory_service: InventoryService,
    pub crm_service: CrmService,
    pub audit_service: AuditService,
    pub statistics_service: StatisticsService,
}

impl AppState {
    /// Conecta ao banco e monta o estado sobre o armazenamento PostgreSQL.
    pub async fn connect(config: &AppConfig) -> anyhow::Result<(Self, PgPool)> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        let store = Arc::new(PgCollectionStore::new(db_pool.clone()));
        let state = Self::with_store(store, config.jwt_secret.clone(), config.report_offset);

        Ok((state, db_pool))
    }

    // --- Monta o gráfico de dependências ---
    pub fn with_store(
        store: Arc<dyn CollectionStore>,
        jwt_secret: String,
        report_offset: FixedOffset,
    ) -> Self {
        let collections = Collections::new(store);

        let order_repo = Arc::new(OperationsRepository::new(collections.clone()));
        let payment_repo = Arc::new(FinanceRepository::new(collections.clone()));
        let material_repo = Arc::new(InventoryRepository::new(collections.clone()));
        let provider_repo = Arc::new(CrmRepository::new(collections.clone()));
        let audit_repo = Arc::new(StoredAuditRepository::new(collections));

        let audit_service = AuditService::new(audit_repo);

        Self {
            auth_service: AuthService::new(jwt_secret),
            operation_service: OperationService::new(
                order_repo.clone(),
                provider_repo.clone(),
                audit_service.clone(),
            ),
            finance_service: FinanceService::new(
                payment_repo.clone(),
                order_repo.clone(),
                audit_service.clone(),
                report_offset,
            ),
            inventory_service: InventoryService::new(material_repo.clone()),
            crm_service: CrmService::new(provider_repo),
            statistics_service: StatisticsService::new(
                order_repo,
                payment_repo,
                material_repo,
                report_offset,
            ),
            audit_service,
        }
    }
}
