// src/db/store.rs

//! Armazenamento chave-valor das coleções.
//!
//! Cada coleção (orders, payments, ...) é um array JSON guardado como texto
//! sob o nome da coleção.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use sqlx::PgPool;
use tokio::sync::{Mutex, RwLock};

use crate::common::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Orders,
    Payments,
    Materials,
    Providers,
    AuditLogs,
}

impl Collection {
    pub fn key(&self) -> &'static str {
        match self {
            Collection::Orders => "orders",
            Collection::Payments => "payments",
            Collection::Materials => "materials",
            Collection::Providers => "providers",
            Collection::AuditLogs => "auditLogs",
        }
    }
}

#[async_trait]
pub trait CollectionStore: Send + Sync {
    /// Texto bruto guardado sob `key`, ou `None` se a chave não existe.
    async fn load_raw(&self, key: &str) -> Result<Option<String>, AppError>;

    async fn save_raw(&self, key: &str, value: String) -> Result<(), AppError>;
}

// ---
// PostgreSQL
// ---

#[derive(Clone)]
pub struct PgCollectionStore {
    pool: PgPool,
}

impl PgCollectionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CollectionStore for PgCollectionStore {
    async fn load_raw(&self, key: &str) -> Result<Option<String>, AppError> {
        let value = sqlx::query_scalar::<_, String>("SELECT value FROM collections WHERE name = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }

    async fn save_raw(&self, key: &str, value: String) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO collections (name, value, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (name) DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

// ---
// Em memória (testes e execução local)
// ---

#[derive(Clone, Default)]
pub struct MemoryCollectionStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryCollectionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CollectionStore for MemoryCollectionStore {
    async fn load_raw(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn save_raw(&self, key: &str, value: String) -> Result<(), AppError> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }
}

// ---
// Acesso tipado compartilhado pelos repositórios
// ---

/// Store + trava de escrita. Leituras não travam; toda escrita
/// (ler-modificar-gravar) passa pela mesma trava.
#[derive(Clone)]
pub struct Collections {
    store: Arc<dyn CollectionStore>,
    write_lock: Arc<Mutex<()>>,
}

impl Collections {
    pub fn new(store: Arc<dyn CollectionStore>) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Coleção ausente ou ilegível vira lista vazia. Registros malformados
    /// dentro de um array válido são descartados.
    pub async fn load<T: DeserializeOwned>(&self, collection: Collection) -> Result<Vec<T>, AppError> {
        let Some(raw) = self.store.load_raw(collection.key()).await? else {
            return Ok(Vec::new());
        };

        let items: Vec<Value> = match serde_json::from_str(&raw) {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!("⚠️ Coleção '{}' ilegível, tratada como vazia: {}", collection.key(), e);
                return Ok(Vec::new());
            }
        };

        let (parsed, skipped) = split_records::<T>(items);
        if !skipped.is_empty() {
            tracing::warn!(
                "⚠️ {} registro(s) malformado(s) ignorado(s) em '{}'",
                skipped.len(),
                collection.key()
            );
        }

        Ok(parsed)
    }

    /// Carrega, aplica `change` e grava a coleção inteira sob a trava de escrita.
    ///
    /// Ao contrário de `load`, a escrita é estrita: uma coleção ilegível não é
    /// sobrescrita, e registros que não desserializam em `T` voltam intactos
    /// para o fim do array.
    pub async fn update<T, R, F>(&self, collection: Collection, change: F) -> Result<R, AppError>
    where
        T: DeserializeOwned + Serialize,
        F: FnOnce(&mut Vec<T>) -> Result<R, AppError>,
    {
        let _guard = self.write_lock.lock().await;

        let items: Vec<Value> = match self.store.load_raw(collection.key()).await? {
            None => Vec::new(),
            Some(raw) => serde_json::from_str(&raw).map_err(|e| {
                tracing::error!("❌ Coleção '{}' ilegível, escrita recusada: {}", collection.key(), e);
                AppError::CorruptCollection(collection.key())
            })?,
        };

        let (mut typed, untouched) = split_records::<T>(items);
        let result = change(&mut typed)?;

        let mut records = typed
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<Value>, _>>()?;
        records.extend(untouched);

        let raw = serde_json::to_string(&records)?;
        self.store.save_raw(collection.key(), raw).await?;

        Ok(result)
    }
}

// Separa os registros que desserializam em `T` dos que não desserializam.
fn split_records<T: DeserializeOwned>(items: Vec<Value>) -> (Vec<T>, Vec<Value>) {
    let mut parsed = Vec::with_capacity(items.len());
    let mut rest = Vec::new();
    for item in items {
        match T::deserialize(&item) {
            Ok(value) => parsed.push(value),
            Err(_) => rest.push(item),
        }
    }
    (parsed, rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Item {
        id: u32,
    }

    #[tokio::test]
    async fn missing_and_garbage_collections_read_as_empty() {
        let store = MemoryCollectionStore::new();
        store.save_raw("payments", "{not json".to_string()).await.unwrap();
        let collections = Collections::new(Arc::new(store));

        let orders: Vec<Item> = collections.load(Collection::Orders).await.unwrap();
        let payments: Vec<Item> = collections.load(Collection::Payments).await.unwrap();

        assert!(orders.is_empty());
        assert!(payments.is_empty());
    }

    #[tokio::test]
    async fn malformed_records_are_skipped() {
        let store = MemoryCollectionStore::new();
        store
            .save_raw("orders", r#"[{"id": 1}, {"id": "x"}, {"id": 3}]"#.to_string())
            .await
            .unwrap();
        let collections = Collections::new(Arc::new(store));

        let items: Vec<Item> = collections.load(Collection::Orders).await.unwrap();
        assert_eq!(items, vec![Item { id: 1 }, Item { id: 3 }]);
    }

    #[tokio::test]
    async fn update_persists_the_whole_collection() {
        let store = MemoryCollectionStore::new();
        let collections = Collections::new(Arc::new(store.clone()));

        collections
            .update(Collection::AuditLogs, |items: &mut Vec<Item>| {
                items.push(Item { id: 7 });
                Ok(())
            })
            .await
            .unwrap();

        let raw = store.load_raw("auditLogs").await.unwrap().unwrap();
        assert_eq!(raw, r#"[{"id":7}]"#);
    }

    #[tokio::test]
    async fn update_keeps_records_it_cannot_read() {
        let store = MemoryCollectionStore::new();
        store
            .save_raw("orders", r#"[{"id":1},{"id":"legacy"}]"#.to_string())
            .await
            .unwrap();
        let collections = Collections::new(Arc::new(store.clone()));

        collections
            .update(Collection::Orders, |items: &mut Vec<Item>| {
                items.push(Item { id: 2 });
                Ok(())
            })
            .await
            .unwrap();

        let raw = store.load_raw("orders").await.unwrap().unwrap();
        assert_eq!(raw, r#"[{"id":1},{"id":2},{"id":"legacy"}]"#);
    }

    #[tokio::test]
    async fn update_refuses_to_overwrite_an_unreadable_collection() {
        let store = MemoryCollectionStore::new();
        store.save_raw("payments", "{corrupt".to_string()).await.unwrap();
        let collections = Collections::new(Arc::new(store.clone()));

        let result = collections
            .update(Collection::Payments, |items: &mut Vec<Item>| {
                items.push(Item { id: 9 });
                Ok(())
            })
            .await;

        assert!(matches!(result, Err(AppError::CorruptCollection("payments"))));
        let raw = store.load_raw("payments").await.unwrap().unwrap();
        assert_eq!(raw, "{corrupt");
    }
}
