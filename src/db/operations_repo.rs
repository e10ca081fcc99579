// src/db/operations_repo.rs

use async_trait::async_trait;

use crate::{
    common::error::AppError,
    db::store::{Collection, Collections},
    models::operations::Order,
};

pub type OrderChange = Box<dyn FnOnce(&mut Order) -> Result<(), AppError> + Send>;

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Cópia imutável de todas as ordens no momento da leitura.
    async fn snapshot(&self) -> Result<Vec<Order>, AppError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Order>, AppError>;

    async fn insert(&self, order: Order) -> Result<Order, AppError>;

    /// Aplica `change` à ordem `id` e devolve a versão gravada.
    async fn update(&self, id: &str, change: OrderChange) -> Result<Order, AppError>;
}

#[derive(Clone)]
pub struct OperationsRepository {
    collections: Collections,
}

impl OperationsRepository {
    pub fn new(collections: Collections) -> Self {
        Self { collections }
    }
}

#[async_trait]
impl OrderRepository for OperationsRepository {
    async fn snapshot(&self) -> Result<Vec<Order>, AppError> {
        self.collections.load(Collection::Orders).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Order>, AppError> {
        let orders: Vec<Order> = self.collections.load(Collection::Orders).await?;
        Ok(orders.into_iter().find(|o| o.id == id))
    }

    async fn insert(&self, order: Order) -> Result<Order, AppError> {
        self.collections
            .update(Collection::Orders, move |orders: &mut Vec<Order>| {
                orders.push(order.clone());
                Ok(order)
            })
            .await
    }

    async fn update(&self, id: &str, change: OrderChange) -> Result<Order, AppError> {
        self.collections
            .update(Collection::Orders, |orders: &mut Vec<Order>| {
                let order = orders
                    .iter_mut()
                    .find(|o| o.id == id)
                    .ok_or(AppError::OrderNotFound)?;
                change(&mut *order)?;
                Ok(order.clone())
            })
            .await
    }
}
