// src/db/finance_repo.rs

use async_trait::async_trait;

use crate::{
    common::error::AppError,
    db::store::{Collection, Collections},
    models::finance::Payment,
};

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn snapshot(&self) -> Result<Vec<Payment>, AppError>;

    async fn insert(&self, payment: Payment) -> Result<Payment, AppError>;

    /// Remove e devolve o pagamento; `PaymentNotFound` se o id não existe.
    async fn delete(&self, id: &str) -> Result<Payment, AppError>;
}

#[derive(Clone)]
pub struct FinanceRepository {
    collections: Collections,
}

impl FinanceRepository {
    pub fn new(collections: Collections) -> Self {
        Self { collections }
    }
}

#[async_trait]
impl PaymentRepository for FinanceRepository {
    async fn snapshot(&self) -> Result<Vec<Payment>, AppError> {
        self.collections.load(Collection::Payments).await
    }

    async fn insert(&self, payment: Payment) -> Result<Payment, AppError> {
        self.collections
            .update(Collection::Payments, move |payments: &mut Vec<Payment>| {
                payments.push(payment.clone());
                Ok(payment)
            })
            .await
    }

    async fn delete(&self, id: &str) -> Result<Payment, AppError> {
        self.collections
            .update(Collection::Payments, |payments: &mut Vec<Payment>| {
                let index = payments
                    .iter()
                    .position(|p| p.id == id)
                    .ok_or(AppError::PaymentNotFound)?;
                Ok(payments.remove(index))
            })
            .await
    }
}
