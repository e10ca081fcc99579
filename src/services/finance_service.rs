// src/services/finance_service.rs

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        money::{is_accepted_amount, saturating_sum},
    },
    db::{OrderRepository, PaymentRepository},
    models::{
        audit::{NewAuditEntry, ACTION_DELETE_PAYMENT},
        auth::CurrentUser,
        finance::{Payment, PaymentFilter, PaymentSummary, RegisterPaymentPayload},
        operations::OrderStatus,
        statistics::Period,
    },
    services::audit_service::AuditService,
};

#[derive(Clone)]
pub struct FinanceService {
    payments: Arc<dyn PaymentRepository>,
    orders: Arc<dyn OrderRepository>,
    audit: AuditService,
    offset: FixedOffset,
}

impl FinanceService {
    pub fn new(
        payments: Arc<dyn PaymentRepository>,
        orders: Arc<dyn OrderRepository>,
        audit: AuditService,
        offset: FixedOffset,
    ) -> Self {
        Self { payments, orders, audit, offset }
    }

    fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.offset).date_naive()
    }

    /// Registra o pagamento de uma ordem completada.
    pub async fn register_payment(&self, payload: RegisterPaymentPayload) -> Result<Payment, AppError> {
        if payload.amount <= Decimal::ZERO || !is_accepted_amount(payload.amount) {
            return Err(AppError::InvalidAmount);
        }

        let order = self
            .orders
            .find_by_id(&payload.order_id)
            .await?
            .ok_or(AppError::OrderNotFound)?;

        if order.status != OrderStatus::Completed {
            return Err(AppError::OrderNotPayable);
        }

        let now = Utc::now();
        let payment = Payment {
            id: Uuid::new_v4().to_string(),
            order_id: order.id,
            order_number: order.order_number,
            provider_name: order.provider_name,
            amount: payload.amount,
            payment_method: payload.payment_method,
            reference: payload.reference,
            payment_date: payload.payment_date.unwrap_or_else(|| self.today(now)).into(),
            receipt_url: None,
            created_at: now,
        };

        let payment = self.payments.insert(payment).await?;
        tracing::info!("💰 Pagamento de {} registrado para {}", payment.amount, payment.order_number);

        Ok(payment)
    }

    pub async fn list_payments(&self, filter: &PaymentFilter) -> Result<Vec<Payment>, AppError> {
        let payments = self.payments.snapshot().await?;
        Ok(filter_payments(payments, filter))
    }

    pub async fn summary(&self) -> Result<PaymentSummary, AppError> {
        let payments = self.payments.snapshot().await?;
        Ok(summarize_payments(&payments, self.today(Utc::now()), self.offset))
    }

    /// Remove o pagamento e deixa o rastro na auditoria. Se a auditoria
    /// falhar, o pagamento é regravado e o erro volta para o chamador.
    pub async fn delete_payment(&self, user: &CurrentUser, payment_id: &str) -> Result<Payment, AppError> {
        let payment = self.payments.delete(payment_id).await?;

        let recorded = self
            .audit
            .record(NewAuditEntry {
                user_id: user.id.clone(),
                user_name: user.name.clone(),
                action: ACTION_DELETE_PAYMENT,
                details: format!(
                    "Pago {} - ${:.2} eliminado",
                    payment.order_number, payment.amount
                ),
            })
            .await;

        if let Err(e) = recorded {
            tracing::error!("❌ Auditoria falhou, pagamento {} restaurado: {:?}", payment.id, e);
            self.payments.insert(payment).await?;
            return Err(e);
        }

        Ok(payment)
    }
}

pub fn filter_payments(mut payments: Vec<Payment>, filter: &PaymentFilter) -> Vec<Payment> {
    if let Some(search) = filter.search.as_deref().map(str::to_lowercase) {
        payments.retain(|p| {
            p.order_number.to_lowercase().contains(&search)
                || p.provider_name.to_lowercase().contains(&search)
        });
    }
    payments
}

pub fn summarize_payments(payments: &[Payment], today: NaiveDate, offset: FixedOffset) -> PaymentSummary {
    let this_month = Period::containing(today);

    let sum = |keep: &dyn Fn(&Payment) -> bool| -> Decimal {
        saturating_sum(payments.iter().filter(|p| keep(p)).map(|p| p.amount))
    };

    PaymentSummary {
        total_paid: sum(&|_| true),
        paid_today: sum(&|p| p.payment_date.local_date(offset) == today),
        paid_this_month: sum(&|p| this_month.contains(p.payment_date.local_date(offset))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::{AuditRepository, Collections, FinanceRepository, MemoryCollectionStore, OperationsRepository},
        models::{audit::AuditLog, auth::Role, finance::PaymentMethod},
    };
    use chrono::{Offset, TimeZone};

    fn payment(order_number: &str, provider: &str, date: (i32, u32, u32), amount: i64) -> Payment {
        Payment {
            id: format!("{order_number}-{amount}"),
            order_id: "o".to_string(),
            order_number: order_number.to_string(),
            provider_name: provider.to_string(),
            amount: Decimal::from(amount),
            payment_method: PaymentMethod::Tarjeta,
            reference: String::new(),
            payment_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap().into(),
            receipt_url: None,
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn summary_splits_today_and_month() {
        let payments = vec![
            payment("ORD-1", "A", (2025, 3, 10), 100),
            payment("ORD-2", "A", (2025, 3, 2), 40),
            payment("ORD-3", "B", (2024, 3, 10), 7),
            payment("ORD-4", "B", (2025, 2, 28), 3),
        ];

        let summary = summarize_payments(&payments, NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(), Utc.fix());

        assert_eq!(summary.total_paid, Decimal::from(150));
        assert_eq!(summary.paid_today, Decimal::from(100));
        // Março de 2024 não conta como "este mês".
        assert_eq!(summary.paid_this_month, Decimal::from(140));
    }

    #[test]
    fn search_matches_order_number_or_provider() {
        let payments = vec![
            payment("ORD-12345", "Optica Sur", (2025, 3, 1), 1),
            payment("ORD-99999", "Laboratorio Norte", (2025, 3, 1), 2),
        ];

        let by_provider = filter_payments(payments.clone(), &PaymentFilter { search: Some("norte".into()) });
        let by_number = filter_payments(payments, &PaymentFilter { search: Some("ord-123".into()) });

        assert_eq!(by_provider.len(), 1);
        assert_eq!(by_provider[0].order_number, "ORD-99999");
        assert_eq!(by_number.len(), 1);
        assert_eq!(by_number[0].provider_name, "Optica Sur");
    }

    struct BrokenAuditTrail;

    #[async_trait::async_trait]
    impl AuditRepository for BrokenAuditTrail {
        async fn snapshot(&self) -> Result<Vec<AuditLog>, AppError> {
            Ok(Vec::new())
        }

        async fn append(&self, _log: AuditLog) -> Result<(), AppError> {
            Err(AppError::InternalServerError(anyhow::anyhow!("audit store offline")))
        }
    }

    #[tokio::test]
    async fn payment_survives_when_the_audit_trail_fails() {
        let collections = Collections::new(Arc::new(MemoryCollectionStore::new()));
        let payments = Arc::new(FinanceRepository::new(collections.clone()));
        payments
            .insert(payment("ORD-00042", "Optica Sur", (2025, 3, 1), 80))
            .await
            .unwrap();

        let service = FinanceService::new(
            payments.clone(),
            Arc::new(OperationsRepository::new(collections)),
            AuditService::new(Arc::new(BrokenAuditTrail)),
            Utc.fix(),
        );
        let admin = CurrentUser {
            id: "u1".to_string(),
            name: "Admin".to_string(),
            role: Role::Administrador,
        };

        let result = service.delete_payment(&admin, "ORD-00042-80").await;

        assert!(matches!(result, Err(AppError::InternalServerError(_))));
        let remaining = payments.snapshot().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].order_number, "ORD-00042");
    }
}
