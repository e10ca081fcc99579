// src/services/operation_service.rs

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::{error::AppError, money::is_accepted_amount},
    db::{OrderRepository, ProviderRepository},
    models::{
        audit::{NewAuditEntry, ACTION_UPDATE_ORDER_STATUS},
        auth::CurrentUser,
        crm::ProviderStatus,
        operations::{
            CreateOrderPayload, Order, OrderFilter, OrderStatus, ProviderOrdersView,
            UpdateOrderStatusPayload,
        },
    },
    services::audit_service::AuditService,
};

#[derive(Clone)]
pub struct OperationService {
    orders: Arc<dyn OrderRepository>,
    providers: Arc<dyn ProviderRepository>,
    audit: AuditService,
}

impl OperationService {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        providers: Arc<dyn ProviderRepository>,
        audit: AuditService,
    ) -> Self {
        Self { orders, providers, audit }
    }

    pub async fn create_order(&self, payload: CreateOrderPayload) -> Result<Order, AppError> {
        if !is_accepted_amount(payload.total_amount) {
            return Err(AppError::InvalidAmount);
        }

        // 1. Só provedores ativos recebem ordens
        let provider = self
            .providers
            .find_by_id(&payload.provider_id)
            .await?
            .filter(|p| p.status == ProviderStatus::Active)
            .ok_or(AppError::ProviderUnavailable)?;

        // 2. Monta a ordem
        let created_at = Utc::now();
        let order = Order {
            id: Uuid::new_v4().to_string(),
            order_number: Order::number_for(created_at),
            provider_id: provider.id,
            provider_name: provider.name,
            client_name: payload.client_name,
            client_document: payload.client_document,
            optical_formula: payload.optical_formula,
            lens_type: payload.lens_type,
            treatment: payload.treatment,
            total_amount: payload.total_amount,
            estimated_date: payload.estimated_date,
            estimated_delivery_date: None,
            delivered_at: None,
            observations: payload.observations,
            status: OrderStatus::Pending,
            created_at,
        };

        let order = self.orders.insert(order).await?;
        tracing::info!("🧾 Ordem {} criada para {}", order.order_number, order.provider_name);

        Ok(order)
    }

    pub async fn list_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>, AppError> {
        let orders = self.orders.snapshot().await?;
        Ok(filter_orders(orders, filter))
    }

    /// Ordens recebidas pelo provedor autenticado.
    pub async fn list_provider_orders(&self, provider: &CurrentUser) -> Result<ProviderOrdersView, AppError> {
        let mut orders: Vec<Order> = self
            .orders
            .snapshot()
            .await?
            .into_iter()
            .filter(|o| o.provider_name == provider.name)
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let count = |status: OrderStatus| orders.iter().filter(|o| o.status == status).count();

        Ok(ProviderOrdersView {
            pending_orders: count(OrderStatus::Pending),
            in_progress_orders: count(OrderStatus::InProcess),
            completed_orders: count(OrderStatus::Completed),
            orders,
        })
    }

    pub async fn update_status(
        &self,
        provider: &CurrentUser,
        order_id: &str,
        payload: UpdateOrderStatusPayload,
    ) -> Result<Order, AppError> {
        let provider_name = provider.name.clone();
        let new_status = payload.status;
        let estimated = payload.estimated_delivery_date;

        let order = self
            .orders
            .update(
                order_id,
                Box::new(move |order: &mut Order| {
                    // Ordem de outro provedor se comporta como inexistente.
                    if order.provider_name != provider_name {
                        return Err(AppError::OrderNotFound);
                    }
                    if !order.status.can_transition_to(new_status) {
                        return Err(AppError::InvalidStatusTransition {
                            from: order.status.to_string(),
                            to: new_status.to_string(),
                        });
                    }
                    if new_status == OrderStatus::Delivered && order.status != OrderStatus::Delivered {
                        order.delivered_at = Some(Utc::now());
                    }
                    order.status = new_status;
                    if estimated.is_some() {
                        order.estimated_delivery_date = estimated;
                    }
                    Ok(())
                }),
            )
            .await?;

        self.audit
            .record(NewAuditEntry {
                user_id: provider.id.clone(),
                user_name: provider.name.clone(),
                action: ACTION_UPDATE_ORDER_STATUS,
                details: format!("Orden {} actualizada a {}", order.order_number, new_status),
            })
            .await?;

        Ok(order)
    }
}

pub fn filter_orders(mut orders: Vec<Order>, filter: &OrderFilter) -> Vec<Order> {
    let search = filter
        .search
        .as_deref()
        .map(str::to_lowercase)
        .unwrap_or_default();

    orders.retain(|o| {
        let matches_search = search.is_empty()
            || o.order_number.to_lowercase().contains(&search)
            || o.client_name.to_lowercase().contains(&search)
            || o.provider_name.to_lowercase().contains(&search);
        let matches_status = filter.status.is_none_or(|s| o.status == s);
        matches_search && matches_status
    });

    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    orders
}
