// src/routes.rs

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, patch, put},
    Router,
};

use crate::{config::AppState, handlers, middleware::auth::auth_guard};

pub fn build_router(app_state: AppState) -> Router {
    // Rotas do usuário logado
    let user_routes = Router::new()
        .route("/", get(handlers::auth::get_me))
        .route("/menu", get(handlers::auth::get_my_menu));

    let statistics_routes = Router::new()
        .route("/compare", get(handlers::statistics::compare_periods))
        .route("/export", get(handlers::statistics::export_report))
        .route("/provider", get(handlers::statistics::provider_statistics));

    let order_routes = Router::new()
        .route(
            "/",
            get(handlers::operations::list_orders).post(handlers::operations::create_order),
        )
        .route("/providers", get(handlers::crm::list_active_providers));

    let provider_panel_routes = Router::new()
        .route("/orders", get(handlers::operations::list_received_orders))
        .route(
            "/orders/{order_id}/status",
            patch(handlers::operations::update_order_status),
        );

    let payment_routes = Router::new()
        .route(
            "/",
            get(handlers::finance::list_payments).post(handlers::finance::register_payment),
        )
        .route("/summary", get(handlers::finance::payment_summary))
        .route("/{payment_id}", delete(handlers::finance::delete_payment));

    let material_routes = Router::new()
        .route(
            "/",
            get(handlers::inventory::list_materials).post(handlers::inventory::create_material),
        )
        .route("/{material_id}", put(handlers::inventory::update_material));

    let provider_routes = Router::new().route(
        "/",
        get(handlers::crm::list_providers).post(handlers::crm::create_provider),
    );

    // Tudo abaixo exige Bearer válido; as permissões ficam nos extratores dos handlers
    let protected = Router::new()
        .nest("/me", user_routes)
        .nest("/statistics", statistics_routes)
        .nest("/orders", order_routes)
        .nest("/provider", provider_panel_routes)
        .nest("/payments", payment_routes)
        .nest("/materials", material_routes)
        .nest("/providers", provider_routes)
        .route("/audit-logs", get(handlers::audit::list_audit_logs))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api", protected)
        .with_state(app_state)
}
