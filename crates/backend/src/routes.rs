use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::handlers;
use crate::system;

/// Montar o roteador da aplicação.
///
/// Rotas públicas: health e autenticação (login/verify/refresh/logout).
/// Todo o resto de /api exige bearer token válido; a administração de
/// usuários exige admin.
pub fn build_router() -> Router {
    // ========================================
    // AUTH (público)
    // ========================================
    let auth_routes = Router::new()
        .route("/api/auth/login", post(system::handlers::auth::login))
        .route("/api/auth/verify", get(system::handlers::auth::verify))
        .route("/api/auth/refresh", post(system::handlers::auth::refresh))
        .route("/api/auth/logout", post(system::handlers::auth::logout))
        .route(
            "/api/auth/me",
            get(system::handlers::auth::current_user)
                .layer(middleware::from_fn(system::auth::middleware::require_auth)),
        );

    // ========================================
    // ADMINISTRAÇÃO DE USUÁRIOS (admin)
    // ========================================
    let admin_routes = Router::new()
        .route(
            "/api/system/users",
            get(system::handlers::users::list).post(system::handlers::users::create),
        )
        .route(
            "/api/system/users/:id",
            get(system::handlers::users::get_by_id)
                .put(system::handlers::users::update)
                .delete(system::handlers::users::delete),
        )
        .layer(middleware::from_fn(system::auth::middleware::require_admin));

    let change_password_route = Router::new()
        .route(
            "/api/system/users/:id/change-password",
            post(system::handlers::users::change_password),
        )
        .layer(middleware::from_fn(system::auth::middleware::require_auth));

    // ========================================
    // ROTAS DE NEGÓCIO (bearer token)
    // ========================================
    let business_routes = Router::new()
        // Catálogo de produtos
        .route(
            "/api/produtos",
            get(handlers::a001_product::list_all).post(handlers::a001_product::upsert),
        )
        .route(
            "/api/produtos/list",
            get(handlers::a001_product::list_paginated),
        )
        .route(
            "/api/produtos/:id",
            get(handlers::a001_product::get_by_id).delete(handlers::a001_product::delete),
        )
        // Estoque (contrato legado)
        .route("/api/estoque", get(handlers::a001_product::estoque_list))
        .route("/api/estoque/entrada", post(handlers::a005_stock::entrada))
        .route("/api/estoque/saida", post(handlers::a005_stock::saida))
        .route(
            "/api/estoque/movimentos",
            get(handlers::a005_stock::movimentos),
        )
        // Clientes
        .route(
            "/api/clientes",
            get(handlers::a002_customer::list_all).post(handlers::a002_customer::upsert),
        )
        .route(
            "/api/clientes/:id",
            get(handlers::a002_customer::get_by_id).delete(handlers::a002_customer::delete),
        )
        // Vendas
        .route(
            "/api/vendas",
            get(handlers::a003_sale::list).post(handlers::a003_sale::create),
        )
        .route(
            "/api/vendas/:id",
            get(handlers::a003_sale::get_by_id).delete(handlers::a003_sale::delete),
        )
        // Pagamentos
        .route(
            "/api/pagamentos",
            get(handlers::a004_payment::list_all).post(handlers::a004_payment::upsert),
        )
        .route(
            "/api/pagamentos/:id",
            get(handlers::a004_payment::get_by_id).delete(handlers::a004_payment::delete),
        )
        // Envios FULL (conciliação)
        .route(
            "/api/envios/full",
            get(handlers::a006_full_shipment::list_groups),
        )
        .route(
            "/api/envios/full/pendentes",
            get(handlers::a006_full_shipment::pendentes),
        )
        .route(
            "/api/envios/full/relacionar-manual",
            post(handlers::a006_full_shipment::relacionar_manual),
        )
        .route(
            "/api/envios/full/kits/find-by-composition",
            post(handlers::a006_full_shipment::kits_find_by_composition),
        )
        .route(
            "/api/envios/full/kits/create-and-relate",
            post(handlers::a006_full_shipment::kits_create_and_relate),
        )
        .route(
            "/api/envios/full/:shipment_number",
            get(handlers::a006_full_shipment::get_group),
        )
        .route(
            "/api/envios/full/:shipment_number/emitir",
            post(handlers::a006_full_shipment::emitir),
        )
        // UseCase u501: importação FULL
        .route(
            "/api/u501/import/start",
            post(handlers::usecases::u501_start_import),
        )
        .route(
            "/api/u501/import/:session_id/progress",
            get(handlers::usecases::u501_get_progress),
        )
        // UseCase u502: conciliação automática
        .route(
            "/api/u502/match/start",
            post(handlers::usecases::u502_start_matching),
        )
        .route(
            "/api/u502/match/:session_id/progress",
            get(handlers::usecases::u502_get_progress),
        )
        // D400: resumo de vendas
        .route(
            "/api/d400/resumo-vendas",
            get(handlers::d400_sales_summary::resumo_vendas),
        )
        .route(
            "/api/d400/resumo-vendas.csv",
            get(handlers::d400_sales_summary::resumo_vendas_csv),
        )
        .route(
            "/api/d400/top-produtos",
            get(handlers::d400_sales_summary::top_produtos),
        )
        .route(
            "/api/d400/categorias",
            get(handlers::d400_sales_summary::categorias),
        )
        // D401: saldos de clientes
        .route(
            "/api/d401/saldos",
            get(handlers::d401_customer_balances::saldos),
        )
        .route(
            "/api/d401/saldos/:customer/extrato",
            get(handlers::d401_customer_balances::extrato),
        )
        .layer(middleware::from_fn(system::auth::middleware::require_auth));

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .merge(auth_routes)
        .merge(admin_routes)
        .merge(change_password_route)
        .merge(business_routes)
        .fallback_service(ServeDir::new("dist"))
}
