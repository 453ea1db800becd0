//src/main.rs

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post},
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_target(false)
        .compact()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas públicas: health e emissão de token
    let public_routes = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/token", post(handlers::auth::login));

    // Usuários (CRUD restrito a superusuário; /me para qualquer autenticado)
    let user_routes = Router::new()
        .route(
            "/",
            post(handlers::users::create_user).get(handlers::users::list_users),
        )
        .route("/me", get(handlers::auth::me))
        .route(
            "/{id}",
            get(handlers::users::get_user)
                .put(handlers::users::update_user)
                .delete(handlers::users::delete_user),
        );

    // Dados mestres
    let catalog_routes = Router::new()
        .route(
            "/companies",
            post(handlers::catalog::create_company).get(handlers::catalog::list_companies),
        )
        .route(
            "/formulas",
            post(handlers::catalog::create_formula).get(handlers::catalog::list_formulas),
        )
        .route(
            "/distributions",
            post(handlers::catalog::create_distribution)
                .get(handlers::catalog::list_distributions),
        )
        .route(
            "/customers",
            post(handlers::catalog::create_customer).get(handlers::catalog::list_customers),
        );

    // Catálogo de produtos + lotes
    let inventory_routes = Router::new()
        .route(
            "/products",
            get(handlers::products::list_products).post(handlers::products::create_product),
        )
        .route(
            "/products/{id}",
            get(handlers::products::get_product)
                .put(handlers::products::update_product)
                .delete(handlers::products::delete_product),
        )
        .route(
            "/stocks",
            get(handlers::stocks::list_stocks).post(handlers::stocks::create_stock),
        )
        .route(
            "/stocks/{id}",
            get(handlers::stocks::get_stock)
                .put(handlers::stocks::update_stock)
                .delete(handlers::stocks::delete_stock),
        );

    // Pedidos + razão + discrepâncias
    let order_routes = Router::new()
        .route(
            "/orders",
            post(handlers::orders::create_order).get(handlers::orders::list_orders),
        )
        .route(
            "/orders/{id}",
            get(handlers::orders::get_order).patch(handlers::orders::update_order_status),
        )
        .route("/transactions", post(handlers::ledger::record_transaction))
        .route(
            "/transactions/customers",
            get(handlers::ledger::list_customer_transactions),
        )
        .route(
            "/transactions/distributions",
            get(handlers::ledger::list_distribution_transactions),
        )
        .route(
            "/discrepancies",
            post(handlers::discrepancies::create_discrepancy)
                .get(handlers::discrepancies::list_discrepancies),
        );

    // Tudo que não é público passa pela guarda de autenticação
    let protected = Router::new()
        .nest("/api/users", user_routes)
        .nest("/api", catalog_routes)
        .nest("/api", inventory_routes)
        .nest("/api", order_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let app = Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .merge(public_routes)
        .merge(protected)
        .with_state(app_state);

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", addr);
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}
