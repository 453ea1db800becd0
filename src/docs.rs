// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::me,

        // --- Catálogo de produtos ---
        handlers::products::list_products,
        handlers::products::get_product,
        handlers::products::create_product,

        // --- Lotes ---
        handlers::stocks::list_stocks,
        handlers::stocks::create_stock,

        // --- Pedidos ---
        handlers::orders::create_order,
        handlers::orders::update_order_status,
        handlers::orders::get_order,

        // --- Razão / Discrepâncias ---
        handlers::ledger::record_transaction,
        handlers::discrepancies::create_discrepancy,
    ),
    components(
        schemas(
            models::auth::LoginPayload,
            models::auth::AuthResponse,
            models::product::ProductType,
            models::product::CreateProductPayload,
            models::product::ProductSummary,
            models::product::Stock,
            models::product::CreateStockPayload,
            models::order::OrderStatus,
            models::order::CreateOrderPayload,
            models::order::OrderLinePayload,
            models::order::Order,
            models::order::OrderLine,
            models::order::OrderDetail,
            models::ledger::TransactionType,
            models::ledger::RecordTransactionPayload,
            models::ledger::CustomerTransaction,
            models::ledger::DistributionTransaction,
            models::discrepancy::DiscrepancyType,
            models::discrepancy::CreateDiscrepancyPayload,
            models::discrepancy::InventoryDiscrepancy,
        )
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Pharmacy Backend API",
        description = "Estoque, pedidos e razão de uma farmácia."
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}
