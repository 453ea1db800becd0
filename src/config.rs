// src/config.rs

use std::{env, str::FromStr, time::Duration};

use rust_decimal::Decimal;
use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{
    db::{
        CatalogRepository, DiscrepancyRepository, LedgerRepository, OrderRepository,
        ProductRepository, StockRepository, UserRepository,
    },
    services::{
        AuthService, DiscrepancyService, InventoryService, LedgerService, OrderService,
        order_service::OrderPolicy,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub inventory_service: InventoryService,
    pub order_service: OrderService,
    pub ledger_service: LedgerService,
    pub discrepancy_service: DiscrepancyService,
    pub catalog_repo: CatalogRepository,
    pub product_repo: ProductRepository,
    pub stock_repo: StockRepository,
    pub user_repo: UserRepository,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").map_err(|_| anyhow::anyhow!("DATABASE_URL deve ser definida"))?;
        let jwt_secret =
            env::var("JWT_SECRET").map_err(|_| anyhow::anyhow!("JWT_SECRET deve ser definido"))?;

        // Política do motor de pedidos, configurável por deployment.
        let max_discount_percent = parse_env("MAX_DISCOUNT_PERCENT", Decimal::from(10))?;
        let only_superuser_cancel_order = parse_env("ONLY_SUPERUSER_CANCEL_ORDER", true)?;

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o grafo de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let catalog_repo = CatalogRepository::new(db_pool.clone());
        let product_repo = ProductRepository::new(db_pool.clone());
        let stock_repo = StockRepository::new(db_pool.clone());
        let order_repo = OrderRepository::new(db_pool.clone());
        let ledger_repo = LedgerRepository::new(db_pool.clone());
        let discrepancy_repo = DiscrepancyRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo.clone(), jwt_secret);
        let inventory_service = InventoryService::new(product_repo.clone());
        let order_service = OrderService::new(
            order_repo,
            OrderPolicy {
                max_discount_percent,
                only_superuser_cancel_order,
            },
            db_pool.clone(),
        );
        let ledger_service = LedgerService::new(ledger_repo, db_pool.clone());
        let discrepancy_service = DiscrepancyService::new(discrepancy_repo, stock_repo.clone());

        Ok(Self {
            db_pool,
            auth_service,
            inventory_service,
            order_service,
            ledger_service,
            discrepancy_service,
            catalog_repo,
            product_repo,
            stock_repo,
            user_repo,
        })
    }
}

fn parse_env<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| anyhow::anyhow!("Valor inválido para {}: {}", name, e)),
        Err(_) => Ok(default),
    }
}
