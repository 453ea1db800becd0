// src/db/order_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, FromRow, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::order::{Order, OrderLine, OrderStatus},
};

// Pedidos e linhas de pedido. Toda sequência ler-checar-escrever sobre
// `stocks.qty` passa por aqui com lock de linha (`FOR UPDATE`), sempre
// ordenado por id de lote para não haver deadlock entre transições.
#[derive(Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

// Lote como visto na criação do pedido: saldo comprometido + preço.
#[derive(Debug, Clone, FromRow)]
pub struct StockForOrder {
    pub id: Uuid,
    pub qty: i32,
    pub sale_price: Decimal,
    pub product_name: String,
}

// Linha + lote travado, usada nas transições de status.
#[derive(Debug, Clone, FromRow)]
pub struct LockedLine {
    pub stock_id: Uuid,
    pub quantity: i32,
    pub qty: i32,
    pub product_name: String,
}

impl OrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn stocks_for_lines<'e, E>(
        &self,
        executor: E,
        stock_ids: &[Uuid],
    ) -> Result<Vec<StockForOrder>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, StockForOrder>(
            r#"
            SELECT s.id, s.qty, s.sale_price, p.name AS product_name
            FROM stocks s
            JOIN products p ON p.id = s.product_id
            WHERE s.id = ANY($1)
            ORDER BY s.id
            "#,
        )
        .bind(stock_ids)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    pub async fn insert_order<'e, E>(
        &self,
        executor: E,
        customer_id: Option<Uuid>,
        total_amount: Decimal,
        total_after_disc: Decimal,
        created_by: Uuid,
    ) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, Order>(
            r#"
            INSERT INTO orders (customer_id, total_amount, total_after_disc, created_by)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(customer_id)
        .bind(total_amount)
        .bind(total_after_disc)
        .bind(created_by)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_foreign_key_violation() {
                    return AppError::NotFound { entity: "Customer" };
                }
            }
            AppError::from(e)
        })?;
        Ok(order)
    }

    pub async fn insert_line<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
        stock_id: Uuid,
        quantity: i32,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("INSERT INTO stock_orders (order_id, stock_id, quantity) VALUES ($1, $2, $3)")
            .bind(order_id)
            .bind(stock_id)
            .bind(quantity)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<Order>, AppError> {
        let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(order)
    }

    /// Trava o pedido: uma transição em andamento por pedido.
    pub async fn find_for_update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Order>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(order)
    }

    /// Linhas do pedido com os lotes travados, em ordem estável de id.
    /// A disponibilidade é rechecada aqui, no momento da transição.
    pub async fn lock_lines<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
    ) -> Result<Vec<LockedLine>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lines = sqlx::query_as::<_, LockedLine>(
            r#"
            SELECT so.stock_id, so.quantity, s.qty, p.name AS product_name
            FROM stock_orders so
            JOIN stocks s ON s.id = so.stock_id
            JOIN products p ON p.id = s.product_id
            WHERE so.order_id = $1
            ORDER BY s.id
            FOR UPDATE OF s
            "#,
        )
        .bind(order_id)
        .fetch_all(executor)
        .await?;
        Ok(lines)
    }

    pub async fn adjust_stock_qty<'e, E>(
        &self,
        executor: E,
        stock_id: Uuid,
        delta: i32,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE stocks SET qty = qty + $2, updated_at = now() WHERE id = $1")
            .bind(stock_id)
            .bind(delta)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn set_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: OrderStatus,
    ) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, Order>(
            "UPDATE orders SET status = $2, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_one(executor)
        .await?;
        Ok(order)
    }

    pub async fn lines<'e, E>(&self, executor: E, order_id: Uuid) -> Result<Vec<OrderLine>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lines = sqlx::query_as::<_, OrderLine>(
            r#"
            SELECT so.stock_id, s.product_id, p.name AS product_name, s.barcode,
                   so.quantity, s.sale_price AS unit_sale_price
            FROM stock_orders so
            JOIN stocks s ON s.id = so.stock_id
            JOIN products p ON p.id = s.product_id
            WHERE so.order_id = $1
            ORDER BY s.id
            "#,
        )
        .bind(order_id)
        .fetch_all(executor)
        .await?;
        Ok(lines)
    }

    pub async fn list(&self, limit: i64, offset: i64) -> Result<(Vec<Order>, i64), AppError> {
        let orders = sqlx::query_as::<_, Order>(
            "SELECT * FROM orders ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;

        Ok((orders, total))
    }
}
