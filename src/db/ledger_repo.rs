// src/db/ledger_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        catalog::{Customer, Distribution},
        ledger::{CustomerTransaction, DistributionTransaction, TransactionType},
    },
};

// Razão de transações. Único caminho de escrita para os saldos de
// cliente e distribuidor: o delta e o lançamento entram na mesma
// transação, com a linha do saldo travada antes.
#[derive(Clone)]
pub struct LedgerRepository {
    pool: PgPool,
}

impl LedgerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Cliente de um pedido; `None` externo = pedido inexistente,
    /// `None` interno = pedido sem cliente (cliente apagado).
    pub async fn find_order_customer<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
    ) -> Result<Option<Option<Uuid>>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row: Option<(Option<Uuid>,)> =
            sqlx::query_as("SELECT customer_id FROM orders WHERE id = $1")
                .bind(order_id)
                .fetch_optional(executor)
                .await?;
        Ok(row.map(|(customer_id,)| customer_id))
    }

    pub async fn lock_customer<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Customer>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let customer =
            sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(executor)
                .await?;
        Ok(customer)
    }

    pub async fn lock_distribution<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Distribution>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let distribution =
            sqlx::query_as::<_, Distribution>("SELECT * FROM distributions WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(executor)
                .await?;
        Ok(distribution)
    }

    pub async fn adjust_customer_balance<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        delta: Decimal,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE customers SET balance = balance + $2 WHERE id = $1")
            .bind(id)
            .bind(delta)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn adjust_distribution_balance<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        delta: Decimal,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE distributions SET balance = balance + $2 WHERE id = $1")
            .bind(id)
            .bind(delta)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn insert_customer_transaction<'e, E>(
        &self,
        executor: E,
        customer_id: Uuid,
        order_id: Uuid,
        transaction_type: TransactionType,
        amount: Decimal,
        notes: Option<&str>,
        created_by: Uuid,
    ) -> Result<CustomerTransaction, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let transaction = sqlx::query_as::<_, CustomerTransaction>(
            r#"
            INSERT INTO customer_transactions (customer_id, order_id, transaction_type,
                                               total_amount, notes, created_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(customer_id)
        .bind(order_id)
        .bind(transaction_type)
        .bind(amount)
        .bind(notes)
        .bind(created_by)
        .fetch_one(executor)
        .await?;
        Ok(transaction)
    }

    pub async fn insert_distribution_transaction<'e, E>(
        &self,
        executor: E,
        distribution_id: Uuid,
        transaction_type: TransactionType,
        amount: Decimal,
        notes: Option<&str>,
        created_by: Uuid,
    ) -> Result<DistributionTransaction, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let transaction = sqlx::query_as::<_, DistributionTransaction>(
            r#"
            INSERT INTO distribution_transactions (distribution_id, transaction_type,
                                                   total_amount, notes, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(distribution_id)
        .bind(transaction_type)
        .bind(amount)
        .bind(notes)
        .bind(created_by)
        .fetch_one(executor)
        .await?;
        Ok(transaction)
    }

    pub async fn list_customer_transactions(
        &self,
        customer_id: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<CustomerTransaction>, i64), AppError> {
        let rows = sqlx::query_as::<_, CustomerTransaction>(
            r#"
            SELECT * FROM customer_transactions
            WHERE ($1::uuid IS NULL OR customer_id = $1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(customer_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM customer_transactions WHERE ($1::uuid IS NULL OR customer_id = $1)",
        )
        .bind(customer_id)
        .fetch_one(&self.pool)
        .await?;

        Ok((rows, total))
    }

    pub async fn list_distribution_transactions(
        &self,
        distribution_id: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<DistributionTransaction>, i64), AppError> {
        let rows = sqlx::query_as::<_, DistributionTransaction>(
            r#"
            SELECT * FROM distribution_transactions
            WHERE ($1::uuid IS NULL OR distribution_id = $1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(distribution_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM distribution_transactions WHERE ($1::uuid IS NULL OR distribution_id = $1)",
        )
        .bind(distribution_id)
        .fetch_one(&self.pool)
        .await?;

        Ok((rows, total))
    }
}
