// src/db/discrepancy_repo.rs

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::discrepancy::{DiscrepancyType, InventoryDiscrepancy},
};

#[derive(Clone)]
pub struct DiscrepancyRepository {
    pool: PgPool,
}

impl DiscrepancyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(
        &self,
        discrepancy_type: DiscrepancyType,
        stock_id: Option<Uuid>,
        quantity: Option<i32>,
        amount: Option<Decimal>,
        distribution_id: Option<Uuid>,
        notes: Option<&str>,
        created_by: Uuid,
    ) -> Result<InventoryDiscrepancy, AppError> {
        let discrepancy = sqlx::query_as::<_, InventoryDiscrepancy>(
            r#"
            INSERT INTO inventory_discrepancies (discrepancy_type, stock_id, quantity,
                                                 amount, distribution_id, notes, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(discrepancy_type)
        .bind(stock_id)
        .bind(quantity)
        .bind(amount)
        .bind(distribution_id)
        .bind(notes)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;
        Ok(discrepancy)
    }

    pub async fn list(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<InventoryDiscrepancy>, i64), AppError> {
        let rows = sqlx::query_as::<_, InventoryDiscrepancy>(
            "SELECT * FROM inventory_discrepancies ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM inventory_discrepancies")
            .fetch_one(&self.pool)
            .await?;

        Ok((rows, total))
    }
}
