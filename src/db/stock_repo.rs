// src/db/stock_repo.rs

use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::product::{
        CreateStockPayload, ExpiryBucket, Stock, StockFilter, UpdateStockPayload, barcode_from_id,
        short_expiry_horizon,
    },
};

// Lotes de estoque. A quantidade só é decrementada/incrementada pelo
// motor de pedidos (order_repo), nunca por aqui fora do CRUD declarado.
#[derive(Clone)]
pub struct StockRepository {
    pool: PgPool,
}

impl StockRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Recebimento de lote. O id é gerado no cliente para que o código de
    /// barras derivado do identificador persista na mesma escrita.
    pub async fn create(
        &self,
        payload: &CreateStockPayload,
        added_by: Uuid,
    ) -> Result<Stock, AppError> {
        let id = Uuid::new_v4();
        let barcode = payload
            .barcode
            .clone()
            .unwrap_or_else(|| barcode_from_id(id));

        sqlx::query_as::<_, Stock>(
            r#"
            INSERT INTO stocks (id, product_id, qty, sale_price, purchase_price,
                                expiry_date, barcode, bought_from, added_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload.product_id)
        .bind(payload.qty)
        .bind(payload.sale_price)
        .bind(payload.purchase_price)
        .bind(payload.expiry_date)
        .bind(&barcode)
        .bind(payload.bought_from)
        .bind(added_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::field("barcode", "This barcode is already in use.");
                }
                if db_err.is_foreign_key_violation() {
                    return AppError::NotFound { entity: "Product" };
                }
            }
            e.into()
        })
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<Stock>, AppError> {
        let stock = sqlx::query_as::<_, Stock>("SELECT * FROM stocks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(stock)
    }

    pub async fn update(&self, id: Uuid, payload: &UpdateStockPayload) -> Result<Stock, AppError> {
        sqlx::query_as::<_, Stock>(
            r#"
            UPDATE stocks SET
                qty = COALESCE($2, qty),
                sale_price = COALESCE($3, sale_price),
                purchase_price = COALESCE($4, purchase_price),
                expiry_date = COALESCE($5, expiry_date),
                bought_from = COALESCE($6, bought_from),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload.qty)
        .bind(payload.sale_price)
        .bind(payload.purchase_price)
        .bind(payload.expiry_date)
        .bind(payload.bought_from)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound { entity: "Stock" })
    }

    /// Lote referenciado por linha de pedido nunca é apagado: o RESTRICT
    /// do banco vira um erro de conflito para o chamador.
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM stocks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_foreign_key_violation() {
                        return AppError::Conflict(
                            "This stock batch is referenced by order lines and cannot be deleted."
                                .to_string(),
                        );
                    }
                }
                AppError::from(e)
            })?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound { entity: "Stock" });
        }
        Ok(())
    }

    pub async fn list(
        &self,
        filter: &StockFilter,
        as_of: NaiveDate,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Stock>, i64), AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT s.*");
        push_filtered_body(&mut qb, filter, as_of);
        qb.push(" ORDER BY s.entry_date DESC LIMIT ");
        qb.push_bind(limit);
        qb.push(" OFFSET ");
        qb.push_bind(offset);

        let rows = qb.build_query_as::<Stock>().fetch_all(&self.pool).await?;

        let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*)");
        push_filtered_body(&mut count_qb, filter, as_of);

        let total: i64 = count_qb
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        Ok((rows, total))
    }
}

fn push_filtered_body(qb: &mut QueryBuilder<'_, Postgres>, filter: &StockFilter, as_of: NaiveDate) {
    let horizon = short_expiry_horizon(as_of);

    qb.push(" FROM stocks s WHERE 1=1");

    if let Some(product_id) = filter.product_id {
        qb.push(" AND s.product_id = ");
        qb.push_bind(product_id);
    }
    if let Some(barcode) = &filter.barcode {
        qb.push(" AND s.barcode = ");
        qb.push_bind(barcode.clone());
    }
    if let Some(bought_from) = filter.bought_from {
        qb.push(" AND s.bought_from = ");
        qb.push_bind(bought_from);
    }
    if let Some(after) = filter.entry_after {
        qb.push(" AND s.entry_date::date >= ");
        qb.push_bind(after);
    }
    if let Some(before) = filter.entry_before {
        qb.push(" AND s.entry_date::date <= ");
        qb.push_bind(before);
    }
    if let Some(active) = filter.active {
        qb.push(if active { " AND s.qty > 0" } else { " AND s.qty = 0" });
    }
    if let Some(bucket) = filter.expiration {
        match bucket {
            ExpiryBucket::Expired => {
                qb.push(" AND s.expiry_date < ");
                qb.push_bind(as_of);
            }
            ExpiryBucket::ShortExpired => {
                qb.push(" AND s.expiry_date >= ");
                qb.push_bind(as_of);
                qb.push(" AND s.expiry_date < ");
                qb.push_bind(horizon);
            }
            ExpiryBucket::ExpiredAndShortExpired => {
                qb.push(" AND s.expiry_date < ");
                qb.push_bind(horizon);
            }
        }
    }
}
