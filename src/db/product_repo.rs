// src/db/product_repo.rs

use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::product::{
        CreateProductPayload, ExpiryBucket, Product, ProductAggRow, ProductFilter,
        short_expiry_horizon,
    },
};

// Catálogo de produtos + agregação de lotes. Todos os somatórios saem de
// uma única query agrupada (SUM ... FILTER), para o resultado continuar
// correto sob mutação concorrente de estoque.
#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

const AGG_SELECT: &str = "SELECT p.id, p.name, p.company_id, p.formula_id, p.distribution_id, \
     p.product_type, p.avg_qty, p.per_pack, p.market_item, p.description";

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: &CreateProductPayload) -> Result<Product, AppError> {
        sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, company_id, formula_id, distribution_id, product_type,
                                  avg_qty, per_pack, market_item, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(&payload.name)
        .bind(payload.company_id)
        .bind(payload.formula_id)
        .bind(payload.distribution_id)
        .bind(payload.product_type)
        .bind(payload.avg_qty)
        .bind(payload.per_pack)
        .bind(payload.market_item)
        .bind(&payload.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::field("name", "A product with this name already exists.");
                }
            }
            e.into()
        })
    }

    pub async fn update(&self, id: Uuid, payload: &CreateProductPayload) -> Result<Product, AppError> {
        sqlx::query_as::<_, Product>(
            r#"
            UPDATE products SET
                name = $2, company_id = $3, formula_id = $4, distribution_id = $5,
                product_type = $6, avg_qty = $7, per_pack = $8, market_item = $9, description = $10
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&payload.name)
        .bind(payload.company_id)
        .bind(payload.formula_id)
        .bind(payload.distribution_id)
        .bind(payload.product_type)
        .bind(payload.avg_qty)
        .bind(payload.per_pack)
        .bind(payload.market_item)
        .bind(&payload.description)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::field("name", "A product with this name already exists.");
                }
            }
            AppError::from(e)
        })?
        .ok_or(AppError::NotFound { entity: "Product" })
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound { entity: "Product" });
        }
        Ok(())
    }

    /// Detalhe de um produto com os baldes de quantidade, na data dada.
    pub async fn find_agg(
        &self,
        id: Uuid,
        as_of: NaiveDate,
    ) -> Result<Option<ProductAggRow>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(AGG_SELECT);
        push_agg_columns(&mut qb, as_of);
        qb.push(" FROM products p LEFT JOIN stocks s ON s.product_id = p.id WHERE p.id = ");
        qb.push_bind(id);
        qb.push(" GROUP BY p.id");

        let row = qb
            .build_query_as::<ProductAggRow>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Listagem filtrada + paginada; devolve a página e o total de grupos.
    pub async fn list(
        &self,
        filter: &ProductFilter,
        as_of: NaiveDate,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<ProductAggRow>, i64), AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(AGG_SELECT);
        push_agg_columns(&mut qb, as_of);
        push_filtered_body(&mut qb, filter, as_of);
        qb.push(" ORDER BY p.name ASC LIMIT ");
        qb.push_bind(limit);
        qb.push(" OFFSET ");
        qb.push_bind(offset);

        let rows = qb
            .build_query_as::<ProductAggRow>()
            .fetch_all(&self.pool)
            .await?;

        // Mesmo corpo, embrulhado num COUNT de grupos.
        let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM (SELECT p.id");
        push_filtered_body(&mut count_qb, filter, as_of);
        count_qb.push(") AS sub");

        let total: i64 = count_qb
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        Ok((rows, total))
    }
}

// Colunas agregadas por balde de validade. Lote sem validade conta como
// não-vencido.
fn push_agg_columns(qb: &mut QueryBuilder<'_, Postgres>, as_of: NaiveDate) {
    let horizon = short_expiry_horizon(as_of);

    qb.push(", COALESCE(SUM(s.qty) FILTER (WHERE s.expiry_date IS NULL OR s.expiry_date >= ");
    qb.push_bind(as_of);
    qb.push("), 0) AS total_qty");

    qb.push(", COALESCE(SUM(s.qty) FILTER (WHERE s.expiry_date < ");
    qb.push_bind(as_of);
    qb.push("), 0) AS total_qty_expired");

    qb.push(", COALESCE(SUM(s.qty) FILTER (WHERE s.expiry_date >= ");
    qb.push_bind(as_of);
    qb.push(" AND s.expiry_date < ");
    qb.push_bind(horizon);
    qb.push("), 0) AS total_qty_short_expired");
}

// FROM + WHERE + GROUP BY + HAVING compartilhados entre a página e o COUNT.
fn push_filtered_body(qb: &mut QueryBuilder<'_, Postgres>, filter: &ProductFilter, as_of: NaiveDate) {
    let horizon = short_expiry_horizon(as_of);

    qb.push(" FROM products p LEFT JOIN stocks s ON s.product_id = p.id WHERE 1=1");

    if let Some(name) = &filter.name {
        qb.push(" AND p.name = ");
        qb.push_bind(name.clone());
    }
    if let Some(fragment) = &filter.name_contains {
        qb.push(" AND p.name ILIKE ");
        qb.push_bind(format!("%{}%", fragment));
    }
    if let Some(product_type) = filter.product_type {
        qb.push(" AND p.product_type = ");
        qb.push_bind(product_type);
    }
    if let Some(ids) = &filter.company_ids {
        qb.push(" AND p.company_id = ANY(");
        qb.push_bind(ids.clone());
        qb.push(")");
    }
    if let Some(ids) = &filter.distribution_ids {
        qb.push(" AND p.distribution_id = ANY(");
        qb.push_bind(ids.clone());
        qb.push(")");
    }
    if let Some(ids) = &filter.formula_ids {
        qb.push(" AND p.formula_id = ANY(");
        qb.push_bind(ids.clone());
        qb.push(")");
    }
    if let Some(active) = filter.active {
        // Produto ativo: baseline de reposição maior que zero.
        qb.push(if active { " AND p.avg_qty > 0" } else { " AND p.avg_qty = 0" });
    }
    if let Some(bucket) = filter.expiration {
        match bucket {
            ExpiryBucket::Expired => {
                qb.push(" AND EXISTS (SELECT 1 FROM stocks sx WHERE sx.product_id = p.id AND sx.expiry_date < ");
                qb.push_bind(as_of);
                qb.push(")");
            }
            ExpiryBucket::ShortExpired => {
                qb.push(" AND EXISTS (SELECT 1 FROM stocks sx WHERE sx.product_id = p.id AND sx.expiry_date >= ");
                qb.push_bind(as_of);
                qb.push(" AND sx.expiry_date < ");
                qb.push_bind(horizon);
                qb.push(")");
            }
            ExpiryBucket::ExpiredAndShortExpired => {
                qb.push(" AND EXISTS (SELECT 1 FROM stocks sx WHERE sx.product_id = p.id AND sx.expiry_date < ");
                qb.push_bind(horizon);
                qb.push(")");
            }
        }
    }

    qb.push(" GROUP BY p.id");

    if let Some(bucket) = filter.low_qty {
        // Só lotes não-vencidos contam para o balde de quantidade baixa.
        qb.push(" HAVING COALESCE(SUM(s.qty) FILTER (WHERE s.expiry_date IS NULL OR s.expiry_date >= ");
        qb.push_bind(as_of);
        qb.push("), 0) < p.avg_qty * ");
        qb.push(bucket.sql_factor());
    }
}
