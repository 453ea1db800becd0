// src/services/inventory_service.rs

use chrono::{NaiveDate, Utc};

use crate::{
    common::{
        error::AppError,
        pagination::PageQuery,
    },
    db::ProductRepository,
    models::product::{ProductAggRow, ProductFilter, ProductSummary},
};

// Abaixo deste baseline o limiar suave de 80% é ignorado: produto de
// estoque pequeno viveria em alerta "baixo" perpétuo.
const SMALL_STOCK_CUTOFF: i32 = 5;

// --- Motor de agregação de estoque ---
// Classificação somente-leitura dos lotes por produto. Os somatórios por
// balde saem de uma única query agrupada (product_repo); os déficits
// derivados são funções puras daqui.

pub fn required_qty(avg_qty: i32, total_qty: i64) -> i64 {
    (i64::from(avg_qty) - total_qty).max(0)
}

pub fn required_low_qty(avg_qty: i32, total_qty: i64) -> i64 {
    if avg_qty < SMALL_STOCK_CUTOFF {
        return required_qty(avg_qty, total_qty);
    }
    // floor(avg_qty * 0.8) em aritmética inteira
    (i64::from(avg_qty) * 8 / 10 - total_qty).max(0)
}

pub fn is_active(avg_qty: i32) -> bool {
    avg_qty > 0
}

pub fn summarize(row: ProductAggRow) -> ProductSummary {
    let required_qty = required_qty(row.avg_qty, row.total_qty);
    let required_low_qty = required_low_qty(row.avg_qty, row.total_qty);
    ProductSummary {
        id: row.id,
        name: row.name,
        company_id: row.company_id,
        formula_id: row.formula_id,
        distribution_id: row.distribution_id,
        product_type: row.product_type,
        product_type_label: row.product_type.label(),
        avg_qty: row.avg_qty,
        per_pack: row.per_pack,
        market_item: row.market_item,
        description: row.description,
        total_qty: row.total_qty,
        total_qty_expired: row.total_qty_expired,
        total_qty_short_expired: row.total_qty_short_expired,
        required_qty,
        required_low_qty,
        is_active: is_active(row.avg_qty),
    }
}

#[derive(Clone)]
pub struct InventoryService {
    product_repo: ProductRepository,
}

impl InventoryService {
    pub fn new(product_repo: ProductRepository) -> Self {
        Self { product_repo }
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    pub async fn list_products(
        &self,
        filter: &ProductFilter,
        page: &PageQuery,
    ) -> Result<(Vec<ProductSummary>, i64), AppError> {
        let (rows, total) = self
            .product_repo
            .list(filter, Self::today(), page.limit(), page.offset())
            .await?;
        Ok((rows.into_iter().map(summarize).collect(), total))
    }

    pub async fn get_product(&self, id: uuid::Uuid) -> Result<ProductSummary, AppError> {
        let row = self
            .product_repo
            .find_agg(id, Self::today())
            .await?
            .ok_or(AppError::NotFound { entity: "Product" })?;
        Ok(summarize(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_qty_is_deficit_against_baseline() {
        // avg 10, 3 unidades ativas -> faltam 7
        assert_eq!(required_qty(10, 3), 7);
        assert_eq!(required_qty(10, 10), 0);
        assert_eq!(required_qty(10, 15), 0);
        assert_eq!(required_qty(0, 0), 0);
    }

    #[test]
    fn required_low_qty_uses_soft_threshold() {
        // avg 10: floor(10 * 0.8) = 8 -> 8 - 3 = 5
        assert_eq!(required_low_qty(10, 3), 5);
        assert_eq!(required_low_qty(10, 8), 0);
        assert_eq!(required_low_qty(10, 9), 0);
        // floor(7 * 0.8) = 5
        assert_eq!(required_low_qty(7, 2), 3);
    }

    #[test]
    fn small_stock_ignores_soft_threshold() {
        // avg < 5 cai no déficit cheio
        assert_eq!(required_low_qty(4, 1), required_qty(4, 1));
        assert_eq!(required_low_qty(4, 1), 3);
        assert_eq!(required_low_qty(3, 0), 3);
        // no limiar, volta a valer o 80%
        assert_eq!(required_low_qty(5, 0), 4);
    }

    #[test]
    fn active_means_positive_baseline() {
        assert!(is_active(1));
        assert!(!is_active(0));
    }
}
