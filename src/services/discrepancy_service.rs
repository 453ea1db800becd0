// src/services/discrepancy_service.rs

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{DiscrepancyRepository, StockRepository},
    models::discrepancy::{CreateDiscrepancyPayload, InventoryDiscrepancy},
};

// --- Validação por tipo ---
// Tipos que consomem lote exigem {stock, quantity} e proíbem vínculo de
// caixa; tipos de caixa exigem {amount, distribution} e proíbem lote.
// Função pura para ficar testável sem banco.
pub fn validate_payload(payload: &CreateDiscrepancyPayload) -> Result<(), AppError> {
    let kind = payload.discrepancy_type;
    if kind.consumes_stock() {
        if payload.stock_id.is_none() {
            return Err(AppError::field(
                "stockId",
                format!("'stockId' is required for discrepancy type '{}'.", kind.label()),
            ));
        }
        match payload.quantity {
            None => {
                return Err(AppError::field(
                    "quantity",
                    format!("'quantity' is required for discrepancy type '{}'.", kind.label()),
                ));
            }
            Some(quantity) if quantity < 1 => {
                return Err(AppError::field("quantity", "Quantity must be at least 1."));
            }
            Some(_) => {}
        }
        if payload.distribution_id.is_some() {
            return Err(AppError::field(
                "distributionId",
                format!(
                    "'distributionId' is not allowed for discrepancy type '{}'.",
                    kind.label()
                ),
            ));
        }
    } else {
        if payload.amount.is_none() {
            return Err(AppError::field(
                "amount",
                format!("'amount' is required for discrepancy type '{}'.", kind.label()),
            ));
        }
        if payload.distribution_id.is_none() {
            return Err(AppError::field(
                "distributionId",
                format!(
                    "'distributionId' is required for discrepancy type '{}'.",
                    kind.label()
                ),
            ));
        }
        if payload.stock_id.is_some() {
            return Err(AppError::field(
                "stockId",
                format!("'stockId' is not allowed for discrepancy type '{}'.", kind.label()),
            ));
        }
        if payload.quantity.is_some() {
            return Err(AppError::field(
                "quantity",
                format!("'quantity' is not allowed for discrepancy type '{}'.", kind.label()),
            ));
        }
    }

    if let Some(amount) = payload.amount {
        if amount <= Decimal::ZERO {
            return Err(AppError::field("amount", "Amount must be positive."));
        }
    }

    Ok(())
}

#[derive(Clone)]
pub struct DiscrepancyService {
    discrepancy_repo: DiscrepancyRepository,
    stock_repo: StockRepository,
}

impl DiscrepancyService {
    pub fn new(discrepancy_repo: DiscrepancyRepository, stock_repo: StockRepository) -> Self {
        Self {
            discrepancy_repo,
            stock_repo,
        }
    }

    // O registro não mexe em `stocks.qty`: quantidade só muda pelo motor
    // de pedidos. Aqui é lançamento contábil do desvio.
    pub async fn record(
        &self,
        payload: &CreateDiscrepancyPayload,
        created_by: Uuid,
    ) -> Result<InventoryDiscrepancy, AppError> {
        validate_payload(payload)?;

        let mut amount = payload.amount;
        if payload.discrepancy_type.consumes_stock() {
            if let Some(stock_id) = payload.stock_id {
                let stock = self
                    .stock_repo
                    .find(stock_id)
                    .await?
                    .ok_or(AppError::NotFound { entity: "Stock" })?;
                // Valor de caixa implícito: quantidade x preço de compra.
                if let (None, Some(quantity)) = (amount, payload.quantity) {
                    amount = Some(Decimal::from(quantity) * stock.purchase_price);
                }
            }
        }

        self.discrepancy_repo
            .insert(
                payload.discrepancy_type,
                payload.stock_id,
                payload.quantity,
                amount,
                payload.distribution_id,
                payload.notes.as_deref(),
                created_by,
            )
            .await
    }

    pub async fn list(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<InventoryDiscrepancy>, i64), AppError> {
        self.discrepancy_repo.list(limit, offset).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::discrepancy::DiscrepancyType;

    fn payload(kind: DiscrepancyType) -> CreateDiscrepancyPayload {
        CreateDiscrepancyPayload {
            discrepancy_type: kind,
            stock_id: None,
            quantity: None,
            amount: None,
            distribution_id: None,
            notes: None,
        }
    }

    fn field_of(err: AppError) -> String {
        match err {
            AppError::FieldValidation { field, .. } => field,
            other => panic!("esperava FieldValidation, veio {other:?}"),
        }
    }

    #[test]
    fn consuming_type_requires_stock_and_quantity() {
        let mut p = payload(DiscrepancyType::Damaged);
        assert_eq!(field_of(validate_payload(&p).unwrap_err()), "stockId");

        p.stock_id = Some(Uuid::new_v4());
        assert_eq!(field_of(validate_payload(&p).unwrap_err()), "quantity");

        p.quantity = Some(3);
        assert!(validate_payload(&p).is_ok());
    }

    #[test]
    fn consuming_type_forbids_distribution_link() {
        let mut p = payload(DiscrepancyType::Lost);
        p.stock_id = Some(Uuid::new_v4());
        p.quantity = Some(1);
        p.distribution_id = Some(Uuid::new_v4());
        assert_eq!(field_of(validate_payload(&p).unwrap_err()), "distributionId");
    }

    #[test]
    fn cash_type_requires_amount_and_distribution() {
        let mut p = payload(DiscrepancyType::HomeExpenseCash);
        assert_eq!(field_of(validate_payload(&p).unwrap_err()), "amount");

        p.amount = Some(Decimal::new(5000, 2));
        assert_eq!(field_of(validate_payload(&p).unwrap_err()), "distributionId");

        p.distribution_id = Some(Uuid::new_v4());
        assert!(validate_payload(&p).is_ok());
    }

    #[test]
    fn cash_type_forbids_stock_fields() {
        let mut p = payload(DiscrepancyType::RecoveredCashApproval);
        p.amount = Some(Decimal::ONE);
        p.distribution_id = Some(Uuid::new_v4());
        p.stock_id = Some(Uuid::new_v4());
        assert_eq!(field_of(validate_payload(&p).unwrap_err()), "stockId");

        p.stock_id = None;
        p.quantity = Some(2);
        assert_eq!(field_of(validate_payload(&p).unwrap_err()), "quantity");
    }

    #[test]
    fn explicit_amount_must_be_positive() {
        let mut p = payload(DiscrepancyType::Expired);
        p.stock_id = Some(Uuid::new_v4());
        p.quantity = Some(2);
        p.amount = Some(Decimal::ZERO);
        assert_eq!(field_of(validate_payload(&p).unwrap_err()), "amount");
    }

    #[test]
    fn returned_short_expiry_consumes_stock() {
        assert!(DiscrepancyType::ReturnedShortExpiry.consumes_stock());
        assert!(!DiscrepancyType::HomeExpenseCash.consumes_stock());
    }
}
