// src/services/ledger_service.rs

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::LedgerRepository,
    models::ledger::{
        CustomerTransaction, DistributionTransaction, LedgerEntry, RecordTransactionPayload,
    },
};

// Razão de transações: substitui a mutação implícita de saldo por uma
// operação estreita e explícita. O lançamento e o delta de saldo entram
// na mesma transação; se um falhar, nada persiste.
#[derive(Clone)]
pub struct LedgerService {
    ledger_repo: LedgerRepository,
    pool: PgPool,
}

impl LedgerService {
    pub fn new(ledger_repo: LedgerRepository, pool: PgPool) -> Self {
        Self { ledger_repo, pool }
    }

    pub async fn record(
        &self,
        payload: &RecordTransactionPayload,
        created_by: Uuid,
    ) -> Result<LedgerEntry, AppError> {
        if payload.amount <= Decimal::ZERO {
            return Err(AppError::field("amount", "Amount must be positive."));
        }

        match (payload.order_id, payload.distribution_id) {
            (Some(order_id), None) => self.record_for_order(payload, order_id, created_by).await,
            (None, Some(distribution_id)) => {
                self.record_for_distribution(payload, distribution_id, created_by)
                    .await
            }
            // Exatamente um vínculo: nem os dois, nem nenhum.
            _ => Err(AppError::field(
                "orderId",
                "Provide exactly one of 'orderId' or 'distributionId'.",
            )),
        }
    }

    pub async fn list_customer_transactions(
        &self,
        customer_id: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<CustomerTransaction>, i64), AppError> {
        self.ledger_repo
            .list_customer_transactions(customer_id, limit, offset)
            .await
    }

    pub async fn list_distribution_transactions(
        &self,
        distribution_id: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<DistributionTransaction>, i64), AppError> {
        self.ledger_repo
            .list_distribution_transactions(distribution_id, limit, offset)
            .await
    }

    async fn record_for_order(
        &self,
        payload: &RecordTransactionPayload,
        order_id: Uuid,
        created_by: Uuid,
    ) -> Result<LedgerEntry, AppError> {
        let mut tx = self.pool.begin().await?;

        let customer_id = self
            .ledger_repo
            .find_order_customer(&mut *tx, order_id)
            .await?
            .ok_or(AppError::NotFound { entity: "Order" })?
            .ok_or_else(|| {
                AppError::field("orderId", "The linked order has no customer.")
            })?;

        // Trava o saldo antes de aplicar o delta.
        self.ledger_repo
            .lock_customer(&mut *tx, customer_id)
            .await?
            .ok_or(AppError::NotFound { entity: "Customer" })?;

        let delta = payload.transaction_type.balance_delta(payload.amount);
        self.ledger_repo
            .adjust_customer_balance(&mut *tx, customer_id, delta)
            .await?;

        let transaction = self
            .ledger_repo
            .insert_customer_transaction(
                &mut *tx,
                customer_id,
                order_id,
                payload.transaction_type,
                payload.amount,
                payload.notes.as_deref(),
                created_by,
            )
            .await?;

        tx.commit().await?;
        Ok(LedgerEntry::Customer(transaction))
    }

    async fn record_for_distribution(
        &self,
        payload: &RecordTransactionPayload,
        distribution_id: Uuid,
        created_by: Uuid,
    ) -> Result<LedgerEntry, AppError> {
        let mut tx = self.pool.begin().await?;

        self.ledger_repo
            .lock_distribution(&mut *tx, distribution_id)
            .await?
            .ok_or(AppError::NotFound { entity: "Distribution" })?;

        let delta = payload.transaction_type.balance_delta(payload.amount);
        self.ledger_repo
            .adjust_distribution_balance(&mut *tx, distribution_id, delta)
            .await?;

        let transaction = self
            .ledger_repo
            .insert_distribution_transaction(
                &mut *tx,
                distribution_id,
                payload.transaction_type,
                payload.amount,
                payload.notes.as_deref(),
                created_by,
            )
            .await?;

        tx.commit().await?;
        Ok(LedgerEntry::Distribution(transaction))
    }
}
