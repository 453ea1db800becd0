// src/models/ledger.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Tipo de transação ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "transaction_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    PaymentReceived,
    PaymentMade,
    ProductsReceived,
}

impl TransactionType {
    pub fn label(&self) -> &'static str {
        match self {
            TransactionType::PaymentReceived => "Payment Received",
            TransactionType::PaymentMade => "Payment Made",
            TransactionType::ProductsReceived => "Products Received",
        }
    }

    /// Delta aplicado ao saldo da parte vinculada, na mesma transação
    /// que persiste o lançamento. Pagamento recebido soma; pagamento
    /// feito e mercadoria recebida a crédito subtraem.
    pub fn balance_delta(&self, amount: Decimal) -> Decimal {
        match self {
            TransactionType::PaymentReceived => amount,
            TransactionType::PaymentMade | TransactionType::ProductsReceived => -amount,
        }
    }
}

// --- Lançamentos ---

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerTransaction {
    pub id: Uuid,
    pub customer_id: Option<Uuid>,
    pub order_id: Option<Uuid>,
    pub transaction_type: TransactionType,
    pub total_amount: Decimal,
    pub notes: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DistributionTransaction {
    pub id: Uuid,
    pub distribution_id: Uuid,
    pub transaction_type: TransactionType,
    pub total_amount: Decimal,
    pub notes: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

// Resposta única do endpoint de lançamento: ou um lado, ou o outro.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", untagged)]
pub enum LedgerEntry {
    Customer(CustomerTransaction),
    Distribution(DistributionTransaction),
}

// --- Payload ---
// Exatamente um entre `order_id` e `distribution_id` deve vir preenchido.

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordTransactionPayload {
    pub order_id: Option<Uuid>,
    pub distribution_id: Option<Uuid>,
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balance_delta_signs() {
        let amount = Decimal::new(15000, 2); // 150.00
        assert_eq!(TransactionType::PaymentReceived.balance_delta(amount), amount);
        assert_eq!(TransactionType::PaymentMade.balance_delta(amount), -amount);
        assert_eq!(TransactionType::ProductsReceived.balance_delta(amount), -amount);
    }

    #[test]
    fn labels() {
        assert_eq!(TransactionType::PaymentReceived.label(), "Payment Received");
        assert_eq!(TransactionType::ProductsReceived.label(), "Products Received");
    }
}
