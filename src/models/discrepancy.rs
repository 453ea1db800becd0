// src/models/discrepancy.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Tipo de discrepância ---
// Movimento de estoque fora de venda. Tipos que consomem lote exigem
// {stock, quantity}; tipos de caixa exigem {amount, distribution}.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "discrepancy_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DiscrepancyType {
    Lost,
    Damaged,
    Expired,
    Donated,
    FreeGiveaway,
    ReturnedShortExpiry,
    HomeExpenseCash,
    RecoveredCashApproval,
}

impl DiscrepancyType {
    pub fn label(&self) -> &'static str {
        match self {
            DiscrepancyType::Lost => "Lost",
            DiscrepancyType::Damaged => "Damaged",
            DiscrepancyType::Expired => "Expired",
            DiscrepancyType::Donated => "Donated",
            DiscrepancyType::FreeGiveaway => "Free Giveaway",
            DiscrepancyType::ReturnedShortExpiry => "Returned Short Expiry",
            DiscrepancyType::HomeExpenseCash => "Home Expense Cash",
            DiscrepancyType::RecoveredCashApproval => "Recovered Cash Approval",
        }
    }

    /// Tipos que registram consumo de um lote; o valor em caixa pode ser
    /// derivado de quantidade x preço de compra quando não informado.
    pub fn consumes_stock(&self) -> bool {
        matches!(
            self,
            DiscrepancyType::Lost
                | DiscrepancyType::Damaged
                | DiscrepancyType::Expired
                | DiscrepancyType::Donated
                | DiscrepancyType::FreeGiveaway
                | DiscrepancyType::ReturnedShortExpiry
        )
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryDiscrepancy {
    pub id: Uuid,
    pub discrepancy_type: DiscrepancyType,
    pub stock_id: Option<Uuid>,
    pub quantity: Option<i32>,
    pub amount: Option<Decimal>,
    pub distribution_id: Option<Uuid>,
    pub notes: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDiscrepancyPayload {
    pub discrepancy_type: DiscrepancyType,
    pub stock_id: Option<Uuid>,
    pub quantity: Option<i32>,
    pub amount: Option<Decimal>,
    pub distribution_id: Option<Uuid>,
    pub notes: Option<String>,
}
