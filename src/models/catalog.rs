// src/models/catalog.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// --- Dados mestres ---
// Entidades de referência: existem principalmente como chaves estrangeiras
// de produtos, lotes e pedidos. Os saldos de cliente/distribuidor são
// mutados exclusivamente pelo razão de transações.

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub contact_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Formula {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Distribution {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub contact_number: Option<String>,
    pub balance: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub contact_number: Option<String>,
    pub balance: Decimal,
}

// --- Payloads ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePartyPayload {
    #[validate(length(min = 1, message = "The 'name' field is required."))]
    pub name: String,
    pub address: Option<String>,
    #[validate(length(max = 15, message = "Contact number must have at most 15 characters."))]
    pub contact_number: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFormulaPayload {
    #[validate(length(min = 1, message = "The 'name' field is required."))]
    pub name: String,
    pub description: Option<String>,
}
