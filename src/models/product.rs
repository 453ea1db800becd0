// src/models/product.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

// --- Tipo de produto ---
// Enum fechado com rótulo de exibição explícito (sem constantes de classe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "product_type", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum ProductType {
    Tab,
    Syp,
    Cream,
    Cap,
    Inj,
    Drops,
    Drip,
    Sechet,
    Saop,
    #[sqlx(rename = "T/PASTE")]
    #[serde(rename = "T/PASTE")]
    TPaste,
    Ointment,
    Lotion,
    #[sqlx(rename = "B/CREAM")]
    #[serde(rename = "B/CREAM")]
    BCream,
    Oth,
}

impl ProductType {
    pub fn label(&self) -> &'static str {
        match self {
            ProductType::Tab => "Tablets",
            ProductType::Syp => "Syrup",
            ProductType::Cream => "Cream",
            ProductType::Cap => "Capsule",
            ProductType::Inj => "Injection",
            ProductType::Drops => "Drops",
            ProductType::Drip => "Drips",
            ProductType::Sechet => "Sechet",
            ProductType::Saop => "Saop",
            ProductType::TPaste => "T/Paste",
            ProductType::Ointment => "Ointment",
            ProductType::Lotion => "Lotion",
            ProductType::BCream => "B/Cream",
            ProductType::Oth => "Others",
        }
    }
}

// --- Filtros de listagem ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum ExpiryBucket {
    Expired,
    ShortExpired,
    ExpiredAndShortExpired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum LowQtyBucket {
    VeryLow,
    Low,
}

impl LowQtyBucket {
    /// Fração de `avg_qty` abaixo da qual o produto cai no balde.
    /// Literal SQL: entra na query agrupada, nunca como loop no cliente.
    pub fn sql_factor(&self) -> &'static str {
        match self {
            LowQtyBucket::VeryLow => "0.4",
            LowQtyBucket::Low => "0.8",
        }
    }
}

// Horizonte para "validade curta": lotes vencendo dentro de 180 dias.
pub const SHORT_EXPIRY_HORIZON_DAYS: u64 = 180;

pub fn short_expiry_horizon(as_of: NaiveDate) -> NaiveDate {
    as_of
        .checked_add_days(chrono::Days::new(SHORT_EXPIRY_HORIZON_DAYS))
        .unwrap_or(NaiveDate::MAX)
}

// --- Produto ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub company_id: Option<Uuid>,
    pub formula_id: Option<Uuid>,
    pub distribution_id: Option<Uuid>,
    pub product_type: ProductType,
    pub avg_qty: i32,
    pub per_pack: i32,
    pub market_item: bool,
    pub description: Option<String>,
}

// Projeção da query agrupada: produto + somas por balde de validade.
// As quantidades derivadas nunca são armazenadas.
#[derive(Debug, Clone, FromRow)]
pub struct ProductAggRow {
    pub id: Uuid,
    pub name: String,
    pub company_id: Option<Uuid>,
    pub formula_id: Option<Uuid>,
    pub distribution_id: Option<Uuid>,
    pub product_type: ProductType,
    pub avg_qty: i32,
    pub per_pack: i32,
    pub market_item: bool,
    pub description: Option<String>,
    pub total_qty: i64,
    pub total_qty_expired: i64,
    pub total_qty_short_expired: i64,
}

// Leitura servida pelo catálogo: linha agregada + déficits derivados
// pelo motor de agregação.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: Uuid,
    pub name: String,
    pub company_id: Option<Uuid>,
    pub formula_id: Option<Uuid>,
    pub distribution_id: Option<Uuid>,
    pub product_type: ProductType,
    #[schema(value_type = String)]
    pub product_type_label: &'static str,
    pub avg_qty: i32,
    pub per_pack: i32,
    pub market_item: bool,
    pub description: Option<String>,
    pub total_qty: i64,
    pub total_qty_expired: i64,
    pub total_qty_short_expired: i64,
    pub required_qty: i64,
    pub required_low_qty: i64,
    pub is_active: bool,
}

// Filtros do catálogo de produtos. Listas de ids chegam como CSV na
// query string e já vêm convertidas pelo handler.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub name: Option<String>,
    pub name_contains: Option<String>,
    pub product_type: Option<ProductType>,
    pub company_ids: Option<Vec<Uuid>>,
    pub distribution_ids: Option<Vec<Uuid>>,
    pub formula_ids: Option<Vec<Uuid>>,
    pub expiration: Option<ExpiryBucket>,
    pub low_qty: Option<LowQtyBucket>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct StockFilter {
    pub product_id: Option<Uuid>,
    pub barcode: Option<String>,
    pub bought_from: Option<Uuid>,
    pub entry_after: Option<NaiveDate>,
    pub entry_before: Option<NaiveDate>,
    pub expiration: Option<ExpiryBucket>,
    pub active: Option<bool>,
}

// --- Lote de estoque ---

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Stock {
    pub id: Uuid,
    pub product_id: Uuid,
    pub qty: i32,
    pub sale_price: Decimal,
    pub purchase_price: Decimal,
    pub expiry_date: Option<NaiveDate>,
    pub barcode: String,
    pub bought_from: Option<Uuid>,
    pub added_by: Option<Uuid>,
    pub entry_date: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- Código de barras (Code 128) ---
// Simbologia 1D linear: qualquer ASCII imprimível, até 128 caracteres.

pub fn is_code128(code: &str) -> bool {
    !code.is_empty() && code.len() <= 128 && code.bytes().all(|b| (0x20..=0x7e).contains(&b))
}

pub fn validate_barcode(code: &str) -> Result<(), ValidationError> {
    if is_code128(code) {
        return Ok(());
    }
    let mut err = ValidationError::new("code128");
    err.message = Some("Barcode must be a valid Code 128 string (printable ASCII, up to 128 characters).".into());
    Err(err)
}

/// Código gerado quando o lote é recebido sem etiqueta: a forma hex
/// simples do id da linha, que sempre passa no validador Code 128.
pub fn barcode_from_id(id: Uuid) -> String {
    id.simple().to_string()
}

// --- Payloads ---

fn validate_non_negative(val: i32) -> Result<(), ValidationError> {
    if val < 0 {
        let mut err = ValidationError::new("range");
        err.message = Some("The value cannot be negative.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    #[validate(length(min = 1, message = "The 'name' field is required."))]
    pub name: String,
    pub company_id: Option<Uuid>,
    pub formula_id: Option<Uuid>,
    pub distribution_id: Option<Uuid>,
    pub product_type: ProductType,
    #[validate(custom(function = "validate_non_negative"))]
    pub avg_qty: i32,
    #[validate(range(min = 1, message = "The 'perPack' field must be at least 1."))]
    #[serde(default = "default_per_pack")]
    pub per_pack: i32,
    #[serde(default = "default_market_item")]
    pub market_item: bool,
    pub description: Option<String>,
}

fn default_per_pack() -> i32 {
    1
}

fn default_market_item() -> bool {
    true
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStockPayload {
    pub product_id: Uuid,
    #[validate(custom(function = "validate_non_negative"))]
    pub qty: i32,
    pub sale_price: Decimal,
    pub purchase_price: Decimal,
    #[schema(value_type = String, format = Date)]
    pub expiry_date: Option<NaiveDate>,
    // Se ausente, o código é gerado a partir do id da linha persistida.
    #[validate(custom(function = "validate_barcode"))]
    pub barcode: Option<String>,
    pub bought_from: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStockPayload {
    #[validate(custom(function = "validate_non_negative"))]
    pub qty: Option<i32>,
    pub sale_price: Option<Decimal>,
    pub purchase_price: Option<Decimal>,
    #[schema(value_type = String, format = Date)]
    pub expiry_date: Option<NaiveDate>,
    pub bought_from: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn barcode_from_id_passes_code128() {
        let id = Uuid::new_v4();
        let code = barcode_from_id(id);
        assert_eq!(code.len(), 32);
        assert!(is_code128(&code));
    }

    #[test]
    fn code128_rejects_empty_and_non_ascii() {
        assert!(!is_code128(""));
        assert!(!is_code128("caixa-çã"));
        assert!(!is_code128(&"x".repeat(129)));
        assert!(is_code128("ABC-123 xyz"));
    }

    #[test]
    fn product_type_labels() {
        assert_eq!(ProductType::Tab.label(), "Tablets");
        assert_eq!(ProductType::TPaste.label(), "T/Paste");
        assert_eq!(ProductType::Oth.label(), "Others");
    }
}
