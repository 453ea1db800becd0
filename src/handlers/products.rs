// src/handlers/products.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        pagination::{Page, PageQuery},
    },
    config::AppState,
    middleware::auth::{AuthenticatedUser, require_superuser},
    models::product::{
        CreateProductPayload, ExpiryBucket, LowQtyBucket, ProductFilter, ProductType,
    },
};

// Query string do catálogo. Listas de ids chegam como CSV ("a,b,c").
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ProductListQuery {
    pub name: Option<String>,
    pub name_contains: Option<String>,
    pub product_type: Option<ProductType>,
    pub company_ids: Option<String>,
    pub distribution_ids: Option<String>,
    pub formula_ids: Option<String>,
    pub expiration: Option<ExpiryBucket>,
    pub low_qty: Option<LowQtyBucket>,
    pub active: Option<bool>,
}

// CSV -> Vec<Uuid>; qualquer item malformado é erro de validação no campo.
fn parse_id_list(field: &'static str, raw: &str) -> Result<Vec<Uuid>, AppError> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            Uuid::parse_str(part)
                .map_err(|_| AppError::field(field, format!("All '{field}' entries must be valid UUIDs.")))
        })
        .collect()
}

impl ProductListQuery {
    fn into_filter(self) -> Result<ProductFilter, AppError> {
        Ok(ProductFilter {
            name: self.name,
            name_contains: self.name_contains,
            product_type: self.product_type,
            company_ids: self
                .company_ids
                .as_deref()
                .map(|raw| parse_id_list("companyIds", raw))
                .transpose()?,
            distribution_ids: self
                .distribution_ids
                .as_deref()
                .map(|raw| parse_id_list("distributionIds", raw))
                .transpose()?,
            formula_ids: self
                .formula_ids
                .as_deref()
                .map(|raw| parse_id_list("formulaIds", raw))
                .transpose()?,
            expiration: self.expiration,
            low_qty: self.low_qty,
            active: self.active,
        })
    }
}

/// Catálogo paginado com as quantidades computadas por produto.
#[utoipa::path(
    get,
    path = "/api/products",
    params(ProductListQuery, PageQuery),
    responses((status = 200, description = "Página de produtos com quantidades agregadas")),
    security(("bearer_auth" = []))
)]
pub async fn list_products(
    State(app_state): State<AppState>,
    Query(query): Query<ProductListQuery>,
    Query(page): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filter = query.into_filter()?;
    let (results, total) = app_state
        .inventory_service
        .list_products(&filter, &page)
        .await?;

    Ok((StatusCode::OK, Json(Page::new(results, total, &page))))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    responses(
        (status = 200, description = "Detalhe do produto com quantidades agregadas"),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_product(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let product = app_state.inventory_service.get_product(id).await?;
    Ok((StatusCode::OK, Json(product)))
}

#[utoipa::path(
    post,
    path = "/api/products",
    request_body = CreateProductPayload,
    responses((status = 201, description = "Produto criado")),
    security(("bearer_auth" = []))
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let product = app_state.product_repo.create(&payload).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    require_superuser(&user.0)?;
    payload.validate()?;
    let product = app_state.product_repo.update(id, &payload).await?;
    Ok((StatusCode::OK, Json(product)))
}

pub async fn delete_product(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    require_superuser(&user.0)?;
    app_state.product_repo.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_of_uuids_parses() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let parsed = parse_id_list("companyIds", &format!("{a}, {b}")).unwrap();
        assert_eq!(parsed, vec![a, b]);
    }

    #[test]
    fn malformed_id_is_a_field_error() {
        let err = parse_id_list("companyIds", "123,not-an-id").unwrap_err();
        match err {
            AppError::FieldValidation { field, .. } => assert_eq!(field, "companyIds"),
            other => panic!("esperava FieldValidation, veio {other:?}"),
        }
    }
}
