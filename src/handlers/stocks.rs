// src/handlers/stocks.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{NaiveDate, Utc};
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
    models::product::{CreateStockPayload, ExpiryBucket, StockFilter, UpdateStockPayload},
};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct StockListQuery {
    pub product_id: Option<Uuid>,
    pub barcode: Option<String>,
    pub bought_from: Option<Uuid>,
    pub entry_after: Option<NaiveDate>,
    pub entry_before: Option<NaiveDate>,
    pub expiration: Option<ExpiryBucket>,
    pub active: Option<bool>,
}

impl StockListQuery {
    fn into_filter(self) -> StockFilter {
        StockFilter {
            product_id: self.product_id,
            barcode: self.barcode,
            bought_from: self.bought_from,
            entry_after: self.entry_after,
            entry_before: self.entry_before,
            expiration: self.expiration,
            active: self.active,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/stocks",
    params(StockListQuery, PageQuery),
    responses((status = 200, description = "Página de lotes")),
    security(("bearer_auth" = []))
)]
pub async fn list_stocks(
    State(app_state): State<AppState>,
    Query(query): Query<StockListQuery>,
    Query(page): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filter = query.into_filter();
    let as_of = Utc::now().date_naive();
    let (results, total) = app_state
        .stock_repo
        .list(&filter, as_of, page.limit(), page.offset())
        .await?;

    Ok((StatusCode::OK, Json(Page::new(results, total, &page))))
}

pub async fn get_stock(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let stock = app_state
        .stock_repo
        .find(id)
        .await?
        .ok_or(AppError::NotFound { entity: "Stock" })?;
    Ok((StatusCode::OK, Json(stock)))
}

/// Recebimento de lote: o usuário autenticado fica registrado como
/// `added_by`; sem barcode, um é gerado do id persistido.
#[utoipa::path(
    post,
    path = "/api/stocks",
    request_body = CreateStockPayload,
    responses((status = 201, description = "Lote criado", body = crate::models::product::Stock)),
    security(("bearer_auth" = []))
)]
pub async fn create_stock(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateStockPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let stock = app_state.stock_repo.create(&payload, user.0.id).await?;
    Ok((StatusCode::CREATED, Json(stock)))
}

pub async fn update_stock(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStockPayload>,
) -> Result<impl IntoResponse, AppError> {
    require_superuser(&user.0)?;
    payload.validate()?;
    let stock = app_state.stock_repo.update(id, &payload).await?;
    Ok((StatusCode::OK, Json(stock)))
}

pub async fn delete_stock(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    require_superuser(&user.0)?;
    app_state.stock_repo.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
