// src/handlers/ledger.rs

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        pagination::{Page, PageQuery},
    },
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::ledger::RecordTransactionPayload,
};

/// Lançamento no razão: exatamente um vínculo (pedido ou distribuidor);
/// o saldo da parte é ajustado na mesma transação.
#[utoipa::path(
    post,
    path = "/api/transactions",
    request_body = RecordTransactionPayload,
    responses(
        (status = 201, description = "Lançamento registrado e saldo ajustado"),
        (status = 400, description = "Vínculo ausente/duplicado ou valor inválido")
    ),
    security(("bearer_auth" = []))
)]
pub async fn record_transaction(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<RecordTransactionPayload>,
) -> Result<impl IntoResponse, AppError> {
    let entry = app_state.ledger_service.record(&payload, user.0.id).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct CustomerTransactionQuery {
    pub customer_id: Option<Uuid>,
}

pub async fn list_customer_transactions(
    State(app_state): State<AppState>,
    Query(query): Query<CustomerTransactionQuery>,
    Query(page): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (results, total) = app_state
        .ledger_service
        .list_customer_transactions(query.customer_id, page.limit(), page.offset())
        .await?;
    Ok((StatusCode::OK, Json(Page::new(results, total, &page))))
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct DistributionTransactionQuery {
    pub distribution_id: Option<Uuid>,
}

pub async fn list_distribution_transactions(
    State(app_state): State<AppState>,
    Query(query): Query<DistributionTransactionQuery>,
    Query(page): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (results, total) = app_state
        .ledger_service
        .list_distribution_transactions(query.distribution_id, page.limit(), page.offset())
        .await?;
    Ok((StatusCode::OK, Json(Page::new(results, total, &page))))
}
