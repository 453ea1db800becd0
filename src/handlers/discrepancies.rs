// src/handlers/discrepancies.rs

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    common::{
        error::AppError,
        pagination::{Page, PageQuery},
    },
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::discrepancy::CreateDiscrepancyPayload,
};

/// Registro de discrepância (movimento fora de venda). A combinação de
/// campos é validada por tipo; o valor pode ser derivado do lote.
#[utoipa::path(
    post,
    path = "/api/discrepancies",
    request_body = CreateDiscrepancyPayload,
    responses(
        (status = 201, description = "Discrepância registrada"),
        (status = 400, description = "Combinação de campos inválida para o tipo")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_discrepancy(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateDiscrepancyPayload>,
) -> Result<impl IntoResponse, AppError> {
    let discrepancy = app_state
        .discrepancy_service
        .record(&payload, user.0.id)
        .await?;
    Ok((StatusCode::CREATED, Json(discrepancy)))
}

pub async fn list_discrepancies(
    State(app_state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (results, total) = app_state
        .discrepancy_service
        .list(page.limit(), page.offset())
        .await?;
    Ok((StatusCode::OK, Json(Page::new(results, total, &page))))
}
