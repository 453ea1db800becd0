// src/handlers/orders.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        pagination::{Page, PageQuery},
    },
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::order::{CreateOrderPayload, OrderDetail, OrderStatus},
};

/// Criação de pedido: valida disponibilidade e desconto, grava pedido e
/// linhas em uma transação; devolve o detalhe completo.
#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderPayload,
    responses(
        (status = 201, description = "Pedido criado", body = OrderDetail),
        (status = 400, description = "Estoque insuficiente ou desconto fora dos limites")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_order(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateOrderPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let detail = app_state
        .order_service
        .create_order(&payload, user.0.id)
        .await?;

    Ok((StatusCode::CREATED, Json(detail)))
}

/// Transição de status. O corpo só pode conter o campo `status`;
/// qualquer outro campo junto é rejeitado.
#[utoipa::path(
    patch,
    path = "/api/orders/{id}",
    responses(
        (status = 200, description = "Pedido atualizado"),
        (status = 400, description = "Transição ilegal"),
        (status = 409, description = "Estoque consumido por transação concorrente")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_order_status(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse, AppError> {
    let fields = body
        .as_object()
        .ok_or_else(|| AppError::BadRequest("Only 'status' field can be updated.".to_string()))?;
    if !fields.contains_key("status") || fields.len() > 1 {
        return Err(AppError::BadRequest(
            "Only 'status' field can be updated.".to_string(),
        ));
    }

    let new_status: OrderStatus = serde_json::from_value(fields["status"].clone())
        .map_err(|_| {
            AppError::field(
                "status",
                "Only 'pending', 'completed' and 'cancelled' are allowed.",
            )
        })?;

    let order = app_state
        .order_service
        .transition(id, new_status, &user.0)
        .await?;

    Ok((StatusCode::OK, Json(order)))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    responses(
        (status = 200, description = "Detalhe do pedido", body = OrderDetail),
        (status = 404, description = "Pedido não encontrado")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_order(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let detail = app_state.order_service.get_order(id).await?;
    Ok((StatusCode::OK, Json(detail)))
}

pub async fn list_orders(
    State(app_state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (results, total) = app_state
        .order_service
        .list_orders(page.limit(), page.offset())
        .await?;
    Ok((StatusCode::OK, Json(Page::new(results, total, &page))))
}
