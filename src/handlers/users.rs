// src/handlers/users.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::{AuthenticatedUser, require_superuser},
    models::auth::{CreateUserPayload, UpdateUserPayload},
};

// Administração de usuários: tudo aqui é restrito a superusuário,
// exceto o /me (que vive em handlers/auth.rs).

pub async fn create_user(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    require_superuser(&user.0)?;
    payload.validate()?;

    let created = app_state.auth_service.create_user(&payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_users(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    require_superuser(&user.0)?;

    let users = app_state.user_repo.list().await?;
    Ok((StatusCode::OK, Json(users)))
}

pub async fn get_user(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    require_superuser(&user.0)?;

    let found = app_state
        .user_repo
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound { entity: "User" })?;
    Ok((StatusCode::OK, Json(found)))
}

pub async fn update_user(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    require_superuser(&user.0)?;
    payload.validate()?;

    let updated = app_state.auth_service.update_user(id, &payload).await?;
    Ok((StatusCode::OK, Json(updated)))
}

pub async fn delete_user(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    require_superuser(&user.0)?;

    app_state.user_repo.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
