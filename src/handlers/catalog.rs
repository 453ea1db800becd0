// src/handlers/catalog.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::catalog::{CreateFormulaPayload, CreatePartyPayload},
};

// Dados mestres: criação e listagem mínimas, o suficiente para servirem
// de chave estrangeira a produtos, lotes e pedidos.

pub async fn create_company(
    State(app_state): State<AppState>,
    Json(payload): Json<CreatePartyPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let company = app_state
        .catalog_repo
        .create_company(
            &payload.name,
            payload.address.as_deref(),
            payload.contact_number.as_deref(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(company)))
}

pub async fn list_companies(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let companies = app_state.catalog_repo.list_companies().await?;
    Ok((StatusCode::OK, Json(companies)))
}

pub async fn create_formula(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateFormulaPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let formula = app_state
        .catalog_repo
        .create_formula(&payload.name, payload.description.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(formula)))
}

pub async fn list_formulas(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let formulas = app_state.catalog_repo.list_formulas().await?;
    Ok((StatusCode::OK, Json(formulas)))
}

pub async fn create_distribution(
    State(app_state): State<AppState>,
    Json(payload): Json<CreatePartyPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let distribution = app_state
        .catalog_repo
        .create_distribution(
            &payload.name,
            payload.address.as_deref(),
            payload.contact_number.as_deref(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(distribution)))
}

pub async fn list_distributions(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let distributions = app_state.catalog_repo.list_distributions().await?;
    Ok((StatusCode::OK, Json(distributions)))
}

pub async fn create_customer(
    State(app_state): State<AppState>,
    Json(payload): Json<CreatePartyPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let customer = app_state
        .catalog_repo
        .create_customer(
            &payload.name,
            payload.address.as_deref(),
            payload.contact_number.as_deref(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

pub async fn list_customers(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let customers = app_state.catalog_repo.list_customers().await?;
    Ok((StatusCode::OK, Json(customers)))
}
