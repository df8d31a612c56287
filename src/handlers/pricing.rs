// src/handlers/pricing.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::pricing::{FeeSchedule, FeeScheduleInput, PricingTier, PricingTierInput},
};

// =============================================================================
//  1. FAIXAS DE PREÇO
// =============================================================================

// POST /api/pricing/tiers
#[utoipa::path(
    post,
    path = "/api/pricing/tiers",
    tag = "Pricing",
    request_body = PricingTierInput,
    responses(
        (status = 201, description = "Faixa cadastrada", body = PricingTier),
        (status = 409, description = "Já existe faixa para a cidade e tipo de veículo")
    )
)]
pub async fn create_tier(
    State(app_state): State<AppState>,
    Json(payload): Json<PricingTierInput>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let tier = app_state.pricing_repo.create_tier(&payload).await?;

    Ok((StatusCode::CREATED, Json(tier)))
}

// GET /api/pricing/tiers
#[utoipa::path(
    get,
    path = "/api/pricing/tiers",
    tag = "Pricing",
    responses(
        (status = 200, description = "Faixas de preço", body = Vec<PricingTier>)
    )
)]
pub async fn list_tiers(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let tiers = app_state.pricing_repo.list_tiers().await?;

    Ok((StatusCode::OK, Json(tiers)))
}

// PUT /api/pricing/tiers/{id}
#[utoipa::path(
    put,
    path = "/api/pricing/tiers/{id}",
    tag = "Pricing",
    request_body = PricingTierInput,
    params(("id" = Uuid, Path, description = "ID da faixa")),
    responses(
        (status = 200, description = "Faixa atualizada", body = PricingTier),
        (status = 409, description = "Já existe faixa para a cidade e tipo de veículo"),
        (status = 404, description = "Não encontrada")
    )
)]
pub async fn update_tier(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PricingTierInput>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let tier = app_state.pricing_repo.update_tier(id, &payload).await?;

    Ok((StatusCode::OK, Json(tier)))
}

// DELETE /api/pricing/tiers/{id}
#[utoipa::path(
    delete,
    path = "/api/pricing/tiers/{id}",
    tag = "Pricing",
    params(("id" = Uuid, Path, description = "ID da faixa")),
    responses(
        (status = 204, description = "Faixa removida"),
        (status = 404, description = "Não encontrada")
    )
)]
pub async fn delete_tier(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.pricing_repo.delete_tier(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  2. TAXAS POR CIDADE
// =============================================================================

// POST /api/pricing/fees
#[utoipa::path(
    post,
    path = "/api/pricing/fees",
    tag = "Pricing",
    request_body = FeeScheduleInput,
    responses(
        (status = 201, description = "Taxas cadastradas", body = FeeSchedule),
        (status = 409, description = "Cidade já possui tabela de taxas")
    )
)]
pub async fn create_fee_schedule(
    State(app_state): State<AppState>,
    Json(payload): Json<FeeScheduleInput>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let schedule = app_state.pricing_repo.create_fee_schedule(&payload).await?;

    Ok((StatusCode::CREATED, Json(schedule)))
}

// GET /api/pricing/fees
#[utoipa::path(
    get,
    path = "/api/pricing/fees",
    tag = "Pricing",
    responses(
        (status = 200, description = "Tabelas de taxas", body = Vec<FeeSchedule>)
    )
)]
pub async fn list_fee_schedules(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let schedules = app_state.pricing_repo.list_fee_schedules().await?;

    Ok((StatusCode::OK, Json(schedules)))
}

// PUT /api/pricing/fees/{id}
#[utoipa::path(
    put,
    path = "/api/pricing/fees/{id}",
    tag = "Pricing",
    request_body = FeeScheduleInput,
    params(("id" = Uuid, Path, description = "ID da tabela de taxas")),
    responses(
        (status = 200, description = "Taxas atualizadas", body = FeeSchedule),
        (status = 404, description = "Não encontrada"),
        (status = 409, description = "Cidade já possui tabela de taxas")
    )
)]
pub async fn update_fee_schedule(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<FeeScheduleInput>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let schedule = app_state.pricing_repo.update_fee_schedule(id, &payload).await?;

    Ok((StatusCode::OK, Json(schedule)))
}

// DELETE /api/pricing/fees/{id}
#[utoipa::path(
    delete,
    path = "/api/pricing/fees/{id}",
    tag = "Pricing",
    params(("id" = Uuid, Path, description = "ID da tabela de taxas")),
    responses(
        (status = 204, description = "Tabela removida"),
        (status = 404, description = "Não encontrada")
    )
)]
pub async fn delete_fee_schedule(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.pricing_repo.delete_fee_schedule(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
