// src/handlers/loads.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::load::{Load, LoadInput},
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct LoadQuery {
    #[serde(default)]
    pub include_deleted: bool,
}

/// Corpo de exclusão lógica (MotivoExclusao).
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletePayload {
    #[schema(example = "Carga lançada em duplicidade")]
    pub reason: Option<String>,
}

// POST /api/loads
#[utoipa::path(
    post,
    path = "/api/loads",
    tag = "Loads",
    request_body = LoadInput,
    responses(
        (status = 201, description = "Carga criada (km derivado da tabela quando omitido)", body = Load),
        (status = 400, description = "Dados inválidos")
    )
)]
pub async fn create_load(
    State(app_state): State<AppState>,
    Json(payload): Json<LoadInput>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let load = app_state.load_service.create(&payload).await?;

    Ok((StatusCode::CREATED, Json(load)))
}

// GET /api/loads
#[utoipa::path(
    get,
    path = "/api/loads",
    tag = "Loads",
    params(LoadQuery),
    responses(
        (status = 200, description = "Lista de cargas", body = Vec<Load>)
    )
)]
pub async fn list_loads(
    State(app_state): State<AppState>,
    Query(query): Query<LoadQuery>,
) -> Result<impl IntoResponse, AppError> {
    let loads = app_state.load_service.list(query.include_deleted).await?;

    Ok((StatusCode::OK, Json(loads)))
}

// GET /api/loads/{id}
#[utoipa::path(
    get,
    path = "/api/loads/{id}",
    tag = "Loads",
    params(("id" = Uuid, Path, description = "ID da carga")),
    responses(
        (status = 200, description = "Carga", body = Load),
        (status = 404, description = "Não encontrada")
    )
)]
pub async fn get_load(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let load = app_state.load_service.get(id).await?;

    Ok((StatusCode::OK, Json(load)))
}

// PUT /api/loads/{id}
#[utoipa::path(
    put,
    path = "/api/loads/{id}",
    tag = "Loads",
    request_body = LoadInput,
    params(("id" = Uuid, Path, description = "ID da carga")),
    responses(
        (status = 200, description = "Carga alterada", body = Load),
        (status = 400, description = "Motivo da alteração ausente"),
        (status = 404, description = "Não encontrada")
    )
)]
pub async fn update_load(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<LoadInput>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let load = app_state.load_service.update(id, &payload).await?;

    Ok((StatusCode::OK, Json(load)))
}

// POST /api/loads/{id}/delete
#[utoipa::path(
    post,
    path = "/api/loads/{id}/delete",
    tag = "Loads",
    request_body = DeletePayload,
    params(("id" = Uuid, Path, description = "ID da carga")),
    responses(
        (status = 200, description = "Carga excluída (lógica)", body = Load),
        (status = 400, description = "Motivo da exclusão ausente"),
        (status = 404, description = "Não encontrada")
    )
)]
pub async fn delete_load(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<DeletePayload>,
) -> Result<impl IntoResponse, AppError> {
    let load = app_state.load_service.delete(id, payload.reason.as_deref()).await?;

    Ok((StatusCode::OK, Json(load)))
}
