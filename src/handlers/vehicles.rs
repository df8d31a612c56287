// src/handlers/vehicles.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::vehicle::{Vehicle, VehicleInput},
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct VehicleQuery {
    // Apenas veículos ativos (os selecionáveis em lançamentos)
    #[serde(default)]
    pub only_active: bool,
}

// POST /api/vehicles
#[utoipa::path(
    post,
    path = "/api/vehicles",
    tag = "Vehicles",
    request_body = VehicleInput,
    responses(
        (status = 201, description = "Veículo cadastrado", body = Vehicle),
        (status = 400, description = "Dados inválidos")
    )
)]
pub async fn create_vehicle(
    State(app_state): State<AppState>,
    Json(payload): Json<VehicleInput>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let vehicle = app_state.vehicle_repo.create(&payload).await?;

    Ok((StatusCode::CREATED, Json(vehicle)))
}

// GET /api/vehicles
#[utoipa::path(
    get,
    path = "/api/vehicles",
    tag = "Vehicles",
    params(VehicleQuery),
    responses(
        (status = 200, description = "Lista de veículos", body = Vec<Vehicle>)
    )
)]
pub async fn list_vehicles(
    State(app_state): State<AppState>,
    Query(query): Query<VehicleQuery>,
) -> Result<impl IntoResponse, AppError> {
    let vehicles = app_state.vehicle_repo.list(query.only_active).await?;

    Ok((StatusCode::OK, Json(vehicles)))
}

// GET /api/vehicles/{id}
#[utoipa::path(
    get,
    path = "/api/vehicles/{id}",
    tag = "Vehicles",
    params(("id" = Uuid, Path, description = "ID do veículo")),
    responses(
        (status = 200, description = "Veículo", body = Vehicle),
        (status = 404, description = "Não encontrado")
    )
)]
pub async fn get_vehicle(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let vehicle = app_state
        .vehicle_repo
        .find_by_id(id)
        .await?
        .ok_or(AppError::VehicleNotFound(id))?;

    Ok((StatusCode::OK, Json(vehicle)))
}

// PUT /api/vehicles/{id}
#[utoipa::path(
    put,
    path = "/api/vehicles/{id}",
    tag = "Vehicles",
    request_body = VehicleInput,
    params(("id" = Uuid, Path, description = "ID do veículo")),
    responses(
        (status = 200, description = "Veículo atualizado", body = Vehicle),
        (status = 404, description = "Não encontrado")
    )
)]
pub async fn update_vehicle(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<VehicleInput>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let vehicle = app_state
        .vehicle_repo
        .update(id, &payload)
        .await?
        .ok_or(AppError::VehicleNotFound(id))?;

    Ok((StatusCode::OK, Json(vehicle)))
}
