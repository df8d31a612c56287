// src/handlers/billing.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    handlers::loads::DeletePayload,
    middleware::operator::OperatorContext,
    models::billing::{BillingEntry, EntryFilter, ReconciliationSummary},
    services::billing_service::{EditEntryRequest, EntryPreview, EntryRequest, SubmitOutcome},
};

// POST /api/billing-entries
#[utoipa::path(
    post,
    path = "/api/billing-entries",
    tag = "Billing",
    request_body = EntryRequest,
    responses(
        (status = 201, description = "Lançamento gravado", body = SubmitOutcome),
        (status = 409, description = "Cargas já lançadas: reenviar com motivo", body = SubmitOutcome),
        (status = 400, description = "Nenhuma carga selecionada"),
        (status = 422, description = "Veículo inativo ou sem faixa de preço")
    ),
    params(("x-operator" = Option<String>, Header, description = "Operador"))
)]
pub async fn submit_entry(
    State(app_state): State<AppState>,
    OperatorContext(operator): OperatorContext,
    Json(payload): Json<EntryRequest>,
) -> Result<Response, AppError> {
    let outcome = app_state.billing_service.submit(payload, &operator).await?;

    Ok((submit_status(&outcome), Json(outcome)).into_response())
}

// Pendência de motivo não é erro: o front pede o motivo e reenvia
fn submit_status(outcome: &SubmitOutcome) -> StatusCode {
    match outcome {
        SubmitOutcome::Persisted { .. } => StatusCode::CREATED,
        SubmitOutcome::PendingJustification { .. } => StatusCode::CONFLICT,
    }
}

// POST /api/billing-entries/calculate
#[utoipa::path(
    post,
    path = "/api/billing-entries/calculate",
    tag = "Billing",
    request_body = EntryRequest,
    responses(
        (status = 200, description = "Cálculo e conflitos, sem gravar", body = EntryPreview)
    )
)]
pub async fn preview_entry(
    State(app_state): State<AppState>,
    Json(payload): Json<EntryRequest>,
) -> Result<impl IntoResponse, AppError> {
    let preview = app_state.billing_service.preview(&payload).await?;

    Ok((StatusCode::OK, Json(preview)))
}

// GET /api/billing-entries
#[utoipa::path(
    get,
    path = "/api/billing-entries",
    tag = "Billing",
    params(EntryFilter),
    responses(
        (status = 200, description = "Lançamentos", body = Vec<BillingEntry>)
    )
)]
pub async fn list_entries(
    State(app_state): State<AppState>,
    Query(filter): Query<EntryFilter>,
) -> Result<impl IntoResponse, AppError> {
    let entries = app_state.billing_service.list(&filter).await?;

    Ok((StatusCode::OK, Json(entries)))
}

// GET /api/billing-entries/summary
#[utoipa::path(
    get,
    path = "/api/billing-entries/summary",
    tag = "Billing",
    params(EntryFilter),
    responses(
        (status = 200, description = "Receita x custo do período", body = ReconciliationSummary)
    )
)]
pub async fn get_summary(
    State(app_state): State<AppState>,
    Query(filter): Query<EntryFilter>,
) -> Result<impl IntoResponse, AppError> {
    let summary = app_state.billing_service.reconciliation(&filter).await?;

    Ok((StatusCode::OK, Json(summary)))
}

// GET /api/billing-entries/{id}
#[utoipa::path(
    get,
    path = "/api/billing-entries/{id}",
    tag = "Billing",
    params(("id" = Uuid, Path, description = "ID do lançamento")),
    responses(
        (status = 200, description = "Lançamento", body = BillingEntry),
        (status = 404, description = "Não encontrado")
    )
)]
pub async fn get_entry(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let entry = app_state.billing_service.get(id).await?;

    Ok((StatusCode::OK, Json(entry)))
}

// PUT /api/billing-entries/{id}
#[utoipa::path(
    put,
    path = "/api/billing-entries/{id}",
    tag = "Billing",
    request_body = EditEntryRequest,
    params(
        ("id" = Uuid, Path, description = "ID do lançamento"),
        ("x-operator" = Option<String>, Header, description = "Operador")
    ),
    responses(
        (status = 200, description = "Novo lançamento; o original foi excluído com o motivo", body = BillingEntry),
        (status = 400, description = "Motivo da alteração ausente"),
        (status = 404, description = "Não encontrado"),
        (status = 409, description = "Lançamento já excluído")
    )
)]
pub async fn edit_entry(
    State(app_state): State<AppState>,
    OperatorContext(operator): OperatorContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<EditEntryRequest>,
) -> Result<impl IntoResponse, AppError> {
    let entry = app_state.billing_service.edit(id, payload, &operator).await?;

    Ok((StatusCode::OK, Json(entry)))
}

// POST /api/billing-entries/{id}/delete
#[utoipa::path(
    post,
    path = "/api/billing-entries/{id}/delete",
    tag = "Billing",
    request_body = DeletePayload,
    params(("id" = Uuid, Path, description = "ID do lançamento")),
    responses(
        (status = 200, description = "Lançamento excluído (lógica)", body = BillingEntry),
        (status = 400, description = "Motivo da exclusão ausente"),
        (status = 404, description = "Não encontrado"),
        (status = 409, description = "Lançamento já excluído")
    )
)]
pub async fn delete_entry(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<DeletePayload>,
) -> Result<impl IntoResponse, AppError> {
    let entry = app_state
        .billing_service
        .delete(id, payload.reason.as_deref())
        .await?;

    Ok((StatusCode::OK, Json(entry)))
}
