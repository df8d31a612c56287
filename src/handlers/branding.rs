// src/handlers/branding.rs

use axum::{extract::State, Json};

use crate::config::{AppState, Branding};

// GET /api/branding
#[utoipa::path(
    get,
    path = "/api/branding",
    tag = "Settings",
    responses(
        (status = 200, description = "Identidade visual configurada", body = Branding)
    )
)]
pub async fn get_branding(State(app_state): State<AppState>) -> Json<Branding> {
    Json(app_state.branding.as_ref().clone())
}
