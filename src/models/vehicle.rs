// src/models/vehicle.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::validation::{validate_not_blank, validate_not_negative};

// --- Enums (Mapeando o Postgres) ---

/// De onde o registro veio. Compartilhado por veículos e cargas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "record_origin", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordOrigin {
    Erp,
    Csv,
    #[default]
    Manual,
}

// --- Structs ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,

    // Código do veículo no ERP, usado pelas cargas importadas
    #[schema(example = "V-0042")]
    pub external_code: String,

    #[schema(example = "ABC1D23")]
    pub plate: String,

    // Texto livre: "Carreta", "Truck", "Toco"...
    #[schema(example = "Carreta")]
    pub vehicle_type: String,

    #[schema(example = "João da Silva")]
    pub driver_name: Option<String>,

    #[schema(example = "27000")]
    pub capacity: Option<Decimal>,

    #[schema(example = true)]
    pub active: bool,

    pub origin: RecordOrigin,

    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehicleInput {
    #[validate(custom(function = "validate_not_blank"))]
    #[schema(example = "V-0042")]
    pub external_code: String,

    #[validate(length(min = 7, max = 8, message = "Placa inválida."))]
    #[schema(example = "ABC1D23")]
    pub plate: String,

    #[validate(custom(function = "validate_not_blank"))]
    #[schema(example = "Carreta")]
    pub vehicle_type: String,

    pub driver_name: Option<String>,

    #[validate(custom(function = "validate_not_negative"))]
    pub capacity: Option<Decimal>,

    #[serde(default = "default_active")]
    pub active: bool,

    #[serde(default)]
    pub origin: RecordOrigin,
}

fn default_active() -> bool {
    true
}
