// src/models/load.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::validation::{validate_not_blank, validate_not_negative},
    models::vehicle::RecordOrigin,
};

/// Uma carga (nota/CTE) com cidade de destino, valor faturado e distância.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Load {
    pub id: Uuid,

    #[schema(example = "123456")]
    pub load_number: String,

    #[schema(example = "Belo Horizonte")]
    pub city: String,

    // Valor do CTE (lado da receita)
    #[schema(example = "15300.00")]
    pub invoice_value: Decimal,

    #[schema(value_type = String, format = Date, example = "2024-03-15")]
    pub invoice_date: NaiveDate,

    #[schema(example = "350")]
    pub km: Decimal,

    // Código externo do veículo associado
    #[schema(example = "V-0042")]
    pub vehicle_code: Option<String>,

    pub origin: RecordOrigin,

    pub deleted: bool,
    pub delete_reason: Option<String>,

    // MotivoAlteracao da última edição
    pub edit_reason: Option<String>,

    pub created_at: Option<DateTime<Utc>>,
}

/// Cópia dos campos relevantes de uma carga no momento do lançamento.
/// Edições posteriores na carga não alteram lançamentos já gravados.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoadSnapshot {
    pub load_id: Uuid,
    pub load_number: String,
    pub city: String,
    pub invoice_value: Decimal,
    #[schema(value_type = String, format = Date, example = "2024-03-15")]
    pub invoice_date: NaiveDate,
    pub km: Decimal,
    pub vehicle_code: Option<String>,
}

impl From<&Load> for LoadSnapshot {
    fn from(load: &Load) -> Self {
        Self {
            load_id: load.id,
            load_number: load.load_number.clone(),
            city: load.city.clone(),
            invoice_value: load.invoice_value,
            invoice_date: load.invoice_date,
            km: load.km,
            vehicle_code: load.vehicle_code.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoadInput {
    #[validate(custom(function = "validate_not_blank"))]
    #[schema(example = "123456")]
    pub load_number: String,

    #[validate(custom(function = "validate_not_blank"))]
    #[schema(example = "Belo Horizonte")]
    pub city: String,

    #[validate(custom(function = "validate_not_negative"))]
    #[schema(example = "15300.00")]
    pub invoice_value: Decimal,

    #[schema(value_type = String, format = Date, example = "2024-03-15")]
    pub invoice_date: NaiveDate,

    // Quando ausente, a distância é derivada da tabela de preços
    #[validate(custom(function = "validate_not_negative"))]
    pub km: Option<Decimal>,

    pub vehicle_code: Option<String>,

    #[serde(default)]
    pub origin: RecordOrigin,

    // Obrigatório apenas em edições
    pub edit_reason: Option<String>,
}
