// src/models/billing.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::models::{load::LoadSnapshot, pricing::Fees};

/// Resultado do cálculo de frete de um lançamento.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    // Cidade da carga mais distante (CidadeBase)
    #[schema(example = "Belo Horizonte")]
    pub base_city: String,

    #[schema(example = "350")]
    pub base_km: Decimal,

    #[schema(example = "2200.00")]
    pub base_value: Decimal,

    #[serde(flatten)]
    pub fees: Fees,

    #[schema(example = "2360.50")]
    pub total: Decimal,

    // Nenhuma faixa encontrada para cidade/tipo: valor base zerado
    pub pricing_tier_missing: bool,
}

/// Etapas de um lançamento, do rascunho até a exclusão.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryStage {
    Draft,
    LoadsSelected,
    Calculated,
    PendingJustification,
    Persisted,
    Superseded,
    Deleted,
}

/// Lançamento de frete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BillingEntry {
    pub id: Uuid,

    #[schema(value_type = String, format = Date, example = "2024-03-15")]
    pub freight_date: NaiveDate,

    pub vehicle_id: Uuid,

    pub loads: Vec<LoadSnapshot>,

    pub cost: CostBreakdown,

    // Operador que gravou o lançamento
    #[schema(example = "maria")]
    pub operator: String,

    // Motivo: substituição de carga já lançada ou edição
    pub justification: Option<String>,

    // Lançamento que este substituiu (fluxo de edição)
    pub supersedes: Option<Uuid>,
    // Lançamento que substituiu este
    pub superseded_by: Option<Uuid>,

    pub deleted: bool,
    pub delete_reason: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl BillingEntry {
    pub fn stage(&self) -> EntryStage {
        match (self.deleted, self.superseded_by) {
            (false, _) => EntryStage::Persisted,
            (true, Some(_)) => EntryStage::Superseded,
            (true, None) => EntryStage::Deleted,
        }
    }

    pub fn revenue(&self) -> Decimal {
        self.loads.iter().map(|load| load.invoice_value).sum()
    }
}

/// Lançamento pronto para ser gravado pelo repositório.
#[derive(Debug, Clone)]
pub struct NewBillingEntry {
    pub freight_date: NaiveDate,
    pub vehicle_id: Uuid,
    pub loads: Vec<LoadSnapshot>,
    pub cost: CostBreakdown,
    pub operator: String,
    pub justification: Option<String>,
    pub supersedes: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct EntryFilter {
    #[param(value_type = Option<String>, format = Date)]
    pub start: Option<NaiveDate>,
    #[param(value_type = Option<String>, format = Date)]
    pub end: Option<NaiveDate>,
    #[serde(default)]
    pub include_deleted: bool,
}

/// Receita (valor das cargas) contra custo (frete) de um período.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationSummary {
    #[schema(value_type = Option<String>, format = Date)]
    pub start: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = Date)]
    pub end: Option<NaiveDate>,
    pub entries: usize,
    pub revenue: Decimal,
    pub cost: Decimal,
    pub margin: Decimal,
}
