// src/services/billing_service.rs

use std::{collections::HashSet, sync::Arc};

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::{error::AppError, validation::non_blank},
    models::{
        billing::{
            BillingEntry, CostBreakdown, EntryFilter, EntryStage, NewBillingEntry,
            ReconciliationSummary,
        },
        load::{Load, LoadSnapshot},
        pricing::{FeeSchedule, PricingTier},
        vehicle::Vehicle,
    },
    services::{
        duplicate_detector::{conflicting_loads, find_conflicts},
        freight_calculator::calculate,
        pricing::PricingTable,
    },
};

/// Persistência que o fluxo de lançamentos precisa.
#[async_trait]
pub trait BillingStore: Send + Sync {
    async fn find_vehicle(&self, id: Uuid) -> Result<Option<Vehicle>, AppError>;

    async fn find_loads(&self, ids: &[Uuid]) -> Result<Vec<Load>, AppError>;

    async fn list_pricing_tiers(&self) -> Result<Vec<PricingTier>, AppError>;

    async fn list_fee_schedules(&self) -> Result<Vec<FeeSchedule>, AppError>;

    async fn list_entries(&self, filter: &EntryFilter) -> Result<Vec<BillingEntry>, AppError>;

    async fn find_entry(&self, id: Uuid) -> Result<Option<BillingEntry>, AppError>;

    /// Sem motivo, recusa com `LoadsClaimedConcurrently` se alguma carga já
    /// estiver em lançamento ativo no momento da gravação.
    async fn insert_entry(&self, entry: NewBillingEntry) -> Result<BillingEntry, AppError>;

    async fn soft_delete_entry(
        &self,
        id: Uuid,
        reason: &str,
        superseded_by: Option<Uuid>,
    ) -> Result<BillingEntry, AppError>;

    /// Grava o novo lançamento e exclui o antigo com o mesmo motivo.
    /// Esta versão faz duas escritas independentes; se a segunda falhar, os
    /// dois lançamentos ficam ativos. Implementações com transação devem sobrescrever.
    async fn supersede_entry(
        &self,
        entry: NewBillingEntry,
        old_id: Uuid,
        reason: &str,
    ) -> Result<BillingEntry, AppError> {
        let created = self.insert_entry(entry).await?;
        self.soft_delete_entry(old_id, reason, Some(created.id)).await?;
        Ok(created)
    }
}

// --- Rascunho ---

/// Lançamento em montagem, antes de ser gravado.
#[derive(Debug, Clone)]
pub struct EntryDraft {
    vehicle: Vehicle,
    freight_date: NaiveDate,
    loads: Vec<LoadSnapshot>,
    justification: Option<String>,
    breakdown: Option<CostBreakdown>,
    conflicts: Vec<LoadSnapshot>,
}

impl EntryDraft {
    pub fn new(vehicle: Vehicle, freight_date: NaiveDate) -> Self {
        Self {
            vehicle,
            freight_date,
            loads: Vec::new(),
            justification: None,
            breakdown: None,
            conflicts: Vec::new(),
        }
    }

    /// Trocar as cargas invalida cálculo e conflitos anteriores.
    pub fn select_loads(&mut self, loads: Vec<LoadSnapshot>) {
        self.loads = loads;
        self.breakdown = None;
        self.conflicts.clear();
    }

    pub fn justify(&mut self, justification: Option<&str>) {
        self.justification = non_blank(justification).map(str::to_string);
    }

    pub fn calculate(&mut self, table: &PricingTable) -> Option<&CostBreakdown> {
        self.breakdown = calculate(Some(&self.vehicle), &self.loads, table);
        self.breakdown.as_ref()
    }

    pub fn check_conflicts(&mut self, existing: &[BillingEntry], exclude_entry_id: Option<Uuid>) {
        self.conflicts = conflicting_loads(&self.loads, existing, exclude_entry_id);
    }

    pub fn stage(&self) -> EntryStage {
        if self.loads.is_empty() {
            EntryStage::Draft
        } else if self.breakdown.is_none() {
            EntryStage::LoadsSelected
        } else if !self.conflicts.is_empty() && self.justification.is_none() {
            EntryStage::PendingJustification
        } else {
            EntryStage::Calculated
        }
    }

    pub fn breakdown(&self) -> Option<&CostBreakdown> {
        self.breakdown.as_ref()
    }

    pub fn conflicts(&self) -> &[LoadSnapshot] {
        &self.conflicts
    }

    /// Só sai daqui um lançamento se o rascunho estiver pronto para gravar.
    fn into_new_entry(self, operator: &str, supersedes: Option<Uuid>) -> Option<NewBillingEntry> {
        if self.stage() != EntryStage::Calculated {
            return None;
        }

        Some(NewBillingEntry {
            freight_date: self.freight_date,
            vehicle_id: self.vehicle.id,
            loads: self.loads,
            cost: self.breakdown?,
            operator: operator.to_string(),
            justification: self.justification,
            supersedes,
        })
    }
}

// --- Requisições e resultados ---

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntryRequest {
    pub vehicle_id: Uuid,

    #[schema(value_type = String, format = Date, example = "2024-03-15")]
    pub freight_date: NaiveDate,

    pub load_ids: Vec<Uuid>,

    // Motivo para reaproveitar cargas já lançadas
    pub justification: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditEntryRequest {
    pub vehicle_id: Option<Uuid>,

    #[schema(value_type = Option<String>, format = Date)]
    pub freight_date: Option<NaiveDate>,

    // Ausente: mantém as cargas (snapshots) do lançamento original
    pub load_ids: Option<Vec<Uuid>>,

    // Obrigatório
    #[schema(example = "Correção de valor")]
    pub justification: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntryPreview {
    pub cost: CostBreakdown,
    pub conflicts: Vec<LoadSnapshot>,
    pub stage: EntryStage,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmitOutcome {
    Persisted { entry: BillingEntry },
    /// Cargas já lançadas e nenhum motivo informado: nada foi gravado.
    PendingJustification { cost: CostBreakdown, conflicts: Vec<LoadSnapshot> },
}

// --- Serviço ---

#[derive(Clone)]
pub struct BillingService {
    store: Arc<dyn BillingStore>,
    block_on_missing_tier: bool,
}

impl BillingService {
    pub fn new(store: Arc<dyn BillingStore>, block_on_missing_tier: bool) -> Self {
        Self { store, block_on_missing_tier }
    }

    pub async fn list(&self, filter: &EntryFilter) -> Result<Vec<BillingEntry>, AppError> {
        self.store.list_entries(filter).await
    }

    pub async fn get(&self, id: Uuid) -> Result<BillingEntry, AppError> {
        self.store
            .find_entry(id)
            .await?
            .ok_or(AppError::EntryNotFound(id))
    }

    /// Calcula e verifica conflitos sem gravar.
    pub async fn preview(&self, request: &EntryRequest) -> Result<EntryPreview, AppError> {
        let draft = self.prepare(request).await?;
        let cost = draft.breakdown().cloned().ok_or(AppError::NoLoadsSelected)?;

        Ok(EntryPreview {
            stage: draft.stage(),
            conflicts: draft.conflicts().to_vec(),
            cost,
        })
    }

    pub async fn submit(&self, request: EntryRequest, operator: &str) -> Result<SubmitOutcome, AppError> {
        let draft = self.prepare(&request).await?;

        if draft.stage() == EntryStage::PendingJustification {
            tracing::info!(
                "Lançamento aguardando motivo: {} carga(s) já lançada(s)",
                draft.conflicts().len()
            );
            return Ok(SubmitOutcome::PendingJustification {
                cost: draft.breakdown().cloned().ok_or(AppError::NoLoadsSelected)?,
                conflicts: draft.conflicts().to_vec(),
            });
        }

        if !draft.conflicts().is_empty() {
            tracing::warn!(
                "Cargas reaproveitadas com motivo: {:?}",
                draft.conflicts().iter().map(|l| l.load_number.as_str()).collect::<Vec<_>>()
            );
        }

        let new_entry = draft
            .into_new_entry(operator, None)
            .ok_or(AppError::NoLoadsSelected)?;
        let entry = self.store.insert_entry(new_entry).await?;

        tracing::info!("✅ Lançamento {} gravado (total {})", entry.id, entry.cost.total);
        Ok(SubmitOutcome::Persisted { entry })
    }

    /// Edição = novo lançamento + exclusão do original com o mesmo motivo.
    pub async fn edit(
        &self,
        id: Uuid,
        request: EditEntryRequest,
        operator: &str,
    ) -> Result<BillingEntry, AppError> {
        let justification = non_blank(request.justification.as_deref())
            .ok_or(AppError::MissingJustificationOnEdit)?
            .to_string();

        let original = self.get(id).await?;
        if original.stage() != EntryStage::Persisted {
            return Err(AppError::EntryAlreadyDeleted(id));
        }

        let vehicle = match request.vehicle_id {
            Some(vehicle_id) => self.active_vehicle(vehicle_id).await?,
            // O veículo original é mantido mesmo que tenha sido inativado depois
            None => self
                .store
                .find_vehicle(original.vehicle_id)
                .await?
                .ok_or(AppError::VehicleNotFound(original.vehicle_id))?,
        };

        let loads = match &request.load_ids {
            Some(load_ids) => self.snapshots(load_ids).await?,
            None => original.loads.clone(),
        };

        let existing = self.store.list_entries(&EntryFilter::default()).await?;
        if find_conflicts(&loads, &existing, Some(id)) {
            tracing::warn!("Edição do lançamento {} reaproveita cargas de outro lançamento", id);
        }

        let mut draft = EntryDraft::new(vehicle, request.freight_date.unwrap_or(original.freight_date));
        draft.select_loads(loads);
        draft.justify(Some(justification.as_str()));
        self.price(&mut draft).await?;

        let new_entry = draft
            .into_new_entry(operator, Some(id))
            .ok_or(AppError::NoLoadsSelected)?;
        let entry = self.store.supersede_entry(new_entry, id, &justification).await?;

        tracing::info!("✅ Lançamento {} substituído por {} ({})", id, entry.id, justification);
        Ok(entry)
    }

    pub async fn delete(&self, id: Uuid, reason: Option<&str>) -> Result<BillingEntry, AppError> {
        let reason = non_blank(reason).ok_or(AppError::MissingDeletionReason)?;

        let entry = self.get(id).await?;
        if entry.stage() != EntryStage::Persisted {
            return Err(AppError::EntryAlreadyDeleted(id));
        }

        let deleted = self.store.soft_delete_entry(id, reason, None).await?;
        tracing::info!("🗑️ Lançamento {} excluído: {}", id, reason);
        Ok(deleted)
    }

    pub async fn reconciliation(&self, filter: &EntryFilter) -> Result<ReconciliationSummary, AppError> {
        let live = EntryFilter { include_deleted: false, ..filter.clone() };
        let entries = self.store.list_entries(&live).await?;
        Ok(summarize(&entries, filter.start, filter.end))
    }

    // --- Etapas internas ---

    async fn prepare(&self, request: &EntryRequest) -> Result<EntryDraft, AppError> {
        let vehicle = self.active_vehicle(request.vehicle_id).await?;
        let loads = self.snapshots(&request.load_ids).await?;

        let mut draft = EntryDraft::new(vehicle, request.freight_date);
        draft.select_loads(loads);
        draft.justify(request.justification.as_deref());
        self.price(&mut draft).await?;

        let existing = self.store.list_entries(&EntryFilter::default()).await?;
        draft.check_conflicts(&existing, None);
        Ok(draft)
    }

    async fn active_vehicle(&self, id: Uuid) -> Result<Vehicle, AppError> {
        let vehicle = self
            .store
            .find_vehicle(id)
            .await?
            .ok_or(AppError::VehicleNotFound(id))?;

        if !vehicle.active {
            return Err(AppError::VehicleInactive(id));
        }
        Ok(vehicle)
    }

    /// Snapshots das cargas na ordem pedida, sem repetição.
    async fn snapshots(&self, load_ids: &[Uuid]) -> Result<Vec<LoadSnapshot>, AppError> {
        let mut seen = HashSet::new();
        let ids: Vec<Uuid> = load_ids.iter().copied().filter(|id| seen.insert(*id)).collect();
        if ids.is_empty() {
            return Err(AppError::NoLoadsSelected);
        }

        let found = self.store.find_loads(&ids).await?;

        ids.iter()
            .map(|id| {
                found
                    .iter()
                    .find(|load| load.id == *id && !load.deleted)
                    .map(LoadSnapshot::from)
                    .ok_or(AppError::LoadNotFound(*id))
            })
            .collect()
    }

    async fn price(&self, draft: &mut EntryDraft) -> Result<(), AppError> {
        let tiers = self.store.list_pricing_tiers().await?;
        let schedules = self.store.list_fee_schedules().await?;
        let table = PricingTable::new(&tiers, &schedules);

        let breakdown = draft
            .calculate(&table)
            .cloned()
            .ok_or(AppError::NoLoadsSelected)?;

        if breakdown.pricing_tier_missing && self.block_on_missing_tier {
            return Err(AppError::MissingPricingTier {
                city: breakdown.base_city,
                vehicle_type: draft.vehicle.vehicle_type.clone(),
            });
        }
        Ok(())
    }
}

/// Soma receita (valor das cargas) e custo (frete) dos lançamentos ativos.
pub fn summarize(
    entries: &[BillingEntry],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> ReconciliationSummary {
    let live: Vec<&BillingEntry> = entries.iter().filter(|entry| !entry.deleted).collect();
    let revenue: Decimal = live.iter().map(|entry| entry.revenue()).sum();
    let cost: Decimal = live.iter().map(|entry| entry.cost.total).sum();

    ReconciliationSummary {
        start,
        end,
        entries: live.len(),
        revenue,
        cost,
        margin: revenue - cost,
    }
}
