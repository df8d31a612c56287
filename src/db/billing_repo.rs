// src/db/billing_repo.rs

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{types::Json, Executor, FromRow, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{LoadRepository, PricingRepository, VehicleRepository},
    models::{
        billing::{BillingEntry, CostBreakdown, EntryFilter, NewBillingEntry},
        load::{Load, LoadSnapshot},
        pricing::{FeeSchedule, Fees, PricingTier},
        vehicle::Vehicle,
    },
    services::billing_service::BillingStore,
};

// Linha de `billing_entries`: o cálculo fica em colunas, os snapshots em JSONB
#[derive(Debug, FromRow)]
struct BillingEntryRow {
    id: Uuid,
    freight_date: NaiveDate,
    vehicle_id: Uuid,
    loads: Json<Vec<LoadSnapshot>>,
    base_city: String,
    base_km: Decimal,
    base_value: Decimal,
    #[sqlx(flatten)]
    fees: Fees,
    total: Decimal,
    pricing_tier_missing: bool,
    operator: String,
    justification: Option<String>,
    supersedes: Option<Uuid>,
    superseded_by: Option<Uuid>,
    deleted: bool,
    delete_reason: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<BillingEntryRow> for BillingEntry {
    fn from(row: BillingEntryRow) -> Self {
        BillingEntry {
            id: row.id,
            freight_date: row.freight_date,
            vehicle_id: row.vehicle_id,
            loads: row.loads.0,
            cost: CostBreakdown {
                base_city: row.base_city,
                base_km: row.base_km,
                base_value: row.base_value,
                fees: row.fees,
                total: row.total,
                pricing_tier_missing: row.pricing_tier_missing,
            },
            operator: row.operator,
            justification: row.justification,
            supersedes: row.supersedes,
            superseded_by: row.superseded_by,
            deleted: row.deleted,
            delete_reason: row.delete_reason,
            created_at: row.created_at,
        }
    }
}

// Chave do advisory lock que serializa a gravação de lançamentos
const ENTRY_WRITE_LOCK: i64 = 7_341_202;

#[derive(Clone)]
pub struct BillingRepository {
    pool: PgPool,
    vehicles: VehicleRepository,
    loads: LoadRepository,
    pricing: PricingRepository,
}

impl BillingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            vehicles: VehicleRepository::new(pool.clone()),
            loads: LoadRepository::new(pool.clone()),
            pricing: PricingRepository::new(pool.clone()),
            pool,
        }
    }

    async fn insert_with<'e, E>(executor: E, entry: &NewBillingEntry) -> Result<BillingEntry, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, BillingEntryRow>(
            r#"
            INSERT INTO billing_entries (
                freight_date, vehicle_id, loads,
                base_city, base_km, base_value,
                toll, ferry, environmental, labor_fee, other,
                total, pricing_tier_missing,
                operator, justification, supersedes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING *
            "#,
        )
        .bind(entry.freight_date)
        .bind(entry.vehicle_id)
        .bind(Json(&entry.loads))
        .bind(&entry.cost.base_city)
        .bind(entry.cost.base_km)
        .bind(entry.cost.base_value)
        .bind(entry.cost.fees.toll)
        .bind(entry.cost.fees.ferry)
        .bind(entry.cost.fees.environmental)
        .bind(entry.cost.fees.labor_fee)
        .bind(entry.cost.fees.other)
        .bind(entry.cost.total)
        .bind(entry.cost.pricing_tier_missing)
        .bind(&entry.operator)
        .bind(&entry.justification)
        .bind(entry.supersedes)
        .fetch_one(executor)
        .await?;

        Ok(row.into())
    }

    async fn lock_entries<'e, E>(executor: E) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(ENTRY_WRITE_LOCK)
            .execute(executor)
            .await?;
        Ok(())
    }

    // Alguma das cargas já está em lançamento ativo?
    async fn any_claimed<'e, E>(executor: E, load_ids: &[Uuid]) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let claimed = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM billing_entries e, jsonb_array_elements(e.loads) AS l
                WHERE e.deleted = FALSE
                  AND (l ->> 'loadId')::uuid = ANY($1)
            )
            "#,
        )
        .bind(load_ids)
        .fetch_one(executor)
        .await?;

        Ok(claimed)
    }

    // Só exclui o que ainda está ativo; dois usuários editando o mesmo
    // lançamento não conseguem excluí-lo duas vezes.
    async fn soft_delete_with<'e, E>(
        executor: E,
        id: Uuid,
        reason: &str,
        superseded_by: Option<Uuid>,
    ) -> Result<BillingEntry, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, BillingEntryRow>(
            r#"
            UPDATE billing_entries
            SET deleted = TRUE, delete_reason = $2, superseded_by = $3
            WHERE id = $1 AND deleted = FALSE
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(reason)
        .bind(superseded_by)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::EntryAlreadyDeleted(id))?;

        Ok(row.into())
    }
}

#[async_trait]
impl BillingStore for BillingRepository {
    async fn find_vehicle(&self, id: Uuid) -> Result<Option<Vehicle>, AppError> {
        self.vehicles.find_by_id(id).await
    }

    async fn find_loads(&self, ids: &[Uuid]) -> Result<Vec<Load>, AppError> {
        self.loads.find_many(ids).await
    }

    async fn list_pricing_tiers(&self) -> Result<Vec<PricingTier>, AppError> {
        self.pricing.list_tiers().await
    }

    async fn list_fee_schedules(&self) -> Result<Vec<FeeSchedule>, AppError> {
        self.pricing.list_fee_schedules().await
    }

    async fn list_entries(&self, filter: &EntryFilter) -> Result<Vec<BillingEntry>, AppError> {
        let rows = sqlx::query_as::<_, BillingEntryRow>(
            r#"
            SELECT * FROM billing_entries
            WHERE ($1 OR deleted = FALSE)
              AND ($2::date IS NULL OR freight_date >= $2)
              AND ($3::date IS NULL OR freight_date <= $3)
            ORDER BY freight_date DESC, created_at DESC
            "#,
        )
        .bind(filter.include_deleted)
        .bind(filter.start)
        .bind(filter.end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(BillingEntry::from).collect())
    }

    async fn find_entry(&self, id: Uuid) -> Result<Option<BillingEntry>, AppError> {
        let row = sqlx::query_as::<_, BillingEntryRow>("SELECT * FROM billing_entries WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(BillingEntry::from))
    }

    /// Verificação de cargas e gravação sob o mesmo lock: dois envios
    /// simultâneos da mesma carga não passam ambos sem motivo.
    async fn insert_entry(&self, entry: NewBillingEntry) -> Result<BillingEntry, AppError> {
        let mut tx = self.pool.begin().await?;
        Self::lock_entries(&mut *tx).await?;

        if entry.justification.is_none() {
            let load_ids: Vec<Uuid> = entry.loads.iter().map(|load| load.load_id).collect();
            if Self::any_claimed(&mut *tx, &load_ids).await? {
                return Err(AppError::LoadsClaimedConcurrently);
            }
        }

        let created = Self::insert_with(&mut *tx, &entry).await?;

        tx.commit().await?;
        Ok(created)
    }

    async fn soft_delete_entry(
        &self,
        id: Uuid,
        reason: &str,
        superseded_by: Option<Uuid>,
    ) -> Result<BillingEntry, AppError> {
        Self::soft_delete_with(&self.pool, id, reason, superseded_by).await
    }

    /// Novo lançamento e exclusão do original na mesma transação.
    async fn supersede_entry(
        &self,
        entry: NewBillingEntry,
        old_id: Uuid,
        reason: &str,
    ) -> Result<BillingEntry, AppError> {
        let mut tx = self.pool.begin().await?;
        Self::lock_entries(&mut *tx).await?;

        let created = Self::insert_with(&mut *tx, &entry).await?;
        Self::soft_delete_with(&mut *tx, old_id, reason, Some(created.id)).await?;

        tx.commit().await?;
        Ok(created)
    }
}
