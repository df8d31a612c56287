// src/services/load_service.rs

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::{error::AppError, validation::non_blank},
    db::{LoadRepository, PricingRepository, VehicleRepository},
    models::{
        load::{Load, LoadInput},
        vehicle::Vehicle,
    },
    services::pricing::{CityKey, PricingTable},
};

#[derive(Clone)]
pub struct LoadService {
    loads: LoadRepository,
    vehicles: VehicleRepository,
    pricing: PricingRepository,
}

impl LoadService {
    pub fn new(loads: LoadRepository, vehicles: VehicleRepository, pricing: PricingRepository) -> Self {
        Self { loads, vehicles, pricing }
    }

    pub async fn list(&self, include_deleted: bool) -> Result<Vec<Load>, AppError> {
        self.loads.list(include_deleted).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Load, AppError> {
        self.loads.find_by_id(id).await?.ok_or(AppError::LoadNotFound(id))
    }

    pub async fn create(&self, input: &LoadInput) -> Result<Load, AppError> {
        let km = self.distance(input, None).await?;
        let load = self.loads.create(input, km).await?;

        tracing::info!("Carga {} criada ({} km)", load.load_number, load.km);
        Ok(load)
    }

    /// Alterar uma carga gravada exige MotivoAlteracao.
    pub async fn update(&self, id: Uuid, input: &LoadInput) -> Result<Load, AppError> {
        let reason = non_blank(input.edit_reason.as_deref()).ok_or(AppError::MissingEditReason)?;

        let existing = self.get(id).await?;
        let km = self.distance(input, Some(&existing)).await?;

        let load = self
            .loads
            .update(id, input, km, reason)
            .await?
            .ok_or(AppError::LoadNotFound(id))?;

        tracing::info!("Carga {} alterada: {}", load.load_number, reason);
        Ok(load)
    }

    pub async fn delete(&self, id: Uuid, reason: Option<&str>) -> Result<Load, AppError> {
        let reason = non_blank(reason).ok_or(AppError::MissingDeletionReason)?;

        let load = self
            .loads
            .soft_delete(id, reason)
            .await?
            .ok_or(AppError::LoadNotFound(id))?;

        tracing::info!("🗑️ Carga {} excluída: {}", load.load_number, reason);
        Ok(load)
    }

    async fn distance(&self, input: &LoadInput, existing: Option<&Load>) -> Result<Decimal, AppError> {
        if let Some(km) = keep_or_explicit_km(input, existing) {
            return Ok(km);
        }

        let vehicle = match non_blank(input.vehicle_code.as_deref()) {
            Some(code) => self.vehicles.find_by_external_code(code).await?,
            None => None,
        };
        let tiers = self.pricing.list_tiers().await?;
        let table = PricingTable::new(&tiers, &[]);

        Ok(derived_km(&table, &input.city, vehicle.as_ref()))
    }
}

/// km informado vence; sem mudança de cidade ou veículo, a distância gravada é mantida.
fn keep_or_explicit_km(input: &LoadInput, existing: Option<&Load>) -> Option<Decimal> {
    if input.km.is_some() {
        return input.km;
    }

    existing
        .filter(|load| {
            CityKey::parse(&load.city) == CityKey::parse(&input.city)
                && non_blank(load.vehicle_code.as_deref()) == non_blank(input.vehicle_code.as_deref())
        })
        .map(|load| load.km)
}

/// Distância de referência da faixa (cidade, tipo do veículo); zero sem veículo ou faixa.
fn derived_km(table: &PricingTable, city: &str, vehicle: Option<&Vehicle>) -> Decimal {
    vehicle
        .map(|v| table.reference_km(city, &v.vehicle_type))
        .unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        pricing::{PricingTier, ANY_CITY},
        vehicle::RecordOrigin,
    };
    use chrono::NaiveDate;

    fn input(city: &str, km: Option<i64>, vehicle_code: Option<&str>) -> LoadInput {
        LoadInput {
            load_number: "900".to_string(),
            city: city.to_string(),
            invoice_value: Decimal::from(1200),
            invoice_date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            km: km.map(Decimal::from),
            vehicle_code: vehicle_code.map(str::to_string),
            origin: RecordOrigin::Manual,
            edit_reason: None,
        }
    }

    fn stored(city: &str, km: i64, vehicle_code: &str) -> Load {
        Load {
            id: Uuid::new_v4(),
            load_number: "900".to_string(),
            city: city.to_string(),
            invoice_value: Decimal::from(1200),
            invoice_date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            km: Decimal::from(km),
            vehicle_code: Some(vehicle_code.to_string()),
            origin: RecordOrigin::Csv,
            deleted: false,
            delete_reason: None,
            edit_reason: None,
            created_at: None,
        }
    }

    fn truck() -> Vehicle {
        Vehicle {
            id: Uuid::new_v4(),
            external_code: "V-07".to_string(),
            plate: "XYZ9K88".to_string(),
            vehicle_type: "Truck".to_string(),
            driver_name: None,
            capacity: None,
            active: true,
            origin: RecordOrigin::Csv,
            created_at: None,
        }
    }

    // Pool sem conexão: os motivos são verificados antes de qualquer consulta
    fn offline_service() -> LoadService {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://offline@localhost/freight")
            .unwrap();
        LoadService::new(
            LoadRepository::new(pool.clone()),
            VehicleRepository::new(pool.clone()),
            PricingRepository::new(pool),
        )
    }

    #[tokio::test]
    async fn test_update_requires_edit_reason() {
        let service = offline_service();

        let mut blank = input("Betim", Some(50), Some("V-07"));
        blank.edit_reason = Some("  ".to_string());
        let result = service.update(Uuid::new_v4(), &blank).await;
        assert!(matches!(result, Err(AppError::MissingEditReason)));

        let missing = input("Betim", Some(50), Some("V-07"));
        let result = service.update(Uuid::new_v4(), &missing).await;
        assert!(matches!(result, Err(AppError::MissingEditReason)));
    }

    #[tokio::test]
    async fn test_delete_requires_reason() {
        let service = offline_service();

        let result = service.delete(Uuid::new_v4(), None).await;
        assert!(matches!(result, Err(AppError::MissingDeletionReason)));

        let result = service.delete(Uuid::new_v4(), Some("   ")).await;
        assert!(matches!(result, Err(AppError::MissingDeletionReason)));
    }

    #[test]
    fn test_explicit_km_overrides() {
        let existing = stored("Betim", 50, "V-07");
        let km = keep_or_explicit_km(&input("Contagem", Some(33), Some("V-07")), Some(&existing));
        assert_eq!(km, Some(Decimal::from(33)));
    }

    #[test]
    fn test_unchanged_city_and_vehicle_keep_km() {
        let existing = stored("Betim", 50, "V-07");
        let km = keep_or_explicit_km(&input(" betim ", None, Some("V-07")), Some(&existing));
        assert_eq!(km, Some(Decimal::from(50)));
    }

    #[test]
    fn test_changed_city_or_vehicle_needs_new_distance() {
        let existing = stored("Betim", 50, "V-07");
        assert_eq!(keep_or_explicit_km(&input("Contagem", None, Some("V-07")), Some(&existing)), None);
        assert_eq!(keep_or_explicit_km(&input("Betim", None, Some("V-09")), Some(&existing)), None);
        assert_eq!(keep_or_explicit_km(&input("Betim", None, None), None), None);
    }

    #[test]
    fn test_derived_km_uses_vehicle_type() {
        let table = PricingTable::new(
            &[PricingTier {
                id: Uuid::new_v4(),
                city: ANY_CITY.to_string(),
                vehicle_type: "Truck".to_string(),
                base_value: Decimal::from(700),
                km: Decimal::from(120),
            }],
            &[],
        );

        assert_eq!(derived_km(&table, "Itaúna", Some(&truck())), Decimal::from(120));
        assert_eq!(derived_km(&table, "Itaúna", None), Decimal::ZERO);
    }
}
