// src/services/pricing.rs

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::{
    common::validation::normalize_key,
    models::pricing::{Fees, FeeSchedule, PricingTier, ANY_CITY},
};

/// Chave de cidade normalizada. "Qualquer" vira `Any`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CityKey {
    Any,
    Named(String),
}

impl CityKey {
    pub fn parse(raw: &str) -> Self {
        let key = normalize_key(raw);
        if key == normalize_key(ANY_CITY) {
            CityKey::Any
        } else {
            CityKey::Named(key)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VehicleTypeKey(String);

impl VehicleTypeKey {
    pub fn parse(raw: &str) -> Self {
        Self(normalize_key(raw))
    }
}

/// Índice das faixas de preço e tabelas de taxas, montado uma vez a partir
/// do snapshot dos parâmetros.
#[derive(Debug, Clone, Default)]
pub struct PricingTable {
    tiers: HashMap<(CityKey, VehicleTypeKey), PricingTier>,
    fees: HashMap<CityKey, Fees>,
}

impl PricingTable {
    /// Em caso de chaves repetidas, o primeiro registro vence.
    pub fn new(tiers: &[PricingTier], schedules: &[FeeSchedule]) -> Self {
        let mut table = Self::default();

        for tier in tiers {
            let key = (CityKey::parse(&tier.city), VehicleTypeKey::parse(&tier.vehicle_type));
            table.tiers.entry(key).or_insert_with(|| tier.clone());
        }

        for schedule in schedules {
            table
                .fees
                .entry(CityKey::parse(&schedule.city))
                .or_insert(schedule.fees);
        }

        table
    }

    /// Faixa exata (cidade, tipo), senão ("Qualquer", tipo), senão nenhuma.
    pub fn resolve_tier(&self, city: &str, vehicle_type: &str) -> Option<&PricingTier> {
        let type_key = VehicleTypeKey::parse(vehicle_type);

        self.tiers
            .get(&(CityKey::parse(city), type_key.clone()))
            .or_else(|| self.tiers.get(&(CityKey::Any, type_key)))
    }

    /// Taxas da cidade; cidade sem tabela não paga nada.
    pub fn resolve_fee_schedule(&self, city: &str) -> Fees {
        self.fees
            .get(&CityKey::parse(city))
            .copied()
            .unwrap_or_default()
    }

    /// Distância de referência para uma carga nessa cidade com esse tipo de veículo.
    pub fn reference_km(&self, city: &str, vehicle_type: &str) -> Decimal {
        self.resolve_tier(city, vehicle_type)
            .map(|tier| tier.km)
            .unwrap_or(Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn tier(city: &str, vehicle_type: &str, base_value: i64, km: i64) -> PricingTier {
        PricingTier {
            id: Uuid::new_v4(),
            city: city.to_string(),
            vehicle_type: vehicle_type.to_string(),
            base_value: Decimal::from(base_value),
            km: Decimal::from(km),
        }
    }

    fn schedule(city: &str, toll: Decimal) -> FeeSchedule {
        FeeSchedule {
            id: Uuid::new_v4(),
            city: city.to_string(),
            fees: Fees { toll, ..Fees::default() },
        }
    }

    #[test]
    fn test_exact_tier_wins_over_any_city() {
        let table = PricingTable::new(
            &[tier(ANY_CITY, "Carreta", 1500, 100), tier("Belo Horizonte", "Carreta", 2200, 350)],
            &[],
        );

        let found = table.resolve_tier("Belo Horizonte", "Carreta").unwrap();
        assert_eq!(found.base_value, Decimal::from(2200));
    }

    #[test]
    fn test_any_city_fallback() {
        let table = PricingTable::new(&[tier(ANY_CITY, "Truck", 900, 80)], &[]);

        let found = table.resolve_tier("Contagem", "Truck").unwrap();
        assert_eq!(found.base_value, Decimal::from(900));
        assert_eq!(found.km, Decimal::from(80));
    }

    #[test]
    fn test_fallback_is_per_vehicle_type() {
        let table = PricingTable::new(&[tier(ANY_CITY, "Truck", 900, 80)], &[]);
        assert!(table.resolve_tier("Contagem", "Carreta").is_none());
        assert_eq!(table.reference_km("Contagem", "Carreta"), Decimal::ZERO);
    }

    #[test]
    fn test_lookup_ignores_case_and_spacing() {
        let table = PricingTable::new(&[tier("Belo Horizonte", "Carreta", 2200, 350)], &[]);
        assert!(table.resolve_tier("  BELO  horizonte", "carreta").is_some());
        assert_eq!(CityKey::parse("qualquer"), CityKey::Any);
    }

    #[test]
    fn test_first_duplicate_is_authoritative() {
        let table = PricingTable::new(
            &[tier("Betim", "Toco", 500, 40), tier("betim", "toco", 999, 99)],
            &[schedule("Betim", Decimal::ONE), schedule("BETIM", Decimal::TEN)],
        );

        assert_eq!(table.resolve_tier("Betim", "Toco").unwrap().base_value, Decimal::from(500));
        assert_eq!(table.resolve_fee_schedule("Betim").toll, Decimal::ONE);
    }

    #[test]
    fn test_unknown_city_has_no_fees() {
        let table = PricingTable::new(&[], &[schedule("Betim", Decimal::TEN)]);
        assert_eq!(table.resolve_fee_schedule("Sabará"), Fees::default());
        assert_eq!(table.resolve_fee_schedule("Sabará").sum(), Decimal::ZERO);
    }
}
