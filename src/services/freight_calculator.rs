// src/services/freight_calculator.rs

use std::collections::HashSet;

use rust_decimal::Decimal;

use crate::{
    models::{billing::CostBreakdown, load::LoadSnapshot, pricing::Fees, vehicle::Vehicle},
    services::pricing::{CityKey, PricingTable},
};

/// Calcula o frete de um conjunto de cargas para um veículo.
///
/// A carga de maior km define a cidade base (em empate, a primeira da lista).
/// O valor base vem da faixa da cidade base para o tipo do veículo; sem faixa,
/// o valor base é zero e `pricing_tier_missing` fica marcado. Cada cidade
/// distinta soma sua tabela de taxas uma única vez.
///
/// Retorna `None` sem veículo ou sem cargas.
pub fn calculate(
    vehicle: Option<&Vehicle>,
    loads: &[LoadSnapshot],
    table: &PricingTable,
) -> Option<CostBreakdown> {
    let vehicle = vehicle?;
    let base = loads
        .iter()
        .reduce(|best, load| if load.km > best.km { load } else { best })?;

    let tier = table.resolve_tier(&base.city, &vehicle.vehicle_type);
    if tier.is_none() {
        tracing::warn!(
            "Sem faixa de preço para {} / {}: valor base zerado",
            base.city,
            vehicle.vehicle_type
        );
    }
    let base_value = tier.map(|t| t.base_value).unwrap_or(Decimal::ZERO);

    let mut seen = HashSet::new();
    let fees = loads
        .iter()
        .filter(|load| seen.insert(CityKey::parse(&load.city)))
        .fold(Fees::default(), |acc, load| acc + table.resolve_fee_schedule(&load.city));

    Some(CostBreakdown {
        base_city: base.city.clone(),
        base_km: base.km,
        base_value,
        fees,
        total: base_value + fees.sum(),
        pricing_tier_missing: tier.is_none(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        pricing::{FeeSchedule, PricingTier, ANY_CITY},
        vehicle::RecordOrigin,
    };
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn carreta() -> Vehicle {
        Vehicle {
            id: Uuid::new_v4(),
            external_code: "V-01".to_string(),
            plate: "ABC1D23".to_string(),
            vehicle_type: "Carreta".to_string(),
            driver_name: None,
            capacity: None,
            active: true,
            origin: RecordOrigin::Manual,
            created_at: None,
        }
    }

    fn load(number: &str, city: &str, km: i64) -> LoadSnapshot {
        LoadSnapshot {
            load_id: Uuid::new_v4(),
            load_number: number.to_string(),
            city: city.to_string(),
            invoice_value: Decimal::from(1000),
            invoice_date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            km: Decimal::from(km),
            vehicle_code: Some("V-01".to_string()),
        }
    }

    fn tier(city: &str, base_value: Decimal, km: i64) -> PricingTier {
        PricingTier {
            id: Uuid::new_v4(),
            city: city.to_string(),
            vehicle_type: "Carreta".to_string(),
            base_value,
            km: Decimal::from(km),
        }
    }

    fn schedule(city: &str, fees: Fees) -> FeeSchedule {
        FeeSchedule { id: Uuid::new_v4(), city: city.to_string(), fees }
    }

    fn bh_table() -> PricingTable {
        PricingTable::new(
            &[tier("Belo Horizonte", Decimal::from(2200), 350)],
            &[schedule(
                "Belo Horizonte",
                Fees {
                    toll: Decimal::new(5050, 2),
                    ferry: Decimal::ZERO,
                    environmental: Decimal::ZERO,
                    labor_fee: Decimal::from(100),
                    other: Decimal::from(10),
                },
            )],
        )
    }

    #[test]
    fn test_single_load_in_belo_horizonte() {
        let vehicle = carreta();
        let breakdown =
            calculate(Some(&vehicle), &[load("1", "Belo Horizonte", 350)], &bh_table()).unwrap();

        assert_eq!(breakdown.base_city, "Belo Horizonte");
        assert_eq!(breakdown.base_km, Decimal::from(350));
        assert_eq!(breakdown.base_value, Decimal::from(2200));
        assert_eq!(breakdown.fees.toll, Decimal::new(5050, 2));
        assert_eq!(breakdown.fees.ferry, Decimal::ZERO);
        assert_eq!(breakdown.fees.environmental, Decimal::ZERO);
        assert_eq!(breakdown.fees.labor_fee, Decimal::from(100));
        assert_eq!(breakdown.fees.other, Decimal::from(10));
        assert_eq!(breakdown.total, Decimal::new(236050, 2));
        assert!(!breakdown.pricing_tier_missing);
    }

    #[test]
    fn test_farthest_load_defines_base_city() {
        let vehicle = carreta();
        let table = PricingTable::new(
            &[tier("Betim", Decimal::from(800), 50), tier("Uberlândia", Decimal::from(4100), 540)],
            &[],
        );
        let loads = [load("1", "Betim", 50), load("2", "Uberlândia", 540), load("3", "Betim", 45)];

        let breakdown = calculate(Some(&vehicle), &loads, &table).unwrap();
        assert_eq!(breakdown.base_city, "Uberlândia");
        assert_eq!(breakdown.base_km, Decimal::from(540));
        assert_eq!(breakdown.base_value, Decimal::from(4100));
    }

    #[test]
    fn test_tie_keeps_first_load() {
        let vehicle = carreta();
        let loads = [load("1", "Sete Lagoas", 70), load("2", "Betim", 70)];

        let breakdown = calculate(Some(&vehicle), &loads, &PricingTable::default()).unwrap();
        assert_eq!(breakdown.base_city, "Sete Lagoas");
    }

    #[test]
    fn test_each_city_pays_fees_once() {
        let vehicle = carreta();
        let fees = Fees { toll: Decimal::from(20), labor_fee: Decimal::from(5), ..Fees::default() };
        let table = PricingTable::new(
            &[tier(ANY_CITY, Decimal::from(1000), 100)],
            &[schedule("Betim", fees), schedule("Contagem", fees)],
        );
        let loads = [
            load("1", "Betim", 50),
            load("2", "Betim", 60),
            load("3", "contagem", 30),
            load("4", "Nova Lima", 20),
        ];

        let breakdown = calculate(Some(&vehicle), &loads, &table).unwrap();
        assert_eq!(breakdown.fees.toll, Decimal::from(40));
        assert_eq!(breakdown.fees.labor_fee, Decimal::from(10));
        assert_eq!(breakdown.total, Decimal::from(1050));
        assert_eq!(breakdown.total, breakdown.base_value + breakdown.fees.sum());
    }

    #[test]
    fn test_missing_tier_degrades_to_zero() {
        let vehicle = carreta();
        let table = PricingTable::new(
            &[],
            &[schedule("Betim", Fees { other: Decimal::from(15), ..Fees::default() })],
        );

        let breakdown = calculate(Some(&vehicle), &[load("1", "Betim", 50)], &table).unwrap();
        assert!(breakdown.pricing_tier_missing);
        assert_eq!(breakdown.base_value, Decimal::ZERO);
        assert_eq!(breakdown.total, Decimal::from(15));
    }

    #[test]
    fn test_nothing_to_calculate() {
        let vehicle = carreta();
        assert!(calculate(Some(&vehicle), &[], &bh_table()).is_none());
        assert!(calculate(None, &[load("1", "Belo Horizonte", 350)], &bh_table()).is_none());
    }

    #[test]
    fn test_calculation_is_repeatable() {
        let vehicle = carreta();
        let loads = [load("1", "Belo Horizonte", 350), load("2", "Betim", 50)];
        let table = bh_table();

        assert_eq!(
            calculate(Some(&vehicle), &loads, &table),
            calculate(Some(&vehicle), &loads, &table)
        );
    }
}
