// src/models/pricing.rs

use std::ops::{Add, AddAssign};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::validation::{validate_not_blank, validate_not_negative};

/// Cidade sentinela: a faixa vale para qualquer cidade daquele tipo de veículo.
pub const ANY_CITY: &str = "Qualquer";

/// Faixa de preço (ParametroValor): valor base e km de referência por cidade e tipo de veículo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PricingTier {
    pub id: Uuid,

    #[schema(example = "Belo Horizonte")]
    pub city: String,

    #[schema(example = "Carreta")]
    pub vehicle_type: String,

    #[schema(example = "2200.00")]
    pub base_value: Decimal,

    #[schema(example = "350")]
    pub km: Decimal,
}

/// Os cinco componentes de taxa de uma cidade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, FromRow, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Fees {
    #[validate(custom(function = "validate_not_negative"))]
    #[schema(example = "50.50")]
    pub toll: Decimal,
    #[validate(custom(function = "validate_not_negative"))]
    #[schema(example = "0")]
    pub ferry: Decimal,
    #[validate(custom(function = "validate_not_negative"))]
    #[schema(example = "0")]
    pub environmental: Decimal,
    // Taxa de chapa (descarga)
    #[validate(custom(function = "validate_not_negative"))]
    #[schema(example = "100.00")]
    pub labor_fee: Decimal,
    #[validate(custom(function = "validate_not_negative"))]
    #[schema(example = "10.00")]
    pub other: Decimal,
}

impl Fees {
    pub fn sum(&self) -> Decimal {
        self.toll + self.ferry + self.environmental + self.labor_fee + self.other
    }
}

impl Add for Fees {
    type Output = Fees;

    fn add(self, rhs: Fees) -> Fees {
        Fees {
            toll: self.toll + rhs.toll,
            ferry: self.ferry + rhs.ferry,
            environmental: self.environmental + rhs.environmental,
            labor_fee: self.labor_fee + rhs.labor_fee,
            other: self.other + rhs.other,
        }
    }
}

impl AddAssign for Fees {
    fn add_assign(&mut self, rhs: Fees) {
        *self = *self + rhs;
    }
}

/// Tabela de taxas (ParametroTaxa) de uma cidade. No máximo uma por cidade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeeSchedule {
    pub id: Uuid,

    #[schema(example = "Belo Horizonte")]
    pub city: String,

    #[serde(flatten)]
    #[sqlx(flatten)]
    pub fees: Fees,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PricingTierInput {
    // "Qualquer" vale para todas as cidades
    #[validate(custom(function = "validate_not_blank"))]
    pub city: String,

    #[validate(custom(function = "validate_not_blank"))]
    pub vehicle_type: String,

    #[validate(custom(function = "validate_not_negative"))]
    pub base_value: Decimal,

    #[validate(custom(function = "validate_not_negative"))]
    pub km: Decimal,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeeScheduleInput {
    #[validate(custom(function = "validate_not_blank"))]
    pub city: String,

    #[serde(flatten)]
    #[validate(nested)]
    pub fees: Fees,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tier_input(city: &str, base_value: i64) -> PricingTierInput {
        PricingTierInput {
            city: city.to_string(),
            vehicle_type: "Carreta".to_string(),
            base_value: Decimal::from(base_value),
            km: Decimal::from(350),
        }
    }

    #[test]
    fn test_tier_input_rejects_blank_city_and_negative_value() {
        assert!(tier_input("Belo Horizonte", 2200).validate().is_ok());

        let errors = tier_input("   ", 2200).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("city"));

        let errors = tier_input("Betim", -1).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("base_value"));
    }

    #[test]
    fn test_fee_schedule_input_rejects_negative_fee() {
        let input = FeeScheduleInput {
            city: "Betim".to_string(),
            fees: Fees { toll: Decimal::new(-5050, 2), ..Fees::default() },
        };
        assert!(input.validate().is_err());

        let input = FeeScheduleInput { city: " ".to_string(), fees: Fees::default() };
        assert!(input.validate().is_err());
    }
}
