// src/db/pricing_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        validation::{normalize_key, tidy},
    },
    models::pricing::{FeeSchedule, FeeScheduleInput, PricingTier, PricingTierInput},
};

#[derive(Clone)]
pub struct PricingRepository {
    pool: PgPool,
}

impl PricingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  FAIXAS DE PREÇO (ParametroValor)
    // =========================================================================

    pub async fn list_tiers(&self) -> Result<Vec<PricingTier>, AppError> {
        // created_at garante a ordem "primeiro cadastrado vence" no índice
        let tiers = sqlx::query_as::<_, PricingTier>(
            "SELECT * FROM pricing_tiers ORDER BY created_at ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(tiers)
    }

    pub async fn create_tier(&self, input: &PricingTierInput) -> Result<PricingTier, AppError> {
        let (city, city_key) = stored_text(&input.city);
        let (vehicle_type, vehicle_type_key) = stored_text(&input.vehicle_type);

        sqlx::query_as::<_, PricingTier>(
            r#"
            INSERT INTO pricing_tiers (city, city_key, vehicle_type, vehicle_type_key, base_value, km)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&city)
        .bind(&city_key)
        .bind(&vehicle_type)
        .bind(&vehicle_type_key)
        .bind(input.base_value)
        .bind(input.km)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| duplicate_tier_or(e, &city, &vehicle_type))
    }

    pub async fn update_tier(&self, id: Uuid, input: &PricingTierInput) -> Result<PricingTier, AppError> {
        let (city, city_key) = stored_text(&input.city);
        let (vehicle_type, vehicle_type_key) = stored_text(&input.vehicle_type);

        sqlx::query_as::<_, PricingTier>(
            r#"
            UPDATE pricing_tiers SET
                city = $2, city_key = $3, vehicle_type = $4, vehicle_type_key = $5,
                base_value = $6, km = $7
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&city)
        .bind(&city_key)
        .bind(&vehicle_type)
        .bind(&vehicle_type_key)
        .bind(input.base_value)
        .bind(input.km)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| duplicate_tier_or(e, &city, &vehicle_type))?
        .ok_or(AppError::ParameterNotFound(id))
    }

    pub async fn delete_tier(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM pricing_tiers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::ParameterNotFound(id));
        }
        Ok(())
    }

    // =========================================================================
    //  TAXAS POR CIDADE (ParametroTaxa)
    // =========================================================================

    pub async fn list_fee_schedules(&self) -> Result<Vec<FeeSchedule>, AppError> {
        let schedules = sqlx::query_as::<_, FeeSchedule>(
            "SELECT * FROM fee_schedules ORDER BY created_at ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(schedules)
    }

    pub async fn create_fee_schedule(&self, input: &FeeScheduleInput) -> Result<FeeSchedule, AppError> {
        let (city, city_key) = stored_text(&input.city);

        sqlx::query_as::<_, FeeSchedule>(
            r#"
            INSERT INTO fee_schedules (city, city_key, toll, ferry, environmental, labor_fee, other)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&city)
        .bind(&city_key)
        .bind(input.fees.toll)
        .bind(input.fees.ferry)
        .bind(input.fees.environmental)
        .bind(input.fees.labor_fee)
        .bind(input.fees.other)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| duplicate_city_or(e, &city))
    }

    pub async fn update_fee_schedule(
        &self,
        id: Uuid,
        input: &FeeScheduleInput,
    ) -> Result<FeeSchedule, AppError> {
        let (city, city_key) = stored_text(&input.city);

        sqlx::query_as::<_, FeeSchedule>(
            r#"
            UPDATE fee_schedules SET
                city = $2, city_key = $3,
                toll = $4, ferry = $5, environmental = $6, labor_fee = $7, other = $8
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&city)
        .bind(&city_key)
        .bind(input.fees.toll)
        .bind(input.fees.ferry)
        .bind(input.fees.environmental)
        .bind(input.fees.labor_fee)
        .bind(input.fees.other)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| duplicate_city_or(e, &city))?
        .ok_or(AppError::ParameterNotFound(id))
    }

    pub async fn delete_fee_schedule(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM fee_schedules WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::ParameterNotFound(id));
        }
        Ok(())
    }
}

/// Texto gravado e a chave do índice único, com a mesma normalização da busca.
fn stored_text(raw: &str) -> (String, String) {
    (tidy(raw), normalize_key(raw))
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation())
}

// Converte violação do índice único de cidade em um erro mais amigável
fn duplicate_city_or(e: sqlx::Error, city: &str) -> AppError {
    if is_unique_violation(&e) {
        return AppError::DuplicateFeeSchedule(city.to_string());
    }
    AppError::DatabaseError(e)
}

fn duplicate_tier_or(e: sqlx::Error, city: &str, vehicle_type: &str) -> AppError {
    if is_unique_violation(&e) {
        return AppError::DuplicatePricingTier {
            city: city.to_string(),
            vehicle_type: vehicle_type.to_string(),
        };
    }
    AppError::DatabaseError(e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::pricing::CityKey;

    #[test]
    fn test_stored_key_matches_lookup_key() {
        let (city, key) = stored_text("  Belo   Horizonte ");
        let (_, spaced_key) = stored_text("Belo  Horizonte");

        assert_eq!(city, "Belo Horizonte");
        // O índice único recusa o segundo cadastro
        assert_eq!(key, spaced_key);
        assert_eq!(CityKey::parse(&city), CityKey::Named(key));
    }

    #[test]
    fn test_stored_key_is_unicode_case_insensitive() {
        let (_, lower) = stored_text("São Paulo");
        let (_, upper) = stored_text("SÃO PAULO");
        assert_eq!(lower, upper);
        assert_eq!(CityKey::parse("são paulo"), CityKey::Named(upper));
    }

    #[test]
    fn test_other_errors_pass_through() {
        assert!(matches!(
            duplicate_city_or(sqlx::Error::RowNotFound, "Betim"),
            AppError::DatabaseError(_)
        ));
        assert!(matches!(
            duplicate_tier_or(sqlx::Error::RowNotFound, "Betim", "Toco"),
            AppError::DatabaseError(_)
        ));
    }
}
