// src/db/load_repo.rs

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::load::{Load, LoadInput},
};

#[derive(Clone)]
pub struct LoadRepository {
    pool: PgPool,
}

impl LoadRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, input: &LoadInput, km: Decimal) -> Result<Load, AppError> {
        let load = sqlx::query_as::<_, Load>(
            r#"
            INSERT INTO loads (load_number, city, invoice_value, invoice_date, km, vehicle_code, origin)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&input.load_number)
        .bind(&input.city)
        .bind(input.invoice_value)
        .bind(input.invoice_date)
        .bind(km)
        .bind(&input.vehicle_code)
        .bind(input.origin)
        .fetch_one(&self.pool)
        .await?;

        Ok(load)
    }

    pub async fn list(&self, include_deleted: bool) -> Result<Vec<Load>, AppError> {
        let loads = sqlx::query_as::<_, Load>(
            r#"
            SELECT * FROM loads
            WHERE ($1 OR deleted = FALSE)
            ORDER BY invoice_date DESC, load_number ASC
            "#,
        )
        .bind(include_deleted)
        .fetch_all(&self.pool)
        .await?;

        Ok(loads)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Load>, AppError> {
        let load = sqlx::query_as::<_, Load>("SELECT * FROM loads WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(load)
    }

    pub async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Load>, AppError> {
        let loads = sqlx::query_as::<_, Load>("SELECT * FROM loads WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(loads)
    }

    pub async fn update(
        &self,
        id: Uuid,
        input: &LoadInput,
        km: Decimal,
        edit_reason: &str,
    ) -> Result<Option<Load>, AppError> {
        let load = sqlx::query_as::<_, Load>(
            r#"
            UPDATE loads SET
                load_number = $2,
                city = $3,
                invoice_value = $4,
                invoice_date = $5,
                km = $6,
                vehicle_code = $7,
                edit_reason = $8
            WHERE id = $1 AND deleted = FALSE
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&input.load_number)
        .bind(&input.city)
        .bind(input.invoice_value)
        .bind(input.invoice_date)
        .bind(km)
        .bind(&input.vehicle_code)
        .bind(edit_reason)
        .fetch_optional(&self.pool)
        .await?;

        Ok(load)
    }

    pub async fn soft_delete(&self, id: Uuid, reason: &str) -> Result<Option<Load>, AppError> {
        let load = sqlx::query_as::<_, Load>(
            r#"
            UPDATE loads SET deleted = TRUE, delete_reason = $2
            WHERE id = $1 AND deleted = FALSE
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(reason)
        .fetch_optional(&self.pool)
        .await?;

        Ok(load)
    }
}
