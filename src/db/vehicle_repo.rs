// src/db/vehicle_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::vehicle::{Vehicle, VehicleInput},
};

// Veículos nunca são apagados: desativar é um update de `active`.
#[derive(Clone)]
pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, input: &VehicleInput) -> Result<Vehicle, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (external_code, plate, vehicle_type, driver_name, capacity, active, origin)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&input.external_code)
        .bind(&input.plate)
        .bind(&input.vehicle_type)
        .bind(&input.driver_name)
        .bind(input.capacity)
        .bind(input.active)
        .bind(input.origin)
        .fetch_one(&self.pool)
        .await?;

        Ok(vehicle)
    }

    pub async fn list(&self, only_active: bool) -> Result<Vec<Vehicle>, AppError> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            "SELECT * FROM vehicles WHERE ($1 = FALSE OR active) ORDER BY plate ASC",
        )
        .bind(only_active)
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    pub async fn find_by_external_code(&self, code: &str) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE external_code = $1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    pub async fn update(&self, id: Uuid, input: &VehicleInput) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles SET
                external_code = $2,
                plate = $3,
                vehicle_type = $4,
                driver_name = $5,
                capacity = $6,
                active = $7,
                origin = $8
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&input.external_code)
        .bind(&input.plate)
        .bind(&input.vehicle_type)
        .bind(&input.driver_name)
        .bind(input.capacity)
        .bind(input.active)
        .bind(input.origin)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vehicle)
    }
}
