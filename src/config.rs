// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use serde::Serialize;
use sqlx::{postgres::PgPoolOptions, PgPool};
use utoipa::ToSchema;

use crate::{
    db::{BillingRepository, LoadRepository, PricingRepository, VehicleRepository},
    services::{billing_service::BillingService, load_service::LoadService},
};

/// Identidade visual da empresa. Lida uma vez na inicialização e só leitura depois.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Branding {
    #[schema(example = "Transportes Exemplo Ltda")]
    pub company_name: String,
    pub logo_url: Option<String>,
    #[schema(example = "#1F4E79")]
    pub primary_color: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    // true: lançamento sem faixa de preço é recusado em vez de sair com valor base zero
    pub block_on_missing_tier: bool,
    pub branding: Branding,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;

        let db_max_connections: u32 = match env::var("DB_MAX_CONNECTIONS") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("DB_MAX_CONNECTIONS inválido: {raw}"))?,
            Err(_) => 5,
        };

        Ok(Self {
            database_url,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            db_max_connections,
            block_on_missing_tier: flag("BLOCK_ON_MISSING_TIER"),
            branding: Branding {
                company_name: env::var("COMPANY_NAME").unwrap_or_else(|_| "Lançamentos de Frete".to_string()),
                logo_url: env::var("COMPANY_LOGO_URL").ok(),
                primary_color: env::var("COMPANY_PRIMARY_COLOR").ok(),
            },
        })
    }
}

fn flag(name: &str) -> bool {
    env::var(name)
        .map(|value| parse_flag(&value))
        .unwrap_or(false)
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "sim" | "yes")
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub branding: Arc<Branding>,
    pub vehicle_repo: VehicleRepository,
    pub pricing_repo: PricingRepository,
    pub load_service: LoadService,
    pub billing_service: BillingService,
}

impl AppState {
    pub async fn new(settings: &Settings) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(settings.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&settings.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let vehicle_repo = VehicleRepository::new(db_pool.clone());
        let pricing_repo = PricingRepository::new(db_pool.clone());
        let load_service = LoadService::new(
            LoadRepository::new(db_pool.clone()),
            vehicle_repo.clone(),
            pricing_repo.clone(),
        );
        let billing_service = BillingService::new(
            Arc::new(BillingRepository::new(db_pool.clone())),
            settings.block_on_missing_tier,
        );

        if settings.block_on_missing_tier {
            tracing::info!("Lançamentos sem faixa de preço serão recusados");
        }

        Ok(Self {
            db_pool,
            branding: Arc::new(settings.branding.clone()),
            vehicle_repo,
            pricing_repo,
            load_service,
            billing_service,
        })
    }
}
