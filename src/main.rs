//src/main.rs

use axum::{
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::{AppState, Settings};
use crate::docs::ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let settings = Settings::from_env()?;
    let app_state = AppState::new(&settings).await?;

    sqlx::migrate!().run(&app_state.db_pool).await?;
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let vehicle_routes = Router::new()
        .route("/"
               , post(handlers::vehicles::create_vehicle)
               .get(handlers::vehicles::list_vehicles)
        )
        .route("/{id}"
               , get(handlers::vehicles::get_vehicle)
               .put(handlers::vehicles::update_vehicle)
        );

    let load_routes = Router::new()
        .route("/"
               , post(handlers::loads::create_load)
               .get(handlers::loads::list_loads)
        )
        .route("/{id}"
               , get(handlers::loads::get_load)
               .put(handlers::loads::update_load)
        )
        .route("/{id}/delete", post(handlers::loads::delete_load));

    let pricing_routes = Router::new()
        .route("/tiers"
               , post(handlers::pricing::create_tier)
               .get(handlers::pricing::list_tiers)
        )
        .route("/tiers/{id}"
               , put(handlers::pricing::update_tier)
               .delete(handlers::pricing::delete_tier)
        )
        .route("/fees"
               , post(handlers::pricing::create_fee_schedule)
               .get(handlers::pricing::list_fee_schedules)
        )
        .route("/fees/{id}"
               , put(handlers::pricing::update_fee_schedule)
               .delete(handlers::pricing::delete_fee_schedule)
        );

    let billing_routes = Router::new()
        .route("/"
               , post(handlers::billing::submit_entry)
               .get(handlers::billing::list_entries)
        )
        .route("/calculate", post(handlers::billing::preview_entry))
        .route("/summary", get(handlers::billing::get_summary))
        .route("/{id}"
               , get(handlers::billing::get_entry)
               .put(handlers::billing::edit_entry)
        )
        .route("/{id}/delete", post(handlers::billing::delete_entry));

    // Combina tudo no router principal
    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/branding", get(handlers::branding::get_branding))
        .nest("/api/vehicles", vehicle_routes)
        .nest("/api/loads", load_routes)
        .nest("/api/pricing", pricing_routes)
        .nest("/api/billing-entries", billing_routes)
        .with_state(app_state);

    let listener = TcpListener::bind(&settings.bind_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
