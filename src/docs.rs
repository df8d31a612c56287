// src/docs.rs

use utoipa::OpenApi;

use crate::config;
use crate::handlers;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Settings ---
        handlers::branding::get_branding,

        // --- Vehicles ---
        handlers::vehicles::create_vehicle,
        handlers::vehicles::list_vehicles,
        handlers::vehicles::get_vehicle,
        handlers::vehicles::update_vehicle,

        // --- Loads ---
        handlers::loads::create_load,
        handlers::loads::list_loads,
        handlers::loads::get_load,
        handlers::loads::update_load,
        handlers::loads::delete_load,

        // --- Pricing ---
        handlers::pricing::create_tier,
        handlers::pricing::list_tiers,
        handlers::pricing::update_tier,
        handlers::pricing::delete_tier,
        handlers::pricing::create_fee_schedule,
        handlers::pricing::list_fee_schedules,
        handlers::pricing::update_fee_schedule,
        handlers::pricing::delete_fee_schedule,

        // --- Billing ---
        handlers::billing::submit_entry,
        handlers::billing::preview_entry,
        handlers::billing::list_entries,
        handlers::billing::get_summary,
        handlers::billing::get_entry,
        handlers::billing::edit_entry,
        handlers::billing::delete_entry,
    ),
    components(
        schemas(
            config::Branding,

            // --- Vehicles ---
            models::vehicle::RecordOrigin,
            models::vehicle::Vehicle,
            models::vehicle::VehicleInput,

            // --- Loads ---
            models::load::Load,
            models::load::LoadSnapshot,
            models::load::LoadInput,
            handlers::loads::DeletePayload,

            // --- Pricing ---
            models::pricing::PricingTier,
            models::pricing::Fees,
            models::pricing::FeeSchedule,
            models::pricing::PricingTierInput,
            models::pricing::FeeScheduleInput,

            // --- Billing ---
            models::billing::CostBreakdown,
            models::billing::EntryStage,
            models::billing::BillingEntry,
            models::billing::ReconciliationSummary,
            services::billing_service::EntryRequest,
            services::billing_service::EditEntryRequest,
            services::billing_service::EntryPreview,
            services::billing_service::SubmitOutcome,
        )
    ),
    tags(
        (name = "Settings", description = "Identidade visual da empresa"),
        (name = "Vehicles", description = "Cadastro de Veículos"),
        (name = "Loads", description = "Cargas (ERP, CSV ou manuais)"),
        (name = "Pricing", description = "Faixas de preço e taxas por cidade"),
        (name = "Billing", description = "Lançamentos de frete")
    )
)]
pub struct ApiDoc;
