pub mod vehicle_repo;
pub use vehicle_repo::VehicleRepository;
pub mod load_repo;
pub use load_repo::LoadRepository;
pub mod pricing_repo;
pub use pricing_repo::PricingRepository;
pub mod billing_repo;
pub use billing_repo::BillingRepository;
