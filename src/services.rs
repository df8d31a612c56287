pub mod billing_service;
pub mod duplicate_detector;
pub mod freight_calculator;
pub mod load_service;
pub mod pricing;
