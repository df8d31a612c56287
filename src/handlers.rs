pub mod billing;
pub mod branding;
pub mod loads;
pub mod pricing;
pub mod vehicles;
