pub mod billing;
pub mod load;
pub mod pricing;
pub mod vehicle;
