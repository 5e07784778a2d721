pub mod profile;
pub mod stock;
