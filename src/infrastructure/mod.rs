// src/infrastructure/mod.rs
// Price repository implementations

pub mod csv_source;
pub mod yahoo;

pub use csv_source::CsvPriceSource;
pub use yahoo::YahooPriceSource;
