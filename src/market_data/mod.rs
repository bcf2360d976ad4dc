// src/market_data/mod.rs
pub mod cache;
pub mod resample;

pub use cache::PriceCache;
pub use resample::to_business_days;
