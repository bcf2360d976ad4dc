// src/domain/mod.rs
pub mod errors;
pub mod models;
pub mod repository;
pub mod service;

// Re-export common types for convenience
pub use errors::{
    AppError, AppResult, DecompositionError, EngineResult, MarketDataError, MarketDataResult,
};
pub use models::{
    CacheKey, DecompositionModel, DecompositionResult, PricePoint, PriceSeries, Series,
};
