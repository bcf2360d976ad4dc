// src/analysis/mod.rs
pub mod decomposition;
pub mod moving_average;
pub mod seasonal;

pub use decomposition::{
    decompose_series, decompose_tagged, seasonal_decompose, ClassicalDecomposer,
};
