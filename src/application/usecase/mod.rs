pub mod decomposition_usecase;

// Re-export public API
pub use decomposition_usecase::{DecompositionProcessor, DecompositionUseCase};
