// src/adapter/mod.rs
pub mod coordinator;
pub mod report;

pub use coordinator::{ReportCoordinator, RunSummary};
pub use report::OutputFormat;
