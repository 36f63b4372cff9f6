//! Pipeline stages.
//!
//! Each stage consumes configs (and the previous stage's artifact) and produces
//! its own artifact. Stages past validation live outside this crate.

pub mod data_ingestion;
pub mod data_validation;

pub use data_ingestion::DataIngestion;
pub use data_validation::{DataValidation, FileValidation, ValidationReport};
