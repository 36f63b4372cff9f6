//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the schema-described table (`Table`, `Column`, `Value`)
//! - immutable stage configs (`TrainingPipelineConfig`, `DataIngestionConfig`, ...)
//! - stage artifacts (`DataIngestionArtifact`, `DataValidationArtifact`)

pub mod artifact;
pub mod config;
pub mod types;

pub use artifact::*;
pub use config::*;
pub use types::*;
