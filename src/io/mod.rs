//! Input/output helpers.
//!
//! - table CSV writing (`export`)
//! - table CSV reading (`ingest`)
//! - stage report JSON read/write (`report`)
//! - YAML configuration reading (`yaml`)

pub mod export;
pub mod ingest;
pub mod report;
pub mod yaml;

pub use export::*;
pub use ingest::*;
pub use report::*;
pub use yaml::*;
