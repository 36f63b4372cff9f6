//! Data sources and dataset partitioning.
//!
//! - MongoDB connection + collection export (`mongo`)
//! - deterministic train/test split (`split`)

pub mod mongo;
pub mod split;

pub use mongo::{HeartFailureData, MongoClient, document_to_record};
pub use split::{TrainTestSplit, train_test_split};

use crate::domain::Table;
use crate::error::PipelineError;

/// Anything that can hand over a full collection as a table.
///
/// The ingestion stage is generic over this so it can run against MongoDB in
/// production and against in-memory fixtures in tests.
pub trait CollectionSource {
    fn export_collection(&self, collection_name: &str) -> Result<Table, PipelineError>;
}
