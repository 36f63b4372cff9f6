//! Pipeline-wide defaults and well-known names.

pub const PIPELINE_NAME: &str = "heart_failure";
pub const ARTIFACT_DIR: &str = "artifact";

pub const DATABASE_NAME: &str = "heart_failure";
pub const COLLECTION_NAME: &str = "heart_failure_data";
/// Environment variable holding the MongoDB connection URL.
pub const MONGODB_URL_KEY: &str = "MONGODB_URL";

pub const FILE_NAME: &str = "heart_failure.csv";
pub const TRAIN_FILE_NAME: &str = "train.csv";
pub const TEST_FILE_NAME: &str = "test.csv";

/// Expected dataset schema, relative to the working directory.
pub const SCHEMA_FILE_PATH: &str = "config/schema.yaml";

pub mod data_ingestion {
    pub const DIR_NAME: &str = "data_ingestion";
    pub const FEATURE_STORE_DIR: &str = "feature_store";
    pub const INGESTED_DIR: &str = "ingested";
    /// Fraction of rows assigned to the test set.
    pub const TRAIN_TEST_SPLIT_RATIO: f64 = 0.2;
    pub const SPLIT_SEED: u64 = 42;
}

pub mod data_validation {
    pub const DIR_NAME: &str = "data_validation";
    pub const REPORT_DIR: &str = "report";
    pub const REPORT_FILE_NAME: &str = "report.json";
}
