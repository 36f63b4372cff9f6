//! Immutable configuration entities.
//!
//! `TrainingPipelineConfig` carries the run-level settings (usually from CLI
//! flags plus defaults). Each stage derives its own config from it, which is
//! where the artifact layout on disk is decided:
//!
//! ```text
//! <artifact_dir>/
//!   data_ingestion/
//!     feature_store/heart_failure.csv
//!     ingested/{train,test}.csv
//!   data_validation/
//!     report/report.json
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::constants::{self, data_ingestion, data_validation};
use crate::error::{PipelineError, ResultExt};
use crate::io::read_yaml_file;

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingPipelineConfig {
    pub pipeline_name: String,
    pub artifact_dir: PathBuf,
    pub database_name: String,
    pub collection_name: String,
    /// Fraction of rows assigned to the test set.
    pub train_test_split_ratio: f64,
    pub random_seed: u64,
    /// YAML file describing the expected dataset columns.
    pub schema_file_path: PathBuf,
}

impl Default for TrainingPipelineConfig {
    fn default() -> Self {
        Self {
            pipeline_name: constants::PIPELINE_NAME.to_string(),
            artifact_dir: PathBuf::from(constants::ARTIFACT_DIR),
            database_name: constants::DATABASE_NAME.to_string(),
            collection_name: constants::COLLECTION_NAME.to_string(),
            train_test_split_ratio: data_ingestion::TRAIN_TEST_SPLIT_RATIO,
            random_seed: data_ingestion::SPLIT_SEED,
            schema_file_path: PathBuf::from(constants::SCHEMA_FILE_PATH),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataIngestionConfig {
    pub data_ingestion_dir: PathBuf,
    pub feature_store_file_path: PathBuf,
    pub training_file_path: PathBuf,
    pub testing_file_path: PathBuf,
    pub train_test_split_ratio: f64,
    pub collection_name: String,
    pub random_seed: u64,
}

impl DataIngestionConfig {
    pub fn new(pipeline: &TrainingPipelineConfig) -> Self {
        let data_ingestion_dir = pipeline.artifact_dir.join(data_ingestion::DIR_NAME);
        let ingested_dir = data_ingestion_dir.join(data_ingestion::INGESTED_DIR);
        Self {
            feature_store_file_path: data_ingestion_dir
                .join(data_ingestion::FEATURE_STORE_DIR)
                .join(constants::FILE_NAME),
            training_file_path: ingested_dir.join(constants::TRAIN_FILE_NAME),
            testing_file_path: ingested_dir.join(constants::TEST_FILE_NAME),
            data_ingestion_dir,
            train_test_split_ratio: pipeline.train_test_split_ratio,
            collection_name: pipeline.collection_name.clone(),
            random_seed: pipeline.random_seed,
        }
    }
}

/// Expected dataset layout, as declared in the schema YAML file.
///
/// ```yaml
/// columns:
///   - age: float
///   - DEATH_EVENT: int
/// numerical_columns: [age]
/// categorical_columns: []
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DatasetSchema {
    pub columns: Vec<BTreeMap<String, String>>,
    pub numerical_columns: Vec<String>,
    #[serde(default)]
    pub categorical_columns: Vec<String>,
}

impl DatasetSchema {
    pub fn from_yaml_file(path: &Path) -> Result<Self, PipelineError> {
        read_yaml_file(path).context("Failed to load dataset schema")
    }

    /// Column names in declaration order.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().flat_map(|entry| entry.keys().cloned()).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataValidationConfig {
    pub data_validation_dir: PathBuf,
    pub report_file_path: PathBuf,
    /// Columns every ingested file must carry, in no particular order.
    pub expected_columns: Vec<String>,
    pub numerical_columns: Vec<String>,
    pub categorical_columns: Vec<String>,
}

impl DataValidationConfig {
    pub fn new(pipeline: &TrainingPipelineConfig, schema: &DatasetSchema) -> Self {
        let data_validation_dir = pipeline.artifact_dir.join(data_validation::DIR_NAME);
        Self {
            report_file_path: data_validation_dir
                .join(data_validation::REPORT_DIR)
                .join(data_validation::REPORT_FILE_NAME),
            data_validation_dir,
            expected_columns: schema.column_names(),
            numerical_columns: schema.numerical_columns.clone(),
            categorical_columns: schema.categorical_columns.clone(),
        }
    }

    /// Build the config from the schema file named by `pipeline`.
    pub fn from_schema_file(pipeline: &TrainingPipelineConfig) -> Result<Self, PipelineError> {
        let schema = DatasetSchema::from_yaml_file(&pipeline.schema_file_path)?;
        Ok(Self::new(pipeline, &schema))
    }
}
