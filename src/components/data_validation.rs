//! Data validation stage.
//!
//! Reads the ingested train/test files back and checks them against the
//! dataset schema loaded from `config/schema.yaml`. Failed checks produce a
//! negative artifact (plus a JSON report); only I/O and parse problems are
//! errors.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::domain::{DataIngestionArtifact, DataValidationArtifact, DataValidationConfig, Table};
use crate::error::{PipelineError, ResultExt};
use crate::io::{read_table_csv, write_json};

/// Checks for one ingested file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileValidation {
    pub path: PathBuf,
    pub rows: usize,
    pub columns: usize,
    pub column_count_ok: bool,
    pub missing_columns: Vec<String>,
    pub missing_numerical_columns: Vec<String>,
    pub missing_categorical_columns: Vec<String>,
}

impl FileValidation {
    pub fn is_valid(&self) -> bool {
        self.column_count_ok
            && self.missing_columns.is_empty()
            && self.missing_numerical_columns.is_empty()
            && self.missing_categorical_columns.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub train: FileValidation,
    pub test: FileValidation,
    pub columns_match: bool,
    pub validation_status: bool,
}

pub struct DataValidation<'a> {
    ingestion_artifact: &'a DataIngestionArtifact,
    config: &'a DataValidationConfig,
}

impl<'a> DataValidation<'a> {
    pub fn new(ingestion_artifact: &'a DataIngestionArtifact, config: &'a DataValidationConfig) -> Self {
        Self {
            ingestion_artifact,
            config,
        }
    }

    pub fn initiate_data_validation(&self) -> Result<DataValidationArtifact, PipelineError> {
        info!("Entered initiate_data_validation");

        let artifact = self
            .run()
            .inspect_err(|err| error!(error = %err, "Error occurred during data validation"))
            .context("initiate_data_validation")?;

        info!(%artifact, "Data validation artifact created");
        info!("Exited initiate_data_validation");
        Ok(artifact)
    }

    fn run(&self) -> Result<DataValidationArtifact, PipelineError> {
        let train_path = &self.ingestion_artifact.trained_file_path;
        let test_path = &self.ingestion_artifact.test_file_path;

        let train = read_table_csv(train_path)?;
        let test = read_table_csv(test_path)?;

        let report = self.validate(train_path, &train, test_path, &test);
        write_json(&self.config.report_file_path, &report)?;

        let message = failure_message(&report);
        if report.validation_status {
            info!("Train and test files match the expected schema");
        } else {
            warn!(%message, "Data validation failed");
        }

        Ok(DataValidationArtifact {
            validation_status: report.validation_status,
            message,
            valid_train_file_path: train_path.clone(),
            valid_test_file_path: test_path.clone(),
            report_file_path: self.config.report_file_path.clone(),
        })
    }

    pub fn validate(&self, train_path: &Path, train: &Table, test_path: &Path, test: &Table) -> ValidationReport {
        let train_check = self.validate_file(train_path, train);
        let test_check = self.validate_file(test_path, test);

        let mut train_columns = train.column_names();
        let mut test_columns = test.column_names();
        train_columns.sort_unstable();
        test_columns.sort_unstable();
        let columns_match = train_columns == test_columns;

        let validation_status = train_check.is_valid() && test_check.is_valid() && columns_match;
        ValidationReport {
            train: train_check,
            test: test_check,
            columns_match,
            validation_status,
        }
    }

    fn validate_file(&self, path: &Path, table: &Table) -> FileValidation {
        FileValidation {
            path: path.to_path_buf(),
            rows: table.n_rows(),
            columns: table.n_cols(),
            column_count_ok: self.validate_number_of_columns(table),
            missing_columns: missing(&self.config.expected_columns, table),
            missing_numerical_columns: missing(&self.config.numerical_columns, table),
            missing_categorical_columns: missing(&self.config.categorical_columns, table),
        }
    }

    pub fn validate_number_of_columns(&self, table: &Table) -> bool {
        let ok = table.n_cols() == self.config.expected_columns.len();
        info!(
            expected = self.config.expected_columns.len(),
            found = table.n_cols(),
            ok,
            "Checked number of columns"
        );
        ok
    }
}

fn missing(expected: &[String], table: &Table) -> Vec<String> {
    expected
        .iter()
        .filter(|name| table.column_index(name).is_none())
        .cloned()
        .collect()
}

fn failure_message(report: &ValidationReport) -> String {
    let mut problems = Vec::new();
    for (label, check) in [("train", &report.train), ("test", &report.test)] {
        if !check.column_count_ok {
            problems.push(format!("{label}: expected column count mismatch ({} found)", check.columns));
        }
        if !check.missing_columns.is_empty() {
            problems.push(format!("{label}: missing columns {}", check.missing_columns.join(", ")));
        }
        if !check.missing_numerical_columns.is_empty() {
            problems.push(format!(
                "{label}: missing numerical columns {}",
                check.missing_numerical_columns.join(", ")
            ));
        }
        if !check.missing_categorical_columns.is_empty() {
            problems.push(format!(
                "{label}: missing categorical columns {}",
                check.missing_categorical_columns.join(", ")
            ));
        }
    }
    if !report.columns_match {
        problems.push("train and test columns differ".to_string());
    }
    problems.join("; ")
}
