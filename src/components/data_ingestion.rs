//! Data ingestion stage.
//!
//! collection -> feature store CSV -> seeded split -> train/test CSVs -> artifact
//!
//! The stage keeps no state between calls. A failure after the train file has
//! been written leaves it on disk; nothing is rolled back.

use tracing::{error, info};

use crate::data::{CollectionSource, train_test_split};
use crate::domain::{DataIngestionArtifact, DataIngestionConfig, Table};
use crate::error::{ErrorKind, PipelineError, ResultExt};
use crate::io::write_table_csv;

pub struct DataIngestion<'a, S: CollectionSource> {
    config: DataIngestionConfig,
    source: &'a S,
}

impl<'a, S: CollectionSource> DataIngestion<'a, S> {
    pub fn new(config: DataIngestionConfig, source: &'a S) -> Self {
        Self { config, source }
    }

    pub fn config(&self) -> &DataIngestionConfig {
        &self.config
    }

    /// Fetch the configured collection and write it to the feature store.
    ///
    /// Returns the snapshot exactly as written.
    pub fn export_data_into_feature_store(&self) -> Result<Table, PipelineError> {
        info!(collection = %self.config.collection_name, "Exporting data from MongoDB");

        self.export_snapshot()
            .inspect_err(|err| error!(error = %err, "Failed to export data into feature store"))
            .context("export_data_into_feature_store")
    }

    fn export_snapshot(&self) -> Result<Table, PipelineError> {
        let snapshot = self.source.export_collection(&self.config.collection_name)?;
        let (rows, cols) = snapshot.shape();
        info!(rows, cols, "Shape of exported data");

        if snapshot.is_empty() {
            return Err(PipelineError::new(
                ErrorKind::Data,
                format!("Collection '{}' returned no usable records.", self.config.collection_name),
            ));
        }

        let path = &self.config.feature_store_file_path;
        info!(path = %path.display(), "Saving exported data into feature store");
        write_table_csv(path, &snapshot)?;

        Ok(snapshot)
    }

    /// Split `snapshot` and write the train and test files, train first.
    pub fn split_data_as_train_test(&self, snapshot: &Table) -> Result<(), PipelineError> {
        info!("Entered split_data_as_train_test");

        self.write_split(snapshot)
            .inspect_err(|err| error!(error = %err, "Error occurred during train-test split"))
            .context("split_data_as_train_test")?;

        info!("Exited split_data_as_train_test");
        Ok(())
    }

    fn write_split(&self, snapshot: &Table) -> Result<(), PipelineError> {
        let split = train_test_split(snapshot, self.config.train_test_split_ratio, self.config.random_seed)?;
        info!(
            train_rows = split.train.n_rows(),
            test_rows = split.test.n_rows(),
            seed = self.config.random_seed,
            "Performed train-test split"
        );

        info!("Exporting train and test datasets to CSV files");
        write_table_csv(&self.config.training_file_path, &split.train)?;
        write_table_csv(&self.config.testing_file_path, &split.test)?;
        info!("Exported train and test datasets successfully");
        Ok(())
    }

    /// Run the whole stage and return the artifact pointing at the split files.
    pub fn initiate_data_ingestion(&self) -> Result<DataIngestionArtifact, PipelineError> {
        info!("Entered initiate_data_ingestion");

        let artifact = self
            .run()
            .inspect_err(|err| error!(error = %err, "Error occurred during data ingestion"))
            .context("initiate_data_ingestion")?;

        info!(%artifact, "Data ingestion artifact created");
        info!("Exited initiate_data_ingestion");
        Ok(artifact)
    }

    fn run(&self) -> Result<DataIngestionArtifact, PipelineError> {
        let snapshot = self.export_data_into_feature_store()?;
        info!("Successfully fetched data from MongoDB");

        self.split_data_as_train_test(&snapshot)?;
        info!("Train-test split completed");

        Ok(DataIngestionArtifact {
            trained_file_path: self.config.training_file_path.clone(),
            test_file_path: self.config.testing_file_path.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::path::Path;

    use tempfile::tempdir;

    use super::*;
    use crate::domain::{TrainingPipelineConfig, Value};
    use crate::io::read_table_csv;
    use crate::test_support::{InMemorySource, heart_failure_table};

    fn config_in(root: &Path, ratio: f64) -> DataIngestionConfig {
        DataIngestionConfig::new(&TrainingPipelineConfig {
            artifact_dir: root.to_path_buf(),
            train_test_split_ratio: ratio,
            ..TrainingPipelineConfig::default()
        })
    }

    fn time_ids(table: &Table) -> HashSet<i64> {
        let idx = table.column_index("time").unwrap();
        table
            .rows()
            .iter()
            .map(|row| match row[idx] {
                Value::Int(id) => id,
                ref other => panic!("unexpected id {other:?}"),
            })
            .collect()
    }

    #[test]
    fn end_to_end_writes_80_20_partition() {
        let dir = tempdir().unwrap();
        let source = InMemorySource::new().with_collection("heart_failure_data", heart_failure_table(100));
        let ingestion = DataIngestion::new(config_in(dir.path(), 0.2), &source);

        let artifact = ingestion.initiate_data_ingestion().unwrap();

        assert!(artifact.trained_file_path.is_file());
        assert!(artifact.test_file_path.is_file());

        let train = read_table_csv(&artifact.trained_file_path).unwrap();
        let test = read_table_csv(&artifact.test_file_path).unwrap();
        assert_eq!(train.n_rows(), 80);
        assert_eq!(test.n_rows(), 20);

        let train_ids = time_ids(&train);
        let test_ids = time_ids(&test);
        assert!(train_ids.is_disjoint(&test_ids));
        let all: HashSet<i64> = train_ids.union(&test_ids).copied().collect();
        assert_eq!(all, (0..100).collect());
    }

    #[test]
    fn feature_store_matches_returned_snapshot() {
        let dir = tempdir().unwrap();
        let table = heart_failure_table(30);
        let source = InMemorySource::new().with_collection("heart_failure_data", table.clone());
        let ingestion = DataIngestion::new(config_in(dir.path(), 0.2), &source);

        let snapshot = ingestion.export_data_into_feature_store().unwrap();
        assert_eq!(snapshot, table);

        let on_disk = read_table_csv(&ingestion.config().feature_store_file_path).unwrap();
        assert_eq!(on_disk.shape(), snapshot.shape());
        assert_eq!(on_disk.column_names(), snapshot.column_names());
        assert_eq!(on_disk, snapshot);
    }

    #[test]
    fn rerun_is_deterministic() {
        let dir = tempdir().unwrap();
        let source = InMemorySource::new().with_collection("heart_failure_data", heart_failure_table(60));
        let ingestion = DataIngestion::new(config_in(dir.path(), 0.2), &source);

        let artifact = ingestion.initiate_data_ingestion().unwrap();
        let first = std::fs::read_to_string(&artifact.test_file_path).unwrap();
        ingestion.initiate_data_ingestion().unwrap();
        let second = std::fs::read_to_string(&artifact.test_file_path).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_file_write_failure_keeps_train_file() {
        let dir = tempdir().unwrap();
        let config = config_in(dir.path(), 0.2);
        // A directory squatting on the test path makes the second write fail.
        std::fs::create_dir_all(&config.testing_file_path).unwrap();

        let source = InMemorySource::new().with_collection("heart_failure_data", heart_failure_table(10));
        let ingestion = DataIngestion::new(config.clone(), &source);

        let err = ingestion.initiate_data_ingestion().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.context().iter().any(|c| c == "split_data_as_train_test"));
        assert_eq!(err.context().last().unwrap(), "initiate_data_ingestion");

        let train = read_table_csv(&config.training_file_path).unwrap();
        assert_eq!(train.n_rows(), 8);
    }

    #[test]
    fn degenerate_ratio_is_rejected_after_feature_store_export() {
        let dir = tempdir().unwrap();
        let source = InMemorySource::new().with_collection("heart_failure_data", heart_failure_table(10));
        let ingestion = DataIngestion::new(config_in(dir.path(), 1.0), &source);

        let err = ingestion.initiate_data_ingestion().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(ingestion.config().feature_store_file_path.is_file());
        assert!(!ingestion.config().training_file_path.exists());
    }

    #[test]
    fn empty_collection_is_a_data_error() {
        let dir = tempdir().unwrap();
        let source = InMemorySource::new().with_collection("heart_failure_data", Table::default());
        let ingestion = DataIngestion::new(config_in(dir.path(), 0.2), &source);

        let err = ingestion.initiate_data_ingestion().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Data);
        assert_eq!(
            err.context(),
            ["export_data_into_feature_store", "initiate_data_ingestion"]
        );
    }

    #[test]
    fn columns_without_rows_are_rejected_before_writing() {
        let dir = tempdir().unwrap();
        let header_only = Table::empty(&["age".to_string(), "DEATH_EVENT".to_string()]);
        let source = InMemorySource::new().with_collection("heart_failure_data", header_only);
        let ingestion = DataIngestion::new(config_in(dir.path(), 0.2), &source);

        let err = ingestion.export_data_into_feature_store().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Data);
        assert!(!ingestion.config().feature_store_file_path.exists());
    }

    #[test]
    fn source_failures_propagate() {
        let dir = tempdir().unwrap();
        let source = InMemorySource::new();
        let ingestion = DataIngestion::new(config_in(dir.path(), 0.2), &source);

        let err = ingestion.initiate_data_ingestion().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Connectivity);
        assert!(!ingestion.config().feature_store_file_path.exists());
    }
}
