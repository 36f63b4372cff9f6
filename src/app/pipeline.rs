//! Training pipeline sequencer.
//!
//! ingestion -> validation, strictly in order. The first failure aborts the run;
//! files already written by earlier stages stay on disk.

use tracing::{error, info};

use crate::components::{DataIngestion, DataValidation};
use crate::data::CollectionSource;
use crate::domain::{
    DataIngestionArtifact, DataIngestionConfig, DataValidationArtifact, DataValidationConfig,
    TrainingPipelineConfig,
};
use crate::error::{PipelineError, ResultExt};

/// Artifacts of a completed run.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub data_ingestion: DataIngestionArtifact,
    pub data_validation: DataValidationArtifact,
}

pub struct TrainPipeline {
    pipeline_config: TrainingPipelineConfig,
    data_ingestion_config: DataIngestionConfig,
    data_validation_config: DataValidationConfig,
}

impl TrainPipeline {
    /// Derive the stage configs. Fails when the schema file cannot be loaded.
    pub fn new(pipeline_config: TrainingPipelineConfig) -> Result<Self, PipelineError> {
        Ok(Self {
            data_ingestion_config: DataIngestionConfig::new(&pipeline_config),
            data_validation_config: DataValidationConfig::from_schema_file(&pipeline_config)?,
            pipeline_config,
        })
    }

    pub fn pipeline_config(&self) -> &TrainingPipelineConfig {
        &self.pipeline_config
    }

    pub fn start_data_ingestion<S: CollectionSource>(&self, source: &S) -> Result<DataIngestionArtifact, PipelineError> {
        info!("Entered start_data_ingestion");

        let artifact = DataIngestion::new(self.data_ingestion_config.clone(), source)
            .initiate_data_ingestion()
            .inspect_err(|err| error!(error = %err, "Error occurred in start_data_ingestion"))
            .context("start_data_ingestion")?;

        info!("Successfully obtained train and test datasets");
        info!("Exited start_data_ingestion");
        Ok(artifact)
    }

    pub fn start_data_validation(
        &self,
        data_ingestion_artifact: &DataIngestionArtifact,
    ) -> Result<DataValidationArtifact, PipelineError> {
        info!("Entered start_data_validation");

        let artifact = DataValidation::new(data_ingestion_artifact, &self.data_validation_config)
            .initiate_data_validation()
            .inspect_err(|err| error!(error = %err, "Error occurred in start_data_validation"))
            .context("start_data_validation")?;

        info!("Data validation completed");
        info!("Exited start_data_validation");
        Ok(artifact)
    }

    pub fn run_pipeline<S: CollectionSource>(&self, source: &S) -> Result<PipelineRun, PipelineError> {
        info!(pipeline = %self.pipeline_config.pipeline_name, "Pipeline started");

        let data_ingestion = self.start_data_ingestion(source)?;
        let data_validation = self.start_data_validation(&data_ingestion)?;

        info!(pipeline = %self.pipeline_config.pipeline_name, "Pipeline finished");
        Ok(PipelineRun {
            data_ingestion,
            data_validation,
        })
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::error::ErrorKind;
    use crate::test_support::{InMemorySource, heart_failure_table};

    fn pipeline_in(root: &std::path::Path) -> TrainPipeline {
        TrainPipeline::new(TrainingPipelineConfig {
            artifact_dir: root.to_path_buf(),
            ..TrainingPipelineConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn full_run_produces_both_artifacts() {
        let dir = tempdir().unwrap();
        let source = InMemorySource::new().with_collection("heart_failure_data", heart_failure_table(100));

        let run = pipeline_in(dir.path()).run_pipeline(&source).unwrap();

        assert!(run.data_ingestion.trained_file_path.starts_with(dir.path()));
        assert!(run.data_validation.validation_status);
        assert!(run.data_validation.report_file_path.is_file());
    }

    #[test]
    fn unreadable_schema_fails_construction() {
        let err = TrainPipeline::new(TrainingPipelineConfig {
            schema_file_path: std::path::PathBuf::from("/definitely/not/here/schema.yaml"),
            ..TrainingPipelineConfig::default()
        })
        .err()
        .unwrap();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn ingestion_failure_aborts_before_validation() {
        let dir = tempdir().unwrap();
        let source = InMemorySource::new();
        let pipeline = pipeline_in(dir.path());

        let err = pipeline.run_pipeline(&source).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Connectivity);
        assert_eq!(err.context().last().unwrap(), "start_data_ingestion");
        assert!(!pipeline.data_validation_config.report_file_path.exists());
    }
}
