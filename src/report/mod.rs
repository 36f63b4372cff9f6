//! Terminal output for finished runs.
//!
//! Formatting lives here so `app` only decides *what* to print.

use crate::app::pipeline::PipelineRun;
use crate::domain::{DataIngestionArtifact, TrainingPipelineConfig};

/// Summary of a full `train` run.
pub fn format_run_summary(run: &PipelineRun, config: &TrainingPipelineConfig) -> String {
    let mut out = format_ingestion_summary(&run.data_ingestion, config);

    let validation = &run.data_validation;
    out.push_str("\nData validation:\n");
    out.push_str(&format!(
        "  status: {}\n",
        if validation.validation_status { "passed" } else { "failed" }
    ));
    if !validation.message.is_empty() {
        out.push_str(&format!("  problems: {}\n", validation.message));
    }
    out.push_str(&format!("  report: {}\n", validation.report_file_path.display()));
    out
}

/// Summary of the ingestion stage alone.
pub fn format_ingestion_summary(artifact: &DataIngestionArtifact, config: &TrainingPipelineConfig) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== {} training pipeline ===\n", config.pipeline_name));
    out.push_str(&format!(
        "Source: {}.{}\n",
        config.database_name, config.collection_name
    ));
    out.push_str(&format!(
        "Split: test_ratio={} seed={}\n",
        config.train_test_split_ratio, config.random_seed
    ));
    out.push_str("\nData ingestion:\n");
    out.push_str(&format!("  train: {}\n", artifact.trained_file_path.display()));
    out.push_str(&format!("  test:  {}\n", artifact.test_file_path.display()));
    out
}
