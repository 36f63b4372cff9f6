//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the composition root:
//! - parses CLI arguments
//! - opens the run's log file
//! - connects to MongoDB (the single handle lives here)
//! - runs the requested pipeline stages
//! - prints a summary

use clap::Parser;
use tracing::{error, info};

use crate::cli::{Command, PipelineArgs};
use crate::data::{HeartFailureData, MongoClient};
use crate::domain::TrainingPipelineConfig;
use crate::error::PipelineError;

pub mod pipeline;

use pipeline::TrainPipeline;

/// Entry point for the `heart-failure` binary.
pub fn run() -> Result<(), PipelineError> {
    let cli = crate::cli::Cli::parse();

    let cwd = std::env::current_dir()?;
    let log_path = crate::logger::init(&crate::logger::find_project_root(&cwd))?;
    info!(log = %log_path.display(), "Logging initialised");

    let result = match cli.command {
        Command::Train(args) => handle_train(&args),
        Command::Ingest(args) => handle_ingest(&args),
    };
    if let Err(err) = &result {
        error!(error = %err, "Pipeline run failed");
    }
    result
}

fn handle_train(args: &PipelineArgs) -> Result<(), PipelineError> {
    let config = pipeline_config_from_args(args);
    let pipeline = TrainPipeline::new(config)?;
    let client = MongoClient::from_env(&pipeline.pipeline_config().database_name)?;
    let source = HeartFailureData::new(&client);

    let run = pipeline.run_pipeline(&source)?;

    println!("{}", crate::report::format_run_summary(&run, pipeline.pipeline_config()));
    Ok(())
}

fn handle_ingest(args: &PipelineArgs) -> Result<(), PipelineError> {
    let config = pipeline_config_from_args(args);
    let pipeline = TrainPipeline::new(config)?;
    let client = MongoClient::from_env(&pipeline.pipeline_config().database_name)?;
    let source = HeartFailureData::new(&client);

    let artifact = pipeline.start_data_ingestion(&source)?;

    println!(
        "{}",
        crate::report::format_ingestion_summary(&artifact, pipeline.pipeline_config())
    );
    Ok(())
}

pub fn pipeline_config_from_args(args: &PipelineArgs) -> TrainingPipelineConfig {
    TrainingPipelineConfig {
        artifact_dir: args.artifact_dir.clone(),
        database_name: args.database.clone(),
        collection_name: args.collection.clone(),
        train_test_split_ratio: args.split_ratio,
        random_seed: args.seed,
        schema_file_path: args.schema_file.clone(),
        ..TrainingPipelineConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn args_map_onto_pipeline_config() {
        let args = PipelineArgs {
            artifact_dir: PathBuf::from("out"),
            database: "db".to_string(),
            collection: "records".to_string(),
            split_ratio: 0.25,
            seed: 9,
            schema_file: PathBuf::from("conf/columns.yaml"),
        };
        let config = pipeline_config_from_args(&args);
        assert_eq!(config.artifact_dir, PathBuf::from("out"));
        assert_eq!(config.database_name, "db");
        assert_eq!(config.collection_name, "records");
        assert_eq!(config.train_test_split_ratio, 0.25);
        assert_eq!(config.random_seed, 9);
        assert_eq!(config.schema_file_path, PathBuf::from("conf/columns.yaml"));
        assert_eq!(config.pipeline_name, "heart_failure");
    }
}
