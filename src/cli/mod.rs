//! Command-line parsing for the training pipeline.
//!
//! Argument parsing stays here; `app` maps the parsed flags into configs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::constants::{self, data_ingestion};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "heart-failure", version, about = "Heart-failure training pipeline")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the pipeline: ingestion followed by validation.
    Train(PipelineArgs),
    /// Run data ingestion only and print the artifact.
    Ingest(PipelineArgs),
}

#[derive(Debug, Args, Clone)]
pub struct PipelineArgs {
    /// Root directory for stage artifacts.
    #[arg(long, default_value = constants::ARTIFACT_DIR)]
    pub artifact_dir: PathBuf,

    /// MongoDB database name.
    #[arg(long, default_value = constants::DATABASE_NAME)]
    pub database: String,

    /// Collection holding the clinical records.
    #[arg(long, default_value = constants::COLLECTION_NAME)]
    pub collection: String,

    /// Fraction of rows assigned to the test set (exclusive 0..1).
    #[arg(long, default_value_t = data_ingestion::TRAIN_TEST_SPLIT_RATIO)]
    pub split_ratio: f64,

    /// Seed for the train/test shuffle.
    #[arg(long, default_value_t = data_ingestion::SPLIT_SEED)]
    pub seed: u64,

    /// YAML file listing the expected dataset columns.
    #[arg(long, default_value = constants::SCHEMA_FILE_PATH)]
    pub schema_file: PathBuf,
}
