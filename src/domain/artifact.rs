//! Artifacts handed from one pipeline stage to the next.
//!
//! Artifacts only reference files on disk; they never embed data.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataIngestionArtifact {
    pub trained_file_path: PathBuf,
    pub test_file_path: PathBuf,
}

impl fmt::Display for DataIngestionArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DataIngestionArtifact(trained_file_path={}, test_file_path={})",
            self.trained_file_path.display(),
            self.test_file_path.display()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataValidationArtifact {
    pub validation_status: bool,
    /// Human-readable summary of the failed checks (empty when valid).
    pub message: String,
    pub valid_train_file_path: PathBuf,
    pub valid_test_file_path: PathBuf,
    pub report_file_path: PathBuf,
}

impl fmt::Display for DataValidationArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DataValidationArtifact(validation_status={}, report_file_path={})",
            self.validation_status,
            self.report_file_path.display()
        )?;
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        Ok(())
    }
}
