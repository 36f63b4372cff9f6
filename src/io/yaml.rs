//! YAML configuration files.

use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::info;

use crate::error::{PipelineError, ResultExt};

/// Read and deserialize a YAML file.
pub fn read_yaml_file<T: DeserializeOwned>(path: &Path) -> Result<T, PipelineError> {
    info!(path = %path.display(), "Reading YAML file");
    let text = std::fs::read_to_string(path).context(format!("Failed to read YAML '{}'", path.display()))?;
    let value = serde_yaml::from_str(&text).context(format!("Invalid YAML '{}'", path.display()))?;
    info!("YAML file read successfully");
    Ok(value)
}
