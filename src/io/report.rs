//! JSON read/write for stage reports.

use std::fs::File;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{PipelineError, ResultExt};
use crate::io::export::ensure_parent_dir;

/// Write `value` as pretty JSON, creating missing parent directories.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), PipelineError> {
    ensure_parent_dir(path)?;
    let file = File::create(path).context(format!("Failed to create JSON '{}'", path.display()))?;
    serde_json::to_writer_pretty(file, value).context(format!("Failed to write JSON '{}'", path.display()))?;
    Ok(())
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, PipelineError> {
    let file = File::open(path).context(format!("Failed to open JSON '{}'", path.display()))?;
    let value = serde_json::from_reader(file).context(format!("Invalid JSON '{}'", path.display()))?;
    Ok(value)
}
