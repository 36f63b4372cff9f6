//! Write tables to CSV.
//!
//! Files carry a header row, no index column, UTF-8, comma separated. Parent
//! directories are created on demand and existing files are overwritten.

use std::fs::create_dir_all;
use std::path::Path;

use tracing::debug;

use crate::domain::Table;
use crate::error::{PipelineError, ResultExt};

/// Write `table` to `path`, creating missing parent directories.
pub fn write_table_csv(path: &Path, table: &Table) -> Result<(), PipelineError> {
    ensure_parent_dir(path)?;

    let mut writer = csv::Writer::from_path(path)
        .context(format!("Failed to create CSV '{}'", path.display()))?;

    writer
        .write_record(table.column_names())
        .context(format!("Failed to write CSV header to '{}'", path.display()))?;

    for row in table.rows() {
        writer
            .write_record(row.iter().map(|v| v.to_field()))
            .context(format!("Failed to write CSV row to '{}'", path.display()))?;
    }

    writer
        .flush()
        .context(format!("Failed to flush CSV '{}'", path.display()))?;

    debug!(path = %path.display(), rows = table.n_rows(), "Wrote CSV");
    Ok(())
}

/// Create the parent directory of `path` if it does not exist yet.
pub fn ensure_parent_dir(path: &Path) -> Result<(), PipelineError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        create_dir_all(dir).context(format!("Failed to create directory '{}'", dir.display()))?;
    }
    Ok(())
}
