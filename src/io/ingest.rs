//! Read CSV files produced by the pipeline back into tables.
//!
//! Used by the validation stage (and by tests checking what ingestion wrote).
//! Values are re-typed from text with `Value::parse_field`, then the schema is
//! inferred the same way as for document-store records.

use std::fs::File;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{Record, Table, Value};
use crate::error::{PipelineError, ResultExt};

/// Load a CSV file with a header row into a `Table`.
pub fn read_table_csv(path: &Path) -> Result<Table, PipelineError> {
    let file = File::open(path).context(format!("Failed to open CSV '{}'", path.display()))?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(file);

    let headers: Vec<String> = reader
        .headers()
        .context(format!("Failed to read CSV headers of '{}'", path.display()))?
        .iter()
        .map(normalize_header_name)
        .collect();

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result.context(format!("Failed to parse CSV '{}'", path.display()))?;
        records.push(to_record(&headers, &record));
    }

    if records.is_empty() {
        // A header-only file still has a schema.
        return Ok(Table::empty(&headers));
    }
    Ok(Table::from_records(records))
}

fn to_record(headers: &[String], record: &StringRecord) -> Record {
    headers
        .iter()
        .zip(record.iter())
        .map(|(name, raw)| (name.clone(), Value::parse_field(raw)))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    name.trim().trim_start_matches('\u{feff}').to_string()
}
