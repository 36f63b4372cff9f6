//! Shared fixtures for unit tests.

use std::collections::HashMap;

use crate::data::CollectionSource;
use crate::domain::{Record, Table, Value};
use crate::error::{ErrorKind, PipelineError};

/// Columns of the heart-failure clinical records, as declared in
/// `config/schema.yaml`.
pub const HEART_FAILURE_COLUMNS: [&str; 13] = [
    "age",
    "anaemia",
    "creatinine_phosphokinase",
    "diabetes",
    "ejection_fraction",
    "high_blood_pressure",
    "platelets",
    "serum_creatinine",
    "serum_sodium",
    "sex",
    "smoking",
    "time",
    "DEATH_EVENT",
];

/// `n` synthetic clinical records. `time` is unique per row and doubles as a
/// row id in tests.
pub fn heart_failure_table(n: usize) -> Table {
    let records: Vec<Record> = (0..n)
        .map(|i| {
            let k = i as i64;
            let values = [
                Value::Float(40.5 + (i % 50) as f64),
                Value::Int(k % 2),
                Value::Int(100 + k * 7),
                Value::Int((k / 2) % 2),
                Value::Int(20 + k % 40),
                Value::Int((k / 3) % 2),
                Value::Float(200000.0 + i as f64 * 1000.5),
                Value::Float(1.0 + (i % 10) as f64 * 0.1),
                Value::Int(130 + k % 10),
                Value::Int((k / 5) % 2),
                Value::Int((k / 7) % 2),
                Value::Int(k),
                Value::Int(i64::from(i % 3 == 0)),
            ];
            HEART_FAILURE_COLUMNS
                .iter()
                .map(|c| c.to_string())
                .zip(values)
                .collect()
        })
        .collect();
    Table::from_records(records)
}

/// Collections held in memory, keyed by name.
#[derive(Default)]
pub struct InMemorySource {
    collections: HashMap<String, Table>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_collection(mut self, name: &str, table: Table) -> Self {
        self.collections.insert(name.to_string(), table);
        self
    }
}

impl CollectionSource for InMemorySource {
    fn export_collection(&self, collection_name: &str) -> Result<Table, PipelineError> {
        self.collections.get(collection_name).cloned().ok_or_else(|| {
            PipelineError::new(
                ErrorKind::Connectivity,
                format!("collection '{collection_name}' is unavailable"),
            )
        })
    }
}
