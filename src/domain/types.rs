//! Schema-described tabular data.
//!
//! Records coming out of the document store are untyped. They are turned into a
//! `Table` at the ingestion boundary: columns get a name and a type voted on by
//! every record, then each record is conformed to that schema.
//!
//! Type inference rules (per column):
//!
//! - missing values never affect the type
//! - `Int` and `Float` vote together as numbers; any `Float` makes the column `Float`
//! - the type with a strict majority of the present values wins, ties give `Text`
//!
//! A record holding a value that cannot be coerced into its column type is
//! dropped and logged with its position. One stray `"unknown"` in `age` does
//! not turn the column into text.

use tracing::warn;

/// A single cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn column_type(&self) -> Option<ColumnType> {
        match self {
            Value::Null => None,
            Value::Bool(_) => Some(ColumnType::Bool),
            Value::Int(_) => Some(ColumnType::Int),
            Value::Float(_) => Some(ColumnType::Float),
            Value::Text(_) => Some(ColumnType::Text),
        }
    }

    /// Convert into `target`, or `None` when the value does not fit.
    ///
    /// Ints widen to floats, anything renders as text, and text holding a
    /// number is parsed into a numeric column.
    pub fn coerce(&self, target: ColumnType) -> Option<Value> {
        match (self, target) {
            (Value::Null, _) => Some(Value::Null),
            (Value::Int(i), ColumnType::Float) => Some(Value::Float(*i as f64)),
            (Value::Text(_), ColumnType::Text) => Some(self.clone()),
            (value, ColumnType::Text) => Some(Value::Text(value.to_field())),
            (Value::Text(s), target) => match Value::parse_field(s) {
                Value::Text(_) => None,
                parsed => parsed.coerce(target),
            },
            (value, target) if value.column_type() == Some(target) => Some(value.clone()),
            _ => None,
        }
    }

    /// Render as a CSV field. Missing values become an empty field.
    ///
    /// Floats use the shortest round-trip representation and always carry a
    /// fractional part, so they read back as floats.
    pub fn to_field(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) if f.is_finite() => format!("{f:?}"),
            Value::Float(_) => String::new(),
            Value::Text(s) => s.clone(),
        }
    }

    /// Parse a CSV field back into a value. Text is kept verbatim.
    pub fn parse_field(raw: &str) -> Value {
        let s = raw.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("na") {
            return Value::Null;
        }
        if s.eq_ignore_ascii_case("true") {
            return Value::Bool(true);
        }
        if s.eq_ignore_ascii_case("false") {
            return Value::Bool(false);
        }
        if let Ok(i) = s.parse::<i64>() {
            return Value::Int(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return if f.is_finite() { Value::Float(f) } else { Value::Null };
        }
        Value::Text(raw.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Bool,
    Int,
    Float,
    Text,
}

/// Per-column tally of the types seen in present values.
#[derive(Debug, Default, Clone, Copy)]
struct TypeVotes {
    bool: usize,
    int: usize,
    float: usize,
    text: usize,
}

impl TypeVotes {
    fn count(&mut self, value: &Value) {
        match value.column_type() {
            Some(ColumnType::Bool) => self.bool += 1,
            Some(ColumnType::Int) => self.int += 1,
            Some(ColumnType::Float) => self.float += 1,
            Some(ColumnType::Text) => self.text += 1,
            None => {}
        }
    }

    fn winner(self) -> ColumnType {
        let numeric = self.int + self.float;
        if numeric > self.bool && numeric > self.text {
            if self.float > 0 { ColumnType::Float } else { ColumnType::Int }
        } else if self.bool > numeric && self.bool > self.text {
            ColumnType::Bool
        } else {
            ColumnType::Text
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub dtype: ColumnType,
}

/// An ordered list of named fields, as read from one source document.
pub type Record = Vec<(String, Value)>;

/// Column-typed rows. Every row has exactly one cell per column.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Build a table from heterogeneous records.
    ///
    /// Columns appear in order of first occurrence across the records. A field
    /// absent from a record becomes `Null`. Columns that only ever hold missing
    /// values are typed `Text`. Records that do not fit the inferred schema are
    /// skipped with a warning.
    pub fn from_records(records: Vec<Record>) -> Table {
        let mut names: Vec<String> = Vec::new();
        let mut votes: Vec<TypeVotes> = Vec::new();

        for record in &records {
            for (name, value) in record {
                let idx = match names.iter().position(|n| n == name) {
                    Some(idx) => idx,
                    None => {
                        names.push(name.clone());
                        votes.push(TypeVotes::default());
                        names.len() - 1
                    }
                };
                votes[idx].count(value);
            }
        }

        let columns: Vec<Column> = names
            .into_iter()
            .zip(votes)
            .map(|(name, votes)| Column {
                name,
                dtype: votes.winner(),
            })
            .collect();

        let mut rows = Vec::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            match conform(&columns, record) {
                Ok(row) => rows.push(row),
                Err(reason) => warn!(position, %reason, "Rejected record that does not fit the schema"),
            }
        }

        Table { columns, rows }
    }

    /// Table with `Text` columns named `names` and no rows.
    pub fn empty(names: &[String]) -> Table {
        Table {
            columns: names
                .iter()
                .map(|name| Column {
                    name: name.clone(),
                    dtype: ColumnType::Text,
                })
                .collect(),
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows(), self.n_cols())
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// New table with the same schema holding the rows at `indices`, in that order.
    pub fn select_rows(&self, indices: &[usize]) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
        }
    }
}

fn conform(columns: &[Column], record: &Record) -> Result<Vec<Value>, String> {
    let mut row = vec![Value::Null; columns.len()];
    for (name, value) in record {
        if let Some(idx) = columns.iter().position(|c| &c.name == name) {
            let dtype = columns[idx].dtype;
            row[idx] = value
                .coerce(dtype)
                .ok_or_else(|| format!("field `{name}` holds {value:?}, expected {dtype:?}"))?;
        }
    }
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: &[(&str, Value)]) -> Record {
        fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn infers_and_widens_column_types() {
        let table = Table::from_records(vec![
            record(&[("age", Value::Int(75)), ("sex", Value::Int(1))]),
            record(&[("age", Value::Float(60.667)), ("note", Value::Text("x".into()))]),
            record(&[("age", Value::Null), ("sex", Value::Text("M".into()))]),
        ]);

        assert_eq!(table.column_names(), vec!["age", "sex", "note"]);
        assert_eq!(table.columns()[0].dtype, ColumnType::Float);
        assert_eq!(table.columns()[1].dtype, ColumnType::Text);
        assert_eq!(table.columns()[2].dtype, ColumnType::Text);

        assert_eq!(table.rows()[0][0], Value::Float(75.0));
        assert_eq!(table.rows()[0][1], Value::Text("1".into()));
        assert_eq!(table.rows()[1][1], Value::Null);
        assert_eq!(table.rows()[2][0], Value::Null);
        assert_eq!(table.shape(), (3, 3));
    }

    #[test]
    fn nonconforming_record_is_dropped_and_column_stays_numeric() {
        let table = Table::from_records(vec![
            record(&[("age", Value::Int(75)), ("sex", Value::Int(1))]),
            record(&[("age", Value::Int(60)), ("sex", Value::Int(0))]),
            record(&[("age", Value::Text("unknown".into())), ("sex", Value::Int(1))]),
        ]);

        assert_eq!(table.columns()[0].dtype, ColumnType::Int);
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.rows()[0], vec![Value::Int(75), Value::Int(1)]);
        assert_eq!(table.rows()[1], vec![Value::Int(60), Value::Int(0)]);
    }

    #[test]
    fn numeric_text_is_parsed_into_numeric_columns() {
        let table = Table::from_records(vec![
            record(&[("platelets", Value::Float(265000.0))]),
            record(&[("platelets", Value::Int(263358))]),
            record(&[("platelets", Value::Text(" 162000 ".into()))]),
            record(&[("platelets", Value::Bool(true))]),
        ]);

        assert_eq!(table.columns()[0].dtype, ColumnType::Float);
        assert_eq!(
            table.rows().iter().map(|r| r[0].clone()).collect::<Vec<_>>(),
            vec![Value::Float(265000.0), Value::Float(263358.0), Value::Float(162000.0)]
        );
    }

    #[test]
    fn coerce_refuses_narrowing() {
        assert_eq!(Value::Float(1.5).coerce(ColumnType::Int), None);
        assert_eq!(Value::Bool(true).coerce(ColumnType::Float), None);
        assert_eq!(Value::Int(3).coerce(ColumnType::Float), Some(Value::Float(3.0)));
        assert_eq!(Value::Null.coerce(ColumnType::Bool), Some(Value::Null));
        assert_eq!(Value::Bool(false).coerce(ColumnType::Text), Some(Value::Text("false".into())));
    }

    #[test]
    fn all_null_column_is_text() {
        let table = Table::from_records(vec![record(&[("x", Value::Null)])]);
        assert_eq!(table.columns()[0].dtype, ColumnType::Text);
    }

    #[test]
    fn fields_parse_back_to_their_types() {
        assert_eq!(Value::parse_field(""), Value::Null);
        assert_eq!(Value::parse_field("NA"), Value::Null);
        assert_eq!(Value::parse_field("NaN"), Value::Null);
        assert_eq!(Value::parse_field("true"), Value::Bool(true));
        assert_eq!(Value::parse_field("42"), Value::Int(42));
        assert_eq!(Value::parse_field("42.0"), Value::Float(42.0));
        assert_eq!(Value::parse_field(&Value::Float(265000.0).to_field()), Value::Float(265000.0));
        assert_eq!(Value::parse_field("abc"), Value::Text("abc".into()));
        assert_eq!(Value::parse_field(" a b "), Value::Text(" a b ".into()));
    }

    #[test]
    fn select_rows_keeps_schema_and_order() {
        let table = Table::from_records(
            (0..5)
                .map(|i| record(&[("id", Value::Int(i))]))
                .collect(),
        );
        let picked = table.select_rows(&[4, 0, 2]);
        assert_eq!(picked.columns(), table.columns());
        let ids: Vec<_> = picked.rows().iter().map(|r| r[0].clone()).collect();
        assert_eq!(ids, vec![Value::Int(4), Value::Int(0), Value::Int(2)]);
    }
}
