use std::collections::HashMap;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use super::coercion;
use super::error::Result;
use super::types::{Number, Timestamp, Value};

/// Column names of a result, shared by all of its rows.
#[derive(Debug, PartialEq)]
pub(crate) struct Columns {
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

impl Columns {
    pub(crate) fn new(names: Vec<String>) -> Self {
        let mut positions = HashMap::with_capacity(names.len());
        for (position, name) in names.iter().enumerate() {
            // A repeated label resolves to its first column.
            positions.entry(name.clone()).or_insert(position);
        }
        Self { names, positions }
    }

    pub(crate) fn names(&self) -> &[String] {
        &self.names
    }

    pub(crate) fn len(&self) -> usize {
        self.names.len()
    }

    fn position(&self, column: &str) -> Option<usize> {
        self.positions.get(column).copied()
    }
}

/// One materialized record, keyed by column name.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Arc<Columns>,
    values: Vec<Value>,
}

impl Row {
    pub(crate) fn new(columns: Arc<Columns>, values: Vec<Value>) -> Self {
        debug_assert_eq!(columns.len(), values.len());
        Self { columns, values }
    }

    /// Does this row have a column with the given name?
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.position(column).is_some()
    }

    /// The stored value of a column, exactly as the driver produced it.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .position(column)
            .and_then(|position| self.values.get(position))
    }

    /// Column names in result order.
    pub fn columns(&self) -> &[String] {
        self.columns.names()
    }

    /// Number of columns in this row.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates `(column, value)` pairs in result order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns
            .names()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    /// The value as a string; `"null"` when the value is null or the column is absent.
    pub fn as_string(&self, column: &str) -> String {
        coercion::to_string(self.get(column))
    }

    /// Is the stored value an integer or a real?
    pub fn is_number(&self, column: &str) -> bool {
        matches!(self.get(column), Some(Value::Integer(_) | Value::Real(_)))
    }

    pub fn as_number(&self, column: &str) -> Result<Number> {
        coercion::to_number(column, self.get(column))
    }

    /// See [`coercion::to_boolean`] for the accepted truthy values.
    pub fn as_boolean(&self, column: &str) -> bool {
        coercion::to_boolean(self.get(column))
    }

    pub fn as_timestamp(&self, column: &str) -> Result<Option<Timestamp>> {
        coercion::to_timestamp(column, self.get(column))
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::CoercionError;
    use chrono::{TimeZone, Utc};

    fn row(pairs: &[(&str, Value)]) -> Row {
        let names = pairs.iter().map(|(name, _)| name.to_string()).collect();
        let values = pairs.iter().map(|(_, value)| value.clone()).collect();
        Row::new(Arc::new(Columns::new(names)), values)
    }

    #[test]
    fn test_get_returns_stored_value() {
        let row = row(&[
            ("id", Value::Integer(1)),
            ("name", Value::Text("ada".into())),
        ]);

        assert_eq!(row.get("id"), Some(&Value::Integer(1)));
        assert_eq!(row.get("name"), Some(&Value::Text("ada".into())));
        assert_eq!(row.get("email"), None);
    }

    #[test]
    fn test_has_column() {
        let row = row(&[("id", Value::Null)]);

        assert!(row.has_column("id"));
        assert!(!row.has_column("ID"));
    }

    #[test]
    fn test_repeated_label_resolves_to_first_column() {
        let row = row(&[("x", Value::Integer(1)), ("x", Value::Integer(2))]);

        assert_eq!(row.get("x"), Some(&Value::Integer(1)));
        assert_eq!(row.len(), 2);
    }

    #[test]
    fn test_as_string_null_and_absent() {
        let row = row(&[("nickname", Value::Null)]);

        assert_eq!(row.as_string("nickname"), "null");
        assert_eq!(row.as_string("missing"), "null");
    }

    #[test]
    fn test_as_boolean_examples() {
        let row = row(&[
            ("upper", Value::Text("TRUE".into())),
            ("zero", Value::Text("0".into())),
            ("one", Value::Integer(1)),
        ]);

        assert!(row.as_boolean("upper"));
        assert!(!row.as_boolean("zero"));
        assert!(row.as_boolean("one"));
        assert!(!row.as_boolean("missing"));
    }

    #[test]
    fn test_is_number_and_as_number() {
        let row = row(&[
            ("count", Value::Integer(4)),
            ("label", Value::Text("4".into())),
        ]);

        assert!(row.is_number("count"));
        assert!(!row.is_number("label"));
        assert!(!row.is_number("missing"));
        assert_eq!(row.as_number("count"), Ok(Number::Integer(4)));
        assert!(matches!(
            row.as_number("label"),
            Err(CoercionError::NotANumber { found: "text", .. })
        ));
    }

    #[test]
    fn test_as_timestamp_from_millis() {
        let row = row(&[("ts", Value::Integer(1000))]);

        assert_eq!(
            row.as_timestamp("ts"),
            Ok(Some(Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 1).unwrap()))
        );
    }

    #[test]
    fn test_iter_in_column_order() {
        let row = row(&[("b", Value::Integer(2)), ("a", Value::Integer(1))]);

        let pairs: Vec<_> = row.iter().collect();

        assert_eq!(
            pairs,
            vec![("b", &Value::Integer(2)), ("a", &Value::Integer(1))]
        );
    }

    #[test]
    fn test_serializes_as_map() {
        let row = row(&[("id", Value::Integer(7)), ("name", Value::Text("x".into()))]);

        let json = serde_json::to_string(&row).unwrap();

        assert_eq!(json, r#"{"id":7,"name":"x"}"#);
    }
}
