use std::sync::Arc;

use serde::{Serialize, Serializer};

use super::error::{CoercionError, MaterializeError, Result};
use super::row::{Columns, Row};
use super::types::{Number, Timestamp, Value};

/// Assembles a [`QueryResult`] one record at a time.
///
/// The column set is fixed when the builder is created and every record must
/// provide exactly one value per column.
#[derive(Debug)]
pub struct ResultBuilder {
    columns: Arc<Columns>,
    rows: Vec<Row>,
}

impl ResultBuilder {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns: Arc::new(Columns::new(columns)),
            rows: Vec::new(),
        }
    }

    /// Number of columns every record must have.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Appends a record, keeping insertion order.
    pub fn push(&mut self, values: Vec<Value>) -> std::result::Result<(), MaterializeError> {
        if values.len() != self.columns.len() {
            return Err(MaterializeError::RecordWidth {
                record: self.rows.len(),
                expected: self.columns.len(),
                actual: values.len(),
            });
        }
        self.rows.push(Row::new(Arc::clone(&self.columns), values));
        Ok(())
    }

    pub fn finish(self) -> QueryResult {
        QueryResult {
            columns: self.columns,
            rows: self.rows,
        }
    }
}

/// The ordered rows produced by one query execution.
///
/// Immutable once built. All rows share the same column set.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    columns: Arc<Columns>,
    rows: Vec<Row>,
}

impl QueryResult {
    /// Builds a result from column names and records in one step.
    pub fn from_records(
        columns: Vec<String>,
        records: impl IntoIterator<Item = Vec<Value>>,
    ) -> std::result::Result<Self, MaterializeError> {
        let mut builder = ResultBuilder::new(columns);
        for record in records {
            builder.push(record)?;
        }
        Ok(builder.finish())
    }

    /// Column names in result order.
    pub fn columns(&self) -> &[String] {
        self.columns.names()
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    /// Stored value at `index`/`column`. `Ok(None)` when the row has no such column.
    pub fn get(&self, index: usize, column: &str) -> Result<Option<&Value>> {
        Ok(self.checked_row(index)?.get(column))
    }

    pub fn get_string(&self, index: usize, column: &str) -> Result<String> {
        Ok(self.checked_row(index)?.as_string(column))
    }

    pub fn get_number(&self, index: usize, column: &str) -> Result<Number> {
        self.checked_row(index)?.as_number(column)
    }

    pub fn get_boolean(&self, index: usize, column: &str) -> Result<bool> {
        Ok(self.checked_row(index)?.as_boolean(column))
    }

    pub fn get_timestamp(&self, index: usize, column: &str) -> Result<Option<Timestamp>> {
        self.checked_row(index)?.as_timestamp(column)
    }

    fn checked_row(&self, index: usize) -> Result<&Row> {
        self.rows.get(index).ok_or(CoercionError::RowOutOfBounds {
            index,
            rows: self.rows.len(),
        })
    }
}

impl<'a> IntoIterator for &'a QueryResult {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl IntoIterator for QueryResult {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl Serialize for QueryResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn users() -> QueryResult {
        QueryResult::from_records(
            vec!["id".into(), "name".into(), "active".into()],
            vec![
                vec![
                    Value::Integer(1),
                    Value::Text("ada".into()),
                    Value::Text("TRUE".into()),
                ],
                vec![Value::Integer(2), Value::Null, Value::Text("0".into())],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_empty_result() {
        let result = QueryResult::from_records(vec!["id".into()], Vec::new()).unwrap();

        assert_eq!(result.rows(), 0);
        assert!(result.is_empty());
        assert_eq!(result.columns(), ["id".to_string()]);
    }

    #[test]
    fn test_preserves_record_order() {
        let result = users();

        let ids: Vec<_> = result
            .iter()
            .map(|row| row.as_number("id").unwrap().as_i64())
            .collect();

        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_every_column_keyed_by_its_own_name() {
        let result = users();
        let row = result.row(0).unwrap();

        assert_eq!(row.get("id"), Some(&Value::Integer(1)));
        assert_eq!(row.get("name"), Some(&Value::Text("ada".into())));
        assert_eq!(row.get("active"), Some(&Value::Text("TRUE".into())));
    }

    #[test]
    fn test_get_returns_values_verbatim() {
        let records = vec![
            vec![Value::Real(1.0), Value::Blob(vec![1, 2]), Value::Boolean(true)],
            vec![Value::Null, Value::Text("1".into()), Value::Integer(0)],
        ];
        let columns = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let result = QueryResult::from_records(columns.clone(), records.clone()).unwrap();

        for (index, record) in records.iter().enumerate() {
            for (column, expected) in columns.iter().zip(record) {
                assert_eq!(result.get(index, column), Ok(Some(expected)));
            }
        }
    }

    #[test]
    fn test_indexed_accessors() {
        let result = users();

        assert_eq!(result.get_string(0, "name"), Ok("ada".to_string()));
        assert_eq!(result.get_string(1, "name"), Ok("null".to_string()));
        assert_eq!(result.get_boolean(0, "active"), Ok(true));
        assert_eq!(result.get_boolean(1, "active"), Ok(false));
        assert_eq!(result.get_number(1, "id"), Ok(Number::Integer(2)));
        assert_eq!(result.get(0, "missing"), Ok(None));
    }

    #[test]
    fn test_indexed_timestamp() {
        let result =
            QueryResult::from_records(vec!["ts".into()], vec![vec![Value::Integer(1000)]])
                .unwrap();

        assert_eq!(
            result.get_timestamp(0, "ts"),
            Ok(Some(Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 1).unwrap()))
        );
    }

    #[test]
    fn test_row_out_of_bounds() {
        let result = users();

        assert_eq!(
            result.get_string(5, "name"),
            Err(CoercionError::RowOutOfBounds { index: 5, rows: 2 })
        );
        assert!(result.row(5).is_none());
    }

    #[test]
    fn test_rejects_record_with_wrong_width() {
        let result = QueryResult::from_records(
            vec!["a".into(), "b".into()],
            vec![
                vec![Value::Integer(1), Value::Integer(2)],
                vec![Value::Integer(3)],
            ],
        );

        assert_eq!(
            result,
            Err(MaterializeError::RecordWidth {
                record: 1,
                expected: 2,
                actual: 1,
            })
        );
    }

    #[test]
    fn test_builder_width() {
        let builder = ResultBuilder::new(vec!["a".into(), "b".into()]);

        assert_eq!(builder.width(), 2);
    }

    #[test]
    fn test_into_iterator_consumes_rows() {
        let rows: Vec<Row> = users().into_iter().collect();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].as_string("active"), "0");
    }

    #[test]
    fn test_serializes_as_sequence_of_maps() {
        let json = serde_json::to_string(&users()).unwrap();

        assert_eq!(
            json,
            r#"[{"id":1,"name":"ada","active":"TRUE"},{"id":2,"name":null,"active":"0"}]"#
        );
    }
}
