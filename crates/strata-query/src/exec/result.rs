//! Query result types.
//!
//! Finished rows are handed to a [`ResultSink`]. The sink is owned by
//! whoever drives the operator tree and is lent to the tree one pull at a
//! time; operators never hold on to it.

use std::sync::Arc;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use strata_core::Value;

use super::context::ExecutionConfig;
use super::record::RecordLayout;

/// One finished result row: a value per return column, in column order.
///
/// The width is fixed when the row is built.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct OutputRow {
    values: Box<[Value]>,
}

impl OutputRow {
    /// Creates a row from its values.
    #[must_use]
    pub fn new(values: Vec<Value>) -> Self {
        Self { values: values.into_boxed_slice() }
    }

    /// Returns the values.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Gets a value by column index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the row has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Consumes the row and returns the values.
    #[must_use]
    pub fn into_values(self) -> Vec<Value> {
        self.values.into_vec()
    }
}

impl From<Vec<Value>> for OutputRow {
    fn from(values: Vec<Value>) -> Self {
        Self::new(values)
    }
}

/// Why a sink refused a row.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SinkError {
    /// The sink already holds as many rows as it accepts.
    #[error("result set is full ({capacity} rows)")]
    Full {
        /// The capacity that was reached.
        capacity: usize,
    },
    /// The sink failed for another reason (allocation, shape mismatch, ...).
    #[error("{0}")]
    Internal(String),
}

/// Destination for finished result rows.
///
/// # Contract
///
/// - `is_full` has no side effects.
/// - Once `is_full` returns true it keeps returning true until the owner
///   resets the sink for a new query; appending never un-fills it.
/// - `append` on a full sink returns [`SinkError::Full`] and leaves the
///   sink untouched.
pub trait ResultSink {
    /// Returns true if no further rows will be accepted.
    fn is_full(&self) -> bool;

    /// Appends a row, taking ownership of it on success.
    fn append(&mut self, row: OutputRow) -> Result<(), SinkError>;
}

/// A set of result rows, optionally bounded by a row limit.
#[derive(Debug, Clone)]
pub struct ResultSet {
    /// The result columns.
    columns: Arc<RecordLayout>,
    /// The rows appended so far.
    rows: Vec<OutputRow>,
    /// Maximum number of rows accepted; `None` for unbounded.
    limit: Option<usize>,
}

impl ResultSet {
    /// Creates an unbounded result set.
    #[must_use]
    pub fn new(columns: Arc<RecordLayout>) -> Self {
        Self { columns, rows: Vec::new(), limit: None }
    }

    /// Creates a result set that accepts at most `limit` rows.
    ///
    /// A limit of zero yields a set that is full from the start.
    #[must_use]
    pub fn with_limit(columns: Arc<RecordLayout>, limit: usize) -> Self {
        Self { columns, rows: Vec::new(), limit: Some(limit) }
    }

    /// Creates a result set honouring the configured row limit.
    #[must_use]
    pub fn from_config(columns: Arc<RecordLayout>, config: &ExecutionConfig) -> Self {
        match config.max_result_rows {
            0 => Self::new(columns),
            limit => Self::with_limit(columns, limit),
        }
    }

    /// Returns the result columns.
    #[must_use]
    pub fn columns(&self) -> Vec<&str> {
        self.columns.names()
    }

    /// Returns the shared column layout.
    #[must_use]
    pub fn layout(&self) -> Arc<RecordLayout> {
        Arc::clone(&self.columns)
    }

    /// Returns the row limit, if any.
    #[must_use]
    pub const fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Returns the rows.
    #[must_use]
    pub fn rows(&self) -> &[OutputRow] {
        &self.rows
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Gets a row by index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&OutputRow> {
        self.rows.get(index)
    }

    /// Returns an iterator over the rows.
    pub fn iter(&self) -> impl Iterator<Item = &OutputRow> {
        self.rows.iter()
    }

    /// Discards all rows so the set can serve a fresh run of the query.
    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Consumes the result set and returns the rows.
    #[must_use]
    pub fn into_rows(self) -> Vec<OutputRow> {
        self.rows
    }

    /// Converts to a vector of value arrays.
    #[must_use]
    pub fn to_values(&self) -> Vec<Vec<Value>> {
        self.rows.iter().map(|r| r.values().to_vec()).collect()
    }
}

impl ResultSink for ResultSet {
    fn is_full(&self) -> bool {
        self.limit.is_some_and(|limit| self.rows.len() >= limit)
    }

    fn append(&mut self, row: OutputRow) -> Result<(), SinkError> {
        if let Some(capacity) = self.limit {
            if self.rows.len() >= capacity {
                return Err(SinkError::Full { capacity });
            }
        }
        if row.len() != self.columns.len() {
            return Err(SinkError::Internal(format!(
                "row has {} values but the result set has {} columns",
                row.len(),
                self.columns.len()
            )));
        }
        self.rows
            .try_reserve(1)
            .map_err(|e| SinkError::Internal(format!("cannot grow result set: {e}")))?;
        self.rows.push(row);
        Ok(())
    }
}

impl Serialize for ResultSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ResultSet", 2)?;
        state.serialize_field("columns", &self.columns.names())?;
        state.serialize_field("rows", &self.rows)?;
        state.end()
    }
}

impl IntoIterator for ResultSet {
    type Item = OutputRow;
    type IntoIter = std::vec::IntoIter<OutputRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a OutputRow;
    type IntoIter = std::slice::Iter<'a, OutputRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Arc<RecordLayout> {
        Arc::new(RecordLayout::new(["id", "name"]))
    }

    fn row(id: i64, name: &str) -> OutputRow {
        OutputRow::new(vec![Value::Int(id), Value::from(name)])
    }

    #[test]
    fn unbounded_set_never_fills() {
        let mut rs = ResultSet::new(columns());
        for i in 0..100 {
            assert!(!rs.is_full());
            rs.append(row(i, "x")).unwrap();
        }
        assert_eq!(rs.len(), 100);
        assert_eq!(rs.limit(), None);
    }

    #[test]
    fn bounded_set_rejects_after_capacity() {
        let mut rs = ResultSet::with_limit(columns(), 2);
        rs.append(row(1, "Alice")).unwrap();
        assert!(!rs.is_full());
        rs.append(row(2, "Bob")).unwrap();
        assert!(rs.is_full());

        let err = rs.append(row(3, "Carol")).unwrap_err();
        assert_eq!(err, SinkError::Full { capacity: 2 });
        assert_eq!(rs.len(), 2);
        assert!(rs.is_full());
        assert_eq!(rs.get(1).and_then(|r| r.get(1)), Some(&Value::from("Bob")));
    }

    #[test]
    fn zero_limit_is_full_immediately() {
        let mut rs = ResultSet::with_limit(columns(), 0);
        assert!(rs.is_full());
        assert!(matches!(rs.append(row(1, "a")), Err(SinkError::Full { capacity: 0 })));
        assert!(rs.is_empty());
    }

    #[test]
    fn width_mismatch_is_internal_error() {
        let mut rs = ResultSet::new(columns());
        let err = rs.append(OutputRow::new(vec![Value::Int(1)])).unwrap_err();
        assert!(matches!(err, SinkError::Internal(_)));
        assert!(rs.is_empty());
    }

    #[test]
    fn clear_makes_room_again() {
        let mut rs = ResultSet::with_limit(columns(), 1);
        rs.append(row(1, "a")).unwrap();
        assert!(rs.is_full());
        rs.clear();
        assert!(!rs.is_full());
        rs.append(row(2, "b")).unwrap();
        assert_eq!(rs.to_values(), vec![vec![Value::Int(2), Value::from("b")]]);
    }

    #[test]
    fn from_config_maps_zero_to_unbounded() {
        let unbounded = ResultSet::from_config(columns(), &ExecutionConfig::new());
        assert_eq!(unbounded.limit(), None);

        let bounded =
            ResultSet::from_config(columns(), &ExecutionConfig::new().with_max_result_rows(5));
        assert_eq!(bounded.limit(), Some(5));
    }

    #[test]
    fn serializes_columns_and_rows() {
        let mut rs = ResultSet::new(columns());
        rs.append(row(1, "Al")).unwrap();

        let json = serde_json::to_value(&rs).unwrap();
        assert_eq!(json["columns"], serde_json::json!(["id", "name"]));
        assert_eq!(json["rows"][0][0], serde_json::json!({"Int": 1}));
        assert_eq!(json["rows"][0][1], serde_json::json!({"String": "Al"}));
    }

    #[test]
    fn iteration() {
        let mut rs = ResultSet::new(columns());
        rs.append(row(1, "a")).unwrap();
        rs.append(row(2, "b")).unwrap();

        let sum: i64 = rs.iter().filter_map(|r| r.get(0).and_then(Value::as_int)).sum();
        assert_eq!(sum, 3);
        assert_eq!(rs.columns(), vec!["id", "name"]);

        let rows: Vec<OutputRow> = rs.into_iter().collect();
        assert_eq!(rows.len(), 2);
    }
}
