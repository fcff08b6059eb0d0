//! Core types for refsearch-core.
//!
//! A [`Record`] is one row of the reference table: an ordered mapping from
//! column name to a JSON scalar. Key order is whatever the store returned,
//! which is why `serde_json` is built with `preserve_order`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;

/// Column that the table and the CSV export move to the front by default.
pub const DEFAULT_LEAD_COLUMN: &str = "Issuer Name";

/// One row of the reference table.
///
/// Values are expected to be scalars (string, number, bool, null). Anything
/// else is kept verbatim and rendered as compact JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

/// The rows currently held by a search session, in store order.
pub type ResultSet = Vec<Record>;

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a column. Returns `self` so fixtures read as a chain.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(column.into(), value.into());
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(column.into(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    /// Column names in storage order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Display text of a column, or `None` when the column is missing or null.
    pub fn value_text(&self, column: &str) -> Option<Cow<'_, str>> {
        self.0.get(column).and_then(scalar_text)
    }

    /// Display text of a column; missing and null both render as `""`.
    pub fn text(&self, column: &str) -> Cow<'_, str> {
        self.value_text(column).unwrap_or(Cow::Borrowed(""))
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Record(iter.into_iter().collect())
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Record(map)
    }
}

fn scalar_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Bool(b) => Some(Cow::Owned(b.to_string())),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        other => Some(Cow::Owned(other.to_string())),
    }
}

/// Column order used by both the results table and the CSV export.
///
/// Starts from the first record's keys in storage order. When `lead` names a
/// column that the first record has, that column is moved to the front.
/// An empty result set has no columns.
pub fn display_columns(records: &[Record], lead: Option<&str>) -> Vec<String> {
    let Some(first) = records.first() else {
        return Vec::new();
    };

    let mut columns: Vec<String> = first.columns().map(str::to_string).collect();
    if let Some(lead) = lead {
        if let Some(pos) = columns.iter().position(|c| c == lead) {
            let col = columns.remove(pos);
            columns.insert(0, col);
        }
    }
    columns
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
