//! Typed values exchanged with the store.

use cardstack_core::{CardstackError, CardstackResult};
use std::collections::{BTreeMap, HashMap};

/// A value that can be bound to a statement placeholder or read from a column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SqlValue {
    Null,
    Int(i64),
    Text(String),
    Bytes(Vec<u8>),
}

impl SqlValue {
    /// Returns true for [`SqlValue::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Int(_) => "integer",
            Self::Text(_) => "text",
            Self::Bytes(_) => "bytes",
        }
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Placeholder name to value mapping for one statement execution.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BindParameters {
    values: BTreeMap<String, SqlValue>,
}

impl BindParameters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value, builder style.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Adds or replaces a value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<SqlValue>) {
        self.values.insert(name.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        self.values.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates placeholders in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// One result row, keyed by column name.
///
/// The typed getters report missing columns, unexpected nulls and type
/// mismatches as [`CardstackError::RowMapping`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Row {
    columns: HashMap<String, SqlValue>,
}

impl Row {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a column value, builder style.
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.insert(column, value);
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<SqlValue>) {
        self.columns.insert(column.into(), value.into());
    }

    #[must_use]
    pub fn contains(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    #[must_use]
    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.columns.get(column)
    }

    fn value(&self, column: &str) -> CardstackResult<&SqlValue> {
        self.columns
            .get(column)
            .ok_or_else(|| CardstackError::row_mapping(column, "column not present in row"))
    }

    pub fn get_i64(&self, column: &str) -> CardstackResult<i64> {
        self.get_opt_i64(column)?
            .ok_or_else(|| CardstackError::row_mapping(column, "unexpected null"))
    }

    pub fn get_opt_i64(&self, column: &str) -> CardstackResult<Option<i64>> {
        match self.value(column)? {
            SqlValue::Null => Ok(None),
            SqlValue::Int(v) => Ok(Some(*v)),
            other => Err(mismatch(column, "integer", other)),
        }
    }

    pub fn get_string(&self, column: &str) -> CardstackResult<String> {
        self.get_opt_string(column)?
            .ok_or_else(|| CardstackError::row_mapping(column, "unexpected null"))
    }

    /// Reads a text column. Binary values are accepted when they are valid UTF-8.
    pub fn get_opt_string(&self, column: &str) -> CardstackResult<Option<String>> {
        match self.value(column)? {
            SqlValue::Null => Ok(None),
            SqlValue::Text(v) => Ok(Some(v.clone())),
            SqlValue::Bytes(v) => String::from_utf8(v.clone())
                .map(Some)
                .map_err(|e| CardstackError::row_mapping(column, e.to_string())),
            other @ SqlValue::Int(_) => Err(mismatch(column, "text", other)),
        }
    }

    pub fn get_bytes(&self, column: &str) -> CardstackResult<Vec<u8>> {
        match self.value(column)? {
            SqlValue::Bytes(v) => Ok(v.clone()),
            SqlValue::Text(v) => Ok(v.clone().into_bytes()),
            SqlValue::Null => Err(CardstackError::row_mapping(column, "unexpected null")),
            other @ SqlValue::Int(_) => Err(mismatch(column, "bytes", other)),
        }
    }
}

fn mismatch(column: &str, expected: &str, found: &SqlValue) -> CardstackError {
    CardstackError::row_mapping(
        column,
        format!("expected {} but found {}", expected, found.kind()),
    )
}
