//! Rows produced by the reader

use super::Header;
use crate::error::{CsvError, Result};
use indexmap::IndexMap;
use std::str::FromStr;

/// A single normalized field value; `None` is an absent value.
pub type Value = Option<String>;

/// One complete logical record.
///
/// Without a header a row is a positional list of values; with a header the
/// values are keyed by column name in header order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    /// Values by position
    Positional(Vec<Value>),
    /// Values by column name
    Named(IndexMap<String, Value>),
}

impl Row {
    /// Zip header keys with values.
    ///
    /// Fails with [`CsvError::TooManyColumns`] when there are more values
    /// than header names.
    pub fn from_header(header: &Header, values: Vec<Value>) -> Result<Self> {
        if values.len() > header.len() {
            return Err(CsvError::TooManyColumns {
                expected: header.len(),
                found: values.len(),
            });
        }

        let mut map = IndexMap::with_capacity(values.len());
        for (key, value) in header.keys().iter().zip(values) {
            map.insert(key.clone(), value);
        }
        Ok(Row::Named(map))
    }

    /// Check if the row is keyed by column name
    pub fn is_named(&self) -> bool {
        matches!(self, Row::Named(_))
    }

    /// Get a value by column name.
    ///
    /// Returns `None` when the column does not exist or the row is
    /// positional; `Some(None)` when the column exists but holds an absent
    /// value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        match self {
            Row::Named(map) => map.get(name),
            Row::Positional(_) => None,
        }
    }

    /// Get a value by position
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        match self {
            Row::Named(map) => map.get_index(index).map(|(_, v)| v),
            Row::Positional(values) => values.get(index),
        }
    }

    /// Get a present value as a string slice
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|v| v.as_deref())
    }

    /// Convert a named value with [`FromStr`].
    ///
    /// Returns `None` if the column is missing, absent, or does not parse.
    pub fn parse_value<T: FromStr>(&self, name: &str) -> Option<T> {
        self.get_str(name).and_then(|s| s.trim().parse::<T>().ok())
    }

    /// Number of values
    pub fn len(&self) -> usize {
        match self {
            Row::Named(map) => map.len(),
            Row::Positional(values) => values.len(),
        }
    }

    /// Check if the row has no values
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over values in column order
    pub fn values(&self) -> Box<dyn Iterator<Item = &Value> + '_> {
        match self {
            Row::Named(map) => Box::new(map.values()),
            Row::Positional(values) => Box::new(values.iter()),
        }
    }

    /// Borrow the name-to-value mapping of a named row
    pub fn as_map(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Row::Named(map) => Some(map),
            Row::Positional(_) => None,
        }
    }
}
