//! Column header of a CSV source

use std::fmt;

/// Ordered column names read from the first row of a source.
///
/// The original spelling is kept for display; [`Header::keys`] holds the
/// names used to build row mappings, which are case-folded when the reader
/// is configured with `lower_case_header`.  Names need not be unique; a
/// duplicate name shadows the earlier column in the produced mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    names: Vec<String>,
    keys: Vec<String>,
}

impl Header {
    /// Create a header from raw column names
    pub fn new(names: Vec<String>, lower_case: bool) -> Self {
        let keys = if lower_case {
            names.iter().map(|name| name.to_lowercase()).collect()
        } else {
            names.clone()
        };
        Self { names, keys }
    }

    /// Column names as they appear in the source
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Column names used as row keys
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if the header has no columns
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Position of the first column with the given key
    pub fn position(&self, key: &str) -> Option<usize> {
        self.keys.iter().position(|k| k == key)
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.names.join(", "))
    }
}
