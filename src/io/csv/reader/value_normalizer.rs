//! Per-field value post-processing

use crate::io::csv::encoding::transliterate;
use crate::io::csv::CsvReaderConfiguration;
use crate::types::Value;
use encoding_rs::Encoding;

/// Raw value that stands for "no value", distinct from an empty string.
pub const NULL_SENTINEL: &str = "\x00";

/// Remove one matching pair of enclosure characters around `value`.
pub fn strip_enclosure(value: &str, enclosure: char) -> &str {
    value
        .strip_prefix(enclosure)
        .and_then(|rest| rest.strip_suffix(enclosure))
        .unwrap_or(value)
}

/// Turns raw field text into the value handed to the caller.
#[derive(Debug, Clone)]
pub struct ValueNormalizer {
    target: Option<&'static Encoding>,
    empty_default: Option<Value>,
}

impl ValueNormalizer {
    /// Create a normalizer for the configuration's value policy
    pub fn new(config: &CsvReaderConfiguration) -> Self {
        let target = if config.source_encoding() != config.target_encoding() {
            Some(config.target_encoding())
        } else {
            None
        };
        let empty_default = if config.default_empty_strings() {
            Some(config.empty_string_default().clone())
        } else {
            None
        };
        Self {
            target,
            empty_default,
        }
    }

    /// Normalize one raw field.
    ///
    /// The null sentinel maps to `None`.  Otherwise the value is
    /// transliterated into the target encoding when it differs from the
    /// source, and an empty result is replaced by the configured default.
    pub fn normalize(&self, raw: String) -> Value {
        if raw == NULL_SENTINEL {
            return None;
        }

        let value = self.transcode(raw);

        match &self.empty_default {
            Some(default) if value.is_empty() => default.clone(),
            _ => Some(value),
        }
    }

    /// Transliterate a column name; names are never defaulted or nulled.
    pub fn normalize_name(&self, raw: String) -> String {
        self.transcode(raw)
    }

    fn transcode(&self, raw: String) -> String {
        match self.target {
            Some(target) => transliterate(&raw, target).into_owned(),
            None => raw,
        }
    }
}
