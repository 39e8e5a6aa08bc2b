//! CSV reader configuration

use super::encoding::{resolve_encoding, resolve_source_encoding};
use crate::error::{CsvError, Result};
use crate::types::Value;
use encoding_rs::{Encoding, UTF_8};

/// Default field separator
pub const DEFAULT_DELIMITER: char = ',';
/// Default quote character
pub const DEFAULT_ENCLOSURE: char = '"';
/// Default escape character
pub const DEFAULT_ESCAPE: char = '\\';

/// Dialect and value policy for a [`CsvReader`](super::CsvReader).
///
/// The configuration is fixed for the duration of a read pass; replacing it
/// on the reader starts the source over.
#[derive(Debug, Clone)]
pub struct CsvReaderConfiguration {
    delimiter: char,
    enclosure: char,
    escape: char,
    strict: bool,
    has_header: bool,
    lower_case_header: bool,
    source_encoding: &'static Encoding,
    target_encoding: &'static Encoding,
    default_empty_strings: bool,
    empty_string_default: Value,
}

impl Default for CsvReaderConfiguration {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            enclosure: DEFAULT_ENCLOSURE,
            escape: DEFAULT_ESCAPE,
            strict: false,
            has_header: true,
            lower_case_header: true,
            source_encoding: UTF_8,
            target_encoding: UTF_8,
            default_empty_strings: false,
            empty_string_default: None,
        }
    }
}

/// Parse a single dialect symbol.  `None` is rejected, an empty string
/// selects the default.
fn single_char(value: Option<&str>, default: char, what: &str) -> Result<char> {
    let value = value.ok_or_else(|| CsvError::Configuration(format!("No {} is provided", what)))?;

    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (None, _) => Ok(default),
        (Some(c), None) => Ok(c),
        _ => Err(CsvError::Configuration(format!(
            "{} must be a single character, got '{}'",
            what, value
        ))),
    }
}

/// Delimiter, enclosure and escape must be pairwise distinct.
fn check_distinct(delimiter: char, enclosure: char, escape: char) -> Result<()> {
    let clash = if delimiter == enclosure {
        Some(("delimiter", "enclosure", delimiter))
    } else if escape == enclosure {
        Some(("escape", "enclosure", escape))
    } else if escape == delimiter {
        Some(("escape", "delimiter", escape))
    } else {
        None
    };

    match clash {
        Some((a, b, c)) => Err(CsvError::Configuration(format!(
            "{} '{}' must differ from the {}",
            a, c, b
        ))),
        None => Ok(()),
    }
}

impl CsvReaderConfiguration {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Field separator
    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Quote character
    pub fn enclosure(&self) -> char {
        self.enclosure
    }

    /// Character that suppresses the quoting meaning of a following enclosure
    pub fn escape(&self) -> char {
        self.escape
    }

    /// Whether lenient recoveries are promoted to errors
    pub fn strict(&self) -> bool {
        self.strict
    }

    /// Whether the first row holds column names
    pub fn has_header(&self) -> bool {
        self.has_header
    }

    /// Whether column names are case-folded
    pub fn lower_case_header(&self) -> bool {
        self.lower_case_header
    }

    /// Encoding the source bytes are decoded with
    pub fn source_encoding(&self) -> &'static Encoding {
        self.source_encoding
    }

    /// Encoding whose repertoire values are transliterated into
    pub fn target_encoding(&self) -> &'static Encoding {
        self.target_encoding
    }

    /// Whether empty values are replaced by [`Self::empty_string_default`]
    pub fn default_empty_strings(&self) -> bool {
        self.default_empty_strings
    }

    /// Replacement for empty values
    pub fn empty_string_default(&self) -> &Value {
        &self.empty_string_default
    }

    /// Set the field separator.
    ///
    /// `None` is a configuration error; an empty string restores `,`.  The
    /// separator must differ from the enclosure and the escape character,
    /// and this holds for a restored default too: with the enclosure set to
    /// `,`, `set_delimiter(Some(""))` is an error.
    pub fn set_delimiter(&mut self, delimiter: Option<&str>) -> Result<()> {
        let delimiter = single_char(delimiter, DEFAULT_DELIMITER, "delimiter")?;
        check_distinct(delimiter, self.enclosure, self.escape)?;
        self.delimiter = delimiter;
        Ok(())
    }

    /// Set the quote character.
    ///
    /// `None` is a configuration error; an empty string restores `"`.  Like
    /// the delimiter, a restored default that collides with another symbol
    /// is rejected.
    pub fn set_enclosure(&mut self, enclosure: Option<&str>) -> Result<()> {
        let enclosure = single_char(enclosure, DEFAULT_ENCLOSURE, "enclosure")?;
        check_distinct(self.delimiter, enclosure, self.escape)?;
        self.enclosure = enclosure;
        Ok(())
    }

    /// Set the escape character; an empty string restores `\`.
    pub fn set_escape(&mut self, escape: &str) -> Result<()> {
        let escape = single_char(Some(escape), DEFAULT_ESCAPE, "escape")?;
        check_distinct(self.delimiter, self.enclosure, escape)?;
        self.escape = escape;
        Ok(())
    }

    pub fn set_strict(&mut self, strict: bool) {
        self.strict = strict;
    }

    pub fn set_has_header(&mut self, has_header: bool) {
        self.has_header = has_header;
    }

    pub fn set_lower_case_header(&mut self, lower_case_header: bool) {
        self.lower_case_header = lower_case_header;
    }

    /// Set the source encoding by label (e.g. `"ISO-8859-1"`)
    pub fn set_source_encoding(&mut self, label: &str) -> Result<()> {
        self.source_encoding = resolve_source_encoding(label)?;
        Ok(())
    }

    /// Set the target encoding by label
    pub fn set_target_encoding(&mut self, label: &str) -> Result<()> {
        self.target_encoding = resolve_encoding(label)?;
        Ok(())
    }

    pub fn set_default_empty_strings(&mut self, default_empty_strings: bool) {
        self.default_empty_strings = default_empty_strings;
    }

    pub fn set_empty_string_default(&mut self, value: Value) {
        self.empty_string_default = value;
    }

    /// Builder form of [`Self::set_delimiter`]
    pub fn with_delimiter(mut self, delimiter: &str) -> Result<Self> {
        self.set_delimiter(Some(delimiter))?;
        Ok(self)
    }

    /// Builder form of [`Self::set_enclosure`]
    pub fn with_enclosure(mut self, enclosure: &str) -> Result<Self> {
        self.set_enclosure(Some(enclosure))?;
        Ok(self)
    }

    /// Builder form of [`Self::set_escape`]
    pub fn with_escape(mut self, escape: &str) -> Result<Self> {
        self.set_escape(escape)?;
        Ok(self)
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    pub fn with_lower_case_header(mut self, lower_case_header: bool) -> Self {
        self.lower_case_header = lower_case_header;
        self
    }

    /// Builder form of [`Self::set_source_encoding`]
    pub fn with_source_encoding(mut self, label: &str) -> Result<Self> {
        self.set_source_encoding(label)?;
        Ok(self)
    }

    /// Builder form of [`Self::set_target_encoding`]
    pub fn with_target_encoding(mut self, label: &str) -> Result<Self> {
        self.set_target_encoding(label)?;
        Ok(self)
    }

    /// Replace empty values with `value`
    pub fn with_empty_string_default(mut self, value: Value) -> Self {
        self.default_empty_strings = true;
        self.empty_string_default = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CsvReaderConfiguration::default();
        assert_eq!(config.delimiter(), ',');
        assert_eq!(config.enclosure(), '"');
        assert_eq!(config.escape(), '\\');
        assert!(!config.strict());
        assert!(config.has_header());
        assert!(config.lower_case_header());
        assert_eq!(config.source_encoding(), UTF_8);
        assert!(!config.default_empty_strings());
    }

    #[test]
    fn test_empty_symbol_restores_default() {
        let mut config = CsvReaderConfiguration::new();
        config.set_delimiter(Some(";")).unwrap();
        config.set_enclosure(Some("|")).unwrap();
        assert_eq!(config.delimiter(), ';');
        assert_eq!(config.enclosure(), '|');

        config.set_delimiter(Some("")).unwrap();
        config.set_enclosure(Some("")).unwrap();
        assert_eq!(config.delimiter(), ',');
        assert_eq!(config.enclosure(), '"');
    }

    #[test]
    fn test_missing_symbol_is_error() {
        let mut config = CsvReaderConfiguration::new();
        assert!(matches!(config.set_delimiter(None), Err(CsvError::Configuration(_))));
        assert!(matches!(config.set_enclosure(None), Err(CsvError::Configuration(_))));
        assert_eq!(config.delimiter(), ',');
    }

    #[test]
    fn test_multi_char_symbol_is_error() {
        let mut config = CsvReaderConfiguration::new();
        assert!(config.set_delimiter(Some(";;")).is_err());
        assert!(config.set_escape("ab").is_err());
    }

    #[test]
    fn test_delimiter_and_enclosure_must_differ() {
        let mut config = CsvReaderConfiguration::new();
        assert!(config.set_delimiter(Some("\"")).is_err());
        assert!(config.set_enclosure(Some(",")).is_err());
    }

    #[test]
    fn test_escape_must_differ_from_other_symbols() {
        let mut config = CsvReaderConfiguration::new();
        assert!(matches!(config.set_escape("\""), Err(CsvError::Configuration(_))));
        assert!(matches!(config.set_escape(","), Err(CsvError::Configuration(_))));
        assert_eq!(config.escape(), '\\');

        assert!(config.set_delimiter(Some("\\")).is_err());
        assert!(config.set_enclosure(Some("\\")).is_err());

        config.set_escape("~").unwrap();
        assert_eq!(config.escape(), '~');
        assert!(CsvReaderConfiguration::new().with_escape("\"").is_err());
    }

    #[test]
    fn test_restored_default_that_collides_is_error() {
        let mut config = CsvReaderConfiguration::new();
        config.set_delimiter(Some(";")).unwrap();
        config.set_enclosure(Some(",")).unwrap();

        let err = config.set_delimiter(Some("")).unwrap_err();
        assert!(matches!(err, CsvError::Configuration(_)));
        assert_eq!(config.delimiter(), ';');

        config.set_enclosure(Some("")).unwrap();
        config.set_delimiter(Some("")).unwrap();
        assert_eq!(config.delimiter(), ',');
        assert_eq!(config.enclosure(), '"');
    }

    #[test]
    fn test_unknown_encoding_is_error() {
        let result = CsvReaderConfiguration::new().with_source_encoding("no-such-charset");
        assert!(matches!(result, Err(CsvError::Encoding(_))));
    }

    #[test]
    fn test_with_empty_string_default_enables_policy() {
        let config = CsvReaderConfiguration::new().with_empty_string_default(Some("n/a".into()));
        assert!(config.default_empty_strings());
        assert_eq!(config.empty_string_default(), &Some("n/a".to_string()));
    }
}
