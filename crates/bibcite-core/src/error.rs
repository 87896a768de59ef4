//! Error and warning types shared across the engine
//!
//! Only [`ConfigurationError`] is fatal, and only for the call that hit it.
//! Everything else is collected next to the successful output.

use bibcite_bibtex::BibTeXParseError;
use std::fmt;

/// Unknown style id or unusable configuration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("unknown citation style `{0}`")]
    UnknownStyle(String),
    #[error("configuration value out of range: {0}")]
    OutOfRange(String),
    #[error("could not read configuration: {0}")]
    Unreadable(String),
}

/// One import entry that could not be turned into a reference
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("entry {index}{}: {reason}", describe_location(.line, .key))]
pub struct ParseError {
    /// Zero-based position of the entry in the input
    pub index: usize,
    pub line: Option<u32>,
    /// Citation key or RIS `ID`, when one could be read
    pub key: Option<String>,
    pub reason: String,
}

fn describe_location(line: &Option<u32>, key: &Option<String>) -> String {
    match (line, key) {
        (Some(line), Some(key)) => format!(" (`{}`, line {})", key, line),
        (Some(line), None) => format!(" (line {})", line),
        (None, Some(key)) => format!(" (`{}`)", key),
        (None, None) => String::new(),
    }
}

impl From<BibTeXParseError> for ParseError {
    fn from(error: BibTeXParseError) -> Self {
        Self {
            index: error.index,
            line: Some(error.line),
            key: error.cite_key,
            reason: error.reason.to_string(),
        }
    }
}

/// A field that has no slot in the target format and was dropped
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("reference `{reference_id}`: field `{field}` dropped: {reason}")]
pub struct SerializationError {
    pub reference_id: String,
    pub field: String,
    pub reason: String,
}

/// Non-fatal rendering problem the caller should surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    pub reference_id: String,
    pub field: String,
    pub message: String,
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "reference `{}`: {} ({})", self.reference_id, self.message, self.field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bibcite_bibtex::ParseErrorReason;

    #[test]
    fn test_parse_error_from_bibtex() {
        let error: ParseError = BibTeXParseError {
            index: 3,
            line: 12,
            cite_key: Some("smith2020".into()),
            reason: ParseErrorReason::UnbalancedBraces,
        }
        .into();
        assert_eq!(error.index, 3);
        assert_eq!(
            error.to_string(),
            "entry 3 (`smith2020`, line 12): unbalanced braces"
        );
    }

    #[test]
    fn test_parse_error_without_location() {
        let error = ParseError {
            index: 0,
            line: None,
            key: None,
            reason: "missing ER tag".into(),
        };
        assert_eq!(error.to_string(), "entry 0: missing ER tag");
    }
}
