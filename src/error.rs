//! Error types for the retrieval core.

use thiserror::Error as ThisError;

/// Result type alias for Tessera operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the retrieval core.
///
/// Literal/value errors and engine failures both propagate to the immediate
/// caller with their cause preserved; nothing is suppressed or retried at
/// this layer.
#[derive(Debug, ThisError)]
pub enum Error {
    /// A date or dateTime literal that does not match the expected grammar.
    #[error("invalid date value: {0}")]
    InvalidDateValue(String),

    /// A literal lexical form that cannot be encoded for its datatype.
    #[error("invalid literal value: {0}")]
    InvalidLiteralValue(String),

    /// Stored term text that cannot be decoded back into an RDF term.
    #[error("invalid RDF term: {0}")]
    InvalidTerm(String),

    /// The query-language subsystem rejected a constraint expression.
    #[error("query parse error: {0}")]
    QueryParse(String),

    /// Engine-level fault while executing a page query.
    #[error("search error: {0}")]
    Search(String),

    /// Engine-level fault or missing field while reading a stored document.
    #[error("document read error: {0}")]
    DocumentRead(String),
}

impl From<oxrdf::IriParseError> for Error {
    fn from(err: oxrdf::IriParseError) -> Self {
        Error::InvalidTerm(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidDateValue("not-a-date".to_string());
        assert_eq!(err.to_string(), "invalid date value: not-a-date");
    }
}
