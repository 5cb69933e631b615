//! Names of the index fields that make up a triple document.
//!
//! Every triple is stored as one document. The subject, predicate and object
//! are kept in NTriples form in the `s`/`p`/`o` fields; in addition the
//! object value lands in exactly one typed object field, picked by the codec
//! registry from the literal datatype.

/// Stored subject, in NTriples form.
pub const SUBJECT: &str = "s";

/// Stored predicate, in NTriples form.
pub const PREDICATE: &str = "p";

/// Stored object, in NTriples form.
pub const OBJECT: &str = "o";

/// Object field for boolean literals (single-character canonical token).
pub const BOOLEAN_OBJECT: &str = "o_b";

/// Object field for numeric literals (double precision).
pub const NUMERIC_OBJECT: &str = "o_n";

/// Object field for date and dateTime literals (epoch-millisecond instant).
pub const DATE_OBJECT: &str = "o_d";

/// Catch-all object field for plain text values.
pub const TEXT_OBJECT: &str = "o_s";

/// The stored fields needed to rebuild a triple from a matched document.
pub const TRIPLE_FIELDS: [&str; 3] = [SUBJECT, PREDICATE, OBJECT];

/// Renders a quoted `field:"value"` clause for a query string.
pub fn fq(field: &str, value: &str) -> String {
    format!("{}:\"{}\"", field, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fq_quotes_the_value() {
        assert_eq!(fq(TEXT_OBJECT, "hello world"), "o_s:\"hello world\"");
    }
}
