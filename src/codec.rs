//! Datatype codec registry for literal object values.
//!
//! Every RDF literal datatype maps to one of a closed set of codecs that
//! know three things: how the value is written into its typed document
//! field, how an exact-match filter for that field is built, and how a
//! textual `field:value` constraint is rendered. Datatypes without a
//! registered codec fall back to plain-text handling; that fallback is not
//! an error.

use std::collections::HashMap;

use log::error;
use oxrdf::vocab::xsd;

use crate::datetime::{self, IsoPartialFormatter};
use crate::error::{Error, Result};
use crate::schema;
use crate::search::{DocumentFields, FieldValue, FilterQuery, QueryContext};

/// Per-datatype strategy for encoding object values and building query
/// constraints.
///
/// The set of encodings is fixed by the index schema, so the dispatch is a
/// closed enum rather than open-ended dynamic dispatch. Codecs are stateless
/// and safe to share across threads once the registry is built.
#[derive(Debug, Clone)]
pub enum FieldCodec {
    /// Boolean literals, stored as a single-character canonical token.
    Boolean,
    /// Numeric literals, stored at double precision.
    Numeric,
    /// Date and dateTime literals, stored as epoch-millisecond instants.
    DateTime(IsoPartialFormatter),
    /// Anything else, stored as plain text.
    CatchAll,
}

impl FieldCodec {
    /// Writes the literal's lexical form into the object field this codec
    /// owns.
    ///
    /// Numeric values are parsed at double precision: arbitrary-precision
    /// decimal input silently truncates to what the field can hold. Date
    /// values are stored as zone-adjusted instants (see
    /// [`datetime::epoch_millis`]).
    pub fn encode(&self, document: &mut DocumentFields, value: &str) -> Result<()> {
        match self {
            FieldCodec::Boolean => {
                let token = boolean_token(value)?;
                document.set(schema::BOOLEAN_OBJECT, FieldValue::Text(token));
            }
            FieldCodec::Numeric => {
                let number = parse_double(value)?;
                document.set(schema::NUMERIC_OBJECT, FieldValue::Double(number));
            }
            FieldCodec::DateTime(_) => {
                let instant = datetime::epoch_millis(value)?;
                document.set(schema::DATE_OBJECT, FieldValue::Instant(instant));
            }
            FieldCodec::CatchAll => {
                document.set(schema::TEXT_OBJECT, FieldValue::Text(value.to_string()));
            }
        }
        Ok(())
    }

    /// Appends an exact-match filter for this codec's field.
    ///
    /// The boolean filter compares only the uppercased first character of
    /// the input, so `"falsetto"` matches stored `F`; the quirk is kept
    /// deliberately. Date constraints are rendered as query-language text
    /// and parsed through `context`; any failure on that path is an invalid
    /// date value naming the offending input.
    pub fn build_filter(
        &self,
        filters: &mut Vec<FilterQuery>,
        value: &str,
        context: &dyn QueryContext,
    ) -> Result<()> {
        match self {
            FieldCodec::Boolean => {
                filters.push(FilterQuery::Term {
                    field: schema::BOOLEAN_OBJECT.to_string(),
                    value: boolean_token(value)?,
                });
            }
            FieldCodec::Numeric => {
                let number = parse_double(value)?;
                filters.push(FilterQuery::DoubleRange {
                    field: schema::NUMERIC_OBJECT.to_string(),
                    low: number,
                    high: number,
                });
            }
            FieldCodec::DateTime(formatter) => {
                let clause = date_clause(formatter, value)?;
                let query = context.parse_query(&clause).map_err(|err| {
                    error!("invalid date value {:?}: {}", value, err);
                    Error::InvalidDateValue(value.to_string())
                })?;
                filters.push(query);
            }
            FieldCodec::CatchAll => {
                filters.push(FilterQuery::Phrase {
                    field: schema::TEXT_OBJECT.to_string(),
                    text: value.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Appends a textual `field:value` clause to a query string under
    /// construction. Date failures surface exactly as in
    /// [`FieldCodec::build_filter`].
    pub fn render_constraint(&self, builder: &mut String, value: &str) -> Result<()> {
        match self {
            FieldCodec::Boolean => {
                builder.push_str(schema::BOOLEAN_OBJECT);
                builder.push(':');
                builder.push_str(value);
            }
            FieldCodec::Numeric => {
                builder.push_str(schema::NUMERIC_OBJECT);
                builder.push(':');
                builder.push_str(value);
            }
            FieldCodec::DateTime(formatter) => {
                builder.push_str(&date_clause(formatter, value)?);
            }
            FieldCodec::CatchAll => {
                builder.push_str(&schema::fq(schema::TEXT_OBJECT, value));
            }
        }
        Ok(())
    }
}

fn boolean_token(value: &str) -> Result<String> {
    value
        .chars()
        .next()
        .map(|c| c.to_ascii_uppercase().to_string())
        .ok_or_else(|| Error::InvalidLiteralValue(value.to_string()))
}

fn parse_double(value: &str) -> Result<f64> {
    value.trim().parse().map_err(|_| Error::InvalidLiteralValue(value.to_string()))
}

fn date_clause(formatter: &IsoPartialFormatter, value: &str) -> Result<String> {
    let canonical = formatter.normalize(value).map_err(|err| {
        error!("invalid date value {:?}", value);
        err
    })?;
    Ok(format!("{}: \"{}\"", schema::DATE_OBJECT, canonical))
}

/// Registry mapping literal datatype IRIs to their codecs.
///
/// Built once at startup, read-only afterwards; lookups never fail because
/// unregistered datatypes resolve to the catch-all codec.
#[derive(Debug, Clone)]
pub struct FieldCodecRegistry {
    codecs: HashMap<&'static str, FieldCodec>,
    catch_all: FieldCodec,
}

impl FieldCodecRegistry {
    /// Builds the registry with the fixed datatype table.
    pub fn new() -> Self {
        let mut codecs = HashMap::new();

        codecs.insert(xsd::BOOLEAN.as_str(), FieldCodec::Boolean);

        codecs.insert(xsd::INT.as_str(), FieldCodec::Numeric);
        codecs.insert(xsd::INTEGER.as_str(), FieldCodec::Numeric);
        codecs.insert(xsd::DECIMAL.as_str(), FieldCodec::Numeric);
        codecs.insert(xsd::DOUBLE.as_str(), FieldCodec::Numeric);
        codecs.insert(xsd::LONG.as_str(), FieldCodec::Numeric);

        codecs.insert(xsd::DATE.as_str(), FieldCodec::DateTime(IsoPartialFormatter::new()));
        codecs.insert(xsd::DATE_TIME.as_str(), FieldCodec::DateTime(IsoPartialFormatter::new()));

        FieldCodecRegistry { codecs, catch_all: FieldCodec::CatchAll }
    }

    /// Returns the codec registered for the given datatype IRI, or the
    /// catch-all codec when the datatype is absent or unregistered.
    pub fn lookup(&self, datatype: Option<&str>) -> &FieldCodec {
        datatype.and_then(|iri| self.codecs.get(iri)).unwrap_or(&self.catch_all)
    }

    /// Returns the plain-text codec used for objects without a literal
    /// datatype (URIs, blank nodes, plain literals).
    pub fn catch_all(&self) -> &FieldCodec {
        &self.catch_all
    }
}

impl Default for FieldCodecRegistry {
    fn default() -> Self {
        FieldCodecRegistry::new()
    }
}
