//! Translation of triple patterns into paged search queries.
//!
//! A triple pattern constrains any subset of subject, predicate and object.
//! Bound subjects and predicates become exact term filters over their
//! NTriples text; a bound object dispatches through the codec registry on
//! its literal datatype, so the filter lands on the same typed field the
//! value was encoded into.

use oxrdf::vocab::xsd;
use oxrdf::{NamedNode, Subject, Term};

use crate::codec::FieldCodecRegistry;
use crate::error::Result;
use crate::schema;
use crate::search::{FilterQuery, QueryCommand, QueryContext, SortSpec};

/// A subject/predicate/object pattern; `None` leaves a position unbound.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriplePattern {
    /// Subject constraint.
    pub subject: Option<Subject>,
    /// Predicate constraint.
    pub predicate: Option<NamedNode>,
    /// Object constraint.
    pub object: Option<Term>,
}

impl TriplePattern {
    /// Creates a pattern with the given bindings.
    pub fn new(
        subject: Option<Subject>,
        predicate: Option<NamedNode>,
        object: Option<Term>,
    ) -> Self {
        TriplePattern { subject, predicate, object }
    }
}

/// Builds the filter set selecting the documents that match a pattern.
pub fn pattern_filters(
    pattern: &TriplePattern,
    registry: &FieldCodecRegistry,
    context: &dyn QueryContext,
) -> Result<Vec<FilterQuery>> {
    let mut filters = Vec::new();

    if let Some(subject) = &pattern.subject {
        filters.push(FilterQuery::Term {
            field: schema::SUBJECT.to_string(),
            value: subject.to_string(),
        });
    }

    if let Some(predicate) = &pattern.predicate {
        filters.push(FilterQuery::Term {
            field: schema::PREDICATE.to_string(),
            value: predicate.to_string(),
        });
    }

    if let Some(object) = &pattern.object {
        match object {
            Term::Literal(literal) => {
                if literal.language().is_some() || literal.datatype() == xsd::STRING {
                    registry.catch_all().build_filter(&mut filters, literal.value(), context)?;
                } else {
                    let codec = registry.lookup(Some(literal.datatype().as_str()));
                    codec.build_filter(&mut filters, literal.value(), context)?;
                }
            }
            other => {
                // URIs and blank nodes match on their NTriples text.
                registry.catch_all().build_filter(&mut filters, &other.to_string(), context)?;
            }
        }
    }

    Ok(filters)
}

/// Translates a pattern straight into a paged query command.
pub fn query_command<C>(
    pattern: &TriplePattern,
    registry: &FieldCodecRegistry,
    context: &dyn QueryContext,
    sort: SortSpec,
    page_len: usize,
) -> Result<QueryCommand<C>> {
    Ok(QueryCommand::new(pattern_filters(pattern, registry, context)?, sort, page_len))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use oxrdf::Literal;

    struct SplitContext;

    impl QueryContext for SplitContext {
        fn parse_query(&self, expression: &str) -> Result<FilterQuery> {
            let (field, value) = expression
                .split_once(':')
                .ok_or_else(|| Error::QueryParse(expression.to_string()))?;
            Ok(FilterQuery::Phrase {
                field: field.trim().to_string(),
                text: value.trim().trim_matches('"').to_string(),
            })
        }
    }

    fn registry() -> FieldCodecRegistry {
        FieldCodecRegistry::new()
    }

    #[test]
    fn test_bound_subject_and_predicate_become_term_filters() {
        let pattern = TriplePattern::new(
            Some(NamedNode::new("http://example.org/alice").unwrap().into()),
            Some(NamedNode::new("http://example.org/knows").unwrap()),
            None,
        );
        let filters = pattern_filters(&pattern, &registry(), &SplitContext).unwrap();
        assert_eq!(
            filters,
            vec![
                FilterQuery::Term {
                    field: "s".to_string(),
                    value: "<http://example.org/alice>".to_string(),
                },
                FilterQuery::Term {
                    field: "p".to_string(),
                    value: "<http://example.org/knows>".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_unbound_pattern_builds_no_filters() {
        let filters = pattern_filters(&TriplePattern::default(), &registry(), &SplitContext);
        assert!(filters.unwrap().is_empty());
    }

    #[test]
    fn test_typed_numeric_object_uses_the_numeric_field() {
        let pattern = TriplePattern::new(
            None,
            None,
            Some(Literal::new_typed_literal("42", xsd::INTEGER).into()),
        );
        let filters = pattern_filters(&pattern, &registry(), &SplitContext).unwrap();
        assert_eq!(
            filters,
            vec![FilterQuery::DoubleRange { field: "o_n".to_string(), low: 42.0, high: 42.0 }]
        );
    }

    #[test]
    fn test_plain_literal_object_uses_the_text_field() {
        let pattern =
            TriplePattern::new(None, None, Some(Literal::new_simple_literal("hello").into()));
        let filters = pattern_filters(&pattern, &registry(), &SplitContext).unwrap();
        assert_eq!(
            filters,
            vec![FilterQuery::Phrase { field: "o_s".to_string(), text: "hello".to_string() }]
        );
    }

    #[test]
    fn test_uri_object_matches_its_ntriples_text() {
        let pattern = TriplePattern::new(
            None,
            None,
            Some(NamedNode::new("http://example.org/bob").unwrap().into()),
        );
        let filters = pattern_filters(&pattern, &registry(), &SplitContext).unwrap();
        assert_eq!(
            filters,
            vec![FilterQuery::Phrase {
                field: "o_s".to_string(),
                text: "<http://example.org/bob>".to_string(),
            }]
        );
    }

    #[test]
    fn test_date_object_goes_through_the_query_parser() {
        let pattern = TriplePattern::new(
            None,
            None,
            Some(Literal::new_typed_literal("2020-01-01", xsd::DATE).into()),
        );
        let filters = pattern_filters(&pattern, &registry(), &SplitContext).unwrap();
        assert_eq!(
            filters,
            vec![FilterQuery::Phrase {
                field: "o_d".to_string(),
                text: "2020-01-01T00:00:00Z".to_string(),
            }]
        );
    }

    #[test]
    fn test_malformed_date_object_is_rejected() {
        let pattern = TriplePattern::new(
            None,
            None,
            Some(Literal::new_typed_literal("not-a-date", xsd::DATE).into()),
        );
        let err = pattern_filters(&pattern, &registry(), &SplitContext).unwrap_err();
        assert!(matches!(err, Error::InvalidDateValue(_)));
    }
}
