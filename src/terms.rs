//! Decoding of stored NTriples-style text back into RDF terms.
//!
//! The index keeps subjects, predicates and objects in their NTriples
//! representation (`<iri>`, `_:id`, `"value"`, `"value"@lang`,
//! `"value"^^<datatype>`). This module turns that text back into [`oxrdf`]
//! terms by dispatching on the leading characters, the same way the store
//! wrote it. It is not a full NTriples document parser.

use oxrdf::{BlankNode, Literal, NamedNode, Subject, Term};

use crate::error::{Error, Result};

/// A triple drawn from the index.
///
/// [`Triple::Wildcard`] stands in when the consumer declared that full
/// materialization is unnecessary (for instance when only counting matches);
/// no stored fields are read in that case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Triple {
    /// A fully reconstructed subject/predicate/object triple.
    Spo {
        /// Subject: a URI or a blank node.
        subject: Subject,
        /// Predicate: always a URI.
        predicate: NamedNode,
        /// Object: any RDF term.
        object: Term,
    },
    /// Placeholder yielded when triple construction was skipped.
    Wildcard,
}

impl Triple {
    /// Returns the subject, unless this is the wildcard placeholder.
    pub fn subject(&self) -> Option<&Subject> {
        match self {
            Triple::Spo { subject, .. } => Some(subject),
            Triple::Wildcard => None,
        }
    }

    /// Returns the predicate, unless this is the wildcard placeholder.
    pub fn predicate(&self) -> Option<&NamedNode> {
        match self {
            Triple::Spo { predicate, .. } => Some(predicate),
            Triple::Wildcard => None,
        }
    }

    /// Returns the object, unless this is the wildcard placeholder.
    pub fn object(&self) -> Option<&Term> {
        match self {
            Triple::Spo { object, .. } => Some(object),
            Triple::Wildcard => None,
        }
    }

    /// True for the placeholder yielded when construction was skipped.
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Triple::Wildcard)
    }
}

/// Decodes stored subject text into a URI or blank node.
pub fn as_uri_or_blank_node(text: &str) -> Result<Subject> {
    if let Some(id) = text.strip_prefix("_:") {
        Ok(Subject::BlankNode(BlankNode::new_unchecked(id)))
    } else {
        as_uri(text).map(Subject::NamedNode)
    }
}

/// Decodes stored predicate text into a URI.
pub fn as_uri(text: &str) -> Result<NamedNode> {
    if text.starts_with('<') && text.ends_with('>') {
        Ok(NamedNode::new(&text[1..text.len() - 1])?)
    } else {
        Ok(NamedNode::new(text)?)
    }
}

/// Decodes stored object text into a term: URI, blank node or literal.
pub fn as_node(text: &str) -> Result<Term> {
    if let Some(id) = text.strip_prefix("_:") {
        Ok(Term::BlankNode(BlankNode::new_unchecked(id)))
    } else if text.starts_with('"') {
        parse_literal(text).map(Term::Literal)
    } else {
        as_uri(text).map(Term::NamedNode)
    }
}

fn parse_literal(text: &str) -> Result<Literal> {
    let bytes = text.as_bytes();
    let mut end = None;
    let mut i = 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => {
                end = Some(i);
                break;
            }
            _ => i += 1,
        }
    }
    let end = end.ok_or_else(|| Error::InvalidTerm(text.to_string()))?;

    let value = unescape(&text[1..end])?;
    let rest = &text[end + 1..];

    if rest.is_empty() {
        Ok(Literal::new_simple_literal(value))
    } else if let Some(language) = rest.strip_prefix('@') {
        Literal::new_language_tagged_literal(value, language)
            .map_err(|_| Error::InvalidTerm(text.to_string()))
    } else if let Some(datatype) = rest.strip_prefix("^^") {
        Ok(Literal::new_typed_literal(value, as_uri(datatype)?))
    } else {
        Err(Error::InvalidTerm(text.to_string()))
    }
}

fn unescape(raw: &str) -> Result<String> {
    if !raw.contains('\\') {
        return Ok(raw.to_string());
    }

    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('b') => out.push('\u{8}'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{c}'),
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some('\\') => out.push('\\'),
            Some('u') => out.push(code_point(&mut chars, 4, raw)?),
            Some('U') => out.push(code_point(&mut chars, 8, raw)?),
            _ => return Err(Error::InvalidTerm(raw.to_string())),
        }
    }
    Ok(out)
}

fn code_point(chars: &mut std::str::Chars<'_>, length: usize, raw: &str) -> Result<char> {
    let hex: String = chars.by_ref().take(length).collect();
    if hex.len() != length {
        return Err(Error::InvalidTerm(raw.to_string()));
    }
    u32::from_str_radix(&hex, 16)
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(|| Error::InvalidTerm(raw.to_string()))
}
