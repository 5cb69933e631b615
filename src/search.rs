//! The narrow contract between the retrieval core and the search engine.
//!
//! The engine owns storage, ranking and cursor issuance; this crate only
//! needs to execute a filter query page by page, compare cursor tokens for
//! equality and read stored fields of matched documents. Everything else
//! stays behind the [`IndexSearcher`] trait.

use std::collections::HashMap;

use crate::error::Result;

/// Identifier of a matched document inside the index.
pub type DocId = u32;

/// A value written into a typed document field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Plain text.
    Text(String),
    /// Double-precision number.
    Double(f64),
    /// Epoch-millisecond instant.
    Instant(i64),
}

/// A document under construction, before it is handed to the index layer.
#[derive(Debug, Clone, Default)]
pub struct DocumentFields {
    fields: HashMap<String, FieldValue>,
}

impl DocumentFields {
    /// Creates an empty draft.
    pub fn new() -> Self {
        DocumentFields::default()
    }

    /// Sets a field, replacing any previous value.
    pub fn set(&mut self, field: &str, value: FieldValue) {
        self.fields.insert(field.to_string(), value);
    }

    /// Reads a field back.
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Number of populated fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when no field has been set yet.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// An exact-match constraint over one index field.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterQuery {
    /// Single-token term match.
    Term {
        /// Constrained field.
        field: String,
        /// Token the field must hold.
        value: String,
    },
    /// Closed numeric range; an exact match collapses to `low == high`.
    DoubleRange {
        /// Constrained field.
        field: String,
        /// Lower bound, inclusive.
        low: f64,
        /// Upper bound, inclusive.
        high: f64,
    },
    /// Phrase-exact match.
    Phrase {
        /// Constrained field.
        field: String,
        /// Phrase the field must hold.
        text: String,
    },
}

/// Sort direction of one sort field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

/// One field of a sort specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortField {
    /// Field name.
    pub name: String,
    /// Sort direction.
    pub order: SortOrder,
}

/// The total sort order a paged query runs under.
///
/// Cursor tokens are only meaningful relative to the sort specification that
/// produced them, so the sort specification travels with the query command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortSpec {
    /// Ordered list of sort fields.
    pub fields: Vec<SortField>,
}

impl SortSpec {
    /// Creates a sort specification over the given fields.
    pub fn new(fields: Vec<SortField>) -> Self {
        SortSpec { fields }
    }

    /// Convenience constructor for a single ascending field.
    pub fn ascending(field: &str) -> Self {
        SortSpec { fields: vec![SortField { name: field.to_string(), order: SortOrder::Asc }] }
    }
}

/// Aggregate handle over the full matching document set.
///
/// Delivered once, on the first query execution, so callers can derive
/// statistics such as the total match count before any triple is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocSet {
    matches: u64,
}

impl DocSet {
    /// Creates a document-set handle with the given match count.
    pub fn new(matches: u64) -> Self {
        DocSet { matches }
    }

    /// Total number of matching documents.
    pub fn len(&self) -> u64 {
        self.matches
    }

    /// True when the query matched nothing.
    pub fn is_empty(&self) -> bool {
        self.matches == 0
    }
}

/// Mutable per-iteration request state for one paged query.
///
/// A command is owned by exactly one deep-paging iterator, which updates the
/// cursor between page fetches and drops the document-set request after the
/// first execution.
#[derive(Debug, Clone)]
pub struct QueryCommand<C> {
    /// Conjunction of filter constraints identifying the matching documents.
    pub filters: Vec<FilterQuery>,
    /// Sort order the cursor tokens are valid under.
    pub sort: SortSpec,
    /// Requested page length.
    pub page_len: usize,
    /// Resume token; `None` until the iterator seeds it at rest position.
    pub cursor: Option<C>,
    /// Whether the engine should also return the aggregate document set.
    pub want_doc_set: bool,
}

impl<C> QueryCommand<C> {
    /// Creates a command that asks for the document set on first execution.
    pub fn new(filters: Vec<FilterQuery>, sort: SortSpec, page_len: usize) -> Self {
        QueryCommand { filters, sort, page_len, cursor: None, want_doc_set: true }
    }
}

/// One page of results from a single query execution.
#[derive(Debug, Clone)]
pub struct ResultPage<C> {
    /// Matched document ids, in sort order. At most `page_len` of them.
    pub documents: Vec<DocId>,
    /// Token resuming after the last returned document.
    pub next_cursor: C,
    /// Aggregate document set, present on the first execution only.
    pub doc_set: Option<DocSet>,
}

/// Handle onto the underlying search engine.
pub trait IndexSearcher {
    /// Engine-opaque cursor token. Two tokens compare equal iff they
    /// represent the same resume point under the same sort.
    type Cursor: Clone + PartialEq;

    /// The cursor at rest position for the given sort, i.e. before any
    /// document has been returned.
    fn rest_cursor(&self, sort: &SortSpec) -> Self::Cursor;

    /// Executes one paged query.
    fn search(&self, command: &QueryCommand<Self::Cursor>) -> Result<ResultPage<Self::Cursor>>;

    /// Reads the requested stored fields of a matched document.
    fn document(&self, id: DocId, fields: &[&str]) -> Result<HashMap<String, String>>;
}

/// Seam onto the query-language subsystem.
///
/// The date codec renders its constraint as query-language text and lets the
/// engine's own parser turn it into a filter, mirroring how ad-hoc query
/// fragments are handled everywhere else.
pub trait QueryContext {
    /// Parses a `field:value` expression into a filter query.
    fn parse_query(&self, expression: &str) -> Result<FilterQuery>;
}
