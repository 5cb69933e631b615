//! # Tessera
//!
//! Tessera is the retrieval core of an RDF triple store built on top of an
//! inverted-index search engine. A tessera is a single tile of a mosaic: the
//! index stores one document per triple, and this crate reassembles those
//! tiles back into RDF terms, lazily and page by page.
//!
//! The crate owns two tightly coupled pieces of machinery:
//!
//! - a datatype codec registry that decides, per RDF literal datatype, how a
//!   value is written into index fields, how exact-match filters are built
//!   and how textual query constraints are rendered;
//! - a deep-paging iterator that exhausts arbitrarily large result sets
//!   through opaque cursor tokens, one bounded page at a time, rebuilding
//!   triples from matched documents on demand.
//!
//! The search engine itself (storage, ranking, cursor issuance) stays behind
//! the narrow [`search::IndexSearcher`] contract, and RDF terms are modelled
//! with [`oxrdf`].
//!
//! ## Example
//!
//! ```rust
//! use tessera::FieldCodecRegistry;
//!
//! let registry = FieldCodecRegistry::new();
//! // Unknown datatypes silently fall back to plain-text handling.
//! let codec = registry.lookup(Some("http://example.org/unknown#type"));
//! assert!(std::ptr::eq(codec, registry.catch_all()));
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::doc_markdown)]

pub mod codec;
pub mod datetime;
pub mod error;
pub mod graph;
pub mod paging;
pub mod schema;
pub mod search;
pub mod terms;

pub use codec::{FieldCodec, FieldCodecRegistry};
pub use datetime::IsoPartialFormatter;
pub use error::{Error, Result};
pub use graph::TriplePattern;
pub use paging::{DeepPagingIterator, GraphEventConsumer};
pub use search::{
    DocId, DocSet, DocumentFields, FieldValue, FilterQuery, IndexSearcher, QueryCommand,
    QueryContext, ResultPage, SortField, SortOrder, SortSpec,
};
pub use terms::Triple;
