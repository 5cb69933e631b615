//! Deep paging over search results, triple by triple.
//!
//! Naive offset paging degrades badly on large result sets, so the iterator
//! advances through opaque cursor tokens instead: each page fetch re-issues
//! the query with the resume token the previous fetch returned, and the
//! engine never has to skip over already-consumed documents. The iteration
//! protocol itself is an explicit finite-state machine.

use std::collections::HashMap;

use log::debug;

use crate::error::{Error, Result};
use crate::schema;
use crate::search::{DocId, DocSet, IndexSearcher, QueryCommand, SortSpec};
use crate::terms::{self, Triple};

/// Consumer of iteration events.
///
/// Lets the caller gather aggregate statistics and perform per-triple
/// bookkeeping without re-reading pages, and lets it skip the cost of field
/// reads entirely when full triples are not needed.
pub trait GraphEventConsumer {
    /// Called exactly once, with the aggregate document set of the first
    /// query execution.
    fn on_doc_set(&mut self, doc_set: &DocSet);

    /// Whether matched documents should be materialized into full triples.
    /// When false the iterator yields [`Triple::Wildcard`] and reads no
    /// stored fields.
    fn requires_triple_build(&self) -> bool;

    /// Called after each triple has been drawn, with the underlying
    /// document id.
    fn after_triple_built(&mut self, triple: &Triple, document: DocId);
}

/// Iteration states. Transitions are strictly sequential and driven by
/// [`DeepPagingIterator::next`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Execute the query for the first time and deliver the document set.
    FirstQuery,
    /// Draw triples from the current page.
    PageIteration,
    /// Decide whether another page must be fetched.
    CheckContinuation,
    /// Re-execute the query with the updated cursor.
    Requery,
    /// Terminal: the result set is consumed (or the iteration failed).
    Exhausted,
}

/// A lazy, forward-only, non-restartable sequence of triples drawn from
/// paged search results.
///
/// Yields `Result<Triple>`: any engine failure surfaces as one final `Err`
/// item, after which the iterator is exhausted. The iterator owns its query
/// command and cursor state; it is single-threaded by construction.
pub struct DeepPagingIterator<'a, S: IndexSearcher, G: GraphEventConsumer> {
    searcher: &'a S,
    command: QueryCommand<S::Cursor>,
    consumer: &'a mut G,
    page: Vec<DocId>,
    drawn: usize,
    sent_cursor: S::Cursor,
    next_cursor: S::Cursor,
    state: State,
}

impl<'a, S: IndexSearcher, G: GraphEventConsumer> DeepPagingIterator<'a, S, G> {
    /// Builds a new iterator over the given command.
    ///
    /// The command's cursor is seeded at the rest position of `sort`, which
    /// becomes the sort order every subsequent token is valid under.
    pub fn new(
        searcher: &'a S,
        mut command: QueryCommand<S::Cursor>,
        sort: SortSpec,
        consumer: &'a mut G,
    ) -> Self {
        command.sort = sort;
        let rest = searcher.rest_cursor(&command.sort);
        command.cursor = Some(rest.clone());
        DeepPagingIterator {
            searcher,
            command,
            consumer,
            page: Vec::new(),
            drawn: 0,
            sent_cursor: rest.clone(),
            next_cursor: rest,
            state: State::FirstQuery,
        }
    }

    /// Executes the query with the current cursor and installs the returned
    /// page. Returns whether the page holds any document.
    fn execute_query(&mut self) -> Result<bool> {
        let result = self.searcher.search(&self.command)?;
        debug!(
            "page query returned {} documents over {} filters",
            result.documents.len(),
            self.command.filters.len()
        );

        // The document set only travels with the very first execution;
        // requeries must not re-trigger the notification.
        if let Some(doc_set) = &result.doc_set {
            self.consumer.on_doc_set(doc_set);
        }
        self.command.want_doc_set = false;

        if let Some(cursor) = &self.command.cursor {
            self.sent_cursor = cursor.clone();
        }
        self.next_cursor = result.next_cursor;
        self.page = result.documents;
        self.drawn = 0;

        Ok(!self.page.is_empty())
    }

    /// Turns a matched document into a triple and notifies the consumer.
    ///
    /// When the consumer declared that full construction is unnecessary the
    /// stored fields are never read and the wildcard placeholder is yielded
    /// instead. The notification fires strictly after a successful decode.
    fn materialize(&mut self, document: DocId) -> Result<Triple> {
        let triple = if self.consumer.requires_triple_build() {
            let fields = self.searcher.document(document, &schema::TRIPLE_FIELDS)?;
            Triple::Spo {
                subject: terms::as_uri_or_blank_node(stored(&fields, schema::SUBJECT)?)?,
                predicate: terms::as_uri(stored(&fields, schema::PREDICATE)?)?,
                object: terms::as_node(stored(&fields, schema::OBJECT)?)?,
            }
        } else {
            Triple::Wildcard
        };

        self.consumer.after_triple_built(&triple, document);
        Ok(triple)
    }
}

fn stored<'f>(fields: &'f HashMap<String, String>, name: &str) -> Result<&'f str> {
    fields
        .get(name)
        .map(String::as_str)
        .ok_or_else(|| Error::DocumentRead(format!("missing stored field {}", name)))
}

impl<S: IndexSearcher, G: GraphEventConsumer> Iterator for DeepPagingIterator<'_, S, G> {
    type Item = Result<Triple>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.state {
                State::FirstQuery | State::Requery => match self.execute_query() {
                    Ok(true) => self.state = State::PageIteration,
                    Ok(false) => {
                        self.state = State::Exhausted;
                        return None;
                    }
                    Err(err) => {
                        self.state = State::Exhausted;
                        return Some(Err(err));
                    }
                },
                State::PageIteration => {
                    if self.drawn < self.page.len() {
                        let document = self.page[self.drawn];
                        self.drawn += 1;
                        return match self.materialize(document) {
                            Ok(triple) => Some(Ok(triple)),
                            Err(err) => {
                                self.state = State::Exhausted;
                                Some(Err(err))
                            }
                        };
                    }
                    self.state = State::CheckContinuation;
                }
                State::CheckContinuation => {
                    // A short page means the result set ended; an unchanged
                    // cursor means the engine has nothing to resume from.
                    // Either way the iteration is complete.
                    let more = self.page.len() == self.command.page_len
                        && self.sent_cursor != self.next_cursor;
                    if more {
                        self.command.cursor = Some(self.next_cursor.clone());
                        self.state = State::Requery;
                    } else {
                        self.state = State::Exhausted;
                    }
                }
                State::Exhausted => return None,
            }
        }
    }
}
