use std::collections::HashMap;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tessera::{
    DeepPagingIterator, DocId, DocSet, GraphEventConsumer, IndexSearcher, QueryCommand, Result,
    ResultPage, SortSpec, Triple,
};

struct BenchSearcher {
    triples: Vec<(String, String, String)>,
}

impl BenchSearcher {
    fn new(count: usize) -> Self {
        let triples = (0..count)
            .map(|i| {
                (
                    format!("<http://example.org/s/{}>", i),
                    "<http://example.org/knows>".to_string(),
                    format!("\"object value {}\"", i),
                )
            })
            .collect();
        BenchSearcher { triples }
    }
}

impl IndexSearcher for BenchSearcher {
    type Cursor = usize;

    fn rest_cursor(&self, _sort: &SortSpec) -> usize {
        0
    }

    fn search(&self, command: &QueryCommand<usize>) -> Result<ResultPage<usize>> {
        let from = command.cursor.unwrap_or(0);
        let to = (from + command.page_len).min(self.triples.len());
        Ok(ResultPage {
            documents: (from..to).map(|i| i as DocId).collect(),
            next_cursor: to,
            doc_set: command.want_doc_set.then(|| DocSet::new(self.triples.len() as u64)),
        })
    }

    fn document(&self, id: DocId, fields: &[&str]) -> Result<HashMap<String, String>> {
        let (s, p, o) = &self.triples[id as usize];
        Ok(fields
            .iter()
            .map(|name| {
                let value = match *name {
                    "s" => s.clone(),
                    "p" => p.clone(),
                    _ => o.clone(),
                };
                ((*name).to_string(), value)
            })
            .collect())
    }
}

struct CountingConsumer {
    count: usize,
    build: bool,
}

impl GraphEventConsumer for CountingConsumer {
    fn on_doc_set(&mut self, _doc_set: &DocSet) {}

    fn requires_triple_build(&self) -> bool {
        self.build
    }

    fn after_triple_built(&mut self, _triple: &Triple, _document: DocId) {
        self.count += 1;
    }
}

fn bench_deep_paging(c: &mut Criterion) {
    let searcher = BenchSearcher::new(10_000);

    c.bench_function("deep_paging_materialized_10k", |b| {
        b.iter(|| {
            let mut consumer = CountingConsumer { count: 0, build: true };
            let command = QueryCommand::new(Vec::new(), SortSpec::ascending("id"), 500);
            let iterator = DeepPagingIterator::new(
                &searcher,
                command,
                SortSpec::ascending("id"),
                &mut consumer,
            );
            let drawn = iterator.filter(|item| item.is_ok()).count();
            black_box(drawn)
        });
    });

    c.bench_function("deep_paging_wildcard_10k", |b| {
        b.iter(|| {
            let mut consumer = CountingConsumer { count: 0, build: false };
            let command = QueryCommand::new(Vec::new(), SortSpec::ascending("id"), 500);
            let iterator = DeepPagingIterator::new(
                &searcher,
                command,
                SortSpec::ascending("id"),
                &mut consumer,
            );
            let drawn = iterator.filter(|item| item.is_ok()).count();
            black_box(drawn)
        });
    });
}

criterion_group!(benches, bench_deep_paging);
criterion_main!(benches);
