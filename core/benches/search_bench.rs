use criterion::{black_box, criterion_group, criterion_main, Criterion};
use search_core::SearchIndex;

const WORDS: &[&str] = &[
    "contract", "written", "court", "appeal", "party", "agreement", "evidence", "judge",
    "statute", "claim", "damages", "motion", "trial", "witness", "verdict", "jury",
];

fn synthetic_corpus(num_docs: usize, doc_len: usize) -> SearchIndex {
    let mut idx = SearchIndex::new();
    for d in 0..num_docs {
        let text: Vec<&str> = (0..doc_len).map(|i| WORDS[(d * 7 + i * 13 + i / 3) % WORDS.len()]).collect();
        idx.index_document(&text.join(" "), format!("doc{d}"));
    }
    idx
}

fn bench_search(c: &mut Criterion) {
    let idx = synthetic_corpus(2_000, 200);
    c.bench_function("search_two_terms", |b| b.iter(|| idx.search(black_box("written contract"), 10)));
}

fn bench_index(c: &mut Criterion) {
    c.bench_function("index_200_docs", |b| b.iter(|| synthetic_corpus(200, 200)));
}

criterion_group!(benches, bench_search, bench_index);
criterion_main!(benches);
