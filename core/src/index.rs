use crate::tokenizer::tokenize;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

pub type DocId = u32;

/// Number of results returned when the caller does not ask for a specific count.
pub const DEFAULT_TOP_N: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocMeta {
    pub name: String,
    /// L2 norm of the raw term-frequency vector, fixed at ingest time.
    pub magnitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub doc_id: DocId,
    pub name: String,
    pub score: f64,
}

/// In-memory inverted index over raw term frequencies.
///
/// Documents are numbered `0..num_docs()` in the order they were indexed.
/// Posting lists never hold zero frequencies, and a term is present only if
/// at least one document contains it.
#[derive(Debug, Default, Clone)]
pub struct SearchIndex {
    postings: HashMap<String, HashMap<DocId, u32>>,
    docs: Vec<DocMeta>,
}

impl SearchIndex {
    pub fn new() -> Self { Self::default() }

    /// Add a document and return the id it was assigned.
    pub fn index_document(&mut self, text: &str, name: impl Into<String>) -> DocId {
        let mut tf_counts: HashMap<String, u32> = HashMap::new();
        for term in tokenize(text) {
            *tf_counts.entry(term).or_insert(0) += 1;
        }

        let doc_id = self.docs.len() as DocId;
        let magnitude = magnitude(tf_counts.values().copied());
        let num_terms = tf_counts.len();

        for (term, tf) in tf_counts {
            self.postings.entry(term).or_default().insert(doc_id, tf);
        }
        let name = name.into();
        tracing::trace!(doc_id, %name, num_terms, magnitude, "indexed document");
        self.docs.push(DocMeta { name, magnitude });
        doc_id
    }

    /// Rank documents against `query` and return at most `n` hits, best first.
    ///
    /// Each distinct query term known to the index adds `tf * ln(N / df)` to
    /// every document in its posting list, and the sum is divided by the
    /// document's magnitude. The query vector is not normalized, so scores
    /// are only comparable within one query and are not bounded by 1.
    /// Equal scores are ordered by ascending doc id.
    pub fn search(&self, query: &str, n: usize) -> Vec<SearchHit> {
        if n == 0 || self.docs.is_empty() {
            return Vec::new();
        }
        let scores = self.score(query);
        if scores.is_empty() {
            return Vec::new();
        }
        let candidates = scores.len();

        // min-heap of size n keyed by (score, lower doc id wins)
        let mut heap: BinaryHeap<Reverse<(OrderedFloat<f64>, Reverse<DocId>)>> = BinaryHeap::with_capacity(n.min(candidates) + 1);
        for (doc_id, score) in scores {
            heap.push(Reverse((OrderedFloat(score), Reverse(doc_id))));
            if heap.len() > n {
                heap.pop();
            }
        }
        let mut top: Vec<(OrderedFloat<f64>, Reverse<DocId>)> = heap.into_iter().map(|Reverse(k)| k).collect();
        top.sort_unstable_by(|a, b| b.cmp(a));

        tracing::debug!(query, candidates, returned = top.len(), "search complete");
        top.into_iter()
            .map(|(score, Reverse(doc_id))| SearchHit {
                doc_id,
                name: self.docs[doc_id as usize].name.clone(),
                score: score.0,
            })
            .collect()
    }

    /// Normalized score of every document sharing at least one term with the query.
    fn score(&self, query: &str) -> HashMap<DocId, f64> {
        let n = self.docs.len() as f64;
        let mut seen: HashSet<String> = HashSet::new();
        let mut scores: HashMap<DocId, f64> = HashMap::new();

        // first-appearance order keeps float accumulation reproducible
        for term in tokenize(query) {
            if !seen.insert(term.clone()) {
                continue;
            }
            let Some(plist) = self.postings.get(&term) else { continue };
            let df = plist.len();
            debug_assert!(df > 0, "term {term:?} has an empty posting list");
            let idf = (n / df as f64).ln();
            for (doc_id, tf) in plist {
                *scores.entry(*doc_id).or_insert(0.0) += *tf as f64 * idf;
            }
        }

        for (doc_id, score) in scores.iter_mut() {
            let mag = self.docs[*doc_id as usize].magnitude;
            *score = if mag > 0.0 { *score / mag } else { 0.0 };
        }
        scores
    }

    pub fn num_docs(&self) -> usize { self.docs.len() }

    pub fn num_terms(&self) -> usize { self.postings.len() }

    pub fn doc(&self, doc_id: DocId) -> Option<&DocMeta> { self.docs.get(doc_id as usize) }

    /// Documents in id order.
    pub fn docs(&self) -> impl Iterator<Item = (DocId, &DocMeta)> + '_ {
        self.docs.iter().enumerate().map(|(i, d)| (i as DocId, d))
    }

    pub fn postings(&self, term: &str) -> Option<&HashMap<DocId, u32>> { self.postings.get(term) }

    /// Number of documents containing `term`; 0 for unknown terms.
    pub fn doc_freq(&self, term: &str) -> usize {
        self.postings.get(term).map_or(0, |p| p.len())
    }
}

fn magnitude(counts: impl Iterator<Item = u32>) -> f64 {
    counts.map(|c| (c as f64) * (c as f64)).sum::<f64>().sqrt()
}
