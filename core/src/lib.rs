//! TF-IDF inverted index and ranker.
//!
//! Callers feed `(text, name)` pairs into a [`SearchIndex`] and query it with
//! free text. Reading files, fetching documents and printing results are left
//! to the embedding application.

pub mod index;
pub mod tokenizer;

pub use index::{DocId, DocMeta, SearchHit, SearchIndex, DEFAULT_TOP_N};
