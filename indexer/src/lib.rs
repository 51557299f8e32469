pub mod corpus;

pub use corpus::{collect_files, load_into, CorpusOptions, LoadReport};
