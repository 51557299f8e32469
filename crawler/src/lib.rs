pub mod gutenberg;

pub use gutenberg::{book_page_url, parse_book_page, sanitize_title, BookPage, FetchOutcome, SkipReason};
