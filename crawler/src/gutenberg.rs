//! Project Gutenberg book pages: where the plain-text download lives and
//! what the book is called.

use lazy_static::lazy_static;
use scraper::{Html, Selector};
use std::fmt;
use std::path::PathBuf;
use url::Url;

/// Link text of the plain-text download on a book page.
pub const PLAIN_TEXT_LINK: &str = "Plain Text UTF-8";

/// Byte budget for a file stem; leaves room for `.txt` under the usual 255-byte name limit.
const MAX_FILE_STEM_BYTES: usize = 200;

lazy_static! {
    static ref SEL_A: Selector = Selector::parse("a").expect("valid selector");
    static ref SEL_TITLE: Selector = Selector::parse(r#"h1[itemprop="name"]"#).expect("valid selector");
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookPage {
    pub title: String,
    pub text_url: Url,
}

/// Why a book id produced no file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Http(String),
    Status(u16),
    NoPlainText,
    NoTitle,
    BadUrl(String),
    EmptyText,
    Write(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Http(e) => write!(f, "request failed: {e}"),
            SkipReason::Status(code) => write!(f, "unexpected status {code}"),
            SkipReason::NoPlainText => write!(f, "no \"{PLAIN_TEXT_LINK}\" link"),
            SkipReason::NoTitle => write!(f, "no title"),
            SkipReason::BadUrl(e) => write!(f, "bad url: {e}"),
            SkipReason::EmptyText => write!(f, "empty text"),
            SkipReason::Write(e) => write!(f, "write failed: {e}"),
        }
    }
}

#[derive(Debug)]
pub enum FetchOutcome {
    Saved { id: u32, path: PathBuf, bytes: usize },
    Skipped { id: u32, reason: SkipReason },
}

/// URL of the catalogue page for ebook `id`.
pub fn book_page_url(base: &str, id: u32) -> Result<Url, SkipReason> {
    let raw = format!("{}/ebooks/{id}", base.trim_end_matches('/'));
    Url::parse(&raw).map_err(|e| SkipReason::BadUrl(e.to_string()))
}

/// Extract the title and plain-text download link from a book page.
pub fn parse_book_page(html: &str, page_url: &Url) -> Result<BookPage, SkipReason> {
    let doc = Html::parse_document(html);

    let href = doc
        .select(&SEL_A)
        .find(|a| a.text().collect::<String>().contains(PLAIN_TEXT_LINK))
        .and_then(|a| a.value().attr("href"))
        .ok_or(SkipReason::NoPlainText)?;
    let text_url = page_url.join(href).map_err(|e| SkipReason::BadUrl(e.to_string()))?;

    let title = doc
        .select(&SEL_TITLE)
        .next()
        .map(|h| h.text().collect::<String>())
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or(SkipReason::NoTitle)?;

    Ok(BookPage { title, text_url })
}

/// Turn a book title into a file stem that is safe on common filesystems.
pub fn sanitize_title(title: &str) -> String {
    let replaced: String = title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => ' ',
            c => c,
        })
        .collect();
    let collapsed = replaced.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut stem = String::new();
    for c in collapsed.trim_matches('.').chars() {
        if stem.len() + c.len_utf8() > MAX_FILE_STEM_BYTES {
            break;
        }
        stem.push(c);
    }
    let stem = stem.trim().to_string();
    if stem.is_empty() { "untitled".to_string() } else { stem }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <h1 itemprop="name">The Declaration of Independence of the United States of America by Thomas Jefferson</h1>
          <table>
            <tr><td><a href="/ebooks/1.html.images">Read online (web)</a></td></tr>
            <tr><td><a href="/ebooks/1.txt.utf-8">Plain Text UTF-8</a></td></tr>
          </table>
        </body></html>
    "#;

    fn page_url() -> Url {
        book_page_url("https://www.gutenberg.org/", 1).unwrap()
    }

    #[test]
    fn builds_catalogue_url() {
        assert_eq!(page_url().as_str(), "https://www.gutenberg.org/ebooks/1");
    }

    #[test]
    fn finds_title_and_plain_text_link() {
        let page = parse_book_page(PAGE, &page_url()).unwrap();
        assert!(page.title.starts_with("The Declaration of Independence"));
        assert_eq!(page.text_url.as_str(), "https://www.gutenberg.org/ebooks/1.txt.utf-8");
    }

    #[test]
    fn missing_link_is_reported() {
        let html = r#"<h1 itemprop="name">Some Book</h1><a href="/x">EPUB3</a>"#;
        assert_eq!(parse_book_page(html, &page_url()), Err(SkipReason::NoPlainText));
    }

    #[test]
    fn missing_title_is_reported() {
        let html = r#"<h1>Other</h1><a href="/ebooks/2.txt.utf-8">Plain Text UTF-8</a>"#;
        assert_eq!(parse_book_page(html, &page_url()), Err(SkipReason::NoTitle));
    }

    #[test]
    fn sanitizes_path_characters() {
        assert_eq!(sanitize_title("War/Peace: Part 1?"), "War_Peace_ Part 1_");
        assert_eq!(sanitize_title("  Moby Dick\r\nby Herman   Melville "), "Moby Dick by Herman Melville");
        assert_eq!(sanitize_title(".."), "untitled");
        assert_eq!(sanitize_title(""), "untitled");
    }

    #[test]
    fn long_titles_are_truncated() {
        let long = "a".repeat(500);
        assert_eq!(sanitize_title(&long).len(), MAX_FILE_STEM_BYTES);

        // three bytes per char: stops at a char boundary under the budget
        let wide = sanitize_title(&"漢".repeat(500));
        assert_eq!(wide.len(), 198);
        assert!(wide.chars().all(|c| c == '漢'));
    }
}
