use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RE: Regex = Regex::new(r"\w+").expect("valid regex");
}

/// Tokenize text into lowercase word terms, in order of appearance.
///
/// A term is a maximal run of word characters (Unicode letters, digits and
/// `_`). Everything else separates terms. Duplicates are kept so callers can
/// count frequencies.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    RE.find_iter(&lowered).map(|m| m.as_str().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_tokenize() {
        let t = tokenize("The cat, the CAT!");
        assert_eq!(t, vec!["the", "cat", "the", "cat"]);
    }

    #[test]
    fn empty_text_has_no_terms() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("  ... !? ").is_empty());
    }
}
