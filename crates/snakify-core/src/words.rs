use regex::{bytes, Regex};
use std::collections::BTreeSet;
use std::sync::LazyLock;

static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Za-z0-9_]+\b").expect("valid word pattern"));

/// Distinct identifier tokens in `text`.
pub fn distinct_tokens(text: &str) -> BTreeSet<&str> {
    WORD.find_iter(text).map(|m| m.as_str()).collect()
}

/// Identifier tokens in `text`, in order, repeats included.
pub fn tokens(text: &str) -> impl Iterator<Item = &str> {
    WORD.find_iter(text).map(|m| m.as_str())
}

/// Builds a pattern matching any of `words` only as whole words.
pub fn whole_word_pattern<'a, I>(words: I) -> Result<Regex, regex::Error>
where
    I: IntoIterator<Item = &'a str>,
{
    Regex::new(&whole_word_alternation(words))
}

/// Byte-oriented form of [`whole_word_pattern`], for content that may not be
/// valid UTF-8.
pub fn whole_word_bytes_pattern<'a, I>(words: I) -> Result<bytes::Regex, regex::Error>
where
    I: IntoIterator<Item = &'a str>,
{
    bytes::Regex::new(&whole_word_alternation(words))
}

fn whole_word_alternation<'a, I>(words: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut words: Vec<&str> = words.into_iter().collect();
    // Longest first so a shorter spelling never shadows a longer one.
    words.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    let alternation = words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|");
    format!(r"\b(?:{})\b", alternation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_tokens() {
        let text = "let myVar = myVar + other_thing; // 42 myVar";
        let found = distinct_tokens(text);
        assert_eq!(
            found.into_iter().collect::<Vec<_>>(),
            vec!["42", "let", "myVar", "other_thing"]
        );
    }

    #[test]
    fn test_whole_word_pattern_ignores_partial_matches() {
        let pattern = whole_word_pattern(["foo"]).unwrap();
        assert!(pattern.is_match("call(foo)"));
        assert!(!pattern.is_match("fooBar"));
        assert!(!pattern.is_match("myFoo"));
        assert!(!pattern.is_match("foo_bar"));
    }

    #[test]
    fn test_whole_word_pattern_escapes_and_prefers_longest() {
        let pattern = whole_word_pattern(["foo", "fooBar"]).unwrap();
        let matches: Vec<_> = pattern.find_iter("fooBar foo").map(|m| m.as_str()).collect();
        assert_eq!(matches, vec!["fooBar", "foo"]);
    }

    #[test]
    fn test_bytes_pattern_matches_around_invalid_utf8() {
        let pattern = whole_word_bytes_pattern(["myVar"]).unwrap();
        let content = b"// caf\xe9\nvar myVar = 1; myVariable\n";
        let matches: Vec<_> = pattern.find_iter(content).map(|m| m.as_bytes()).collect();
        assert_eq!(matches, vec![b"myVar".as_slice()]);
    }
}
