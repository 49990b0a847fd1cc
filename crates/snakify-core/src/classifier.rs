use regex::Regex;
use std::sync::LazyLock;

static CAPITALIZED_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(.)([A-Z][a-z]+)").expect("valid capitalized word pattern"));

static LOWER_UPPER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("valid lower/upper pattern"));

/// Returns true when `name` looks like a camelCase or PascalCase identifier.
///
/// A candidate is neither all-lowercase nor all-uppercase, has no underscore,
/// and contains at least one lowercase letter directly followed by an
/// uppercase letter. A digit before an uppercase letter is not a camel
/// transition, so `item2Name` alone is not a candidate.
pub fn is_candidate(name: &str) -> bool {
    !is_all_lowercase(name)
        && !is_all_uppercase(name)
        && !name.contains('_')
        && has_case_transition(name)
}

/// Converts a camelCase or PascalCase name into snake_case.
///
/// Names that already contain an underscore, or that have no lowercase
/// letters at all, are returned unchanged so the conversion is idempotent.
pub fn to_snake_case(name: &str) -> String {
    if name.contains('_') || name.to_uppercase() == name {
        return name.to_string();
    }

    // Capitalized words first so acronym runs like `HTTPCode` split before `Code`.
    let split_words = CAPITALIZED_WORD.replace_all(name, "${1}_${2}");
    let split_camel = LOWER_UPPER.replace_all(&split_words, "${1}_${2}");
    split_camel.to_lowercase()
}

/// Computes the proposed rename for `name`, if it is a conversion candidate
/// whose snake_case form actually differs.
pub fn propose(name: &str) -> Option<String> {
    if !is_candidate(name) {
        return None;
    }
    let proposed = to_snake_case(name);
    (proposed != name).then_some(proposed)
}

fn is_all_lowercase(name: &str) -> bool {
    let mut cased = false;
    for c in name.chars() {
        if c.is_uppercase() {
            return false;
        }
        cased |= c.is_lowercase();
    }
    cased
}

fn is_all_uppercase(name: &str) -> bool {
    let mut cased = false;
    for c in name.chars() {
        if c.is_lowercase() {
            return false;
        }
        cased |= c.is_uppercase();
    }
    cased
}

fn has_case_transition(name: &str) -> bool {
    name.chars()
        .zip(name.chars().skip(1))
        .any(|(a, b)| a.is_ascii_lowercase() && b.is_ascii_uppercase())
}
