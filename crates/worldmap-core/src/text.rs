// crates/worldmap-core/src/text.rs

//! Text folding used by the client-side filters.
//!
//! Folding = transliterate to ASCII, lowercase, trim. `"Côte d'Ivoire"` and
//! `"cote d'ivoire"` fold to the same key.

use deunicode::deunicode;

/// Accent-insensitive, case-insensitive search key.
pub fn fold_key(s: &str) -> String {
    deunicode(s.trim()).to_ascii_lowercase()
}

/// `true` if the folded `haystack` contains the folded `needle`.
/// An empty needle matches everything.
pub fn contains_folded(haystack: &str, needle: &str) -> bool {
    let q = fold_key(needle);
    q.is_empty() || fold_key(haystack).contains(&q)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_accents_and_case() {
        assert_eq!(fold_key("  Côte d'Ivoire "), "cote d'ivoire");
        assert_eq!(fold_key("ÅLAND"), "aland");
    }

    #[test]
    fn folded_containment() {
        assert!(contains_folded("São Tomé and Príncipe", "tome"));
        assert!(contains_folded("Anything", "   "));
        assert!(!contains_folded("France", "germ"));
    }
}
