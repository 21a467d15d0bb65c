//! Unicode tokenization and diacritic folding for address search.
//!
//! Folding relies on NFD decomposition: a base letter plus combining marks
//! decomposes into separate codepoints, so stripping combining marks after
//! decomposition turns "Vĩnh" into "Vinh" without a hand-maintained
//! transliteration table.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Fold diacritics and lowercase, e.g. "Vĩnh Tuy" -> "vinh tuy".
pub fn fold_diacritics(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Split folded text into alphanumeric tokens.
pub fn tokenize(s: &str) -> Vec<String> {
    fold_diacritics(s)
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_vietnamese_diacritics() {
        assert_eq!(fold_diacritics("Vĩnh Tuy"), "vinh tuy");
        assert_eq!(fold_diacritics("Phố Lạc Trung"), "pho lac trung");
    }

    #[test]
    fn tokenizes_on_non_alphanumeric() {
        assert_eq!(
            tokenize("88 Phố Lạc-Trung"),
            vec!["88", "pho", "lac", "trung"]
        );
    }

    #[test]
    fn tokenize_is_diacritic_insensitive() {
        assert_eq!(tokenize("Vinh Tuy"), tokenize("Vĩnh Tuy"));
    }
}
