//! Text normalization shared by every extractor and the similarity engine.

/// Symbols kept because they carry meaning in technical terms (c++, c#, .net, ci-cd).
const ALLOWED_SYMBOLS: &[char] = &['+', '#', '.', '-', '(', ')'];

/// En and em dashes, folded to `-` so year ranges written with them survive.
const DASHES: &[char] = &['\u{2013}', '\u{2014}'];

/// Lowercases, replaces anything outside letters/digits/`+#.-()` with a space,
/// and collapses whitespace runs. Never fails; empty in, empty out.
pub fn normalize(text: &str) -> String {
    let mapped: String = text
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || ALLOWED_SYMBOLS.contains(&c) {
                c
            } else if DASHES.contains(&c) {
                '-'
            } else {
                ' '
            }
        })
        .collect();

    mapped
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Number of whitespace-separated words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_collapses_whitespace() {
        assert_eq!(normalize("  Senior   Rust\tEngineer\n"), "senior rust engineer");
    }

    #[test]
    fn test_keeps_technical_symbols() {
        assert_eq!(
            normalize("C++, C#, .NET (Core) & CI-CD!"),
            "c++ c# .net (core) ci-cd"
        );
    }

    #[test]
    fn test_strips_punctuation_noise() {
        assert_eq!(normalize("python/django; rest*api"), "python django rest api");
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("  ,;  "), "");
    }

    #[test]
    fn test_dashes_fold_to_hyphen() {
        assert_eq!(normalize("2016 \u{2013} Present"), "2016 - present");
        assert_eq!(normalize("2010\u{2014}2014"), "2010-2014");
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count("a bb ccc"), 3);
        assert_eq!(word_count(""), 0);
    }
}
