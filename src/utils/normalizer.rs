use std::sync::LazyLock;

use regex::Regex;

/// Word-character runs, with `_` treated as a separator.
/// `_` is ASCII punctuation and is blanked by `clean` anyway, so tokens seen
/// here match the tokens that survive punctuation removal.
static WORD_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\w--_]+").expect("static regex")
});

/// Stemming capability
/// Reduces a token to its stem. Implementations must be pure.
pub trait Stemmer: Send + Sync {
    fn stem(&self, token: &str) -> String;
}

/// Leaves tokens untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityStemmer;

impl Stemmer for IdentityStemmer {
    #[inline]
    fn stem(&self, token: &str) -> String {
        token.to_string()
    }
}

impl<F> Stemmer for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    #[inline]
    fn stem(&self, token: &str) -> String {
        self(token)
    }
}

#[inline]
fn is_single_cyrillic_letter(token: &str) -> bool {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => matches!(c, 'Ё' | 'ё' | 'А'..='я'),
        _ => false,
    }
}

#[inline]
fn is_single_digit(token: &str) -> bool {
    token.len() == 1 && token.as_bytes()[0].is_ascii_digit()
}

/// Drop every word run for which `remove` holds
fn drop_word_runs(text: &str, remove: impl Fn(&str) -> bool) -> String {
    WORD_RUN
        .replace_all(text, |caps: &regex::Captures| {
            let run = &caps[0];
            if remove(run) { String::new() } else { run.to_string() }
        })
        .into_owned()
}

/// Deterministic text cleanup
///
/// 1. trim and lowercase
/// 2. drop tokens made of exactly one Cyrillic letter
/// 3. replace ASCII punctuation with spaces
/// 4. drop standalone single-digit tokens
/// 5. collapse whitespace
/// 6. trim
///
/// `clean(clean(s)) == clean(s)` for every input.
pub fn clean(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    let without_letters = drop_word_runs(&lowered, is_single_cyrillic_letter);
    let without_punct: String = without_letters
        .chars()
        .map(|c| if c.is_ascii_punctuation() { ' ' } else { c })
        .collect();
    let without_digits = drop_word_runs(&without_punct, is_single_digit);
    without_digits.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Stemming plus cleanup, applied identically to corpus content and queries
#[derive(Debug, Clone, Default)]
pub struct TextNormalizer<S = IdentityStemmer>
where
    S: Stemmer,
{
    stemmer: S,
}

impl<S> TextNormalizer<S>
where
    S: Stemmer,
{
    pub fn new(stemmer: S) -> Self {
        Self { stemmer }
    }

    #[inline]
    pub fn stem(&self, token: &str) -> String {
        self.stemmer.stem(token)
    }

    #[inline]
    pub fn clean(&self, text: &str) -> String {
        clean(text)
    }

    /// Stem the given tokens, join them with single spaces and clean the result
    pub fn normalize_tokens<T>(&self, tokens: &[T]) -> String
    where
        T: AsRef<str>,
    {
        let stemmed: Vec<String> = tokens.iter().map(|t| self.stemmer.stem(t.as_ref())).collect();
        clean(&stemmed.join(" "))
    }

    /// Whitespace-split `text`, then `normalize_tokens`
    pub fn normalize(&self, text: &str) -> String {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        self.normalize_tokens(&tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_trims() {
        assert_eq!(clean("  Кольцо СЕРЕБРЯНОЕ  "), "кольцо серебряное");
    }

    #[test]
    fn drops_single_cyrillic_letters() {
        assert_eq!(clean("кольцо с бриллиантом и серьги"), "кольцо бриллиантом серьги");
        assert_eq!(clean("Ё ё Я"), "");
        // latin single letters are kept
        assert_eq!(clean("a b"), "a b");
    }

    #[test]
    fn replaces_punctuation() {
        assert_eq!(clean("кольцо,серебро!(925)"), "кольцо серебро 925");
        assert_eq!(clean("a-b"), "a b");
    }

    #[test]
    fn drops_single_digits_only() {
        assert_eq!(clean("размер 7 и 17"), "размер 17");
        assert_eq!(clean("1,2,3"), "");
        assert_eq!(clean("5мм"), "5мм");
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(clean("a \t\n  b"), "a b");
        assert_eq!(clean(""), "");
        assert_eq!(clean("   "), "");
    }

    #[test]
    fn underscore_does_not_break_idempotence() {
        let once = clean("аб_в");
        assert_eq!(once, "аб");
        assert_eq!(clean(&once), once);

        let once = clean("12_3 x_5");
        assert_eq!(clean(&once), once);
    }

    #[test]
    fn normalize_stems_before_cleaning() {
        let normalizer = TextNormalizer::new(|t: &str| t.trim_end_matches("ое").to_string());
        assert_eq!(normalizer.normalize("Серебряное  кольцо"), "серебрян кольцо");
        // stemming sees the raw token, cleaning lowercases afterwards
        assert_eq!(normalizer.normalize("СЕРЕБРЯНОЕ"), "серебряное");
    }

    #[test]
    fn identity_normalizer_equals_clean() {
        let normalizer = TextNormalizer::<IdentityStemmer>::default();
        let text = "Чашка, керамическая: 2 шт.";
        assert_eq!(normalizer.normalize(text), clean(text));
    }
}
