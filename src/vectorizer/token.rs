use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// runs of two or more word characters
static TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w{2,}").expect("static regex"));

/// Split text into lowercase terms.
/// A term is a run of at least two word characters; shorter runs are skipped.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN.find_iter(&lowered).map(|m| m.as_str().to_string()).collect()
}

/// TokenFrequency
/// Counts token occurrences within one document.
/// Tokens keep first-seen order.
///
/// # Examples
/// ```
/// use tf_idf_recommender::TokenFrequency;
/// let mut freq = TokenFrequency::new();
/// freq.add_tokens(&["кольцо", "серебро", "кольцо"]);
/// assert_eq!(freq.token_count("кольцо"), 2);
/// assert_eq!(freq.token_sum(), 3);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TokenFrequency {
    #[serde(with = "indexmap::map::serde_seq")]
    token_count: IndexMap<String, u32>,
    total_token_count: u64,
}

impl TokenFrequency {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count the terms of `text` (see [`tokenize`])
    pub fn from_text(text: &str) -> Self {
        let mut freq = Self::new();
        freq.add_tokens(&tokenize(text));
        freq
    }

    #[inline]
    pub fn add_token(&mut self, token: &str) -> &mut Self {
        match self.token_count.get_mut(token) {
            Some(count) => *count += 1,
            None => {
                self.token_count.insert(token.to_string(), 1);
            }
        }
        self.total_token_count += 1;
        self
    }

    #[inline]
    pub fn add_tokens<T>(&mut self, tokens: &[T]) -> &mut Self
    where
        T: AsRef<str>,
    {
        for token in tokens {
            self.add_token(token.as_ref());
        }
        self
    }

    /// Drop every token for which `predicate` holds
    pub fn remove_tokens_where(&mut self, predicate: impl Fn(&str) -> bool) -> &mut Self {
        let mut removed = 0u64;
        self.token_count.retain(|token, count| {
            if predicate(token) {
                removed += *count as u64;
                false
            } else {
                true
            }
        });
        self.total_token_count -= removed;
        self
    }

    /// occurrences of `token`, 0 if absent
    #[inline]
    pub fn token_count(&self, token: &str) -> u32 {
        self.token_count.get(token).copied().unwrap_or(0)
    }

    /// total number of tokens counted
    #[inline]
    pub fn token_sum(&self) -> u64 {
        self.total_token_count
    }

    /// number of distinct tokens
    #[inline]
    pub fn token_num(&self) -> usize {
        self.token_count.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.token_count.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.token_count.iter().map(|(t, &c)| (t.as_str(), c))
    }
}
