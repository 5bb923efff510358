pub mod corpus;
pub mod count;
pub mod tfidf;
pub mod token;

use indexmap::IndexSet;
use num::Num;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::utils::math::vector::SparseVector;

/// Term → column index, fixed once fit completes.
/// Terms are stored in ascending order so the index of a term does not depend
/// on document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    terms: IndexSet<String>,
}

impl Vocabulary {
    /// Build from any set of terms; duplicates collapse.
    pub fn from_terms<I, T>(terms: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut terms: Vec<String> = terms.into_iter().map(Into::into).collect();
        terms.sort_unstable();
        terms.dedup();
        Self { terms: terms.into_iter().collect() }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    #[inline]
    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.terms.get_index_of(term)
    }

    #[inline]
    pub fn term(&self, index: usize) -> Option<&str> {
        self.terms.get_index(index).map(String::as_str)
    }

    #[inline]
    pub fn contains(&self, term: &str) -> bool {
        self.terms.contains(term)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }
}

/// Fit/transform contract shared by the count and TF-IDF variants
///
/// `fit` learns a vocabulary (and weights) from a corpus and produces one
/// document vector per input text. After fit the model is immutable:
/// `transform` projects new text onto the frozen vocabulary, ignoring unknown
/// terms.
pub trait VectorSpaceModel: Sized + Send + Sync {
    /// vector entry type
    type Value: Num + Copy + Into<f64> + Send + Sync;

    /// Fails with `EmptyCorpus` on zero documents or an empty vocabulary.
    fn fit<T>(texts: &[T]) -> Result<Self>
    where
        T: AsRef<str>;

    /// Project `text` onto the fitted vocabulary.
    /// No overlap yields the zero vector.
    fn transform(&self, text: &str) -> SparseVector<Self::Value>;

    fn vocabulary(&self) -> &Vocabulary;

    /// one vector per fitted document, in input order
    fn document_vectors(&self) -> &[SparseVector<Self::Value>];

    /// dimension of every vector this model produces
    #[inline]
    fn dim(&self) -> usize {
        self.vocabulary().len()
    }
}
