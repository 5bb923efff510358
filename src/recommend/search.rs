use rayon::prelude::*;
use tracing::info;

use crate::config::DEFAULT_TOP_K;
use crate::error::{Error, Result};
use crate::recommend::hits::{HitEntry, Hits};
use crate::utils::math::vector::{cosine_from_parts, sparse_dot};
use crate::utils::normalizer::{IdentityStemmer, Stemmer, TextNormalizer};
use crate::utils::sort::top_k_desc;
use crate::vectorizer::{corpus::Corpus, tfidf::TfidfVectorizer, VectorSpaceModel};

#[derive(Debug, Clone)]
struct SearchState<K> {
    ids: Vec<K>,
    model: TfidfVectorizer,
    /// L2 norm per document vector
    norms: Vec<f64>,
}

/// "Find items matching this free-text query"
///
/// Fits a [`TfidfVectorizer`] on the corpus and ranks every document by
/// cosine similarity to the query vector. Queries go through the same
/// normalizer as corpus content.
#[derive(Debug, Clone)]
pub struct SearchEngine<K, S = IdentityStemmer>
where
    S: Stemmer,
{
    normalizer: TextNormalizer<S>,
    state: Option<SearchState<K>>,
}

impl<K, S> SearchEngine<K, S>
where
    K: Clone,
    S: Stemmer,
{
    pub fn new(normalizer: TextNormalizer<S>) -> Self {
        Self { normalizer, state: None }
    }

    /// Fit the TF-IDF model on the corpus content.
    /// Replaces any previous build.
    pub fn build(&mut self, corpus: Corpus<K>) -> Result<()> {
        let (ids, contents) = corpus.into_columns();
        let model = TfidfVectorizer::fit(&contents)?;
        let norms = model.document_vectors().par_iter().map(|v| v.norm()).collect();
        info!(items = ids.len(), vocabulary = model.dim(), "search engine built");
        self.state = Some(SearchState { ids, model, norms });
        Ok(())
    }

    fn state(&self) -> Result<&SearchState<K>> {
        self.state
            .as_ref()
            .ok_or_else(|| Error::EmptyCorpus("search engine has not been built".to_string()))
    }

    pub fn is_built(&self) -> bool {
        self.state.is_some()
    }

    /// fitted model, once built
    pub fn model(&self) -> Option<&TfidfVectorizer> {
        self.state.as_ref().map(|s| &s.model)
    }

    pub fn normalizer(&self) -> &TextNormalizer<S> {
        &self.normalizer
    }

    /// Cosine similarity of the normalized query against every document,
    /// in corpus order
    pub fn scores(&self, query: &str) -> Result<Vec<f64>> {
        let state = self.state()?;
        let query_vec = state.model.transform(&self.normalizer.normalize(query));
        if query_vec.dim() != state.model.dim() {
            return Err(Error::DimensionMismatch { expected: state.model.dim(), found: query_vec.dim() });
        }
        let query_norm = query_vec.norm();
        Ok(state
            .model
            .document_vectors()
            .par_iter()
            .zip(state.norms.par_iter())
            .map(|(doc, &doc_norm)| cosine_from_parts(sparse_dot(&query_vec, doc), query_norm, doc_norm))
            .collect())
    }

    /// Top `k` documents for `query`, with scores.
    /// Equal scores keep corpus order, so a query sharing no vocabulary
    /// returns the first `k` items.
    pub fn search_scored(&self, query: &str, k: usize) -> Result<Hits<K>> {
        let scores = self.scores(query)?;
        let state = self.state()?;
        let list = top_k_desc(&scores, k, &[])
            .into_iter()
            .map(|pos| HitEntry { key: state.ids[pos].clone(), score: scores[pos] })
            .collect();
        Ok(Hits::new(list))
    }

    /// Top `k` item ids for `query`, best first
    pub fn search(&self, query: &str, k: usize) -> Result<Vec<K>> {
        Ok(self.search_scored(query, k)?.into_keys())
    }

    /// [`search`](Self::search) with `k = DEFAULT_TOP_K`
    pub fn search_default(&self, query: &str) -> Result<Vec<K>> {
        self.search(query, DEFAULT_TOP_K)
    }
}

impl<K, S> Default for SearchEngine<K, S>
where
    K: Clone,
    S: Stemmer + Default,
{
    fn default() -> Self {
        Self::new(TextNormalizer::default())
    }
}
