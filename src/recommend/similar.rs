use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{CountConfig, DEFAULT_TOP_K};
use crate::error::{Error, Result};
use crate::recommend::hits::{HitEntry, Hits};
use crate::utils::math::vector::{cosine_from_parts, sparse_dot, SparseVector};
use crate::utils::sort::top_k_desc;
use crate::vectorizer::{corpus::Corpus, count::CountVectorizer, VectorSpaceModel};

/// Dense symmetric matrix of pairwise cosine scores, row-major
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityMatrix {
    size: usize,
    scores: Vec<f64>,
}

impl SimilarityMatrix {
    /// Pairwise cosine similarity of `vectors`, rows computed in parallel.
    /// Diagonal: 1 for non-zero vectors, 0 for zero vectors.
    pub fn from_vectors<N>(vectors: &[SparseVector<N>]) -> Result<Self>
    where
        N: num::Num + Copy + Into<f64> + Send + Sync,
    {
        let size = vectors.len();
        if let Some(first) = vectors.first() {
            if let Some(bad) = vectors.iter().find(|v| v.dim() != first.dim()) {
                return Err(Error::DimensionMismatch { expected: first.dim(), found: bad.dim() });
            }
        }
        let norms: Vec<f64> = vectors.par_iter().map(SparseVector::norm).collect();

        let mut scores = vec![0.0; size * size];
        if size > 0 {
            // each (i, j) and (j, i) evaluate the same products in the same
            // order, so the matrix is exactly symmetric
            scores.par_chunks_mut(size).enumerate().for_each(|(i, row)| {
                for (j, cell) in row.iter_mut().enumerate() {
                    *cell = if i == j {
                        if norms[i] == 0.0 { 0.0 } else { 1.0 }
                    } else {
                        cosine_from_parts(sparse_dot(&vectors[i], &vectors[j]), norms[i], norms[j])
                    };
                }
            });
        }
        Ok(Self { size, scores })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if i < self.size && j < self.size {
            Some(self.scores[i * self.size + j])
        } else {
            None
        }
    }

    #[inline]
    pub fn row(&self, i: usize) -> Option<&[f64]> {
        if i < self.size {
            Some(&self.scores[i * self.size..(i + 1) * self.size])
        } else {
            None
        }
    }
}

#[derive(Debug, Clone)]
struct SimilarityState<K> {
    /// external id per corpus position
    ids: Vec<K>,
    /// external id → every corpus position carrying it, ascending
    positions: HashMap<K, Vec<usize>>,
    matrix: SimilarityMatrix,
}

/// "Find items similar to this item"
///
/// `build` fits a [`CountVectorizer`] on the corpus content and keeps only the
/// ids and the pairwise similarity matrix; content is dropped. The matrix is
/// O(n²) in the corpus size.
#[derive(Debug, Clone)]
pub struct ItemSimilarityIndex<K>
where
    K: Clone + Eq + Hash + Debug,
{
    config: CountConfig,
    state: Option<SimilarityState<K>>,
}

impl<K> ItemSimilarityIndex<K>
where
    K: Clone + Eq + Hash + Debug,
{
    pub fn new(config: CountConfig) -> Self {
        Self { config, state: None }
    }

    /// Fit the count model and compute the similarity matrix.
    /// Replaces any previous build.
    pub fn build(&mut self, corpus: Corpus<K>) -> Result<()> {
        let (ids, contents) = corpus.into_columns();
        let model = CountVectorizer::fit_with_config(&self.config, &contents)?;
        drop(contents);

        let matrix = SimilarityMatrix::from_vectors(model.document_vectors())?;
        debug!(size = matrix.size(), cells = matrix.size() * matrix.size(), "similarity matrix computed");

        let mut positions: HashMap<K, Vec<usize>> = HashMap::with_capacity(ids.len());
        for (pos, id) in ids.iter().enumerate() {
            positions.entry(id.clone()).or_default().push(pos);
        }
        info!(items = ids.len(), vocabulary = model.dim(), "item similarity index built");
        self.state = Some(SimilarityState { ids, positions, matrix });
        Ok(())
    }

    fn state(&self) -> Result<&SimilarityState<K>> {
        self.state
            .as_ref()
            .ok_or_else(|| Error::EmptyCorpus("item similarity index has not been built".to_string()))
    }

    /// all positions of `item_id`; never empty
    fn positions<'s>(&self, state: &'s SimilarityState<K>, item_id: &K) -> Result<&'s [usize]> {
        state
            .positions
            .get(item_id)
            .map(Vec::as_slice)
            .filter(|found| !found.is_empty())
            .ok_or_else(|| Error::UnknownItem(format!("{item_id:?}")))
    }

    /// first position of `item_id`
    fn position(&self, state: &SimilarityState<K>, item_id: &K) -> Result<usize> {
        Ok(self.positions(state, item_id)?[0])
    }

    pub fn is_built(&self) -> bool {
        self.state.is_some()
    }

    /// number of indexed items, 0 before build
    pub fn len(&self) -> usize {
        self.state.as_ref().map_or(0, |s| s.ids.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Similarity of two indexed items
    pub fn similarity(&self, a: &K, b: &K) -> Result<f64> {
        let state = self.state()?;
        let (i, j) = (self.position(state, a)?, self.position(state, b)?);
        state
            .matrix
            .get(i, j)
            .ok_or(Error::DimensionMismatch { expected: state.matrix.size(), found: i.max(j) + 1 })
    }

    /// The `k` items most similar to `item_id`, with scores.
    /// `item_id` itself is never returned, not even from a duplicate
    /// position; ties keep corpus order.
    pub fn find_closest_scored(&self, item_id: &K, k: usize) -> Result<Hits<K>> {
        let state = self.state()?;
        let own = self.positions(state, item_id)?;
        let pos = own[0];
        let row = state
            .matrix
            .row(pos)
            .ok_or(Error::DimensionMismatch { expected: state.matrix.size(), found: pos + 1 })?;

        let list = top_k_desc(row, k, own)
            .into_iter()
            .map(|other| HitEntry { key: state.ids[other].clone(), score: row[other] })
            .collect();
        Ok(Hits::new(list))
    }

    /// The `k` items most similar to `item_id`, best first
    pub fn find_closest(&self, item_id: &K, k: usize) -> Result<Vec<K>> {
        Ok(self.find_closest_scored(item_id, k)?.into_keys())
    }

    /// [`find_closest`](Self::find_closest) with `k = DEFAULT_TOP_K`
    pub fn find_closest_default(&self, item_id: &K) -> Result<Vec<K>> {
        self.find_closest(item_id, DEFAULT_TOP_K)
    }
}

impl<K> Default for ItemSimilarityIndex<K>
where
    K: Clone + Eq + Hash + Debug,
{
    fn default() -> Self {
        Self::new(CountConfig::default())
    }
}
