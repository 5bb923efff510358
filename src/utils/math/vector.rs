use num::Num;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::error::{Error, Result};

/// Sparse vector over a fixed dimension
/// Stores non-zero entries as SoA (inds/vals) sorted by index.
/// Values are non-negative in every vector this crate produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparseVector<N>
where
    N: Num + Copy,
{
    dim: usize,
    inds: Vec<u32>,
    vals: Vec<N>,
}

impl<N> SparseVector<N>
where
    N: Num + Copy,
{
    /// zero vector of dimension `dim`
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            inds: Vec::new(),
            vals: Vec::new(),
        }
    }

    /// Build from (index, value) pairs in any order.
    /// Zero values are dropped, duplicated indices are summed.
    pub fn from_pairs(dim: usize, pairs: impl IntoIterator<Item = (usize, N)>) -> Result<Self> {
        let mut pairs: Vec<(usize, N)> = pairs.into_iter().filter(|(_, v)| !v.is_zero()).collect();
        if let Some(&(idx, _)) = pairs.iter().find(|(idx, _)| *idx >= dim) {
            return Err(Error::DimensionMismatch { expected: dim, found: idx + 1 });
        }
        pairs.sort_unstable_by_key(|(idx, _)| *idx);

        let mut inds: Vec<u32> = Vec::with_capacity(pairs.len());
        let mut vals: Vec<N> = Vec::with_capacity(pairs.len());
        for (idx, val) in pairs {
            match inds.last() {
                Some(&last) if last as usize == idx => {
                    if let Some(slot) = vals.last_mut() {
                        *slot = *slot + val;
                    }
                }
                _ => {
                    inds.push(idx as u32);
                    vals.push(val);
                }
            }
        }
        Ok(Self { dim, inds, vals })
    }

    /// dimension (vocabulary size)
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// number of stored non-zero entries
    #[inline]
    pub fn nnz(&self) -> usize {
        self.inds.len()
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.inds.is_empty()
    }

    pub fn get(&self, idx: usize) -> N {
        match self.inds.binary_search(&(idx as u32)) {
            Ok(pos) => self.vals[pos],
            Err(_) => N::zero(),
        }
    }

    /// iterate non-zero entries in ascending index order
    pub fn iter(&self) -> impl Iterator<Item = (usize, N)> + '_ {
        self.inds.iter().zip(self.vals.iter()).map(|(&i, &v)| (i as usize, v))
    }

    /// scale every entry
    pub fn map_values<M>(&self, f: impl Fn(usize, N) -> M) -> SparseVector<M>
    where
        M: Num + Copy,
    {
        SparseVector {
            dim: self.dim,
            inds: self.inds.clone(),
            vals: self.iter().map(|(i, v)| f(i, v)).collect(),
        }
    }
}

impl<N> SparseVector<N>
where
    N: Num + Copy + Into<f64>,
{
    pub fn to_dense(&self) -> Vec<f64> {
        let mut dense = vec![0.0; self.dim];
        for (idx, val) in self.iter() {
            dense[idx] = val.into();
        }
        dense
    }

    /// L2 norm
    pub fn norm(&self) -> f64 {
        self.vals
            .iter()
            .map(|&v| {
                let v: f64 = v.into();
                v * v
            })
            .sum::<f64>()
            .sqrt()
    }

    /// dot product, checking dimensions
    pub fn dot<M>(&self, other: &SparseVector<M>) -> Result<f64>
    where
        M: Num + Copy + Into<f64>,
    {
        check_dim(self.dim, other.dim)?;
        Ok(sparse_dot(self, other))
    }
}

#[inline]
fn check_dim(expected: usize, found: usize) -> Result<()> {
    if expected != found {
        return Err(Error::DimensionMismatch { expected, found });
    }
    Ok(())
}

/// merge-join over the two sorted index arrays
#[inline]
pub(crate) fn sparse_dot<A, B>(a: &SparseVector<A>, b: &SparseVector<B>) -> f64
where
    A: Num + Copy + Into<f64>,
    B: Num + Copy + Into<f64>,
{
    let mut a_it = a.iter();
    let mut b_it = b.iter();
    let mut a_next = a_it.next();
    let mut b_next = b_it.next();
    let mut dot = 0_f64;
    while let (Some((ia, va)), Some((ib, vb))) = (a_next, b_next) {
        match ia.cmp(&ib) {
            Ordering::Equal => {
                let va: f64 = va.into();
                let vb: f64 = vb.into();
                dot += va * vb;
                a_next = a_it.next();
                b_next = b_it.next();
            }
            Ordering::Less => a_next = a_it.next(),
            Ordering::Greater => b_next = b_it.next(),
        }
    }
    dot
}

/// cosine from a precomputed dot product and norms
/// a zero-norm side yields 0, never NaN
#[inline]
pub(crate) fn cosine_from_parts(dot: f64, norm_a: f64, norm_b: f64) -> f64 {
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// Cosine similarity
/// cos(θ) = Σ(a_i * b_i) / (||a|| * ||b||)
/// Zero vectors have similarity 0 with everything, including themselves.
pub fn cosine_similarity<A, B>(a: &SparseVector<A>, b: &SparseVector<B>) -> Result<f64>
where
    A: Num + Copy + Into<f64>,
    B: Num + Copy + Into<f64>,
{
    check_dim(a.dim, b.dim)?;
    Ok(cosine_from_parts(sparse_dot(a, b), a.norm(), b.norm()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_pairs_sorts_and_merges() {
        let v = SparseVector::from_pairs(5, vec![(3, 1u32), (0, 2), (3, 4), (1, 0)]).unwrap();
        assert_eq!(v.nnz(), 2);
        assert_eq!(v.iter().collect::<Vec<_>>(), vec![(0, 2), (3, 5)]);
        assert_eq!(v.get(1), 0);
        assert_eq!(v.to_dense(), vec![2.0, 0.0, 0.0, 5.0, 0.0]);
    }

    #[test]
    fn from_pairs_rejects_out_of_range_index() {
        let err = SparseVector::from_pairs(2, vec![(2, 1.0f64)]).unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { expected: 2, found: 3 }));
    }

    #[test]
    fn cosine_of_parallel_vectors_is_one() {
        let a = SparseVector::from_pairs(3, vec![(0, 1u32), (2, 2)]).unwrap();
        let b = SparseVector::from_pairs(3, vec![(0, 2.0f64), (2, 4.0)]).unwrap();
        assert!((cosine_similarity(&a, &b).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn cosine_of_disjoint_vectors_is_zero() {
        let a = SparseVector::from_pairs(3, vec![(0, 1u32)]).unwrap();
        let b = SparseVector::from_pairs(3, vec![(1, 1u32)]).unwrap();
        assert_eq!(cosine_similarity(&a, &b).unwrap(), 0.0);
    }

    #[test]
    fn cosine_with_zero_vector_is_zero_not_nan() {
        let a = SparseVector::<f64>::zeros(3);
        let b = SparseVector::from_pairs(3, vec![(1, 1.0f64)]).unwrap();
        assert_eq!(cosine_similarity(&a, &b).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&a, &a).unwrap(), 0.0);
    }

    #[test]
    fn dimension_mismatch_is_reported() {
        let a = SparseVector::<u32>::zeros(3);
        let b = SparseVector::<u32>::zeros(4);
        assert!(matches!(
            cosine_similarity(&a, &b),
            Err(Error::DimensionMismatch { expected: 3, found: 4 })
        ));
        assert!(a.dot(&b).is_err());
    }
}
