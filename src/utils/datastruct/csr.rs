use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Compressed sparse row matrix of `f64` weights
/// An absent cell means "no entry", which is distinct from a stored zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsrMatrix {
    rows: usize,
    cols: usize,
    /// row `r` occupies `indices[indptr[r]..indptr[r + 1]]`
    indptr: Vec<usize>,
    /// column indices, ascending within each row
    indices: Vec<usize>,
    data: Vec<f64>,
}

impl CsrMatrix {
    /// Build from (row, col, value) triplets.
    /// A later triplet for the same cell overwrites an earlier one.
    pub fn from_triplets(
        rows: usize,
        cols: usize,
        triplets: impl IntoIterator<Item = (usize, usize, f64)>,
    ) -> Result<Self> {
        let mut cells: BTreeMap<(usize, usize), f64> = BTreeMap::new();
        for (r, c, v) in triplets {
            if r >= rows {
                return Err(Error::DimensionMismatch { expected: rows, found: r + 1 });
            }
            if c >= cols {
                return Err(Error::DimensionMismatch { expected: cols, found: c + 1 });
            }
            cells.insert((r, c), v);
        }

        let mut indptr = vec![0usize; rows + 1];
        let mut indices = Vec::with_capacity(cells.len());
        let mut data = Vec::with_capacity(cells.len());
        for (&(r, c), &v) in &cells {
            indptr[r + 1] += 1;
            indices.push(c);
            data.push(v);
        }
        for r in 0..rows {
            indptr[r + 1] += indptr[r];
        }
        Ok(Self { rows, cols, indptr, indices, data })
    }

    /// (rows, cols)
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// number of stored cells
    #[inline]
    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows {
            return None;
        }
        let (start, end) = (self.indptr[row], self.indptr[row + 1]);
        self.indices[start..end]
            .binary_search(&col)
            .ok()
            .map(|pos| self.data[start + pos])
    }

    /// stored (col, value) cells of `row`; empty for out-of-range rows
    pub fn row(&self, row: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let (start, end) = if row < self.rows {
            (self.indptr[row], self.indptr[row + 1])
        } else {
            (0, 0)
        };
        self.indices[start..end]
            .iter()
            .copied()
            .zip(self.data[start..end].iter().copied())
    }

    /// every stored (row, col, value) cell in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        (0..self.rows).flat_map(move |r| self.row(r).map(move |(c, v)| (r, c, v)))
    }
}
