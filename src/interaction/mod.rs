//! Sparse user-item interaction index for collaborative filtering
//!
//! Only the index and identifier codecs live here; no factorization model is
//! trained on top of them.

pub mod codec;

use std::fmt::Debug;
use std::hash::Hash;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::loader::{open_source, Connection, Key, Row, RowSource, SourceKind};
use crate::utils::datastruct::csr::CsrMatrix;

pub use self::codec::{Codec, ItemCodec, ItemRole, Role, UserCodec, UserRole};

/// (user, item) → weight, with codecs for both axes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "U: Serialize + Hash + Eq, I: Serialize + Hash + Eq",
    deserialize = "U: Deserialize<'de> + Hash + Eq, I: Deserialize<'de> + Hash + Eq"
))]
pub struct InteractionIndex<U = Key, I = Key>
where
    U: Hash + Eq,
    I: Hash + Eq,
{
    users: UserCodec<U>,
    items: ItemCodec<I>,
    /// shape (users, items)
    matrix: CsrMatrix,
}

impl InteractionIndex<Key, Key> {
    /// Read `columns` (user, item, weight) from `source` and index them
    pub fn load(source: &dyn RowSource, descriptor: &str, columns: &[&str]) -> Result<Self> {
        let [user_column, item_column, weight_column] = columns else {
            return Err(Error::InvalidConfig(format!(
                "interaction columns must contain exactly 3 values (user, item, weight), got {}",
                columns.len()
            )));
        };
        let rows = source.read(descriptor, columns)?;
        Self::from_rows(&rows, user_column, item_column, weight_column)
    }

    /// [`load`](Self::load) from a source opened by kind.
    /// `Database` needs a connection.
    pub fn load_from(
        kind: SourceKind,
        connection: Option<&dyn Connection>,
        descriptor: &str,
        columns: &[&str],
    ) -> Result<Self> {
        let source = open_source(kind, connection)?;
        Self::load(source.as_ref(), descriptor, columns)
    }

    /// Index rows; rows with a missing or unusable field are dropped
    pub fn from_rows(rows: &[Row], user_column: &str, item_column: &str, weight_column: &str) -> Result<Self> {
        let mut dropped = 0usize;
        let triples: Vec<(Key, Key, f64)> = rows
            .iter()
            .filter_map(|row| {
                let user = row.get(user_column).and_then(Key::from_value);
                let item = row.get(item_column).and_then(Key::from_value);
                let weight = row.get(weight_column).and_then(|v| v.as_f64());
                match (user, item, weight) {
                    (Some(user), Some(item), Some(weight)) => Some((user, item, weight)),
                    _ => {
                        dropped += 1;
                        None
                    }
                }
            })
            .collect();
        if dropped > 0 {
            warn!(dropped, kept = triples.len(), "interaction rows with missing fields dropped");
        }
        Self::from_triples(triples)
    }
}

impl<U, I> InteractionIndex<U, I>
where
    U: Clone + Hash + Eq + Ord + Debug,
    I: Clone + Hash + Eq + Ord + Debug,
{
    /// Index (user, item, weight) triples.
    /// A later triple for the same pair overwrites an earlier one.
    pub fn from_triples(triples: impl IntoIterator<Item = (U, I, f64)>) -> Result<Self> {
        let triples: Vec<(U, I, f64)> = triples.into_iter().collect();
        let users: UserCodec<U> = Codec::from_ids(triples.iter().map(|(u, _, _)| u.clone()));
        let items: ItemCodec<I> = Codec::from_ids(triples.iter().map(|(_, i, _)| i.clone()));

        let cells = triples
            .iter()
            .map(|(u, i, w)| Ok((users.encode(u)?, items.encode(i)?, *w)))
            .collect::<Result<Vec<_>>>()?;
        let matrix = CsrMatrix::from_triplets(users.len(), items.len(), cells)?;

        info!(users = users.len(), items = items.len(), interactions = matrix.nnz(), "interaction index loaded");
        Ok(Self { users, items, matrix })
    }

    pub fn users(&self) -> &UserCodec<U> {
        &self.users
    }

    pub fn items(&self) -> &ItemCodec<I> {
        &self.items
    }

    pub fn matrix(&self) -> &CsrMatrix {
        &self.matrix
    }

    #[inline]
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    #[inline]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn user_to_index(&self, user: &U) -> Result<usize> {
        self.users.encode(user)
    }

    pub fn item_to_index(&self, item: &I) -> Result<usize> {
        self.items.encode(item)
    }

    pub fn index_to_user(&self, index: usize) -> Result<&U> {
        self.users.decode(index)
    }

    pub fn index_to_item(&self, index: usize) -> Result<&I> {
        self.items.decode(index)
    }

    pub fn indices_to_users(&self, indices: &[usize]) -> Result<Vec<U>> {
        self.users.decode_all(indices)
    }

    pub fn indices_to_items(&self, indices: &[usize]) -> Result<Vec<I>> {
        self.items.decode_all(indices)
    }

    /// recorded weight, `None` when the pair never interacted
    pub fn weight(&self, user: &U, item: &I) -> Result<Option<f64>> {
        Ok(self.matrix.get(self.user_to_index(user)?, self.item_to_index(item)?))
    }

    /// every (item, weight) recorded for `user`
    pub fn interactions_of(&self, user: &U) -> Result<Vec<(I, f64)>> {
        let row = self.user_to_index(user)?;
        self.matrix
            .row(row)
            .map(|(col, weight)| Ok((self.index_to_item(col)?.clone(), weight)))
            .collect()
    }
}
