use std::fmt::Debug;
use std::hash::Hash;
use std::marker::PhantomData;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// What a codec encodes; names the role in lookup errors
pub trait Role {
    const NAME: &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRole {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemRole {}

impl Role for UserRole {
    const NAME: &'static str = "user";
}

impl Role for ItemRole {
    const NAME: &'static str = "item";
}

/// Bijection between external ids and dense indices `0..len`
///
/// Indices follow the ascending order of the external ids, so the same set of
/// ids always yields the same assignment regardless of input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "K: Serialize + Hash + Eq",
    deserialize = "K: Deserialize<'de> + Hash + Eq"
))]
pub struct Codec<K, R>
where
    K: Hash + Eq,
{
    ids: IndexSet<K>,
    #[serde(skip)]
    _role: PhantomData<R>,
}

pub type UserCodec<K> = Codec<K, UserRole>;
pub type ItemCodec<K> = Codec<K, ItemRole>;

impl<K, R> Codec<K, R>
where
    K: Hash + Eq + Ord + Debug,
    R: Role,
{
    /// Collect, sort and deduplicate `ids`
    pub fn from_ids(ids: impl IntoIterator<Item = K>) -> Self {
        let mut ids: Vec<K> = ids.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();
        Self {
            ids: ids.into_iter().collect(),
            _role: PhantomData,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: &K) -> bool {
        self.ids.contains(id)
    }

    /// external id → dense index
    pub fn encode(&self, id: &K) -> Result<usize> {
        self.ids.get_index_of(id).ok_or_else(|| Error::UnknownIdentifier {
            role: R::NAME,
            id: format!("{id:?}"),
        })
    }

    /// dense index → external id
    pub fn decode(&self, index: usize) -> Result<&K> {
        self.ids.get_index(index).ok_or_else(|| Error::UnknownIdentifier {
            role: R::NAME,
            id: format!("index {index} (codec holds {})", self.ids.len()),
        })
    }

    pub fn decode_all(&self, indices: &[usize]) -> Result<Vec<K>>
    where
        K: Clone,
    {
        indices.iter().map(|&index| self.decode(index).cloned()).collect()
    }

    /// external ids in index order
    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.ids.iter()
    }
}
