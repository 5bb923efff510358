use serde::{Deserialize, Serialize};

/// One described item: external id plus its normalized content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item<K> {
    pub id: K,
    pub content: String,
}

impl<K> Item<K> {
    pub fn new(id: K, content: impl Into<String>) -> Self {
        Self { id, content: content.into() }
    }
}

/// Ordered items with the column names they were built from
///
/// The position of an item in this sequence is its dense position in every
/// matrix built from the corpus. The corpus is read-only once created and is
/// consumed by the index builders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Corpus<K> {
    id_column: String,
    content_column: String,
    items: Vec<Item<K>>,
}

impl<K> Corpus<K> {
    pub fn new(id_column: impl Into<String>, content_column: impl Into<String>, items: Vec<Item<K>>) -> Self {
        Self {
            id_column: id_column.into(),
            content_column: content_column.into(),
            items,
        }
    }

    /// Corpus from (id, content) pairs with the default column names
    pub fn from_pairs<I, C>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, C)>,
        C: Into<String>,
    {
        let items = pairs.into_iter().map(|(id, content)| Item::new(id, content)).collect();
        Self::new("id", "content", items)
    }

    pub fn id_column(&self) -> &str {
        &self.id_column
    }

    pub fn content_column(&self) -> &str {
        &self.content_column
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Item<K>] {
        &self.items
    }

    pub fn ids(&self) -> impl Iterator<Item = &K> {
        self.items.iter().map(|item| &item.id)
    }

    pub fn contents(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.content.as_str()).collect()
    }

    /// Split into ids and contents, keeping positions aligned
    pub fn into_columns(self) -> (Vec<K>, Vec<String>) {
        self.items.into_iter().map(|item| (item.id, item.content)).unzip()
    }
}
