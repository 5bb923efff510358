use tracing::{info, warn};

use crate::config::ContentConfig;
use crate::error::{Error, Result};
use crate::loader::{open_source, Connection, Key, Row, RowSource, SourceKind, Value};
use crate::utils::normalizer::{IdentityStemmer, Stemmer, TextNormalizer};
use crate::vectorizer::corpus::{Corpus, Item};

/// Combines several raw columns of each row into one normalized content string
#[derive(Debug, Clone, Default)]
pub struct ContentMerger<S = IdentityStemmer>
where
    S: Stemmer,
{
    normalizer: TextNormalizer<S>,
}

impl<S> ContentMerger<S>
where
    S: Stemmer,
{
    pub fn new(normalizer: TextNormalizer<S>) -> Self {
        Self { normalizer }
    }

    pub fn normalizer(&self) -> &TextNormalizer<S> {
        &self.normalizer
    }

    /// Merged content of one row.
    /// Text cells are whitespace-split; other or missing cells add nothing.
    pub fn merge_row(&self, row: &Row, source_columns: &[&str]) -> String {
        let tokens: Vec<&str> = source_columns
            .iter()
            .filter_map(|&column| row.get(column).and_then(Value::as_text))
            .flat_map(str::split_whitespace)
            .collect();
        self.normalizer.normalize_tokens(&tokens)
    }

    /// Build a corpus from rows, keeping row order and id values.
    /// Rows whose id is missing or not an integer/text value are skipped.
    pub fn merge(
        &self,
        rows: &[Row],
        id_column: &str,
        content_column: &str,
        source_columns: &[&str],
    ) -> Corpus<Key> {
        let mut items = Vec::with_capacity(rows.len());
        for (line, row) in rows.iter().enumerate() {
            let Some(id) = row.get(id_column).and_then(Key::from_value) else {
                warn!(row = line, column = id_column, "row skipped: missing or non-key id");
                continue;
            };
            items.push(Item::new(id, self.merge_row(row, source_columns)));
        }
        Corpus::new(id_column, content_column, items)
    }

    /// Read `source_columns` and the id column from `source`, then merge
    pub fn merge_contents(
        &self,
        source: &dyn RowSource,
        descriptor: &str,
        config: &ContentConfig,
    ) -> Result<Corpus<Key>> {
        if config.item_id_column.is_empty() {
            return Err(Error::InvalidConfig("item id column must not be empty".to_string()));
        }
        let source_columns: Vec<&str> = config.source_columns.iter().map(String::as_str).collect();
        let mut columns = source_columns.clone();
        columns.push(config.item_id_column.as_str());

        let rows = source.read(descriptor, &columns)?;
        let corpus = self.merge(&rows, &config.item_id_column, &config.content_column, &source_columns);
        info!(descriptor, rows = rows.len(), items = corpus.len(), "content merged");
        Ok(corpus)
    }

    /// [`merge_contents`](Self::merge_contents) over a source opened by kind.
    /// `Database` needs a connection.
    pub fn merge_from(
        &self,
        kind: SourceKind,
        connection: Option<&dyn Connection>,
        descriptor: &str,
        config: &ContentConfig,
    ) -> Result<Corpus<Key>> {
        let source = open_source(kind, connection)?;
        self.merge_contents(source.as_ref(), descriptor, config)
    }
}
