//! Configuration for content merging, count vectorization and interaction loading

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default vocabulary cap of the count vectorizer
pub const DEFAULT_MAX_FEATURES: usize = 100_000;

/// Result count of `find_closest_default` and `search_default`
pub const DEFAULT_TOP_K: usize = 10;

/// Which columns make up an item's content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// column holding the external item id
    pub item_id_column: String,
    /// name given to the merged content column
    pub content_column: String,
    /// columns merged into the content, in order
    pub source_columns: Vec<String>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            item_id_column: "id".to_string(),
            content_column: "content".to_string(),
            source_columns: Vec::new(),
        }
    }
}

/// Count vectorizer options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountConfig {
    /// keep only the N most frequent terms; `None` keeps all
    pub max_features: Option<usize>,
    /// terms dropped before counting
    pub stop_words: BTreeSet<String>,
}

impl CountConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_features(mut self, max_features: Option<usize>) -> Self {
        self.max_features = max_features;
        self
    }

    pub fn with_stop_words<I, T>(mut self, stop_words: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.stop_words = stop_words.into_iter().map(Into::into).collect();
        self
    }
}

impl Default for CountConfig {
    fn default() -> Self {
        Self {
            max_features: Some(DEFAULT_MAX_FEATURES),
            stop_words: BTreeSet::new(),
        }
    }
}

/// Interaction source columns: user, item, weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    pub columns: Vec<String>,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            columns: vec!["user".to_string(), "item".to_string(), "weight".to_string()],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub content: ContentConfig,
    pub count: CountConfig,
    pub interactions: InteractionConfig,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Config = toml::from_str(raw).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.content.item_id_column.is_empty() {
            return Err(Error::InvalidConfig("content.item_id_column must not be empty".to_string()));
        }
        if self.content.content_column.is_empty() {
            return Err(Error::InvalidConfig("content.content_column must not be empty".to_string()));
        }
        if self.count.max_features == Some(0) {
            return Err(Error::InvalidConfig("count.max_features must be positive".to_string()));
        }
        if self.interactions.columns.len() != 3 {
            return Err(Error::InvalidConfig(format!(
                "interactions.columns must contain exactly 3 values (user, item, weight), got {}",
                self.interactions.columns.len()
            )));
        }
        Ok(())
    }
}
