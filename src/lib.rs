//! This crate is a content-based recommendation engine built on count and TF-IDF vectors.

pub mod config;
pub mod error;
pub mod interaction;
pub mod loader;
pub mod recommend;
pub mod utils;
pub mod vectorizer;

/// Item Similarity Index
/// "Find items similar to this item".
/// Fits a count vectorizer on the corpus and precomputes the pairwise cosine
/// similarity matrix, so lookups are a single row scan.
///
/// `ItemSimilarityIndex<K>` is generic over the item key type `K`
/// (e.g., `String`, `i64`, `Key`).
///
/// The matrix holds n² scores; memory grows quadratically with the corpus.
pub use recommend::similar::{ItemSimilarityIndex, SimilarityMatrix};

/// TF-IDF Search Engine
/// "Find items matching this free-text query".
/// Fits a smoothed TF-IDF model on the corpus and ranks documents by cosine
/// similarity to the normalized query.
///
/// `SearchEngine<K, S>` has the following generic parameters:
/// - `K`: Item key type
/// - `S`: Stemmer applied to queries, which should match the one used on the corpus
pub use recommend::search::SearchEngine;

/// Search Hits and Hit Entry structures
/// - `Hits`: ranked list of results, best first
/// - `HitEntry`: a single result, holding the item key and its score
pub use recommend::hits::{HitEntry, Hits};

/// Interaction Index
/// Sparse user × item weight matrix with separate codecs for each axis.
/// Dense indices follow the sorted order of the external ids.
pub use interaction::{Codec, InteractionIndex, ItemCodec, UserCodec};

/// Corpus
/// Ordered (id, content) pairs; the position of an item is its tie-break rank.
pub use vectorizer::corpus::{Corpus, Item};

/// Token Frequency structure
/// Counts token occurrences within a document.
pub use vectorizer::token::TokenFrequency;

/// Vectorizers
/// - `CountVectorizer`: raw term counts, optional stopwords and vocabulary cap
/// - `TfidfVectorizer`: smoothed IDF with L2-normalized rows
pub use vectorizer::{count::CountVectorizer, tfidf::TfidfVectorizer, VectorSpaceModel, Vocabulary};

/// Text normalization
/// Stemming plus the cleaning pipeline shared by content and queries.
pub use utils::normalizer::{clean, IdentityStemmer, Stemmer, TextNormalizer};

/// Row loading and content merging
pub use loader::{ContentMerger, CsvSource, DatabaseSource, Key, MemorySource, Row, RowSource, Value};

pub use config::Config;
pub use error::{Error, Result};
