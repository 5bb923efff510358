use thiserror::Error;

/// Errors raised while building or querying the recommenders.
///
/// Per-row data problems never surface here: malformed values degrade to
/// empty contributions. Structural problems are reported eagerly at
/// build/load time.
#[derive(Debug, Error)]
pub enum Error {
    /// Wrong column count, missing connection, unsupported source kind, ...
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// fit/build on zero usable documents, or a query before build
    #[error("empty corpus: {0}")]
    EmptyCorpus(String),

    #[error("unknown item {0}")]
    UnknownItem(String),

    #[error("unknown {role} identifier {id}")]
    UnknownIdentifier { role: &'static str, id: String },

    /// Fit-time and query-time vocabularies disagree.
    /// Indicates a programming error, not a data problem.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("failed to read `{descriptor}`: {message}")]
    Load { descriptor: String, message: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
