use starmark_store::StoreError;
use thiserror::Error;

/// All the ways a starmark command can go wrong
///
/// Commands never swallow these; they travel up to whoever called `execute`.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("API request failed: {0}")]
    ApiError(String),

    /// A page fetch failed; everything imported before it stays in the table
    #[error("Failed to fetch starred repos after importing {imported}: {message}")]
    Fetch { imported: usize, message: String },

    #[error("Invalid starred_at timestamp {value:?}: {source}")]
    TimestampParse {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Unknown bookmark field: {0}")]
    UnknownField(String),

    #[error("Malformed bookmark row: {0}")]
    InvalidRow(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl Error {
    /// True when a write was refused by the table schema (missing title, ...)
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Error::Storage(StoreError::Constraint(_)))
    }
}
