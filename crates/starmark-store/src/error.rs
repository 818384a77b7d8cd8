use rusqlite::ErrorCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    /// A write broke a schema rule (NOT NULL, UNIQUE, CHECK...)
    #[error("Constraint violated: {0}")]
    Constraint(String),

    #[error("Invalid table or column name: {0:?}")]
    InvalidIdentifier(String),

    #[error("Empty column set for {0}")]
    EmptyClause(&'static str),

    #[error("SQLite error: {0}")]
    Sqlite(#[source] rusqlite::Error),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(ref code, ref message)
                if code.code == ErrorCode::ConstraintViolation =>
            {
                StoreError::Constraint(message.clone().unwrap_or_else(|| code.to_string()))
            }
            other => StoreError::Sqlite(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
