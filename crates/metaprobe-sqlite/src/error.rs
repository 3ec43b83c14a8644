//! Error types for the SQLite adapter.

use metaprobe_core::BackendError;
use thiserror::Error;

/// Errors raised by [`crate::SqliteConnection`].
#[derive(Debug, Error)]
pub enum SqliteError {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error("connection is closed")]
    Closed,
}

pub type SqliteResult<T> = Result<T, SqliteError>;

impl SqliteError {
    /// SQLite's extended result code, when the engine reported one.
    pub fn extended_code(&self) -> Option<i32> {
        match self {
            Self::Sqlite(rusqlite::Error::SqliteFailure(err, _)) => Some(err.extended_code),
            _ => None,
        }
    }
}

impl From<SqliteError> for BackendError {
    fn from(err: SqliteError) -> Self {
        let code = err.extended_code();
        let backend = BackendError::new(err.to_string());
        match code {
            Some(code) => backend.with_code(code.to_string()),
            None => backend,
        }
    }
}
