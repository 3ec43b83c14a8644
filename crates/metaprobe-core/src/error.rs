//! Error types for catalog introspection.
//!
//! # Error Handling Strategy
//!
//! Every facade operation returns `Result<T, MetaError>`. Errors surface to the
//! caller unchanged: nothing is retried and nothing is swallowed. The variants
//! follow who is at fault:
//!
//! - [`MetaError::Argument`]: the caller passed an object reference with the wrong shape.
//! - [`MetaError::Template`]: a catalog query definition is broken. Unreachable
//!   for the built-in definitions, reachable for caller-supplied `query_columns` params.
//! - [`MetaError::BackendQuery`]: the backend rejected or failed the SQL.
//! - [`MetaError::Lifecycle`]: the facade outlived its connection.
//!
//! A missing schema, table or view is not an error: existence checks return `false`.

use crate::template::TemplateError;
use thiserror::Error;

/// A failure reported by the connection or statement collaborator.
///
/// Carries the backend's own diagnostic text so callers can act on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct BackendError {
    /// Diagnostic text from the backend.
    pub message: String,
    /// Backend-specific error code, if the backend reports one.
    pub code: Option<String>,
    /// The SQL text that failed, if known.
    pub sql: Option<String>,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            sql: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_sql(mut self, sql: impl Into<String>) -> Self {
        self.sql = Some(sql.into());
        self
    }
}

/// Errors returned by [`crate::MetaData`] operations.
#[derive(Debug, Error)]
pub enum MetaError {
    /// Malformed object reference (empty name, wrong number of parts).
    #[error("invalid object reference: {0}")]
    Argument(String),

    /// Placeholder/value mismatch while rendering SQL.
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    /// The backend rejected or failed the rendered SQL.
    #[error("backend query failed: {0}")]
    BackendQuery(#[from] BackendError),

    /// The owning connection has been dropped or closed.
    #[error("connection is no longer available: {0}")]
    Lifecycle(&'static str),
}

impl MetaError {
    pub(crate) fn argument(message: impl Into<String>) -> Self {
        Self::Argument(message.into())
    }

    /// Whether this error means the connection is gone.
    pub fn is_lifecycle(&self) -> bool {
        matches!(self, Self::Lifecycle(_))
    }

    /// The backend's diagnostic text, for [`MetaError::BackendQuery`].
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::BackendQuery(err) => Some(&err.message),
            _ => None,
        }
    }
}
