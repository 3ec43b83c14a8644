//! Traits for the connection and statement collaborators.
//!
//! The introspection layer never owns a network transport or session state.
//! Everything it needs from the outside world goes through these two traits,
//! which connection adapters (such as `metaprobe-sqlite`) implement.

use crate::error::BackendError;
use crate::format::SqlFormatter;
use crate::types::{ColumnInfo, FetchedRow, StatementOptions};

/// A SQL connection that can compile and run statements.
pub trait Connection {
    /// Prepares `sql`.
    ///
    /// With `options.plan_only` the statement is compiled and described but
    /// must not be executed: no rows are produced, modified or consumed.
    /// Otherwise the statement is executed and its rows become available
    /// through [`StatementHandle::fetch_all`].
    fn prepare_statement(
        &self,
        sql: &str,
        options: StatementOptions,
    ) -> Result<Box<dyn StatementHandle>, BackendError>;

    /// The session's current schema. May change between calls.
    fn current_schema(&self) -> Result<String, BackendError>;

    /// Quoting and normalization rules for this connection.
    fn formatter(&self) -> &dyn SqlFormatter;

    /// Whether the connection has been closed.
    fn is_closed(&self) -> bool;
}

/// A prepared (and possibly executed) statement.
pub trait StatementHandle {
    /// Result column names and types.
    fn columns(&self) -> Result<Vec<ColumnInfo>, BackendError>;

    /// Number of rows the statement produced.
    fn row_count(&self) -> u64;

    /// Drains every remaining row.
    fn fetch_all(&mut self) -> Result<Vec<FetchedRow>, BackendError>;

    /// Releases the statement. Calling it twice is allowed.
    fn close(&mut self) -> Result<(), BackendError>;
}
