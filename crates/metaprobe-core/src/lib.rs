//! Lock-free catalog introspection over a SQL connection.
//!
//! [`MetaData`] answers questions about schemas, tables, views, columns,
//! objects and indices by reading system catalog views in snapshot mode, so
//! introspection never waits on (or blocks) concurrent DDL. It also describes
//! the result columns of arbitrary queries without executing them.
//!
//! The crate does not talk to a database itself. Connection adapters implement
//! [`Connection`] and [`StatementHandle`]; see `metaprobe-sqlite` for one.

pub mod catalog;
pub mod connection;
pub mod error;
pub mod format;
pub mod meta;
pub mod resolver;
pub mod snapshot;
pub mod template;
pub mod types;

// Re-export main types and functions
pub use catalog::MATCH_ALL;
pub use connection::{Connection, StatementHandle};
pub use error::{BackendError, MetaError};
pub use format::{ExaFormatter, FormatOptions, SqlFormatter};
pub use meta::MetaData;
pub use resolver::{IntoObjectRef, QualifiedName};
pub use snapshot::SNAPSHOT_HINT;
pub use template::{render_template, QueryParams, SqlValue, TemplateError};
pub use types::{ColumnInfo, FetchMode, FetchedRow, ResultSet, Row, StatementOptions};

// Test utilities (must be at end of file)
#[cfg(test)]
pub mod test_utils;
