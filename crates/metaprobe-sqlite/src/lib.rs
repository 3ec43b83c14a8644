//! SQLite connection adapter for `metaprobe`.
//!
//! Implements [`metaprobe_core::Connection`] on top of `rusqlite`, so the
//! catalog facade can run against an embedded database. SQLite has no
//! `sys.exa_*` catalog of its own: attach one (for example an in-memory
//! database named `sys`) before calling the listing operations.
//!
//! ```no_run
//! use metaprobe_sqlite::{SqliteConnection, SqliteOptions};
//!
//! let conn = SqliteConnection::open("catalog.db", SqliteOptions::default())?;
//! conn.open_schema("sales")?;
//! let exists = conn.meta().table_exists("orders")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod connection;
pub mod error;
pub mod options;
mod statement;

pub use connection::SqliteConnection;
pub use error::{SqliteError, SqliteResult};
pub use options::{SqliteOptions, DEFAULT_SCHEMA};
