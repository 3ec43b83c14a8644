//! The `rusqlite`-backed connection.

use std::cell::RefCell;
use std::fmt;
use std::path::Path;
use std::sync::{Arc, Weak};

use metaprobe_core::{
    BackendError, Connection, ExaFormatter, FetchMode, FetchedRow, MetaData, SqlFormatter,
    StatementHandle, StatementOptions,
};

use crate::error::{SqliteError, SqliteResult};
use crate::options::SqliteOptions;
use crate::statement::SqliteStatement;

/// A SQLite database exposed through the [`Connection`] trait.
///
/// Owns its [`MetaData`] facade, which refers back to the connection without
/// keeping it alive. Single-threaded, like `rusqlite::Connection` itself.
pub struct SqliteConnection {
    conn: RefCell<Option<rusqlite::Connection>>,
    current_schema: RefCell<String>,
    formatter: ExaFormatter,
    fetch_mode: FetchMode,
    meta: MetaData,
}

impl SqliteConnection {
    /// Opens a private in-memory database.
    pub fn open_in_memory(options: SqliteOptions) -> SqliteResult<Arc<Self>> {
        let conn = rusqlite::Connection::open_in_memory()?;

        #[cfg(feature = "tracing")]
        tracing::debug!("opened in-memory sqlite database");

        Ok(Self::from_rusqlite(conn, options))
    }

    /// Opens (or creates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>, options: SqliteOptions) -> SqliteResult<Arc<Self>> {
        let conn = rusqlite::Connection::open(path.as_ref())?;

        #[cfg(feature = "tracing")]
        tracing::debug!(path = %path.as_ref().display(), "opened sqlite database");

        Ok(Self::from_rusqlite(conn, options))
    }

    /// Wraps an already open `rusqlite` connection.
    pub fn from_rusqlite(conn: rusqlite::Connection, options: SqliteOptions) -> Arc<Self> {
        Arc::new_cyclic(|this: &Weak<Self>| {
            let this: Weak<dyn Connection> = this.clone();
            Self {
                conn: RefCell::new(Some(conn)),
                current_schema: RefCell::new(options.initial_schema()),
                formatter: ExaFormatter::new(options.format),
                fetch_mode: options.fetch_mode,
                meta: MetaData::from_weak(this),
            }
        })
    }

    /// The catalog introspection facade for this connection.
    pub fn meta(&self) -> &MetaData {
        &self.meta
    }

    /// Runs one or more statements that return no rows (DDL, DML, transactions).
    pub fn execute_batch(&self, sql: &str) -> SqliteResult<()> {
        self.with_conn(|conn| Ok(conn.execute_batch(sql)?))
    }

    /// Runs a query and returns its rows in the connection's default fetch mode.
    pub fn query(&self, sql: &str) -> SqliteResult<Vec<FetchedRow>> {
        self.with_conn(|conn| {
            Ok(SqliteStatement::execute(conn, sql, self.fetch_mode)?.into_rows())
        })
    }

    /// Makes `schema` the current schema.
    ///
    /// The name is normalized with the connection's formatter, the way an
    /// unquoted schema name would be stored. Only session state changes.
    pub fn open_schema(&self, schema: &str) -> SqliteResult<()> {
        if self.is_closed() {
            return Err(SqliteError::Closed);
        }
        let schema = self.formatter.normalize_identifier(schema);

        #[cfg(feature = "tracing")]
        tracing::debug!(schema = %schema, "opened schema");

        *self.current_schema.borrow_mut() = schema;
        Ok(())
    }

    /// Closes the underlying database. Closing twice is a no-op.
    ///
    /// Afterwards every operation, including those of [`Self::meta`], fails.
    pub fn close(&self) -> SqliteResult<()> {
        let Some(conn) = self.conn.borrow_mut().take() else {
            return Ok(());
        };

        #[cfg(feature = "tracing")]
        tracing::debug!("closing sqlite database");

        conn.close().map_err(|(_, err)| SqliteError::from(err))
    }

    fn with_conn<T>(
        &self,
        f: impl FnOnce(&rusqlite::Connection) -> SqliteResult<T>,
    ) -> SqliteResult<T> {
        let guard = self.conn.borrow();
        let conn = guard.as_ref().ok_or(SqliteError::Closed)?;
        f(conn)
    }
}

impl Connection for SqliteConnection {
    fn prepare_statement(
        &self,
        sql: &str,
        options: StatementOptions,
    ) -> Result<Box<dyn StatementHandle>, BackendError> {
        #[cfg(feature = "tracing")]
        tracing::trace!(sql = %sql, plan_only = options.plan_only, "preparing statement");

        let statement = self.with_conn(|conn| {
            if options.plan_only {
                SqliteStatement::describe(conn, sql)
            } else {
                SqliteStatement::execute(conn, sql, options.fetch_mode)
            }
        })?;
        Ok(Box::new(statement))
    }

    fn current_schema(&self) -> Result<String, BackendError> {
        if self.is_closed() {
            return Err(SqliteError::Closed.into());
        }
        Ok(self.current_schema.borrow().clone())
    }

    fn formatter(&self) -> &dyn SqlFormatter {
        &self.formatter
    }

    fn is_closed(&self) -> bool {
        self.conn.borrow().is_none()
    }
}

impl fmt::Debug for SqliteConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteConnection")
            .field("current_schema", &*self.current_schema.borrow())
            .field("fetch_mode", &self.fetch_mode)
            .field("closed", &self.is_closed())
            .finish()
    }
}
