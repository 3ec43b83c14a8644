//! The metadata facade.
//!
//! [`MetaData`] answers catalog questions for one connection. Every operation
//! follows the same path:
//!
//! ```text
//! object ref → [resolver] → catalog definition → [template] → SQL
//!     → [snapshot executor] → rows (statement closed) → caller
//! ```
//!
//! The facade holds a non-owning [`Weak`] reference to its connection. It never
//! keeps the connection alive, and once the connection is dropped or closed
//! every operation fails with [`MetaError::Lifecycle`].
//!
//! Listing patterns use SQL `LIKE` wildcards and are always bound as literals.
//! Pass [`crate::MATCH_ALL`] for a filter that should not restrict anything.
//! There is no escape clause, so `%` and `_` cannot be matched literally.

use crate::catalog::{self, CatalogQuery, ExistenceProbe};
use crate::connection::Connection;
use crate::error::MetaError;
use crate::resolver::{resolve, IntoObjectRef};
use crate::snapshot::{describe, execute_snapshot};
use crate::template::{render_template, QueryParams};
use crate::types::{ColumnInfo, Row};
use std::fmt;
use std::sync::{Arc, Weak};

/// Lock-free catalog introspection for one connection.
///
/// Created once per connection, usually by the connection itself at
/// construction time (see `Arc::new_cyclic`), and cheap to clone.
///
/// # Example
///
/// ```ignore
/// let conn = SqliteConnection::open_in_memory(SqliteOptions::default())?;
/// let meta = conn.meta();
///
/// if meta.table_exists(("SALES", "ORDERS"))? {
///     for row in meta.list_columns("SALES", "ORDERS", "%")? {
///         println!("{}", row["COLUMN_NAME"]);
///     }
/// }
/// ```
#[derive(Clone)]
pub struct MetaData {
    connection: Weak<dyn Connection>,
}

impl MetaData {
    /// Creates a facade that refers to, but does not own, `connection`.
    pub fn new<C: Connection + 'static>(connection: &Arc<C>) -> Self {
        let weak: Weak<C> = Arc::downgrade(connection);
        Self { connection: weak }
    }

    /// Creates a facade from an existing weak reference.
    ///
    /// This is what connection types use inside `Arc::new_cyclic`.
    pub fn from_weak(connection: Weak<dyn Connection>) -> Self {
        Self { connection }
    }

    fn connection(&self) -> Result<Arc<dyn Connection>, MetaError> {
        let connection = self
            .connection
            .upgrade()
            .ok_or(MetaError::Lifecycle("connection has been dropped"))?;
        if connection.is_closed() {
            return Err(MetaError::Lifecycle("connection has been closed"));
        }
        Ok(connection)
    }

    /// Returns the result columns of `query` without executing it.
    ///
    /// With `params`, placeholders in `query` are rendered first using the
    /// connection's quoting rules. The statement is only compiled and
    /// described, so no rows are produced, modified or consumed.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, fields(query = query)))]
    pub fn query_columns(
        &self,
        query: &str,
        params: Option<&QueryParams>,
    ) -> Result<Vec<ColumnInfo>, MetaError> {
        let connection = self.connection()?;
        let sql = match params {
            Some(params) => render_template(query, params, connection.formatter())?,
            None => query.to_string(),
        };
        describe(connection.as_ref(), &sql)
    }

    /// Whether a schema with this name exists.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self)))]
    pub fn schema_exists(&self, schema_name: &str) -> Result<bool, MetaError> {
        if schema_name.is_empty() {
            return Err(MetaError::argument("schema name must not be empty"));
        }
        let connection = self.connection()?;
        let name = connection.formatter().normalize_identifier(schema_name);
        self.probe(connection.as_ref(), &catalog::SCHEMA_EXISTS, "", &name)
    }

    /// Whether a table exists. Accepts a bare name or a `(schema, name)` pair.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    pub fn table_exists(&self, table: impl IntoObjectRef) -> Result<bool, MetaError> {
        self.object_exists(&catalog::TABLE_EXISTS, table)
    }

    /// Whether a view exists. Accepts a bare name or a `(schema, name)` pair.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    pub fn view_exists(&self, view: impl IntoObjectRef) -> Result<bool, MetaError> {
        self.object_exists(&catalog::VIEW_EXISTS, view)
    }

    /// Schemas whose name matches `schema_name_pattern`, by name.
    pub fn list_schemas(&self, schema_name_pattern: &str) -> Result<Vec<Row>, MetaError> {
        self.list(&catalog::SCHEMAS, &[schema_name_pattern])
    }

    /// Tables matching both patterns, by schema then name.
    pub fn list_tables(
        &self,
        table_schema_pattern: &str,
        table_name_pattern: &str,
    ) -> Result<Vec<Row>, MetaError> {
        self.list(&catalog::TABLES, &[table_schema_pattern, table_name_pattern])
    }

    /// Views matching both patterns, by schema then name.
    pub fn list_views(
        &self,
        view_schema_pattern: &str,
        view_name_pattern: &str,
    ) -> Result<Vec<Row>, MetaError> {
        self.list(&catalog::VIEWS, &[view_schema_pattern, view_name_pattern])
    }

    /// Columns matching all three patterns, by schema, table and ordinal position.
    pub fn list_columns(
        &self,
        column_schema_pattern: &str,
        column_table_pattern: &str,
        column_name_pattern: &str,
    ) -> Result<Vec<Row>, MetaError> {
        self.list(
            &catalog::COLUMNS,
            &[column_schema_pattern, column_table_pattern, column_name_pattern],
        )
    }

    /// Database objects of any kind, by root name then object name.
    pub fn list_objects(
        &self,
        object_name_pattern: &str,
        object_type_pattern: &str,
        owner_pattern: &str,
        root_name_pattern: &str,
    ) -> Result<Vec<Row>, MetaError> {
        self.list(
            &catalog::OBJECTS,
            &[object_name_pattern, object_type_pattern, owner_pattern, root_name_pattern],
        )
    }

    /// Storage sizes of database objects, by root name then object name.
    pub fn list_object_sizes(
        &self,
        object_name_pattern: &str,
        object_type_pattern: &str,
        owner_pattern: &str,
        root_name_pattern: &str,
    ) -> Result<Vec<Row>, MetaError> {
        self.list(
            &catalog::OBJECT_SIZES,
            &[object_name_pattern, object_type_pattern, owner_pattern, root_name_pattern],
        )
    }

    /// Indices matching all three patterns, by schema then table.
    pub fn list_indices(
        &self,
        index_schema_pattern: &str,
        index_table_pattern: &str,
        index_owner_pattern: &str,
    ) -> Result<Vec<Row>, MetaError> {
        self.list(
            &catalog::INDICES,
            &[index_schema_pattern, index_table_pattern, index_owner_pattern],
        )
    }

    fn object_exists(
        &self,
        probe: &ExistenceProbe,
        object: impl IntoObjectRef,
    ) -> Result<bool, MetaError> {
        let object = object.into_object_ref()?;
        let connection = self.connection()?;
        let resolved = resolve(&object, connection.as_ref())?;
        self.probe(connection.as_ref(), probe, &resolved.schema, &resolved.name)
    }

    fn probe(
        &self,
        connection: &dyn Connection,
        probe: &ExistenceProbe,
        schema: &str,
        name: &str,
    ) -> Result<bool, MetaError> {
        let sql = render_template(
            &probe.template(),
            &probe.params(schema, name),
            connection.formatter(),
        )?;
        let result = execute_snapshot(connection, &sql)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(probe = probe.name, schema, name, found = !result.is_empty(), "existence probe");

        Ok(!result.is_empty())
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(skip(self, query), fields(query = query.name))
    )]
    fn list(&self, query: &CatalogQuery, patterns: &[&str]) -> Result<Vec<Row>, MetaError> {
        let connection = self.connection()?;
        let sql = render_template(
            &query.template(),
            &query.params(patterns),
            connection.formatter(),
        )?;
        Ok(execute_snapshot(connection.as_ref(), &sql)?.rows)
    }
}

impl fmt::Debug for MetaData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetaData")
            .field("connected", &(self.connection.strong_count() > 0))
            .finish()
    }
}
