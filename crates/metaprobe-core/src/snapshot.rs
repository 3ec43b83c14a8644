//! Snapshot execution of catalog reads.
//!
//! Every catalog query is prefixed with [`SNAPSHOT_HINT`], which tells the
//! backend to answer from a transactionally consistent view of the catalog
//! instead of taking schema locks. Catalog reads then neither block nor get
//! blocked by concurrent DDL in other sessions.
//!
//! The statement handle is always drained and closed before returning, on
//! every path.

use crate::connection::{Connection, StatementHandle};
use crate::error::MetaError;
use crate::types::{ColumnInfo, FetchedRow, ResultSet, Row, StatementOptions};

/// SQL comment recognised by the backend as a request for snapshot execution.
pub const SNAPSHOT_HINT: &str = "/*snapshot execution*/";

/// Runs a rendered catalog query in snapshot mode and returns all rows.
///
/// Rows are always field-named, whatever the connection's default fetch mode.
pub fn execute_snapshot(connection: &dyn Connection, sql: &str) -> Result<ResultSet, MetaError> {
    let sql = format!("{SNAPSHOT_HINT}{sql}");

    #[cfg(feature = "tracing")]
    tracing::debug!(sql = %sql, "executing snapshot query");

    let mut statement = connection
        .prepare_statement(&sql, StatementOptions::mapping())
        .map_err(|err| err.with_sql(sql.as_str()))?;

    let materialized = materialize(statement.as_mut());
    let result = finish(statement.as_mut(), materialized)?;

    #[cfg(feature = "tracing")]
    tracing::debug!(rows = result.row_count, "snapshot query finished");

    Ok(result)
}

/// Compiles `sql` without executing it and returns its result columns.
pub fn describe(connection: &dyn Connection, sql: &str) -> Result<Vec<ColumnInfo>, MetaError> {
    #[cfg(feature = "tracing")]
    tracing::debug!(sql = %sql, "describing query");

    let mut statement = connection
        .prepare_statement(sql, StatementOptions::plan_only())
        .map_err(|err| err.with_sql(sql))?;

    let columns = statement.columns().map_err(MetaError::from);
    finish(statement.as_mut(), columns)
}

fn materialize(statement: &mut dyn StatementHandle) -> Result<ResultSet, MetaError> {
    let fetched = statement.fetch_all()?;

    // Column metadata is only needed to name positional rows.
    let names = if fetched.iter().any(|row| matches!(row, FetchedRow::Tuple(_))) {
        statement
            .columns()?
            .into_iter()
            .map(|column| column.name)
            .collect()
    } else {
        Vec::new()
    };

    let rows: Vec<Row> = fetched
        .into_iter()
        .map(|row| into_mapping(row, &names))
        .collect::<Result<_, _>>()?;

    let row_count = statement.row_count().max(rows.len() as u64);
    Ok(ResultSet { row_count, rows })
}

fn into_mapping(row: FetchedRow, names: &[String]) -> Result<Row, MetaError> {
    match row {
        FetchedRow::Mapping(row) => Ok(row),
        FetchedRow::Tuple(values) => {
            if values.len() != names.len() {
                return Err(MetaError::BackendQuery(crate::BackendError::new(format!(
                    "row has {} values but the statement describes {} columns",
                    values.len(),
                    names.len()
                ))));
            }
            Ok(names.iter().cloned().zip(values).collect())
        }
    }
}

/// Closes the statement and returns `outcome`, or the close error if `outcome` succeeded.
fn finish<T>(
    statement: &mut dyn StatementHandle,
    outcome: Result<T, MetaError>,
) -> Result<T, MetaError> {
    let closed = statement.close();

    match (outcome, closed) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(err)) => Err(err.into()),
        (Err(err), _closed) => {
            #[cfg(feature = "tracing")]
            if let Err(close_err) = &_closed {
                tracing::debug!(error = %close_err, "statement close failed after an earlier error");
            }
            Err(err)
        }
    }
}
