//! Statement execution and row conversion.

use metaprobe_core::{BackendError, ColumnInfo, FetchMode, FetchedRow, StatementHandle};
use rusqlite::types::ValueRef;
use serde_json::Value;

use crate::error::SqliteResult;

/// A fully materialized SQLite statement.
///
/// `rusqlite` statements borrow their connection, so rows are read eagerly
/// while the connection is borrowed and handed out from memory afterwards.
#[derive(Debug)]
pub(crate) struct SqliteStatement {
    columns: Vec<ColumnInfo>,
    rows: Vec<FetchedRow>,
    row_count: u64,
    closed: bool,
}

impl SqliteStatement {
    /// Compiles `sql` and reads its result columns without stepping it.
    pub(crate) fn describe(conn: &rusqlite::Connection, sql: &str) -> SqliteResult<Self> {
        let stmt = conn.prepare(sql)?;
        Ok(Self::with_rows(column_info(&stmt), Vec::new()))
    }

    /// Compiles and runs `sql`, reading every row in `mode`.
    pub(crate) fn execute(
        conn: &rusqlite::Connection,
        sql: &str,
        mode: FetchMode,
    ) -> SqliteResult<Self> {
        let mut stmt = conn.prepare(sql)?;
        let columns = column_info(&stmt);
        let width = columns.len();

        let mut fetched = Vec::new();
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let values = (0..width)
                .map(|i| row.get_ref(i).map(to_json))
                .collect::<Result<Vec<_>, _>>()?;
            fetched.push(match mode {
                FetchMode::Tuple => FetchedRow::Tuple(values),
                FetchMode::Mapping => FetchedRow::Mapping(
                    columns.iter().map(|c| c.name.clone()).zip(values).collect(),
                ),
            });
        }

        Ok(Self::with_rows(columns, fetched))
    }

    fn with_rows(columns: Vec<ColumnInfo>, rows: Vec<FetchedRow>) -> Self {
        Self {
            row_count: rows.len() as u64,
            columns,
            rows,
            closed: false,
        }
    }

    pub(crate) fn into_rows(self) -> Vec<FetchedRow> {
        self.rows
    }
}

impl StatementHandle for SqliteStatement {
    fn columns(&self) -> Result<Vec<ColumnInfo>, BackendError> {
        Ok(self.columns.clone())
    }

    fn row_count(&self) -> u64 {
        self.row_count
    }

    fn fetch_all(&mut self) -> Result<Vec<FetchedRow>, BackendError> {
        if self.closed {
            return Err(BackendError::new("statement is closed"));
        }
        Ok(std::mem::take(&mut self.rows))
    }

    fn close(&mut self) -> Result<(), BackendError> {
        self.closed = true;
        self.rows.clear();
        Ok(())
    }
}

fn column_info(stmt: &rusqlite::Statement<'_>) -> Vec<ColumnInfo> {
    stmt.columns()
        .iter()
        .map(|column| ColumnInfo::new(column.name(), column.decl_type().map(str::to_string)))
        .collect()
}

/// Converts one SQLite value to JSON. Blobs become lower-case hex strings.
fn to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::String(bytes.iter().map(|b| format!("{b:02x}")).collect()),
    }
}
