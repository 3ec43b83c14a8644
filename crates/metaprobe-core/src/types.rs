//! Value types exchanged with callers and with the connection collaborator.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A result row keyed by column name.
///
/// Column names and their casing come from the catalog view. Positional access
/// is deliberately not offered: system view column order may change between
/// backend versions.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Name and declared type of one result column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ColumnInfo {
    /// Column name as reported by the backend.
    pub name: String,
    /// Declared SQL type, when the backend knows it (expressions may have none).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
}

impl ColumnInfo {
    pub fn new(name: impl Into<String>, data_type: Option<String>) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// The complete, already-closed result of a snapshot query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    /// Number of rows the statement produced.
    pub row_count: u64,
    /// Every row, in backend order.
    pub rows: Vec<Row>,
}

impl ResultSet {
    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }
}

/// How a statement materializes its rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum FetchMode {
    /// Rows as positional value lists.
    #[default]
    Tuple,
    /// Rows as column-name to value maps.
    Mapping,
}

/// A row as handed back by a [`crate::StatementHandle`].
#[derive(Debug, Clone, PartialEq)]
pub enum FetchedRow {
    Tuple(Vec<serde_json::Value>),
    Mapping(Row),
}

/// Options passed to [`crate::Connection::prepare_statement`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatementOptions {
    /// Compile and describe the statement without executing it.
    pub plan_only: bool,
    /// Requested row materialization.
    pub fetch_mode: FetchMode,
}

impl StatementOptions {
    /// Execute and return field-named rows.
    pub fn mapping() -> Self {
        Self {
            plan_only: false,
            fetch_mode: FetchMode::Mapping,
        }
    }

    /// Prepare and describe only.
    pub fn plan_only() -> Self {
        Self {
            plan_only: true,
            fetch_mode: FetchMode::Mapping,
        }
    }
}
