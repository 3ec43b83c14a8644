//! Adapter configuration.

use metaprobe_core::{FetchMode, FormatOptions};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Schema a connection starts in when [`SqliteOptions::schema`] is unset.
pub const DEFAULT_SCHEMA: &str = "main";

/// Options for opening a [`crate::SqliteConnection`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SqliteOptions {
    /// Initial current schema, reported verbatim by `current_schema`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Identifier quoting and normalization.
    #[serde(default)]
    pub format: FormatOptions,

    /// Row shape for [`crate::SqliteConnection::query`].
    ///
    /// Catalog operations always request field-named rows regardless.
    #[serde(default)]
    pub fetch_mode: FetchMode,
}

impl SqliteOptions {
    pub(crate) fn initial_schema(&self) -> String {
        self.schema
            .clone()
            .unwrap_or_else(|| DEFAULT_SCHEMA.to_string())
    }
}
