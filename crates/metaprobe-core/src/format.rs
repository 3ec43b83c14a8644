//! Identifier and literal formatting.
//!
//! The quoting rules belong to the connection: every [`crate::Connection`]
//! hands out a [`SqlFormatter`] and the template builder delegates all
//! escaping to it. [`ExaFormatter`] implements the common double-quote /
//! single-quote rules and is what the bundled adapters use.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Escaping rules supplied by a connection.
pub trait SqlFormatter {
    /// Quotes a schema, table or column name so it is always referenced
    /// verbatim, including mixed case and reserved characters.
    fn quote_identifier(&self, name: &str) -> String;

    /// Quotes a value as a SQL string literal.
    fn quote_literal(&self, value: &str) -> String;

    /// Converts a user-supplied object name into the form the catalog stores it in.
    ///
    /// Catalog views hold names as values, so existence probes compare against
    /// this normalized text rather than against a quoted identifier.
    fn normalize_identifier(&self, name: &str) -> String {
        name.to_string()
    }
}

/// Options for [`ExaFormatter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct FormatOptions {
    /// Treat object names as case-sensitive.
    ///
    /// When `false` (the default), names are folded to upper case before they
    /// are compared against catalog values, matching how unquoted identifiers
    /// are stored.
    #[serde(default)]
    pub quote_ident: bool,
}

/// Double quotes for identifiers, single quotes for literals, upper-case folding.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExaFormatter {
    options: FormatOptions,
}

impl ExaFormatter {
    pub fn new(options: FormatOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> FormatOptions {
        self.options
    }
}

impl SqlFormatter for ExaFormatter {
    fn quote_identifier(&self, name: &str) -> String {
        format!("\"{}\"", name.replace('"', "\"\""))
    }

    fn quote_literal(&self, value: &str) -> String {
        format!("'{}'", value.replace('\'', "''"))
    }

    fn normalize_identifier(&self, name: &str) -> String {
        if self.options.quote_ident {
            name.to_string()
        } else {
            name.to_uppercase()
        }
    }
}
