//! Placeholder substitution for catalog SQL.
//!
//! Templates carry `{name}` placeholders. Each value is tagged with how it must
//! be substituted, so the choice between identifier quoting and literal quoting
//! is made by the caller's type, never guessed from the text:
//!
//! ```text
//! "SELECT * FROM {tbl} WHERE name LIKE {pattern}"
//!       + tbl = Identifier("Orders"), pattern = Literal("A%")
//!       → SELECT * FROM "Orders" WHERE name LIKE 'A%'
//! ```
//!
//! Rendering is one pass over the template. Substituted text is never rescanned,
//! and nothing is parsed as SQL. `{{` and `}}` produce literal braces.
//!
//! # Example
//!
//! ```
//! use metaprobe_core::template::{render_template, QueryParams};
//! use metaprobe_core::ExaFormatter;
//!
//! let params = QueryParams::new()
//!     .identifier("tbl", "my\"table")
//!     .literal("pattern", "A%");
//!
//! let sql = render_template(
//!     "SELECT * FROM {tbl} WHERE name LIKE {pattern}",
//!     &params,
//!     &ExaFormatter::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(sql, "SELECT * FROM \"my\"\"table\" WHERE name LIKE 'A%'");
//! ```

mod error;

pub use error::TemplateError;

use crate::format::SqlFormatter;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

/// A value to substitute into a template, tagged with how it must be quoted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    /// A schema, table or column name, quoted with the connection's identifier rule.
    Identifier(String),
    /// A string value (including `LIKE` patterns), quoted as a string literal.
    Literal(String),
    /// An integer, emitted as decimal text.
    Integer(i64),
    /// SQL `NULL`.
    Null,
}

impl SqlValue {
    fn render(&self, formatter: &dyn SqlFormatter) -> String {
        match self {
            Self::Identifier(name) => formatter.quote_identifier(name),
            Self::Literal(value) => formatter.quote_literal(value),
            Self::Integer(value) => value.to_string(),
            Self::Null => "NULL".to_string(),
        }
    }
}

/// Named values for a template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    values: BTreeMap<String, SqlValue>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value, replacing any previous value under the same name.
    pub fn with(mut self, name: impl Into<String>, value: SqlValue) -> Self {
        self.insert(name, value);
        self
    }

    pub fn identifier(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.with(name, SqlValue::Identifier(value.into()))
    }

    pub fn literal(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.with(name, SqlValue::Literal(value.into()))
    }

    pub fn integer(self, name: impl Into<String>, value: i64) -> Self {
        self.with(name, SqlValue::Integer(value))
    }

    pub fn null(self, name: impl Into<String>) -> Self {
        self.with(name, SqlValue::Null)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: SqlValue) -> Option<SqlValue> {
        self.values.insert(name.into(), value)
    }

    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

/// One lexical piece of a template.
enum Piece<'a> {
    Text(&'a str),
    Brace(&'static str),
    Placeholder(&'a str),
}

fn token_regex() -> &'static Regex {
    static TOKEN_REGEX: OnceLock<Regex> = OnceLock::new();
    TOKEN_REGEX.get_or_init(|| {
        // Alternation is leftmost-first: escapes win over placeholders, and any
        // brace left over is malformed.
        Regex::new(r"\{\{|\}\}|\{([A-Za-z_][A-Za-z0-9_]*)\}|[{}]").expect("Invalid regex pattern")
    })
}

/// Splits a template into text, escaped braces and placeholders.
fn tokenize(template: &str) -> Result<Vec<Piece<'_>>, TemplateError> {
    let mut pieces = Vec::new();
    let mut last = 0;

    for caps in token_regex().captures_iter(template) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > last {
            pieces.push(Piece::Text(&template[last..whole.start()]));
        }
        last = whole.end();

        if let Some(name) = caps.get(1) {
            pieces.push(Piece::Placeholder(name.as_str()));
            continue;
        }
        match whole.as_str() {
            "{{" => pieces.push(Piece::Brace("{")),
            "}}" => pieces.push(Piece::Brace("}")),
            "{" => {
                return Err(TemplateError::syntax(
                    whole.start(),
                    "expected a placeholder name followed by '}' (use '{{' for a literal brace)",
                ))
            }
            _ => {
                return Err(TemplateError::syntax(
                    whole.start(),
                    "unmatched '}' (use '}}' for a literal brace)",
                ))
            }
        }
    }

    if last < template.len() {
        pieces.push(Piece::Text(&template[last..]));
    }

    Ok(pieces)
}

/// Returns the placeholder names of a template in order of first appearance.
pub fn placeholders(template: &str) -> Result<Vec<String>, TemplateError> {
    let mut seen = BTreeSet::new();
    let mut names = Vec::new();
    for piece in tokenize(template)? {
        if let Piece::Placeholder(name) = piece {
            if seen.insert(name) {
                names.push(name.to_string());
            }
        }
    }
    Ok(names)
}

/// Renders a template, substituting every placeholder from `params`.
///
/// # Errors
///
/// - `TemplateError::Syntax` - a stray or malformed brace
/// - `TemplateError::MissingParameter` - a placeholder without a value
/// - `TemplateError::UnusedParameters` - values the template never references
pub fn render_template(
    template: &str,
    params: &QueryParams,
    formatter: &dyn SqlFormatter,
) -> Result<String, TemplateError> {
    let pieces = tokenize(template)?;

    let mut used = BTreeSet::new();
    let mut rendered = String::with_capacity(template.len());

    for piece in pieces {
        match piece {
            Piece::Text(text) => rendered.push_str(text),
            Piece::Brace(brace) => rendered.push_str(brace),
            Piece::Placeholder(name) => {
                let value = params
                    .get(name)
                    .ok_or_else(|| TemplateError::MissingParameter(name.to_string()))?;
                rendered.push_str(&value.render(formatter));
                used.insert(name);
            }
        }
    }

    let unused: Vec<String> = params
        .names()
        .filter(|name| !used.contains(name))
        .map(str::to_string)
        .collect();
    if !unused.is_empty() {
        return Err(TemplateError::UnusedParameters(unused));
    }

    Ok(rendered)
}
