//! Error types for the template module.

use thiserror::Error;

/// Errors that can occur while rendering a SQL template.
///
/// Templates are developer-authored constants, so any of these indicates a
/// programming error in the template or in the parameters built for it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// A brace that is neither an escape (`{{`, `}}`) nor a well-formed placeholder.
    #[error("template syntax error at byte {position}: {message}")]
    Syntax {
        /// Byte offset of the offending brace.
        position: usize,
        /// What was wrong.
        message: String,
    },

    /// A placeholder appears in the template but no value was supplied for it.
    #[error("missing value for placeholder {{{0}}}")]
    MissingParameter(String),

    /// Values were supplied for names the template never references.
    #[error("parameters not referenced by the template: {}", .0.join(", "))]
    UnusedParameters(Vec<String>),
}

impl TemplateError {
    pub(crate) fn syntax(position: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            position,
            message: message.into(),
        }
    }
}
