//! Object reference resolution.
//!
//! Table and view operations accept either a bare object name or an explicit
//! `(schema, name)` pair. [`IntoObjectRef`] dispatches on the shape of the
//! argument, and [`resolve`] turns the result into the pair of catalog values
//! that the existence probes compare against.
//!
//! A bare name takes the connection's current schema. The current schema is
//! session state that can change between calls, so it is read on every call
//! and never cached.

use crate::connection::Connection;
use crate::error::MetaError;
use std::fmt;

/// A catalog object name with an optional schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    schema: Option<String>,
    name: String,
}

impl QualifiedName {
    /// A name in the connection's current schema.
    pub fn bare(name: impl Into<String>) -> Result<Self, MetaError> {
        let name = name.into();
        if name.is_empty() {
            return Err(MetaError::argument("object name must not be empty"));
        }
        Ok(Self { schema: None, name })
    }

    /// A name in an explicit schema.
    pub fn qualified(schema: impl Into<String>, name: impl Into<String>) -> Result<Self, MetaError> {
        let schema = schema.into();
        if schema.is_empty() {
            return Err(MetaError::argument("schema name must not be empty"));
        }
        let mut qualified = Self::bare(name)?;
        qualified.schema = Some(schema);
        Ok(qualified)
    }

    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.schema {
            Some(schema) => write!(f, "{schema}.{}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// Conversion from the accepted object reference shapes.
///
/// Implemented for bare names (`&str`, `String`), pairs (`(&str, &str)`,
/// `(String, String)`), slices and vectors of one or two parts, and
/// [`QualifiedName`] itself.
pub trait IntoObjectRef {
    fn into_object_ref(self) -> Result<QualifiedName, MetaError>;
}

impl IntoObjectRef for QualifiedName {
    fn into_object_ref(self) -> Result<QualifiedName, MetaError> {
        Ok(self)
    }
}

impl IntoObjectRef for &QualifiedName {
    fn into_object_ref(self) -> Result<QualifiedName, MetaError> {
        Ok(self.clone())
    }
}

impl IntoObjectRef for &str {
    fn into_object_ref(self) -> Result<QualifiedName, MetaError> {
        QualifiedName::bare(self)
    }
}

impl IntoObjectRef for String {
    fn into_object_ref(self) -> Result<QualifiedName, MetaError> {
        QualifiedName::bare(self)
    }
}

impl IntoObjectRef for &String {
    fn into_object_ref(self) -> Result<QualifiedName, MetaError> {
        QualifiedName::bare(self.as_str())
    }
}

impl IntoObjectRef for (&str, &str) {
    fn into_object_ref(self) -> Result<QualifiedName, MetaError> {
        QualifiedName::qualified(self.0, self.1)
    }
}

impl IntoObjectRef for (String, String) {
    fn into_object_ref(self) -> Result<QualifiedName, MetaError> {
        QualifiedName::qualified(self.0, self.1)
    }
}

impl<S: AsRef<str>> IntoObjectRef for &[S] {
    fn into_object_ref(self) -> Result<QualifiedName, MetaError> {
        match self {
            [name] => QualifiedName::bare(name.as_ref()),
            [schema, name] => QualifiedName::qualified(schema.as_ref(), name.as_ref()),
            parts => Err(MetaError::argument(format!(
                "expected a name or a (schema, name) pair, got {} parts",
                parts.len()
            ))),
        }
    }
}

impl<S: AsRef<str>> IntoObjectRef for Vec<S> {
    fn into_object_ref(self) -> Result<QualifiedName, MetaError> {
        self.as_slice().into_object_ref()
    }
}

/// Schema and object name as catalog values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedName {
    pub schema: String,
    pub name: String,
}

/// Resolves an object reference against the connection.
///
/// Explicit schema and object names are normalized with the connection's
/// formatter. A missing schema is replaced by the current schema exactly as
/// the connection reports it.
pub fn resolve(object: &QualifiedName, connection: &dyn Connection) -> Result<ResolvedName, MetaError> {
    let formatter = connection.formatter();
    let name = formatter.normalize_identifier(object.name());
    let schema = match object.schema() {
        Some(schema) => formatter.normalize_identifier(schema),
        None => connection.current_schema()?,
    };

    #[cfg(feature = "tracing")]
    tracing::trace!(input = %object, schema = %schema, name = %name, "resolved object reference");

    Ok(ResolvedName { schema, name })
}
