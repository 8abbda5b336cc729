use std::fmt;

use crate::{ModelError, Result};

/// Schema-qualified object name. Both parts are compared byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SchemaQualifiedName {
    pub schema: String,
    pub name: String,
}

impl SchemaQualifiedName {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
        }
    }

    /// Parses a `schema.name` pair. Everything before the first dot is the
    /// schema; the rest is the object name.
    pub fn parse(text: &str) -> Result<Self> {
        let Some((schema, name)) = text.split_once('.') else {
            return Err(ModelError::InvalidInput {
                what: format!("`{text}` is not a schema-qualified name"),
            }
            .into());
        };

        if schema.is_empty() || name.is_empty() {
            return Err(ModelError::InvalidInput {
                what: format!("`{text}` has an empty schema or name part"),
            }
            .into());
        }

        Ok(Self::new(schema, name))
    }

    #[must_use]
    pub fn with_name(&self, name: impl Into<String>) -> Self {
        Self::new(self.schema.clone(), name)
    }

    #[must_use]
    pub fn with_schema(&self, schema: impl Into<String>) -> Self {
        Self::new(schema, self.name.clone())
    }
}

impl fmt::Display for SchemaQualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.name)
    }
}
