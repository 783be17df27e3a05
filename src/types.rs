//! Scalar column type resolution.
//!
//! The driver never interprets type names itself; it asks a [`TypeRegistry`]
//! for a [`TypeHandle`] and stores that on the property. Unknown names are an
//! error at load time rather than at first use.

use crate::error::{MappingError, MappingResult};
use serde::Serialize;
use std::collections::HashSet;

/// Resolved scalar type of a column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TypeHandle {
    name: String,
}

impl TypeHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether values of this type carry a length (used for discriminator
    /// column defaults).
    pub fn is_string_like(&self) -> bool {
        matches!(self.name.as_str(), "string" | "text" | "guid")
    }
}

pub trait TypeRegistry: Send + Sync {
    fn lookup(&self, type_name: &str) -> MappingResult<TypeHandle>;

    fn has_type(&self, type_name: &str) -> bool {
        self.lookup(type_name).is_ok()
    }
}

const BUILTIN_TYPES: &[&str] = &[
    "string",
    "text",
    "integer",
    "smallint",
    "bigint",
    "boolean",
    "decimal",
    "float",
    "date",
    "time",
    "datetime",
    "datetimetz",
    "date_immutable",
    "datetime_immutable",
    "json",
    "array",
    "simple_array",
    "object",
    "binary",
    "blob",
    "guid",
    "dateinterval",
];

/// Registry preloaded with the standard scalar types.
#[derive(Debug, Clone)]
pub struct DefaultTypeRegistry {
    types: HashSet<String>,
}

impl DefaultTypeRegistry {
    pub fn new() -> Self {
        Self {
            types: BUILTIN_TYPES.iter().map(|name| name.to_string()).collect(),
        }
    }

    /// Make a custom type name resolvable.
    pub fn register(&mut self, type_name: impl Into<String>) -> &mut Self {
        self.types.insert(type_name.into());
        self
    }
}

impl Default for DefaultTypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry for DefaultTypeRegistry {
    fn lookup(&self, type_name: &str) -> MappingResult<TypeHandle> {
        if self.types.contains(type_name) {
            Ok(TypeHandle::new(type_name))
        } else {
            Err(MappingError::UnknownType {
                type_name: type_name.to_string(),
            })
        }
    }
}
