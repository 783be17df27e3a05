//! Error types for mapping operations.
//!
//! Every public API in this crate returns `MappingResult<T>`, an alias for
//! `Result<T, MappingError>`. An error aborts assembly of the class being
//! loaded; nothing is retried and no partial metadata is returned.
//!
//! # Error Handling Example
//!
//! ```
//! use netabase_mapping::error::{ErrorCategory, MappingError};
//!
//! let error = MappingError::DuplicateColumnName {
//!     class_name: "App\\User".to_string(),
//!     column_name: "email".to_string(),
//! };
//!
//! assert_eq!(error.category(), ErrorCategory::DuplicateDefinition);
//! assert!(error.to_string().contains("email"));
//! ```

use thiserror::Error;

/// Result type alias for mapping operations.
pub type MappingResult<T> = Result<T, MappingError>;

/// Coarse classification of a [`MappingError`].
///
/// Callers that only care about *why* a document was rejected, not the exact
/// variant, can match on this instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The document has a shape the driver does not accept.
    Structural,
    /// A column or property name is declared twice.
    DuplicateDefinition,
    /// The declared attributes contradict each other.
    InvariantViolation,
    /// A referenced class or type cannot be found.
    UnresolvedReference,
    /// An enumerated attribute value matches no known constant.
    Lookup,
    /// Failures outside the mapping document itself (I/O, XML syntax, config).
    Environment,
}

/// The main error type for mapping operations.
#[derive(Error, Debug)]
pub enum MappingError {
    #[error("Class '{class_name}' is not a valid entity, mapped superclass or embeddable (root element <{element}>)")]
    InvalidRootElement { class_name: String, element: String },

    #[error("Invalid field override named '{field_name}' for class '{class_name}'")]
    InvalidOverrideFieldName { class_name: String, field_name: String },

    #[error("Override of '{field_name}' in class '{class_name}' cannot apply <{element}> to a {kind} property")]
    OverrideNotApplicable {
        class_name: String,
        field_name: String,
        element: String,
        kind: &'static str,
    },

    #[error("Table id generator is not yet implemented (class '{class_name}')")]
    TableIdGeneratorNotImplemented { class_name: String },

    #[error("<index-by /> is not a valid tag (field '{field_name}' of class '{class_name}')")]
    InvalidIndexByElement { class_name: String, field_name: String },

    #[error("Element <{element}> in class '{class_name}' is missing required attribute '{attribute}'")]
    MissingAttribute {
        class_name: String,
        element: String,
        attribute: &'static str,
    },

    #[error("Duplicate definition of column '{column_name}' on entity '{class_name}'")]
    DuplicateColumnName { class_name: String, column_name: String },

    #[error("Property '{field_name}' is already declared in class '{class_name}'")]
    DuplicateProperty { class_name: String, field_name: String },

    #[error("Entity listener '{listener_class}#{method}' is declared twice for event '{event}' on '{class_name}'")]
    DuplicateEntityListener {
        class_name: String,
        listener_class: String,
        method: String,
        event: String,
    },

    #[error("Field '{field_name}' of class '{class_name}' cannot be both the identifier and the version field")]
    CannotVersionIdField { class_name: String, field_name: String },

    #[error("Many-to-many or one-to-many association '{field_name}' of class '{class_name}' cannot be an identifier")]
    IllegalToManyIdentifierAssociation { class_name: String, field_name: String },

    #[error("Cannot instantiate custom generator for class '{class_name}': no class has been defined")]
    CustomGeneratorClassMissing { class_name: String },

    #[error("Cannot instantiate custom generator '{generator_class}' for class '{class_name}'")]
    CustomGeneratorNotFound {
        class_name: String,
        generator_class: String,
    },

    #[error("Entity listener '{listener_class}' declared on '{class_name}' not found")]
    EntityListenerClassNotFound {
        class_name: String,
        listener_class: String,
    },

    #[error("Unknown column type '{type_name}' requested")]
    UnknownType { type_name: String },

    #[error("Unknown {kind} constant '{value}'")]
    UnknownConstant { kind: &'static str, value: String },

    #[error("No mapping document found for class '{0}'")]
    ClassNotFound(String),

    #[error("Invalid mapping file '{file}' for class '{class_name}'")]
    InvalidMappingFile { class_name: String, file: String },

    #[error("Class '{0}' is not covered by any driver in the chain")]
    NoDriverForClass(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Xml(#[from] roxmltree::Error),

    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    TomlDeError(#[from] toml::de::Error),
}

impl MappingError {
    pub fn category(&self) -> ErrorCategory {
        use MappingError::*;

        match self {
            InvalidRootElement { .. }
            | InvalidOverrideFieldName { .. }
            | OverrideNotApplicable { .. }
            | TableIdGeneratorNotImplemented { .. }
            | InvalidIndexByElement { .. }
            | MissingAttribute { .. }
            | InvalidMappingFile { .. } => ErrorCategory::Structural,
            DuplicateColumnName { .. } | DuplicateProperty { .. } | DuplicateEntityListener { .. } => {
                ErrorCategory::DuplicateDefinition
            }
            CannotVersionIdField { .. } | IllegalToManyIdentifierAssociation { .. } => {
                ErrorCategory::InvariantViolation
            }
            CustomGeneratorClassMissing { .. }
            | CustomGeneratorNotFound { .. }
            | EntityListenerClassNotFound { .. }
            | UnknownType { .. } => ErrorCategory::UnresolvedReference,
            UnknownConstant { .. } => ErrorCategory::Lookup,
            ClassNotFound(_) | NoDriverForClass(_) | Configuration(_) | Xml(_) | IoError(_)
            | TomlDeError(_) => ErrorCategory::Environment,
        }
    }

    /// Shorthand for the lookup failure every enumerated parse produces.
    pub(crate) fn unknown_constant(kind: &'static str, value: impl Into<String>) -> Self {
        MappingError::UnknownConstant {
            kind,
            value: value.into(),
        }
    }
}
