use crate::metadata::constants::GeneratorType;
use crate::metadata::table::Options;
use crate::types::TypeHandle;
use serde::Serialize;

/// Strategy-specific part of an identifier generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum GeneratorDefinition {
    Sequence {
        sequence_name: String,
        /// Kept as declared in the document.
        allocation_size: String,
    },
    Custom {
        class_name: String,
        arguments: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueGeneratorMetadata {
    pub generator_type: GeneratorType,
    pub definition: Option<GeneratorDefinition>,
}

impl ValueGeneratorMetadata {
    pub fn new(generator_type: GeneratorType, definition: Option<GeneratorDefinition>) -> Self {
        Self {
            generator_type,
            definition,
        }
    }
}

/// Scalar property stored in a single column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldMetadata {
    pub name: String,
    pub type_handle: TypeHandle,
    pub column_name: String,
    pub nullable: bool,
    pub unique: bool,
    pub length: Option<u32>,
    pub precision: Option<u32>,
    pub scale: Option<u32>,
    pub versioned: bool,
    pub column_definition: Option<String>,
    pub options: Options,
    pub primary_key: bool,
    pub value_generator: Option<ValueGeneratorMetadata>,
}

impl FieldMetadata {
    pub fn new(name: impl Into<String>, type_handle: TypeHandle, column_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_handle,
            column_name: column_name.into(),
            nullable: false,
            unique: false,
            length: None,
            precision: None,
            scale: None,
            versioned: false,
            column_definition: None,
            options: Options::new(),
            primary_key: false,
            value_generator: None,
        }
    }

    pub fn type_name(&self) -> &str {
        self.type_handle.name()
    }

    pub fn has_value_generator(&self) -> bool {
        self.value_generator.is_some()
    }
}

/// Column prefix policy of an embedded value object.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub enum ColumnPrefix {
    /// No explicit prefix; the engine derives one from the field name.
    #[default]
    Derived,
    Custom(String),
    /// `use-column-prefix="false"`: columns are used unprefixed.
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbeddedMetadata {
    pub name: String,
    pub target_class: String,
    pub column_prefix: ColumnPrefix,
}

impl EmbeddedMetadata {
    pub fn new(name: impl Into<String>, target_class: impl Into<String>, column_prefix: ColumnPrefix) -> Self {
        Self {
            name: name.into(),
            target_class: target_class.into(),
            column_prefix,
        }
    }
}
