use crate::metadata::constants::CacheUsage;
use indexmap::IndexMap;
use serde::Serialize;

/// Key of an entry in an [`Options`] tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum OptionKey {
    Named(String),
    Index(usize),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum OptionValue {
    Text(String),
    Bool(bool),
    Nested(Options),
}

impl OptionValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            OptionValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    pub fn as_nested(&self) -> Option<&Options> {
        match self {
            OptionValue::Nested(options) => Some(options),
            _ => None,
        }
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::Text(value.to_string())
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Bool(value)
    }
}

/// Ordered option tree mixing named and positional entries.
///
/// Positional entries are numbered from zero in the order they are pushed,
/// independently of any named entries around them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Options {
    entries: IndexMap<OptionKey, OptionValue>,
    #[serde(skip)]
    next_index: usize,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a named entry. A repeated name keeps its position and takes the
    /// new value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<OptionValue>) {
        self.entries.insert(OptionKey::Named(name.into()), value.into());
    }

    pub fn push(&mut self, value: impl Into<OptionValue>) {
        self.entries.insert(OptionKey::Index(self.next_index), value.into());
        self.next_index += 1;
    }

    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.entries.get(&OptionKey::Named(name.to_string()))
    }

    pub fn get_index(&self, index: usize) -> Option<&OptionValue> {
        self.entries.get(&OptionKey::Index(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&OptionKey, &OptionValue)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Options> for OptionValue {
    fn from(value: Options) -> Self {
        OptionValue::Nested(value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IndexMetadata {
    pub name: Option<String>,
    pub columns: Vec<String>,
    pub unique: bool,
    pub flags: Vec<String>,
    pub options: Options,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UniqueConstraintMetadata {
    pub name: Option<String>,
    pub columns: Vec<String>,
    pub flags: Vec<String>,
    pub options: Options,
}

/// Primary table of an entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableMetadata {
    pub name: String,
    pub schema: Option<String>,
    pub indexes: Vec<IndexMetadata>,
    pub unique_constraints: Vec<UniqueConstraintMetadata>,
    pub options: Options,
}

impl TableMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// `schema.name` when a schema is set, otherwise just the name.
    pub fn qualified_name(&self) -> String {
        match &self.schema {
            Some(schema) => format!("{}.{}", schema, self.name),
            None => self.name.clone(),
        }
    }
}

/// Second level cache settings for a class or a single association.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheMetadata {
    pub usage: CacheUsage,
    pub region: String,
}

impl CacheMetadata {
    pub fn new(usage: CacheUsage, region: impl Into<String>) -> Self {
        Self {
            usage,
            region: region.into(),
        }
    }
}

/// Foreign key column of an owning association.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinColumnMetadata {
    pub column_name: String,
    pub referenced_column_name: String,
    pub nullable: bool,
    pub unique: bool,
    /// Uppercased referential action, empty when not declared.
    pub on_delete: String,
    pub column_definition: Option<String>,
    pub aliased_name: Option<String>,
}

impl Default for JoinColumnMetadata {
    fn default() -> Self {
        Self {
            column_name: String::new(),
            referenced_column_name: String::new(),
            nullable: true,
            unique: false,
            on_delete: String::new(),
            column_definition: None,
            aliased_name: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JoinTableMetadata {
    pub name: Option<String>,
    pub schema: Option<String>,
    pub join_columns: Vec<JoinColumnMetadata>,
    pub inverse_join_columns: Vec<JoinColumnMetadata>,
}

impl JoinTableMetadata {
    pub fn add_join_column(&mut self, join_column: JoinColumnMetadata) {
        self.join_columns.push(join_column);
    }

    pub fn add_inverse_join_column(&mut self, join_column: JoinColumnMetadata) {
        self.inverse_join_columns.push(join_column);
    }
}
