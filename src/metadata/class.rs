//! Class level metadata and the invariants enforced while it is populated.

use crate::error::{MappingError, MappingResult};
use crate::metadata::constants::{ChangeTrackingPolicy, InheritanceType, LifecycleEvent};
use crate::metadata::field::FieldMetadata;
use crate::metadata::property::PropertyMetadata;
use crate::metadata::table::{CacheMetadata, TableMetadata};
use crate::types::TypeHandle;
use indexmap::IndexMap;
use serde::Serialize;
use std::sync::Arc;
use strum::{AsRefStr, Display};

/// Which root element a class was declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, AsRefStr, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ComponentKind {
    #[default]
    Entity,
    MappedSuperclass,
    Embeddable,
}

/// Identity of a mapped component and its place in the hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentMetadata {
    pub class_name: String,
    /// Already built ancestor; shared with the registry that owns it.
    #[serde(skip)]
    pub parent: Option<Arc<ClassMetadata>>,
    pub kind: ComponentKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscriminatorColumnMetadata {
    pub column_name: String,
    pub type_handle: TypeHandle,
    pub length: Option<u32>,
    pub column_definition: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityListenerMetadata {
    /// Event name exactly as declared; not checked against [`LifecycleEvent`].
    pub event: String,
    pub listener_class: String,
    pub method: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassMetadata {
    component: ComponentMetadata,
    pub table: Option<TableMetadata>,
    pub inheritance_type: InheritanceType,
    pub change_tracking_policy: ChangeTrackingPolicy,
    pub discriminator_column: Option<DiscriminatorColumnMetadata>,
    /// Discriminator value to class name.
    pub discriminator_map: IndexMap<String, String>,
    pub custom_repository_class_name: Option<String>,
    pub read_only: bool,
    pub cache: Option<CacheMetadata>,
    properties: IndexMap<String, PropertyMetadata>,
    lifecycle_callbacks: IndexMap<LifecycleEvent, Vec<String>>,
    entity_listeners: Vec<EntityListenerMetadata>,
}

impl ClassMetadata {
    pub fn new(class_name: impl Into<String>, parent: Option<Arc<ClassMetadata>>) -> Self {
        Self {
            component: ComponentMetadata {
                class_name: class_name.into(),
                parent,
                kind: ComponentKind::Entity,
            },
            table: None,
            inheritance_type: InheritanceType::None,
            change_tracking_policy: ChangeTrackingPolicy::default(),
            discriminator_column: None,
            discriminator_map: IndexMap::new(),
            custom_repository_class_name: None,
            read_only: false,
            cache: None,
            properties: IndexMap::new(),
            lifecycle_callbacks: IndexMap::new(),
            entity_listeners: Vec::new(),
        }
    }

    pub fn class_name(&self) -> &str {
        &self.component.class_name
    }

    pub fn parent(&self) -> Option<&ClassMetadata> {
        self.component.parent.as_deref()
    }

    pub fn component(&self) -> &ComponentMetadata {
        &self.component
    }

    pub fn kind(&self) -> ComponentKind {
        self.component.kind
    }

    pub fn set_kind(&mut self, kind: ComponentKind) {
        self.component.kind = kind;
    }

    pub fn is_mapped_superclass(&self) -> bool {
        self.component.kind == ComponentKind::MappedSuperclass
    }

    pub fn is_embedded_class(&self) -> bool {
        self.component.kind == ComponentKind::Embeddable
    }

    pub fn as_read_only(&mut self) {
        self.read_only = true;
    }

    /// Name of the topmost ancestor.
    pub fn root_class_name(&self) -> &str {
        let mut current = self;
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current.class_name()
    }

    /// Table shared through single table inheritance.
    ///
    /// Only consulted when the direct parent uses single table inheritance.
    /// Mapped superclasses in between are skipped; `None` when every ancestor
    /// is a mapped superclass or the parent uses another strategy.
    pub fn inherited_table(&self) -> Option<&TableMetadata> {
        let parent = self.parent()?;
        if parent.inheritance_type != InheritanceType::SingleTable {
            return None;
        }

        let mut ancestor = Some(parent);
        while let Some(current) = ancestor {
            if !current.is_mapped_superclass() {
                return current.table.as_ref();
            }
            ancestor = current.parent();
        }
        None
    }

    pub fn property(&self, name: &str) -> Option<&PropertyMetadata> {
        self.properties.get(name)
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    pub fn properties(&self) -> impl Iterator<Item = &PropertyMetadata> {
        self.properties.values()
    }

    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldMetadata> {
        self.properties.values().filter_map(PropertyMetadata::as_field)
    }

    pub fn field(&self, name: &str) -> Option<&FieldMetadata> {
        self.property(name).and_then(PropertyMetadata::as_field)
    }

    pub fn identifier(&self) -> Vec<&str> {
        self.properties
            .values()
            .filter(|p| p.is_primary_key())
            .map(PropertyMetadata::name)
            .collect()
    }

    /// Add a new property; its name must not be declared yet.
    pub fn add_property(&mut self, property: impl Into<PropertyMetadata>) -> MappingResult<()> {
        let property = property.into();
        let name = property.name().to_string();

        if self.properties.contains_key(&name) {
            return Err(MappingError::DuplicateProperty {
                class_name: self.class_name().to_string(),
                field_name: name,
            });
        }

        self.properties.insert(name, property);
        Ok(())
    }

    /// Replace a property in place, or append it when it is not declared on
    /// this class (an inherited or embedded field being overridden).
    pub fn set_property_override(&mut self, property: impl Into<PropertyMetadata>) {
        let property = property.into();
        self.properties.insert(property.name().to_string(), property);
    }

    /// Whether `column_name` is already taken by a field or the discriminator
    /// column of this class.
    pub fn check_property_duplication(&self, column_name: &str) -> bool {
        self.column_taken(column_name, None)
    }

    /// Like [`check_property_duplication`](Self::check_property_duplication)
    /// but ignoring the field `except`, whose column is about to be replaced.
    pub fn check_property_duplication_except(&self, column_name: &str, except: &str) -> bool {
        self.column_taken(column_name, Some(except))
    }

    fn column_taken(&self, column_name: &str, except: Option<&str>) -> bool {
        let discriminator = self
            .discriminator_column
            .as_ref()
            .is_some_and(|d| d.column_name == column_name);

        discriminator
            || self
                .fields()
                .filter(|f| Some(f.name.as_str()) != except)
                .any(|f| f.column_name == column_name)
    }

    pub fn lifecycle_callbacks(&self, event: LifecycleEvent) -> &[String] {
        self.lifecycle_callbacks
            .get(&event)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn has_lifecycle_callbacks(&self, event: LifecycleEvent) -> bool {
        !self.lifecycle_callbacks(event).is_empty()
    }

    /// Register `method` for `event`; registering the same pair twice is a
    /// no-op.
    pub fn add_lifecycle_callback(&mut self, event: LifecycleEvent, method: impl Into<String>) {
        let method = method.into();
        let callbacks = self.lifecycle_callbacks.entry(event).or_default();
        if !callbacks.contains(&method) {
            callbacks.push(method);
        }
    }

    pub fn entity_listeners(&self) -> &[EntityListenerMetadata] {
        &self.entity_listeners
    }

    pub fn add_entity_listener(
        &mut self,
        event: impl Into<String>,
        listener_class: impl Into<String>,
        method: impl Into<String>,
    ) -> MappingResult<()> {
        let listener = EntityListenerMetadata {
            event: event.into(),
            listener_class: listener_class.into(),
            method: method.into(),
        };

        if self.entity_listeners.contains(&listener) {
            return Err(MappingError::DuplicateEntityListener {
                class_name: self.class_name().to_string(),
                listener_class: listener.listener_class,
                method: listener.method,
                event: listener.event,
            });
        }

        self.entity_listeners.push(listener);
        Ok(())
    }
}
