//! XML mapping driver.
//!
//! [`XmlDriver`] resolves the mapping element of a class through its locator
//! and folds it into a fresh [`ClassMetadata`]. Sections are processed in a
//! fixed order because later ones depend on earlier ones: the discriminator
//! column takes part in the column duplication check of every field, and
//! `association-key` ids decide whether an association is an identifier.

use crate::config::DriverConfig;
use crate::context::BuildingContext;
use crate::driver::MappingDriver;
use crate::driver::convert::{
    boolean_attribute, cascade_mappings, convert_cache, convert_discriminator_column,
    convert_discriminator_map, convert_field, convert_join_column, convert_join_columns,
    convert_join_table, convert_order_by, parse_indexes, parse_options, parse_unique_constraints,
    required_attribute,
};
use crate::error::{MappingError, MappingResult};
use crate::locator::{FileLocator, MappingLocator};
use crate::metadata::{
    AssociationMetadata, AssociationOverride, ChangeTrackingPolicy, ClassMetadata, ColumnPrefix,
    ComponentKind, EmbeddedMetadata, FetchMode, GeneratorDefinition, GeneratorType,
    InheritanceType, JoinColumnMetadata, LifecycleEvent, ManyToManyAssociationMetadata,
    ManyToOneAssociationMetadata, OneToManyAssociationMetadata, OneToOneAssociationMetadata,
    OverrideConflict, PropertyMetadata, TableMetadata, ToManyMetadata, ValueGeneratorMetadata,
};
use crate::xml::XmlElement;
use log::{debug, trace};
use std::collections::HashSet;
use std::sync::Arc;

/// Mapping driver reading XML mapping documents.
///
/// # Examples
///
/// ```
/// use netabase_mapping::context::BuildingContext;
/// use netabase_mapping::driver::{MappingDriver, XmlDriver};
/// use netabase_mapping::locator::InMemoryLocator;
///
/// let mut locator = InMemoryLocator::new();
/// locator
///     .add_document(r#"<entity name="X" table="x"><id name="id" type="integer"/></entity>"#)
///     .unwrap();
///
/// let driver = XmlDriver::new(locator);
/// let metadata = driver
///     .load_metadata_for_class("X", None, &BuildingContext::default())
///     .unwrap();
///
/// assert_eq!(metadata.table.as_ref().unwrap().name, "x");
/// assert_eq!(metadata.identifier(), vec!["id"]);
/// ```
#[derive(Clone)]
pub struct XmlDriver {
    locator: Arc<dyn MappingLocator>,
}

impl XmlDriver {
    pub fn new(locator: impl MappingLocator + 'static) -> Self {
        Self {
            locator: Arc::new(locator),
        }
    }

    pub fn with_locator(locator: Arc<dyn MappingLocator>) -> Self {
        Self { locator }
    }

    /// Driver over a [`FileLocator`] built from `config`.
    pub fn from_config(config: &DriverConfig) -> Self {
        Self::new(FileLocator::from_config(config))
    }

    pub fn locator(&self) -> &dyn MappingLocator {
        self.locator.as_ref()
    }
}

impl std::fmt::Debug for XmlDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XmlDriver").finish_non_exhaustive()
    }
}

impl MappingDriver for XmlDriver {
    fn load_metadata_for_class(
        &self,
        class_name: &str,
        parent: Option<Arc<ClassMetadata>>,
        context: &BuildingContext,
    ) -> MappingResult<ClassMetadata> {
        debug!("XmlDriver: Loading metadata for {}", class_name);

        let element = self.locator.resolve(class_name)?;
        let metadata = ClassMetadataAssembler::new(&element, class_name, parent, context).assemble()?;

        debug!(
            "XmlDriver: Loaded {} ({} properties, kind {})",
            class_name,
            metadata.property_names().count(),
            metadata.kind()
        );
        Ok(metadata)
    }

    fn all_class_names(&self) -> MappingResult<Vec<String>> {
        self.locator.all_class_names()
    }

    fn is_transient(&self, class_name: &str) -> bool {
        !self.locator.contains(class_name)
    }
}

/// `<id association-key="true">` field names, consulted while associations
/// are read.
#[derive(Debug, Default)]
struct AssociationKeys(HashSet<String>);

impl AssociationKeys {
    fn mark(&mut self, field_name: &str) {
        self.0.insert(field_name.to_string());
    }

    fn contains(&self, field_name: &str) -> bool {
        self.0.contains(field_name)
    }
}

/// State of one `load_metadata_for_class` call.
struct ClassMetadataAssembler<'a> {
    element: &'a XmlElement,
    context: &'a BuildingContext,
    metadata: ClassMetadata,
    association_keys: AssociationKeys,
}

impl<'a> ClassMetadataAssembler<'a> {
    fn new(
        element: &'a XmlElement,
        class_name: &str,
        parent: Option<Arc<ClassMetadata>>,
        context: &'a BuildingContext,
    ) -> Self {
        Self {
            element,
            context,
            metadata: ClassMetadata::new(class_name, parent),
            association_keys: AssociationKeys::default(),
        }
    }

    fn class_name(&self) -> String {
        self.metadata.class_name().to_string()
    }

    fn assemble(mut self) -> MappingResult<ClassMetadata> {
        self.classify()?;
        self.resolve_table();
        self.read_class_cache()?;
        self.read_inheritance()?;
        self.read_change_tracking_policy()?;
        self.read_fields()?;
        self.read_embedded()?;
        self.read_ids()?;
        self.read_one_to_one()?;
        self.read_one_to_many()?;
        self.read_many_to_one()?;
        self.read_many_to_many()?;
        self.read_attribute_overrides()?;
        self.read_association_overrides()?;
        self.read_lifecycle_callbacks()?;
        self.read_entity_listeners()?;
        Ok(self.metadata)
    }

    fn classify(&mut self) -> MappingResult<()> {
        let root = self.element;

        match root.name() {
            "entity" => {
                self.metadata.set_kind(ComponentKind::Entity);
                self.metadata.custom_repository_class_name =
                    root.attribute("repository-class").map(str::to_string);
                if boolean_attribute(root, "read-only") {
                    self.metadata.as_read_only();
                }
            }
            "mapped-superclass" => {
                self.metadata.set_kind(ComponentKind::MappedSuperclass);
                self.metadata.custom_repository_class_name =
                    root.attribute("repository-class").map(str::to_string);
            }
            "embeddable" => self.metadata.set_kind(ComponentKind::Embeddable),
            other => {
                return Err(MappingError::InvalidRootElement {
                    class_name: self.class_name(),
                    element: other.to_string(),
                });
            }
        }

        trace!("XmlDriver: {} is a {}", self.metadata.class_name(), self.metadata.kind());
        Ok(())
    }

    fn resolve_table(&mut self) {
        let single_table_parent = self
            .metadata
            .parent()
            .is_some_and(|parent| parent.inheritance_type == InheritanceType::SingleTable);

        if single_table_parent {
            self.metadata.table = self.metadata.inherited_table().cloned();
            return;
        }

        let root = self.element;
        let name = match root.attribute("table") {
            Some(table) => table.to_string(),
            None => self
                .context
                .naming_strategy
                .class_to_table_name(self.metadata.class_name()),
        };

        let mut table = TableMetadata::new(name);
        table.schema = root.attribute("schema").map(str::to_string);
        if let Some(indexes) = root.child("indexes") {
            table.indexes = parse_indexes(indexes);
        }
        if let Some(constraints) = root.child("unique-constraints") {
            table.unique_constraints = parse_unique_constraints(constraints);
        }
        if let Some(options) = root.child("options") {
            table.options = parse_options(options.children());
        }

        trace!("XmlDriver: {} maps to table {}", self.metadata.class_name(), table.qualified_name());
        self.metadata.table = Some(table);
    }

    fn read_class_cache(&mut self) -> MappingResult<()> {
        if let Some(cache) = self.element.child("cache") {
            self.metadata.cache = Some(convert_cache(cache, &self.metadata, None)?);
        }
        Ok(())
    }

    fn read_inheritance(&mut self) -> MappingResult<()> {
        let root = self.element;
        let Some(inheritance_type) = root.attribute("inheritance-type") else {
            return Ok(());
        };

        self.metadata.inheritance_type = InheritanceType::parse(inheritance_type)?;
        if self.metadata.inheritance_type == InheritanceType::None {
            return Ok(());
        }

        self.metadata.discriminator_column = Some(convert_discriminator_column(
            root.child("discriminator-column"),
            self.context,
        )?);
        if let Some(map) = root.child("discriminator-map") {
            self.metadata.discriminator_map = convert_discriminator_map(map);
        }
        Ok(())
    }

    fn read_change_tracking_policy(&mut self) -> MappingResult<()> {
        if let Some(policy) = self.element.attribute("change-tracking-policy") {
            self.metadata.change_tracking_policy = ChangeTrackingPolicy::parse(policy)?;
        }
        Ok(())
    }

    fn read_fields(&mut self) -> MappingResult<()> {
        let class_name = self.class_name();

        for element in self.element.children_named("field") {
            let name = required_attribute(element, "name", &class_name)?;
            let field = convert_field(element, name, &self.metadata, self.context, false)?;
            self.metadata.add_property(field)?;
        }
        Ok(())
    }

    fn read_embedded(&mut self) -> MappingResult<()> {
        let class_name = self.class_name();

        for element in self.element.children_named("embedded") {
            let name = required_attribute(element, "name", &class_name)?;
            let target = required_attribute(element, "class", &class_name)?;

            let use_prefix = !element.has_attribute("use-column-prefix")
                || boolean_attribute(element, "use-column-prefix");
            let column_prefix = match (use_prefix, element.attribute("column-prefix")) {
                (false, _) => ColumnPrefix::Disabled,
                (true, Some(prefix)) => ColumnPrefix::Custom(prefix.to_string()),
                (true, None) => ColumnPrefix::Derived,
            };

            self.metadata
                .add_property(EmbeddedMetadata::new(name, target, column_prefix))?;
        }
        Ok(())
    }

    fn read_ids(&mut self) -> MappingResult<()> {
        let class_name = self.class_name();

        for element in self.element.children_named("id") {
            let name = required_attribute(element, "name", &class_name)?;

            if boolean_attribute(element, "association-key") {
                trace!("XmlDriver: {}::{} is an association key", class_name, name);
                self.association_keys.mark(name);
                continue;
            }

            let mut field = convert_field(element, name, &self.metadata, self.context, false)?;
            field.primary_key = true;
            if field.versioned {
                return Err(MappingError::CannotVersionIdField {
                    class_name,
                    field_name: name.to_string(),
                });
            }

            if let Some(generator) = element.child("generator") {
                let strategy = generator.attribute("strategy").unwrap_or("AUTO");
                let generator_type = GeneratorType::parse(strategy)?;

                if generator_type != GeneratorType::None {
                    let definition = self.generator_definition(element)?;
                    field.value_generator = Some(ValueGeneratorMetadata::new(generator_type, definition));
                }
            }

            self.metadata.add_property(field)?;
        }
        Ok(())
    }

    fn generator_definition(&self, id: &XmlElement) -> MappingResult<Option<GeneratorDefinition>> {
        if let Some(sequence) = id.child("sequence-generator") {
            return Ok(Some(GeneratorDefinition::Sequence {
                sequence_name: sequence.attribute_or_empty("sequence-name").to_string(),
                allocation_size: sequence.attribute_or_empty("allocation-size").to_string(),
            }));
        }

        if let Some(custom) = id.child("custom-id-generator") {
            let generator_class = match custom.attribute("class") {
                Some(class) if !class.is_empty() => class,
                _ => {
                    return Err(MappingError::CustomGeneratorClassMissing {
                        class_name: self.class_name(),
                    });
                }
            };

            if !self.context.class_resolver.class_exists(generator_class) {
                return Err(MappingError::CustomGeneratorNotFound {
                    class_name: self.class_name(),
                    generator_class: generator_class.to_string(),
                });
            }

            return Ok(Some(GeneratorDefinition::Custom {
                class_name: generator_class.to_string(),
                arguments: Vec::new(),
            }));
        }

        if id.child("table-generator").is_some() {
            return Err(MappingError::TableIdGeneratorNotImplemented {
                class_name: self.class_name(),
            });
        }

        Ok(None)
    }

    /// Attributes shared by every association kind.
    fn read_association(&self, element: &XmlElement) -> MappingResult<AssociationMetadata> {
        let class_name = self.class_name();
        let name = required_attribute(element, "field", &class_name)?;

        let mut association = AssociationMetadata::new(name);
        association.target_entity = required_attribute(element, "target-entity", &class_name)?.to_string();
        if let Some(fetch) = element.attribute("fetch") {
            association.fetch_mode = FetchMode::parse(fetch)?;
        }
        if let Some(cascade) = element.child("cascade") {
            association.cascade = cascade_mappings(cascade)?;
        }
        if let Some(cache) = element.child("cache") {
            association.cache = Some(convert_cache(cache, &self.metadata, Some(name))?);
        }

        trace!("XmlDriver: {}::{} -> {}", class_name, name, association.target_entity);
        Ok(association)
    }

    fn reject_to_many_identifier(&self, association: &AssociationMetadata) -> MappingResult<()> {
        if self.association_keys.contains(&association.name) {
            return Err(MappingError::IllegalToManyIdentifierAssociation {
                class_name: self.class_name(),
                field_name: association.name.clone(),
            });
        }
        Ok(())
    }

    fn read_collection(&self, element: &XmlElement, field_name: &str) -> MappingResult<ToManyMetadata> {
        let mut collection = ToManyMetadata::default();

        if let Some(order_by) = element.child("order-by") {
            collection.order_by = convert_order_by(order_by);
        }

        if let Some(index_by) = element.attribute("index-by") {
            collection.index_by = Some(index_by.to_string());
        } else if element.child("index-by").is_some() {
            return Err(MappingError::InvalidIndexByElement {
                class_name: self.class_name(),
                field_name: field_name.to_string(),
            });
        }

        Ok(collection)
    }

    fn read_one_to_one(&mut self) -> MappingResult<()> {
        for element in self.element.children_named("one-to-one") {
            let mut property = OneToOneAssociationMetadata {
                association: self.read_association(element)?,
                join_columns: Vec::new(),
            };
            let association = &mut property.association;

            association.primary_key = self.association_keys.contains(&association.name);
            match element.attribute("mapped-by") {
                Some(mapped_by) => association.set_mapped_by(mapped_by),
                None => {
                    association.inversed_by = element.attribute("inversed-by").map(str::to_string);
                    property.join_columns = convert_join_columns(element);
                }
            }
            property.association.orphan_removal = boolean_attribute(element, "orphan-removal");

            self.metadata.add_property(property)?;
        }
        Ok(())
    }

    fn read_one_to_many(&mut self) -> MappingResult<()> {
        let class_name = self.class_name();

        for element in self.element.children_named("one-to-many") {
            let mut association = self.read_association(element)?;
            self.reject_to_many_identifier(&association)?;

            association.set_mapped_by(required_attribute(element, "mapped-by", &class_name)?);
            association.orphan_removal = boolean_attribute(element, "orphan-removal");

            let collection = self.read_collection(element, &association.name)?;
            self.metadata.add_property(OneToManyAssociationMetadata {
                association,
                collection,
            })?;
        }
        Ok(())
    }

    fn read_many_to_one(&mut self) -> MappingResult<()> {
        for element in self.element.children_named("many-to-one") {
            let mut association = self.read_association(element)?;

            association.primary_key = self.association_keys.contains(&association.name);
            association.inversed_by = element.attribute("inversed-by").map(str::to_string);

            self.metadata.add_property(ManyToOneAssociationMetadata {
                association,
                join_columns: convert_join_columns(element),
            })?;
        }
        Ok(())
    }

    fn read_many_to_many(&mut self) -> MappingResult<()> {
        for element in self.element.children_named("many-to-many") {
            let mut association = self.read_association(element)?;
            self.reject_to_many_identifier(&association)?;

            let mut join_table = None;
            if let Some(mapped_by) = element.attribute("mapped-by") {
                association.set_mapped_by(mapped_by);
            } else if let Some(table) = element.child("join-table") {
                association.inversed_by = element.attribute("inversed-by").map(str::to_string);
                join_table = Some(convert_join_table(table));
            }
            association.orphan_removal = boolean_attribute(element, "orphan-removal");

            let collection = self.read_collection(element, &association.name)?;
            self.metadata.add_property(ManyToManyAssociationMetadata {
                association,
                collection,
                join_table,
            })?;
        }
        Ok(())
    }

    fn read_attribute_overrides(&mut self) -> MappingResult<()> {
        let class_name = self.class_name();

        for element in self.element.nested("attribute-overrides", "attribute-override") {
            let name = required_attribute(element, "name", &class_name)?;

            let identity = match self.metadata.property(name) {
                None => None,
                Some(PropertyMetadata::Field(existing)) => {
                    Some((existing.primary_key, existing.value_generator.clone()))
                }
                Some(existing) => {
                    return Err(MappingError::OverrideNotApplicable {
                        class_name: class_name.clone(),
                        field_name: name.to_string(),
                        element: "attribute-override".to_string(),
                        kind: existing.kind(),
                    });
                }
            };

            for field_element in element.children_named("field") {
                let mut field = convert_field(field_element, name, &self.metadata, self.context, true)?;

                // The identifier survives a column override.
                if let Some((primary_key, value_generator)) = identity.clone() {
                    field.primary_key = primary_key;
                    field.value_generator = value_generator;
                }
                if field.primary_key && field.versioned {
                    return Err(MappingError::CannotVersionIdField {
                        class_name: class_name.clone(),
                        field_name: name.to_string(),
                    });
                }

                trace!("XmlDriver: overriding attribute {}::{}", class_name, name);
                self.metadata.set_property_override(field);
            }
        }
        Ok(())
    }

    fn read_association_overrides(&mut self) -> MappingResult<()> {
        let class_name = self.class_name();

        for element in self.element.nested("association-overrides", "association-override") {
            let name = required_attribute(element, "name", &class_name)?;
            let existing = self
                .metadata
                .property(name)
                .ok_or_else(|| MappingError::InvalidOverrideFieldName {
                    class_name: class_name.clone(),
                    field_name: name.to_string(),
                })?;

            let ov = AssociationOverride {
                join_columns: element.child("join-columns").map(convert_join_columns_wrapper),
                join_table: element.child("join-table").map(convert_join_table),
                inversed_by: element
                    .child("inversed-by")
                    .map(|inversed_by| inversed_by.attribute_or_empty("name").to_string()),
                fetch_mode: element.attribute("fetch").map(FetchMode::parse).transpose()?,
            };

            let conflict = |conflict: OverrideConflict| MappingError::OverrideNotApplicable {
                class_name: class_name.clone(),
                field_name: name.to_string(),
                element: conflict.element.to_string(),
                kind: existing.kind(),
            };

            let replacement: PropertyMetadata = match existing {
                PropertyMetadata::OneToOne(a) => a.overridden(&ov).map_err(conflict)?.into(),
                PropertyMetadata::ManyToOne(a) => a.overridden(&ov).map_err(conflict)?.into(),
                PropertyMetadata::OneToMany(a) => a.overridden(&ov).map_err(conflict)?.into(),
                PropertyMetadata::ManyToMany(a) => a.overridden(&ov).map_err(conflict)?.into(),
                PropertyMetadata::Field(_) | PropertyMetadata::Embedded(_) => {
                    return Err(conflict(OverrideConflict {
                        element: "association-override",
                    }));
                }
            };

            trace!("XmlDriver: overriding association {}::{}", class_name, name);
            self.metadata.set_property_override(replacement);
        }
        Ok(())
    }

    fn read_lifecycle_callbacks(&mut self) -> MappingResult<()> {
        for element in self.element.nested("lifecycle-callbacks", "lifecycle-callback") {
            let event = LifecycleEvent::parse(element.attribute_or_empty("type"))?;
            self.metadata
                .add_lifecycle_callback(event, element.attribute_or_empty("method"));
        }
        Ok(())
    }

    fn read_entity_listeners(&mut self) -> MappingResult<()> {
        let class_name = self.class_name();

        for element in self.element.nested("entity-listeners", "entity-listener") {
            let listener_class = required_attribute(element, "class", &class_name)?;

            if !self.context.class_resolver.class_exists(listener_class) {
                return Err(MappingError::EntityListenerClassNotFound {
                    class_name,
                    listener_class: listener_class.to_string(),
                });
            }

            for callback in element.children() {
                self.metadata.add_entity_listener(
                    callback.attribute_or_empty("type"),
                    listener_class,
                    callback.attribute_or_empty("method"),
                )?;
            }
        }
        Ok(())
    }
}

/// Every `<join-column>` of an override's `<join-columns>` wrapper.
fn convert_join_columns_wrapper(wrapper: &XmlElement) -> Vec<JoinColumnMetadata> {
    wrapper
        .children_named("join-column")
        .map(convert_join_column)
        .collect()
}
