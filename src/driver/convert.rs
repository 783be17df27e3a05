//! Element converters.
//!
//! Each function turns one XML subtree into one metadata value. None of them
//! touch the class being built except to read it (for default names and the
//! column duplication check).

use crate::context::BuildingContext;
use crate::error::{MappingError, MappingResult};
use crate::metadata::{
    CacheMetadata, CacheUsage, CascadeAction, ClassMetadata, DEFAULT_ORDER_DIRECTION,
    DiscriminatorColumnMetadata, FieldMetadata, IndexMetadata, JoinColumnMetadata,
    JoinTableMetadata, OptionValue, Options, UniqueConstraintMetadata,
};
use crate::xml::XmlElement;
use indexmap::IndexMap;
use log::trace;

pub const DEFAULT_DISCRIMINATOR_COLUMN: &str = "dtype";
pub const DEFAULT_DISCRIMINATOR_TYPE: &str = "string";
pub const DEFAULT_DISCRIMINATOR_LENGTH: u32 = 255;
pub const DEFAULT_FIELD_TYPE: &str = "string";

/// Option names whose value is coerced to a boolean.
const BOOLEAN_OPTIONS: [&str; 2] = ["unsigned", "fixed"];

/// `true` only for the literal values `"true"` and `"1"`.
pub fn evaluate_boolean(value: &str) -> bool {
    value == "true" || value == "1"
}

/// [`evaluate_boolean`] on an attribute; absent attributes are `false`.
pub fn boolean_attribute(element: &XmlElement, name: &str) -> bool {
    element.attribute(name).is_some_and(evaluate_boolean)
}

/// Leading decimal digits of `value`, `0` when there are none.
pub fn parse_integer(value: &str) -> u32 {
    let value = value.trim_start();
    let digits = value
        .find(|c: char| !c.is_ascii_digit())
        .map_or(value, |end| &value[..end]);

    digits
        .chars()
        .fold(0u32, |acc, c| acc.saturating_mul(10).saturating_add(c as u32 - '0' as u32))
}

/// Comma separated list, split verbatim.
pub fn split_list(value: &str) -> Vec<String> {
    value.split(',').map(str::to_string).collect()
}

pub(crate) fn required_attribute<'a>(
    element: &'a XmlElement,
    attribute: &'static str,
    class_name: &str,
) -> MappingResult<&'a str> {
    element
        .attribute(attribute)
        .ok_or_else(|| MappingError::MissingAttribute {
            class_name: class_name.to_string(),
            element: element.name().to_string(),
            attribute,
        })
}

/// Recursively parse `<option>` elements.
///
/// Leaves yield their trimmed text, elements with children a nested tree.
/// A `name` attribute makes a named entry, otherwise the value is appended
/// positionally.
pub fn parse_options(options: &[XmlElement]) -> Options {
    let mut parsed = Options::new();

    for option in options {
        let value = if option.has_children() {
            OptionValue::Nested(parse_options(option.children()))
        } else {
            OptionValue::Text(option.text().to_string())
        };

        match option.attribute("name") {
            Some(name) if BOOLEAN_OPTIONS.contains(&name) => {
                let flag = value.as_text().is_some_and(evaluate_boolean);
                parsed.insert(name, flag);
            }
            Some(name) => parsed.insert(name, value),
            None => parsed.push(value),
        }
    }

    parsed
}

fn nested_options(element: &XmlElement) -> Options {
    element
        .child("options")
        .map(|options| parse_options(options.children()))
        .unwrap_or_default()
}

fn flags(element: &XmlElement) -> Vec<String> {
    element.attribute("flags").map(split_list).unwrap_or_default()
}

/// Every child of `<indexes>`.
pub fn parse_indexes(indexes: &XmlElement) -> Vec<IndexMetadata> {
    indexes
        .children()
        .iter()
        .map(|index| IndexMetadata {
            name: index.attribute("name").map(str::to_string),
            columns: split_list(index.attribute_or_empty("columns")),
            unique: boolean_attribute(index, "unique"),
            flags: flags(index),
            options: nested_options(index),
        })
        .collect()
}

/// Every child of `<unique-constraints>`.
pub fn parse_unique_constraints(constraints: &XmlElement) -> Vec<UniqueConstraintMetadata> {
    constraints
        .children()
        .iter()
        .map(|constraint| UniqueConstraintMetadata {
            name: constraint.attribute("name").map(str::to_string),
            columns: split_list(constraint.attribute_or_empty("columns")),
            flags: flags(constraint),
            options: nested_options(constraint),
        })
        .collect()
}

/// Convert a `<field>` or `<id>` element into a field named `field_name`.
///
/// The resulting column must not already be used by the class. When
/// `overriding` is set, the column of the field being replaced does not count.
pub fn convert_field(
    element: &XmlElement,
    field_name: &str,
    metadata: &ClassMetadata,
    context: &BuildingContext,
    overriding: bool,
) -> MappingResult<FieldMetadata> {
    let class_name = metadata.class_name();
    let type_name = element.attribute("type").unwrap_or(DEFAULT_FIELD_TYPE);
    let column_name = match element.attribute("column") {
        Some(column) => column.to_string(),
        None => context
            .naming_strategy
            .property_to_column_name(field_name, class_name),
    };

    let mut field = FieldMetadata::new(
        field_name,
        context.type_registry.lookup(type_name)?,
        column_name,
    );

    field.versioned = boolean_attribute(element, "version");
    field.length = element.attribute("length").map(parse_integer);
    field.precision = element.attribute("precision").map(parse_integer);
    field.scale = element.attribute("scale").map(parse_integer);
    if element.has_attribute("unique") {
        field.unique = boolean_attribute(element, "unique");
    }
    if element.has_attribute("nullable") {
        field.nullable = boolean_attribute(element, "nullable");
    }
    field.column_definition = element.attribute("column-definition").map(str::to_string);
    field.options = nested_options(element);

    let duplicated = if overriding {
        metadata.check_property_duplication_except(&field.column_name, field_name)
    } else {
        metadata.check_property_duplication(&field.column_name)
    };
    if duplicated {
        return Err(MappingError::DuplicateColumnName {
            class_name: class_name.to_string(),
            column_name: field.column_name,
        });
    }

    trace!("Converted field {}::{} -> column {}", class_name, field_name, field.column_name);
    Ok(field)
}

/// Missing `name` / `referenced-column-name` yield empty strings.
pub fn convert_join_column(element: &XmlElement) -> JoinColumnMetadata {
    let mut join_column = JoinColumnMetadata {
        column_name: element.attribute_or_empty("name").to_string(),
        referenced_column_name: element.attribute_or_empty("referenced-column-name").to_string(),
        column_definition: element.attribute("column-definition").map(str::to_string),
        aliased_name: element.attribute("field-name").map(str::to_string),
        ..Default::default()
    };

    if element.has_attribute("nullable") {
        join_column.nullable = boolean_attribute(element, "nullable");
    }
    if element.has_attribute("unique") {
        join_column.unique = boolean_attribute(element, "unique");
    }
    if let Some(on_delete) = element.attribute("on-delete") {
        join_column.on_delete = on_delete.to_uppercase();
    }

    join_column
}

/// A single `<join-column>` child, else every column in `<join-columns>`.
pub fn convert_join_columns(element: &XmlElement) -> Vec<JoinColumnMetadata> {
    match element.child("join-column") {
        Some(join_column) => vec![convert_join_column(join_column)],
        None => element
            .nested("join-columns", "join-column")
            .map(convert_join_column)
            .collect(),
    }
}

pub fn convert_join_table(element: &XmlElement) -> JoinTableMetadata {
    let mut join_table = JoinTableMetadata {
        name: element.attribute("name").map(str::to_string),
        schema: element.attribute("schema").map(str::to_string),
        ..Default::default()
    };

    for join_column in element.nested("join-columns", "join-column") {
        join_table.add_join_column(convert_join_column(join_column));
    }
    for join_column in element.nested("inverse-join-columns", "join-column") {
        join_table.add_inverse_join_column(convert_join_column(join_column));
    }

    join_table
}

/// Convert a `<cache>` element.
///
/// The default region is the lowercased root class name with `\` replaced by
/// `_`, suffixed with `__<field>` for association caches.
pub fn convert_cache(
    element: &XmlElement,
    metadata: &ClassMetadata,
    field_name: Option<&str>,
) -> MappingResult<CacheMetadata> {
    let usage = match element.attribute("usage") {
        Some(usage) => CacheUsage::parse(usage)?,
        None => CacheUsage::default(),
    };

    let region = match element.attribute("region") {
        Some(region) if !region.is_empty() => region.to_string(),
        _ => {
            let base = metadata.root_class_name().replace('\\', "_").to_lowercase();
            match field_name {
                Some(field) => format!("{}__{}", base, field),
                None => base,
            }
        }
    };

    Ok(CacheMetadata::new(usage, region))
}

/// Convert an optional `<discriminator-column>`, applying defaults for
/// whatever is not declared.
pub fn convert_discriminator_column(
    element: Option<&XmlElement>,
    context: &BuildingContext,
) -> MappingResult<DiscriminatorColumnMetadata> {
    let attribute = |name: &str| element.and_then(|e| e.attribute(name)).filter(|v| !v.is_empty());

    let type_handle = context
        .type_registry
        .lookup(attribute("type").unwrap_or(DEFAULT_DISCRIMINATOR_TYPE))?;

    let length = match attribute("length") {
        Some(length) => Some(parse_integer(length)),
        None if type_handle.is_string_like() => Some(DEFAULT_DISCRIMINATOR_LENGTH),
        None => None,
    };

    Ok(DiscriminatorColumnMetadata {
        column_name: attribute("name").unwrap_or(DEFAULT_DISCRIMINATOR_COLUMN).to_string(),
        type_handle,
        length,
        column_definition: attribute("column-definition").map(str::to_string),
    })
}

/// `<discriminator-mapping value=".." class=".."/>` pairs in declaration
/// order. A repeated value keeps its first position and takes the last class.
pub fn convert_discriminator_map(element: &XmlElement) -> IndexMap<String, String> {
    element
        .children_named("discriminator-mapping")
        .map(|mapping| {
            (
                mapping.attribute_or_empty("value").to_string(),
                mapping.attribute_or_empty("class").to_string(),
            )
        })
        .collect()
}

/// Actions named by the children of `<cascade>`, in declaration order.
pub fn cascade_mappings(element: &XmlElement) -> MappingResult<Vec<CascadeAction>> {
    element
        .children()
        .iter()
        .map(|action| CascadeAction::parse(action.name()))
        .collect()
}

/// `<order-by-field name=".." direction=".."/>` entries; direction defaults
/// to ascending.
pub fn convert_order_by(element: &XmlElement) -> IndexMap<String, String> {
    element
        .children_named("order-by-field")
        .map(|field| {
            (
                field.attribute_or_empty("name").to_string(),
                field
                    .attribute("direction")
                    .unwrap_or(DEFAULT_ORDER_DIRECTION)
                    .to_string(),
            )
        })
        .collect()
}
