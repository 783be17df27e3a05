// Common test fixtures and helpers
#![allow(dead_code)]

use netabase_mapping::prelude::*;
use std::sync::Arc;

pub const AUDIT_LISTENER: &str = "App\\Listener\\AuditListener";
pub const UUID_GENERATOR: &str = "App\\Id\\UuidGenerator";

/// Context that knows the listener and generator classes used by the fixtures
pub fn context() -> BuildingContext {
    context_with_classes(&[AUDIT_LISTENER, UUID_GENERATOR])
}

pub fn context_with_classes(classes: &[&str]) -> BuildingContext {
    BuildingContext::builder()
        .class_resolver(Arc::new(KnownClasses::from_iter(classes.iter().copied())))
        .build()
}

/// Driver over in-memory documents
pub fn driver(documents: &[&str]) -> MappingResult<XmlDriver> {
    let mut locator = InMemoryLocator::new();
    for document in documents {
        locator.add_document(document)?;
    }
    Ok(XmlDriver::new(locator))
}

/// Load `class_name` from a single document with the fixture context
pub fn load(xml: &str, class_name: &str) -> MappingResult<ClassMetadata> {
    driver(&[xml])?.load_metadata_for_class(class_name, None, &context())
}

pub fn load_with_parent(
    xml: &str,
    class_name: &str,
    parent: ClassMetadata,
) -> MappingResult<ClassMetadata> {
    driver(&[xml])?.load_metadata_for_class(class_name, Some(Arc::new(parent)), &context())
}

/// Entity document with `body` as its children
pub fn entity(class_name: &str, body: &str) -> String {
    format!(
        r#"<doctrine-mapping><entity name="{}">{}</entity></doctrine-mapping>"#,
        class_name, body
    )
}
