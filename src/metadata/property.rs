use crate::metadata::association::{
    AssociationMetadata, ManyToManyAssociationMetadata, ManyToOneAssociationMetadata,
    OneToManyAssociationMetadata, OneToOneAssociationMetadata, ToManyMetadata,
};
use crate::metadata::field::{EmbeddedMetadata, FieldMetadata};
use crate::metadata::table::{CacheMetadata, JoinColumnMetadata};
use derive_more::{From, TryInto};
use serde::Serialize;

/// A mapped property of a class.
#[derive(Debug, Clone, PartialEq, Serialize, From, TryInto)]
pub enum PropertyMetadata {
    Field(FieldMetadata),
    Embedded(EmbeddedMetadata),
    OneToOne(OneToOneAssociationMetadata),
    OneToMany(OneToManyAssociationMetadata),
    ManyToOne(ManyToOneAssociationMetadata),
    ManyToMany(ManyToManyAssociationMetadata),
}

impl PropertyMetadata {
    pub fn name(&self) -> &str {
        match self {
            PropertyMetadata::Field(field) => &field.name,
            PropertyMetadata::Embedded(embedded) => &embedded.name,
            PropertyMetadata::OneToOne(a) => &a.association.name,
            PropertyMetadata::OneToMany(a) => &a.association.name,
            PropertyMetadata::ManyToOne(a) => &a.association.name,
            PropertyMetadata::ManyToMany(a) => &a.association.name,
        }
    }

    /// Human readable kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            PropertyMetadata::Field(_) => "field",
            PropertyMetadata::Embedded(_) => "embedded",
            PropertyMetadata::OneToOne(_) => "one-to-one",
            PropertyMetadata::OneToMany(_) => "one-to-many",
            PropertyMetadata::ManyToOne(_) => "many-to-one",
            PropertyMetadata::ManyToMany(_) => "many-to-many",
        }
    }

    pub fn is_primary_key(&self) -> bool {
        match self {
            PropertyMetadata::Field(field) => field.primary_key,
            PropertyMetadata::Embedded(_) => false,
            other => other.association().is_some_and(|a| a.primary_key),
        }
    }

    /// Second level cache of an association. Fields and embedded properties
    /// never carry one, so this is always `None` for them.
    pub fn cache(&self) -> Option<&CacheMetadata> {
        self.association().and_then(|a| a.cache.as_ref())
    }

    pub fn as_field(&self) -> Option<&FieldMetadata> {
        match self {
            PropertyMetadata::Field(field) => Some(field),
            _ => None,
        }
    }

    pub fn as_embedded(&self) -> Option<&EmbeddedMetadata> {
        match self {
            PropertyMetadata::Embedded(embedded) => Some(embedded),
            _ => None,
        }
    }

    pub fn association(&self) -> Option<&AssociationMetadata> {
        match self {
            PropertyMetadata::OneToOne(a) => Some(&a.association),
            PropertyMetadata::OneToMany(a) => Some(&a.association),
            PropertyMetadata::ManyToOne(a) => Some(&a.association),
            PropertyMetadata::ManyToMany(a) => Some(&a.association),
            PropertyMetadata::Field(_) | PropertyMetadata::Embedded(_) => None,
        }
    }

    pub fn is_association(&self) -> bool {
        self.association().is_some()
    }

    pub fn is_to_many(&self) -> bool {
        self.collection().is_some()
    }

    pub fn collection(&self) -> Option<&ToManyMetadata> {
        match self {
            PropertyMetadata::OneToMany(a) => Some(&a.collection),
            PropertyMetadata::ManyToMany(a) => Some(&a.collection),
            _ => None,
        }
    }

    /// Join columns of a to-one association, empty for every other kind.
    pub fn join_columns(&self) -> &[JoinColumnMetadata] {
        match self {
            PropertyMetadata::OneToOne(a) => &a.join_columns,
            PropertyMetadata::ManyToOne(a) => &a.join_columns,
            _ => &[],
        }
    }
}
