//! Association properties.
//!
//! The four relation kinds share [`AssociationMetadata`]; each concrete kind
//! adds what only it can carry (join columns for the to-one kinds, a join
//! table for many-to-many, ordering and indexing for the to-many kinds).

use crate::metadata::constants::{CascadeAction, FetchMode};
use crate::metadata::table::{CacheMetadata, JoinColumnMetadata, JoinTableMetadata};
use indexmap::IndexMap;
use serde::Serialize;

pub const DEFAULT_ORDER_DIRECTION: &str = "ASC";

/// Attributes common to every association kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssociationMetadata {
    pub name: String,
    pub target_entity: String,
    pub owning_side: bool,
    pub fetch_mode: FetchMode,
    pub cascade: Vec<CascadeAction>,
    pub orphan_removal: bool,
    pub mapped_by: Option<String>,
    pub inversed_by: Option<String>,
    pub primary_key: bool,
    pub cache: Option<CacheMetadata>,
}

impl AssociationMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target_entity: String::new(),
            owning_side: true,
            fetch_mode: FetchMode::default(),
            cascade: Vec::new(),
            orphan_removal: false,
            mapped_by: None,
            inversed_by: None,
            primary_key: false,
            cache: None,
        }
    }

    /// Mark this side as the inverse side of `mapped_by`.
    pub fn set_mapped_by(&mut self, mapped_by: impl Into<String>) {
        self.mapped_by = Some(mapped_by.into());
        self.owning_side = false;
    }

    pub fn is_cascading(&self, action: CascadeAction) -> bool {
        self.cascade.contains(&action) || self.cascade.contains(&CascadeAction::All)
    }
}

/// Ordering and indexing of a collection-valued association.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ToManyMetadata {
    /// Field name to direction, in declaration order.
    pub order_by: IndexMap<String, String>,
    pub index_by: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OneToOneAssociationMetadata {
    pub association: AssociationMetadata,
    pub join_columns: Vec<JoinColumnMetadata>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManyToOneAssociationMetadata {
    pub association: AssociationMetadata,
    pub join_columns: Vec<JoinColumnMetadata>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OneToManyAssociationMetadata {
    pub association: AssociationMetadata,
    pub collection: ToManyMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManyToManyAssociationMetadata {
    pub association: AssociationMetadata,
    pub collection: ToManyMetadata,
    pub join_table: Option<JoinTableMetadata>,
}

macro_rules! association_constructors {
    ($($ty:ident { $($extra:ident: $default:expr),* }),* $(,)?) => {
        $(
            impl $ty {
                pub fn new(name: impl Into<String>) -> Self {
                    Self {
                        association: AssociationMetadata::new(name),
                        $($extra: $default),*
                    }
                }
            }
        )*
    };
}

association_constructors!(
    OneToOneAssociationMetadata { join_columns: Vec::new() },
    ManyToOneAssociationMetadata { join_columns: Vec::new() },
    OneToManyAssociationMetadata { collection: ToManyMetadata::default() },
    ManyToManyAssociationMetadata { collection: ToManyMetadata::default(), join_table: None },
);

/// Replacement values declared by an `<association-override>`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssociationOverride {
    pub join_columns: Option<Vec<JoinColumnMetadata>>,
    pub join_table: Option<JoinTableMetadata>,
    pub inversed_by: Option<String>,
    pub fetch_mode: Option<FetchMode>,
}

/// An override element the overridden association kind cannot hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverrideConflict {
    pub element: &'static str,
}

impl AssociationOverride {
    fn apply_common(&self, association: &mut AssociationMetadata) {
        if let Some(inversed_by) = &self.inversed_by {
            association.inversed_by = Some(inversed_by.clone());
        }
        if let Some(fetch_mode) = self.fetch_mode {
            association.fetch_mode = fetch_mode;
        }
    }

    fn reject_join_columns(&self) -> Result<(), OverrideConflict> {
        match self.join_columns {
            Some(_) => Err(OverrideConflict { element: "join-columns" }),
            None => Ok(()),
        }
    }

    fn reject_join_table(&self) -> Result<(), OverrideConflict> {
        match self.join_table {
            Some(_) => Err(OverrideConflict { element: "join-table" }),
            None => Ok(()),
        }
    }
}

// Each override starts from a fresh association of the same kind carrying only
// the field name. Target entity, cascade, orphan removal, ordering and caching
// of the overridden association are not carried over.

impl OneToOneAssociationMetadata {
    pub fn overridden(&self, ov: &AssociationOverride) -> Result<Self, OverrideConflict> {
        ov.reject_join_table()?;
        let mut replacement = Self::new(self.association.name.clone());
        if let Some(join_columns) = &ov.join_columns {
            replacement.join_columns = join_columns.clone();
        }
        ov.apply_common(&mut replacement.association);
        Ok(replacement)
    }
}

impl ManyToOneAssociationMetadata {
    pub fn overridden(&self, ov: &AssociationOverride) -> Result<Self, OverrideConflict> {
        ov.reject_join_table()?;
        let mut replacement = Self::new(self.association.name.clone());
        if let Some(join_columns) = &ov.join_columns {
            replacement.join_columns = join_columns.clone();
        }
        ov.apply_common(&mut replacement.association);
        Ok(replacement)
    }
}

impl OneToManyAssociationMetadata {
    pub fn overridden(&self, ov: &AssociationOverride) -> Result<Self, OverrideConflict> {
        ov.reject_join_columns()?;
        ov.reject_join_table()?;
        let mut replacement = Self::new(self.association.name.clone());
        ov.apply_common(&mut replacement.association);
        Ok(replacement)
    }
}

impl ManyToManyAssociationMetadata {
    pub fn overridden(&self, ov: &AssociationOverride) -> Result<Self, OverrideConflict> {
        ov.reject_join_columns()?;
        let mut replacement = Self::new(self.association.name.clone());
        if let Some(join_table) = &ov.join_table {
            replacement.join_table = Some(join_table.clone());
        }
        ov.apply_common(&mut replacement.association);
        Ok(replacement)
    }
}
