//! Prelude module for convenient imports.
//!
//! ```
//! use netabase_mapping::prelude::*;
//! ```
//!
//! # What's Included
//!
//! - Drivers: [`MappingDriver`], [`XmlDriver`], [`DriverChain`]
//! - Collaborators: [`BuildingContext`], the locator, naming, type and class
//!   resolver traits with their default implementations
//! - The metadata model: [`ClassMetadata`], [`PropertyMetadata`] and the
//!   descriptors they hold
//! - Errors: [`MappingError`], [`MappingResult`]

pub use crate::config::{DEFAULT_FILE_EXTENSION, DriverConfig};
pub use crate::context::{BuildingContext, ClassResolver, KnownClasses};
pub use crate::driver::{DriverChain, MappingDriver, XmlDriver, evaluate_boolean};
pub use crate::error::{ErrorCategory, MappingError, MappingResult};
pub use crate::locator::{FileLocator, InMemoryLocator, MappingLocator};
pub use crate::metadata::*;
pub use crate::naming::{
    DefaultNamingStrategy, NamingStrategy, NamingStrategyKind, UnderscoreNamingStrategy,
};
pub use crate::types::{DefaultTypeRegistry, TypeHandle, TypeRegistry};
pub use crate::xml::XmlElement;
