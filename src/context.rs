//! Read-only collaborators available while a class is being assembled.
//!
//! # Examples
//!
//! ```
//! use netabase_mapping::context::{BuildingContext, KnownClasses};
//! use netabase_mapping::naming::UnderscoreNamingStrategy;
//! use std::sync::Arc;
//!
//! let context = BuildingContext::builder()
//!     .naming_strategy(Arc::new(UnderscoreNamingStrategy))
//!     .class_resolver(Arc::new(KnownClasses::from_iter(["App\\AuditListener"])))
//!     .build();
//!
//! assert!(context.class_resolver.class_exists("App\\AuditListener"));
//! ```

use crate::config::DriverConfig;
use crate::naming::{DefaultNamingStrategy, NamingStrategy, NamingStrategyKind, UnderscoreNamingStrategy};
use crate::types::{DefaultTypeRegistry, TypeRegistry};
use std::collections::HashSet;
use std::sync::Arc;
use typed_builder::TypedBuilder;

/// Answers whether a class referenced from a document exists, for custom id
/// generators and entity listeners.
pub trait ClassResolver: Send + Sync {
    fn class_exists(&self, class_name: &str) -> bool;
}

/// Fixed set of known class names.
#[derive(Debug, Clone, Default)]
pub struct KnownClasses {
    classes: HashSet<String>,
}

impl KnownClasses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, class_name: impl Into<String>) -> &mut Self {
        self.classes.insert(class_name.into());
        self
    }
}

impl<S: Into<String>> FromIterator<S> for KnownClasses {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            classes: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl ClassResolver for KnownClasses {
    fn class_exists(&self, class_name: &str) -> bool {
        self.classes.contains(class_name)
    }
}

#[derive(Clone, TypedBuilder)]
#[builder(doc)]
pub struct BuildingContext {
    #[builder(default = Arc::new(DefaultNamingStrategy) as Arc<dyn NamingStrategy>)]
    pub naming_strategy: Arc<dyn NamingStrategy>,

    #[builder(default = Arc::new(DefaultTypeRegistry::new()) as Arc<dyn TypeRegistry>)]
    pub type_registry: Arc<dyn TypeRegistry>,

    /// Defaults to an empty [`KnownClasses`], so every class reference fails.
    #[builder(default = Arc::new(KnownClasses::new()) as Arc<dyn ClassResolver>)]
    pub class_resolver: Arc<dyn ClassResolver>,
}

impl BuildingContext {
    /// Context with the naming strategy selected by `config` and default
    /// type registry and class resolver.
    pub fn from_config(config: &DriverConfig) -> Self {
        let naming_strategy: Arc<dyn NamingStrategy> = match config.naming {
            NamingStrategyKind::Default => Arc::new(DefaultNamingStrategy),
            NamingStrategyKind::Underscore => Arc::new(UnderscoreNamingStrategy),
        };

        Self::builder().naming_strategy(naming_strategy).build()
    }
}

impl Default for BuildingContext {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl std::fmt::Debug for BuildingContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildingContext").finish_non_exhaustive()
    }
}
