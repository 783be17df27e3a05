//! Namespace based driver multiplexing.
//!
//! A [`DriverChain`] holds drivers keyed by a class name prefix. Lookups go to
//! the first registered driver whose namespace prefixes the class name, then
//! to the default driver if one is set.

use crate::context::BuildingContext;
use crate::driver::MappingDriver;
use crate::error::{MappingError, MappingResult};
use crate::metadata::ClassMetadata;
use indexmap::IndexSet;
use log::{debug, trace};
use std::sync::Arc;

#[derive(Default, Clone)]
pub struct DriverChain {
    drivers: Vec<(String, Arc<dyn MappingDriver>)>,
    default_driver: Option<Arc<dyn MappingDriver>>,
}

impl DriverChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `driver` for every class whose name starts with `namespace`.
    /// The same driver may be registered under several namespaces.
    pub fn add_driver(&mut self, driver: Arc<dyn MappingDriver>, namespace: impl Into<String>) -> &mut Self {
        let namespace = namespace.into();
        debug!("DriverChain: Registered driver for namespace '{}'", namespace);
        self.drivers.push((namespace, driver));
        self
    }

    pub fn set_default_driver(&mut self, driver: Arc<dyn MappingDriver>) -> &mut Self {
        self.default_driver = Some(driver);
        self
    }

    pub fn default_driver(&self) -> Option<&dyn MappingDriver> {
        self.default_driver.as_deref()
    }

    /// Registered `(namespace, driver)` pairs, in registration order.
    pub fn drivers(&self) -> impl Iterator<Item = (&str, &dyn MappingDriver)> {
        self.drivers
            .iter()
            .map(|(namespace, driver)| (namespace.as_str(), driver.as_ref()))
    }

    fn driver_for(&self, class_name: &str) -> Option<&dyn MappingDriver> {
        self.drivers
            .iter()
            .find(|(namespace, _)| class_name.starts_with(namespace.as_str()))
            .map(|(_, driver)| driver.as_ref())
            .or_else(|| self.default_driver())
    }
}

impl MappingDriver for DriverChain {
    fn load_metadata_for_class(
        &self,
        class_name: &str,
        parent: Option<Arc<ClassMetadata>>,
        context: &BuildingContext,
    ) -> MappingResult<ClassMetadata> {
        let driver = self
            .driver_for(class_name)
            .ok_or_else(|| MappingError::NoDriverForClass(class_name.to_string()))?;

        trace!("DriverChain: Delegating {}", class_name);
        driver.load_metadata_for_class(class_name, parent, context)
    }

    /// Names from each namespaced driver that fall inside its namespace,
    /// followed by every name of the default driver. Duplicates are dropped.
    fn all_class_names(&self) -> MappingResult<Vec<String>> {
        let mut class_names = IndexSet::new();

        for (namespace, driver) in &self.drivers {
            class_names.extend(
                driver
                    .all_class_names()?
                    .into_iter()
                    .filter(|class_name| class_name.starts_with(namespace.as_str())),
            );
        }

        if let Some(driver) = &self.default_driver {
            class_names.extend(driver.all_class_names()?);
        }

        Ok(class_names.into_iter().collect())
    }

    fn is_transient(&self, class_name: &str) -> bool {
        self.driver_for(class_name)
            .is_none_or(|driver| driver.is_transient(class_name))
    }
}

impl std::fmt::Debug for DriverChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriverChain")
            .field("namespaces", &self.drivers.iter().map(|(ns, _)| ns).collect::<Vec<_>>())
            .field("has_default_driver", &self.default_driver.is_some())
            .finish()
    }
}
