pub mod chain;
pub mod convert;
pub mod xml_driver;

use crate::context::BuildingContext;
use crate::error::MappingResult;
use crate::metadata::ClassMetadata;
use std::sync::Arc;

pub use crate::config::DEFAULT_FILE_EXTENSION;
pub use chain::DriverChain;
pub use convert::evaluate_boolean;
pub use xml_driver::XmlDriver;

/// Source of class metadata.
///
/// Each call builds one class from scratch. `parent` is the already built
/// metadata of the direct ancestor; it is read but never modified.
pub trait MappingDriver: Send + Sync {
    fn load_metadata_for_class(
        &self,
        class_name: &str,
        parent: Option<Arc<ClassMetadata>>,
        context: &BuildingContext,
    ) -> MappingResult<ClassMetadata>;

    /// Every class this driver can load.
    fn all_class_names(&self) -> MappingResult<Vec<String>>;

    /// `true` when the class is not mapped by this driver.
    fn is_transient(&self, class_name: &str) -> bool;
}
