//! Driver configuration.
//!
//! Built in code through `typed-builder`, or loaded from a TOML file:
//!
//! ```toml
//! file_extension = ".orm.xml"
//! paths = ["config/mapping", "vendor/mapping"]
//! naming = "underscore"
//! ```

use crate::error::{MappingError, MappingResult};
use crate::naming::NamingStrategyKind;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use typed_builder::TypedBuilder;

pub const DEFAULT_FILE_EXTENSION: &str = ".dcm.xml";

fn default_file_extension() -> String {
    DEFAULT_FILE_EXTENSION.to_string()
}

/// Configuration for file based mapping drivers.
///
/// # Examples
///
/// ```
/// use netabase_mapping::config::DriverConfig;
///
/// let config = DriverConfig::builder()
///     .paths(vec!["config/mapping".into()])
///     .build();
///
/// assert_eq!(config.file_extension, ".dcm.xml");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, TypedBuilder)]
#[builder(doc)]
pub struct DriverConfig {
    /// Suffix appended to the class file name
    #[builder(default = default_file_extension(), setter(into))]
    #[serde(default = "default_file_extension")]
    pub file_extension: String,

    /// Directories searched for mapping documents, in order
    #[builder(default)]
    #[serde(default)]
    pub paths: Vec<PathBuf>,

    /// Strategy for default table and column names
    #[builder(default)]
    #[serde(default)]
    pub naming: NamingStrategyKind,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl DriverConfig {
    pub fn from_toml_str(content: &str) -> MappingResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> MappingResult<Self> {
        let content = fs::read_to_string(&path).map_err(|e| {
            MappingError::Configuration(format!(
                "Failed to read driver config '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_toml_str(&content)
    }

    fn validate(&self) -> MappingResult<()> {
        if self.file_extension.is_empty() {
            return Err(MappingError::Configuration(
                "file_extension cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}
