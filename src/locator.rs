//! Locating the mapping element of a class.
//!
//! A document either is a single root element (`<entity name="..">`) or wraps
//! several of them in a `<doctrine-mapping>`-style container. In the latter
//! case only one kind is read per document: entities if there are any,
//! otherwise mapped superclasses, otherwise embeddables.

use crate::config::DriverConfig;
use crate::error::{MappingError, MappingResult};
use crate::xml::XmlElement;
use indexmap::IndexMap;
use log::{debug, trace};
use std::fs;
use std::path::{Path, PathBuf};

pub const ROOT_ELEMENTS: [&str; 3] = ["entity", "mapped-superclass", "embeddable"];

pub trait MappingLocator: Send + Sync {
    /// Mapping element declaring `class_name`.
    fn resolve(&self, class_name: &str) -> MappingResult<XmlElement>;

    /// Every class name this locator can resolve.
    fn all_class_names(&self) -> MappingResult<Vec<String>>;

    fn contains(&self, class_name: &str) -> bool;
}

/// Split a parsed document into class name -> root element.
pub fn mapping_elements(document: &XmlElement) -> IndexMap<String, XmlElement> {
    let keyed = |element: &XmlElement| (element.attribute_or_empty("name").to_string(), element.clone());

    if ROOT_ELEMENTS.contains(&document.name()) {
        return IndexMap::from_iter([keyed(document)]);
    }

    ROOT_ELEMENTS
        .iter()
        .map(|kind| document.children_named(kind).map(keyed).collect::<IndexMap<_, _>>())
        .find(|elements| !elements.is_empty())
        .unwrap_or_default()
}

/// Locator over documents held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLocator {
    elements: IndexMap<String, XmlElement>,
}

impl InMemoryLocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `xml` and register every class it declares. Later documents
    /// replace earlier declarations of the same class.
    pub fn add_document(&mut self, xml: &str) -> MappingResult<&mut Self> {
        let document = XmlElement::parse(xml)?;
        for (class_name, element) in mapping_elements(&document) {
            trace!("InMemoryLocator: registered {}", class_name);
            self.elements.insert(class_name, element);
        }
        Ok(self)
    }

    pub fn add_element(&mut self, class_name: impl Into<String>, element: XmlElement) -> &mut Self {
        self.elements.insert(class_name.into(), element);
        self
    }
}

impl MappingLocator for InMemoryLocator {
    fn resolve(&self, class_name: &str) -> MappingResult<XmlElement> {
        self.elements
            .get(class_name)
            .cloned()
            .ok_or_else(|| MappingError::ClassNotFound(class_name.to_string()))
    }

    fn all_class_names(&self) -> MappingResult<Vec<String>> {
        Ok(self.elements.keys().cloned().collect())
    }

    fn contains(&self, class_name: &str) -> bool {
        self.elements.contains_key(class_name)
    }
}

/// Locator reading one file per class from a list of directories.
///
/// `App\Model\User` is looked up as `App.Model.User.dcm.xml` in each
/// directory in turn; `::` separators are treated like `\`. Class names
/// are listed from the `name` attributes of the mapping files found.
#[derive(Debug, Clone)]
pub struct FileLocator {
    paths: Vec<PathBuf>,
    file_extension: String,
}

impl FileLocator {
    pub fn new(paths: Vec<PathBuf>, file_extension: impl Into<String>) -> Self {
        Self {
            paths,
            file_extension: file_extension.into(),
        }
    }

    pub fn from_config(config: &DriverConfig) -> Self {
        Self::new(config.paths.clone(), config.file_extension.clone())
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn file_extension(&self) -> &str {
        &self.file_extension
    }

    pub fn file_name_for(&self, class_name: &str) -> String {
        format!(
            "{}{}",
            class_name.replace("::", ".").replace('\\', "."),
            self.file_extension
        )
    }

    pub fn find_mapping_file(&self, class_name: &str) -> Option<PathBuf> {
        let file_name = self.file_name_for(class_name);
        self.paths
            .iter()
            .map(|dir| dir.join(&file_name))
            .find(|candidate| candidate.is_file())
    }

    fn load_mapping_file(path: &Path) -> MappingResult<IndexMap<String, XmlElement>> {
        debug!("FileLocator: loading {}", path.display());
        let content = fs::read_to_string(path)?;
        let document = XmlElement::parse(&content)?;
        Ok(mapping_elements(&document))
    }
}

impl MappingLocator for FileLocator {
    fn resolve(&self, class_name: &str) -> MappingResult<XmlElement> {
        let path = self
            .find_mapping_file(class_name)
            .ok_or_else(|| MappingError::ClassNotFound(class_name.to_string()))?;

        let mut elements = Self::load_mapping_file(&path)?;
        elements
            .swap_remove(class_name)
            .ok_or_else(|| MappingError::InvalidMappingFile {
                class_name: class_name.to_string(),
                file: path.display().to_string(),
            })
    }

    fn all_class_names(&self) -> MappingResult<Vec<String>> {
        let mut class_names = Vec::new();

        for dir in self.paths.iter().filter(|dir| dir.is_dir()) {
            for entry in fs::read_dir(dir)? {
                let file_name = entry?.file_name();
                let Some(file_name) = file_name.to_str() else {
                    continue;
                };
                if !file_name.ends_with(&self.file_extension) {
                    continue;
                }

                // Only classes whose own mapping file is this one resolve back to it.
                let elements = Self::load_mapping_file(&dir.join(file_name))?;
                for class_name in elements.into_keys() {
                    if self.file_name_for(&class_name) == file_name && !class_names.contains(&class_name) {
                        class_names.push(class_name);
                    }
                }
            }
        }

        class_names.sort();
        Ok(class_names)
    }

    fn contains(&self, class_name: &str) -> bool {
        self.find_mapping_file(class_name).is_some()
    }
}
