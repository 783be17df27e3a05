//! Owned attributed-tree view of a mapping document.
//!
//! `roxmltree` borrows from the source text, so documents are copied into
//! [`XmlElement`] once at load time. Locators can then hand out elements
//! without keeping the original text alive. Only element names, attributes,
//! element children and text are kept; names are stored without their
//! namespace prefix.

use crate::error::MappingResult;
use roxmltree::{Document, Node};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlElement>,
    text: String,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Parse `xml` and return its root element.
    pub fn parse(xml: &str) -> MappingResult<Self> {
        log::trace!("Parsing mapping document ({} bytes)", xml.len());
        let document = Document::parse(xml)?;
        Ok(Self::from_node(document.root_element()))
    }

    pub fn from_node(node: Node<'_, '_>) -> Self {
        let attributes = node
            .attributes()
            .map(|attr| (attr.name().to_string(), attr.value().to_string()))
            .collect();

        let children = node
            .children()
            .filter(Node::is_element)
            .map(Self::from_node)
            .collect();

        let text: String = node
            .children()
            .filter(Node::is_text)
            .filter_map(|child| child.text())
            .collect();

        Self {
            name: node.tag_name().name().to_string(),
            attributes,
            children,
            text: text.trim().to_string(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Attribute value, or the empty string when it is absent.
    pub fn attribute_or_empty(&self, name: &str) -> &str {
        self.attribute(name).unwrap_or_default()
    }

    pub fn children(&self) -> &[XmlElement] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// First child element called `name`.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|child| child.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// Children named `item` of the first child named `wrapper`, e.g. each
    /// `<join-column>` inside `<join-columns>`.
    pub fn nested<'a>(&'a self, wrapper: &'a str, item: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.child(wrapper)
            .into_iter()
            .flat_map(move |wrapper| wrapper.children_named(item))
    }

    /// Trimmed text content directly under this element.
    pub fn text(&self) -> &str {
        &self.text
    }
}
