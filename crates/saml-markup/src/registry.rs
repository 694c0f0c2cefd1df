//! Element-name dispatch.
//!
//! A registry maps a qualified element name to the function that builds the
//! matching object. Registries are assembled once and only read afterwards.

use std::collections::HashMap;
use std::fmt;

use crate::error::{MarkupError, MarkupResult};
use crate::node::{clark_name, XmlNode};

/// Builds a value from an element.
pub type Factory<T> = fn(&XmlNode) -> MarkupResult<T>;

/// Map from qualified element name to factory.
pub struct Registry<T> {
    factories: HashMap<String, Factory<T>>,
}

impl<T> Registry<T> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Registers the factory for an element. A later registration for the
    /// same name replaces the earlier one.
    #[must_use]
    pub fn register(mut self, namespace: &str, local_name: &str, factory: Factory<T>) -> Self {
        self.factories
            .insert(clark_name(Some(namespace), local_name), factory);
        self
    }

    /// Looks up the factory for an element name.
    #[must_use]
    pub fn lookup(&self, namespace: Option<&str>, local_name: &str) -> Option<Factory<T>> {
        self.factories
            .get(&clark_name(namespace, local_name))
            .copied()
    }

    /// Returns whether a factory is registered for the node's element name.
    #[must_use]
    pub fn recognizes(&self, node: &XmlNode) -> bool {
        self.lookup(node.namespace(), node.local_name()).is_some()
    }

    /// Builds the object for a node using the factory registered for its
    /// element name.
    pub fn construct(&self, node: &XmlNode) -> MarkupResult<T> {
        let factory = self
            .lookup(node.namespace(), node.local_name())
            .ok_or_else(|| MarkupError::UnknownElement(node.clark_name()))?;
        factory(node)
    }

    /// Number of registered element names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.factories.keys().collect();
        names.sort();
        f.debug_struct("Registry").field("elements", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NS: &str = "urn:example";

    fn name_of(node: &XmlNode) -> MarkupResult<String> {
        Ok(node.local_name().to_string())
    }

    fn text_of(node: &XmlNode) -> MarkupResult<String> {
        Ok(node.text().to_string())
    }

    #[test]
    fn dispatches_on_qualified_name() {
        let registry = Registry::new()
            .register(NS, "a", name_of)
            .register(NS, "b", text_of);
        assert_eq!(registry.len(), 2);

        let root = XmlNode::parse_str(r#"<x:root xmlns:x="urn:example"><x:a/><x:b>text</x:b><c/></x:root>"#)
            .unwrap();
        let children = root.children();
        assert_eq!(registry.construct(&children[0]).unwrap(), "a");
        assert_eq!(registry.construct(&children[1]).unwrap(), "text");
        assert!(!registry.recognizes(&children[2]));
        assert!(matches!(
            registry.construct(&children[2]),
            Err(MarkupError::UnknownElement(name)) if name == "c"
        ));
    }

    #[test]
    fn namespace_is_part_of_the_key() {
        let registry = Registry::new().register(NS, "a", name_of);
        assert!(registry.lookup(Some(NS), "a").is_some());
        assert!(registry.lookup(Some("urn:other"), "a").is_none());
        assert!(registry.lookup(None, "a").is_none());
    }
}
