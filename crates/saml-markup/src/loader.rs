//! Loaders used by objects while decoding their children.

use crate::error::{MarkupError, MarkupResult};
use crate::node::{Selector, XmlNode};
use crate::object::MarkupObject;
use crate::registry::{Factory, Registry};

/// How the concrete type of each loaded child is chosen.
pub enum Dispatch<'a, T> {
    /// Every child is built by the same factory.
    Single(Factory<T>),
    /// The child's local name selects the factory.
    Table(&'a [(&'a str, Factory<T>)]),
    /// The child's qualified name is looked up in a registry.
    Registry(&'a Registry<T>),
}

impl<T> Dispatch<'_, T> {
    fn construct(&self, node: &XmlNode) -> MarkupResult<T> {
        match self {
            Self::Single(factory) => factory(node),
            Self::Table(table) => {
                let (_, factory) = table
                    .iter()
                    .find(|(name, _)| *name == node.local_name())
                    .ok_or_else(|| MarkupError::UnknownElement(node.clark_name()))?;
                factory(node)
            }
            Self::Registry(registry) => registry.construct(node),
        }
    }
}

/// Trimmed text content of every matching child.
#[must_use]
pub fn load_string_array(node: &XmlNode, selector: Selector<'_>) -> Vec<String> {
    node.select(selector)
        .map(|child| child.text().trim().to_string())
        .collect()
}

/// Builds an object from every matching child, in document order.
pub fn load_object_array<T>(
    node: &XmlNode,
    selector: Selector<'_>,
    dispatch: &Dispatch<'_, T>,
) -> MarkupResult<Vec<T>> {
    node.select(selector)
        .map(|child| dispatch.construct(child))
        .collect()
}

/// Builds a `T` from every matching child.
pub fn load_objects<T>(node: &XmlNode, selector: Selector<'_>) -> MarkupResult<Vec<T>>
where
    T: MarkupObject + Default,
{
    load_object_array(node, selector, &Dispatch::Single(T::from_element))
}
