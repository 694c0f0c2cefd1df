//! The parse/build/serialize contract shared by every bound object.
//!
//! A bound object is in one of two states. While it still holds the node it
//! was parsed from, [`MarkupObject::to_text`] returns that node's source text
//! unchanged, which keeps externally computed signatures over the original
//! bytes valid. Once it is mutated through its API, or explicitly built with
//! [`MarkupObject::to_document`], the node is dropped and output is built
//! from the current field values. The transition is one-way.

use std::sync::OnceLock;

use crate::builder::{Document, MarkupBuilder};
use crate::config::OutputConfig;
use crate::error::MarkupResult;
use crate::node::XmlNode;

/// Lifecycle state carried by every bound object.
#[derive(Debug, Clone, Default)]
pub struct MarkupState {
    origin: Option<XmlNode>,
    document: OnceLock<Document>,
}

impl MarkupState {
    /// The node this object was parsed from, if it is still authoritative.
    #[must_use]
    pub fn origin(&self) -> Option<&XmlNode> {
        self.origin.as_ref()
    }

    /// Returns whether output will reproduce the parsed source.
    #[must_use]
    pub fn is_parsed(&self) -> bool {
        self.origin.is_some()
    }

    /// Returns whether a built document is cached.
    #[must_use]
    pub fn is_built(&self) -> bool {
        self.document.get().is_some()
    }

    /// Records the node the object was just parsed from.
    pub fn attach(&mut self, node: XmlNode) {
        self.origin = Some(node);
        self.document = OnceLock::new();
    }

    /// Forgets both the parsed node and any cached document.
    pub fn detach(&mut self) {
        self.origin = None;
        self.document = OnceLock::new();
    }

    fn forget_origin(&mut self) {
        self.origin = None;
    }
}

// Lifecycle state is not part of an object's value.
impl PartialEq for MarkupState {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for MarkupState {}

/// An object bound to a markup element.
pub trait MarkupObject {
    /// Lifecycle state of this object.
    fn markup_state(&self) -> &MarkupState;

    /// Mutable lifecycle state of this object.
    fn markup_state_mut(&mut self) -> &mut MarkupState;

    /// Populates fields from a node, replacing any previous values.
    fn decode(&mut self, node: &XmlNode) -> MarkupResult<()>;

    /// Emits this object's markup. Objects without an element of their own
    /// emit nothing.
    fn serialize(&self, _builder: &mut MarkupBuilder) -> MarkupResult<()> {
        Ok(())
    }

    /// Namespace prefixes bound on the root element when this object is built
    /// on its own.
    fn namespaces(&self) -> &'static [(&'static str, &'static str)] {
        &[]
    }

    /// Parses `node` into this object and keeps it for verbatim output.
    fn parse(&mut self, node: &XmlNode) -> MarkupResult<()> {
        self.decode(node)?;
        self.markup_state_mut().attach(node.clone());
        Ok(())
    }

    /// Builds an object from an element.
    fn from_element(node: &XmlNode) -> MarkupResult<Self>
    where
        Self: Default + Sized,
    {
        let mut object = Self::default();
        object.parse(node)?;
        Ok(object)
    }

    /// Builds an object from an optional element; `None` yields `None`.
    fn from_node(node: Option<&XmlNode>) -> MarkupResult<Option<Self>>
    where
        Self: Default + Sized,
    {
        node.map(Self::from_element).transpose()
    }

    /// Parses a whole document whose root element is this object.
    fn from_xml(xml: &str) -> MarkupResult<Self>
    where
        Self: Default + Sized,
    {
        Self::from_element(&XmlNode::parse_str(xml)?)
    }

    /// Drops the parsed node and any cached document. Called by every
    /// mutating accessor.
    fn touch(&mut self) {
        self.markup_state_mut().detach();
    }

    /// Builds fresh markup from the current field values, bypassing the cache.
    fn build(&self) -> MarkupResult<Document> {
        let mut builder = MarkupBuilder::with_namespaces(self.namespaces());
        self.serialize(&mut builder)?;
        builder.finish()
    }

    /// The built document, constructed on first use and cached.
    fn document(&self) -> MarkupResult<&Document> {
        let state = self.markup_state();
        if let Some(document) = state.document.get() {
            return Ok(document);
        }
        let document = self.build()?;
        Ok(state.document.get_or_init(|| document))
    }

    /// Builds and caches the document, discarding the parsed node so later
    /// output reflects field values rather than the original bytes.
    fn to_document(&mut self) -> MarkupResult<&Document> {
        self.markup_state_mut().forget_origin();
        self.document()
    }

    /// Textual form of this object.
    ///
    /// A parsed, unmodified object returns its source text exactly. Otherwise
    /// the built document is rendered, pretty-printed or compact.
    fn to_text(&self, pretty: bool) -> MarkupResult<String> {
        self.to_text_with(&OutputConfig::default().with_pretty(pretty))
    }

    /// Textual form of this object using explicit output options.
    fn to_text_with(&self, options: &OutputConfig) -> MarkupResult<String> {
        if let Some(node) = self.markup_state().origin() {
            return Ok(node.source_text().to_string());
        }
        self.document()?.to_text(options)
    }
}
