//! Attribute consuming services (`md:AttributeConsumingService`).

use saml_markup::{
    load_objects, Indexed, LocalizedText, MarkupBuilder, MarkupObject, MarkupResult, MarkupState,
    Selector, XmlNode,
};
use tracing::debug;

use super::vocabulary::{MD_NS, NAMESPACES};
use super::requested_attribute::RequestedAttribute;

/// A named set of attributes a service provider asks for.
///
/// Reconciliation against provided attributes lives in
/// [`crate::reconcile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeConsumingService {
    index: Option<u32>,
    is_default: Option<bool>,
    name: LocalizedText,
    description: LocalizedText,
    requested_attributes: Vec<RequestedAttribute>,
    state: MarkupState,
}

impl Default for AttributeConsumingService {
    fn default() -> Self {
        Self {
            index: None,
            is_default: None,
            name: LocalizedText::new("md:ServiceName"),
            description: LocalizedText::new("md:ServiceDescription"),
            requested_attributes: Vec::new(),
            state: MarkupState::default(),
        }
    }
}

impl AttributeConsumingService {
    /// Creates a service with a name in no particular language.
    #[must_use]
    pub fn new(name: impl Into<String>, requested_attributes: Vec<RequestedAttribute>) -> Self {
        Self {
            name: LocalizedText::with_text("md:ServiceName", name),
            requested_attributes,
            ..Self::default()
        }
    }

    /// Sets the index.
    #[must_use]
    pub fn with_index(mut self, index: u32) -> Self {
        self.set_index(index);
        self
    }

    /// Marks the service as the default.
    #[must_use]
    pub fn as_default(mut self) -> Self {
        self.set_default(Some(true));
        self
    }

    /// Service names by language.
    #[must_use]
    pub fn name(&self) -> &LocalizedText {
        &self.name
    }

    /// Mutable service names.
    pub fn name_mut(&mut self) -> &mut LocalizedText {
        self.touch();
        &mut self.name
    }

    /// Service descriptions by language.
    #[must_use]
    pub fn description(&self) -> &LocalizedText {
        &self.description
    }

    /// Mutable service descriptions.
    pub fn description_mut(&mut self) -> &mut LocalizedText {
        self.touch();
        &mut self.description
    }

    /// Requested attributes, in declared order.
    #[must_use]
    pub fn requested_attributes(&self) -> &[RequestedAttribute] {
        &self.requested_attributes
    }

    /// Mutable requested attributes.
    pub fn requested_attributes_mut(&mut self) -> &mut Vec<RequestedAttribute> {
        self.touch();
        &mut self.requested_attributes
    }

    /// Appends a requested attribute.
    pub fn push_requested(&mut self, requested: RequestedAttribute) {
        self.touch();
        self.requested_attributes.push(requested);
    }
}

impl Indexed for AttributeConsumingService {
    fn index(&self) -> Option<u32> {
        self.index
    }

    fn set_index(&mut self, index: u32) {
        self.touch();
        self.index = Some(index);
    }

    fn is_default(&self) -> Option<bool> {
        self.is_default
    }

    fn set_default(&mut self, is_default: Option<bool>) {
        self.touch();
        self.is_default = is_default;
    }
}

impl MarkupObject for AttributeConsumingService {
    fn markup_state(&self) -> &MarkupState {
        &self.state
    }

    fn markup_state_mut(&mut self) -> &mut MarkupState {
        &mut self.state
    }

    fn namespaces(&self) -> &'static [(&'static str, &'static str)] {
        NAMESPACES
    }

    fn decode(&mut self, node: &XmlNode) -> MarkupResult<()> {
        self.index = node.parse_attribute("index")?;
        self.is_default = node.bool_attribute("isDefault")?;
        self.name.parse(node.select(Selector::new(MD_NS, "ServiceName")));
        self.description
            .parse(node.select(Selector::new(MD_NS, "ServiceDescription")));
        self.requested_attributes = load_objects(node, Selector::new(MD_NS, "RequestedAttribute"))?;
        debug!(
            index = self.index,
            requested = self.requested_attributes.len(),
            "decoded attribute consuming service"
        );
        Ok(())
    }

    fn serialize(&self, builder: &mut MarkupBuilder) -> MarkupResult<()> {
        let attributes = self.index_attributes();
        builder.element(
            "md:AttributeConsumingService",
            &super::borrowed(&attributes),
            |builder| {
                self.name.serialize(builder)?;
                self.description.serialize(builder)?;
                self.requested_attributes
                    .iter()
                    .try_for_each(|requested| requested.serialize(builder))
            },
        )
    }
}
