//! Attributes requested by a service provider.

use saml_markup::{MarkupBuilder, MarkupObject, MarkupResult, MarkupState, XmlNode};

use super::attribute::Attribute;
use super::vocabulary::{NameFormat, NAMESPACES};
use super::value::Value;

/// A relying party's request for an identity attribute
/// (`md:RequestedAttribute`).
///
/// A present value is the set of values the relying party accepts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestedAttribute {
    attribute: Attribute,
    required: Option<bool>,
    state: MarkupState,
}

impl RequestedAttribute {
    /// Creates an optional request for the named attribute.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            attribute: Attribute::new(name),
            ..Self::default()
        }
    }

    /// Creates a request, inferring name format and friendly name the way
    /// [`Attribute::create`] does.
    #[must_use]
    pub fn create(name: impl Into<String>, required: Option<bool>) -> Self {
        Self {
            attribute: Attribute::create(name),
            required,
            state: MarkupState::default(),
        }
    }

    /// Sets the `isRequired` flag.
    #[must_use]
    pub fn with_required(mut self, required: bool) -> Self {
        self.set_required(Some(required));
        self
    }

    /// Sets the name format.
    #[must_use]
    pub fn with_name_format(mut self, name_format: NameFormat) -> Self {
        self.touch();
        self.attribute.set_name_format(Some(name_format));
        self
    }

    /// Sets the friendly name.
    #[must_use]
    pub fn with_friendly_name(mut self, friendly_name: impl Into<String>) -> Self {
        self.touch();
        self.attribute.set_friendly_name(Some(friendly_name.into()));
        self
    }

    /// Constrains the values the request accepts.
    #[must_use]
    pub fn with_allowed(mut self, allowed: Value) -> Self {
        self.set_allowed(Some(allowed));
        self
    }

    /// The requested attribute's name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.attribute.name()
    }

    /// The requested attribute's friendly name.
    #[must_use]
    pub fn friendly_name(&self) -> Option<&str> {
        self.attribute.friendly_name()
    }

    /// The requested attribute's name format.
    #[must_use]
    pub fn name_format(&self) -> Option<&NameFormat> {
        self.attribute.name_format()
    }

    /// The allowed values, if constrained.
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        self.attribute.value()
    }

    /// The name, format and allowed values as a plain attribute.
    #[must_use]
    pub fn attribute(&self) -> &Attribute {
        &self.attribute
    }

    /// Returns whether the attribute must be released. Absent means no.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }

    /// The `isRequired` flag as declared.
    #[must_use]
    pub fn required(&self) -> Option<bool> {
        self.required
    }

    /// Sets or clears the `isRequired` flag.
    pub fn set_required(&mut self, required: Option<bool>) {
        self.touch();
        self.required = required;
    }

    /// Sets or clears the allowed values.
    pub fn set_allowed(&mut self, allowed: Option<Value>) {
        self.touch();
        self.attribute.set_value(allowed);
    }
}

impl MarkupObject for RequestedAttribute {
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
        self.attribute.decode_fields(node)?;
        self.required = node.bool_attribute("isRequired")?;
        Ok(())
    }

    fn serialize(&self, builder: &mut MarkupBuilder) -> MarkupResult<()> {
        let mut attributes = self.attribute.markup_attributes();
        if let Some(required) = self.required {
            attributes.push(("isRequired", required.to_string()));
        }
        builder.element(
            "md:RequestedAttribute",
            &super::borrowed(&attributes),
            |builder| self.attribute.serialize_values(builder),
        )
    }
}
