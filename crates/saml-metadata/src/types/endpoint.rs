//! Protocol endpoints declared in metadata.

use saml_markup::{Indexed, MarkupBuilder, MarkupObject, MarkupResult, MarkupState, XmlNode};

use super::vocabulary::{SamlBinding, NAMESPACES};

/// A protocol endpoint such as `md:SingleLogoutService`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Endpoint {
    element: String,
    binding: String,
    location: String,
    response_location: Option<String>,
    state: MarkupState,
}

impl Endpoint {
    /// Creates an endpoint written as `md:{element}`.
    #[must_use]
    pub fn new(
        element: impl Into<String>,
        binding: SamlBinding,
        location: impl Into<String>,
    ) -> Self {
        Self {
            element: element.into(),
            binding: binding.uri().to_string(),
            location: location.into(),
            ..Self::default()
        }
    }

    /// Sets the response location.
    #[must_use]
    pub fn with_response_location(mut self, response_location: impl Into<String>) -> Self {
        self.touch();
        self.response_location = Some(response_location.into());
        self
    }

    /// Local name of the element, e.g. `SingleLogoutService`.
    #[must_use]
    pub fn element(&self) -> &str {
        &self.element
    }

    /// Binding URI.
    #[must_use]
    pub fn binding(&self) -> &str {
        &self.binding
    }

    /// Returns the parsed binding, if recognized.
    #[must_use]
    pub fn parsed_binding(&self) -> Option<SamlBinding> {
        SamlBinding::from_uri(&self.binding)
    }

    /// Endpoint URL.
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    /// URL responses are sent to, when it differs from the location.
    #[must_use]
    pub fn response_location(&self) -> Option<&str> {
        self.response_location.as_deref()
    }

    /// Moves the endpoint.
    pub fn set_location(&mut self, location: impl Into<String>) {
        self.touch();
        self.location = location.into();
    }

    fn markup_attributes(&self) -> Vec<(&'static str, String)> {
        let mut attributes = vec![
            ("Binding", self.binding.clone()),
            ("Location", self.location.clone()),
        ];
        if let Some(response_location) = &self.response_location {
            attributes.push(("ResponseLocation", response_location.clone()));
        }
        attributes
    }

    fn write(
        &self,
        builder: &mut MarkupBuilder,
        extra: Vec<(&'static str, String)>,
    ) -> MarkupResult<()> {
        let mut attributes = self.markup_attributes();
        attributes.extend(extra);
        builder.empty(&format!("md:{}", self.element), &super::borrowed(&attributes))
    }
}

impl MarkupObject for Endpoint {
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
        self.element = node.local_name().to_string();
        self.binding = node.required_attribute("Binding")?.to_string();
        self.location = node.required_attribute("Location")?.to_string();
        self.response_location = node.attribute("ResponseLocation").map(str::to_string);
        Ok(())
    }

    fn serialize(&self, builder: &mut MarkupBuilder) -> MarkupResult<()> {
        self.write(builder, Vec::new())
    }
}

/// An endpoint within an indexed collection, such as
/// `md:AssertionConsumerService`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedEndpoint {
    endpoint: Endpoint,
    index: Option<u32>,
    is_default: Option<bool>,
    state: MarkupState,
}

impl Default for IndexedEndpoint {
    fn default() -> Self {
        Self {
            endpoint: Endpoint {
                element: "AssertionConsumerService".to_string(),
                ..Endpoint::default()
            },
            index: None,
            is_default: None,
            state: MarkupState::default(),
        }
    }
}

impl IndexedEndpoint {
    /// Creates an assertion consumer service endpoint.
    #[must_use]
    pub fn assertion_consumer_service(binding: SamlBinding, location: impl Into<String>) -> Self {
        Self::new("AssertionConsumerService", binding, location)
    }

    /// Creates an indexed endpoint written as `md:{element}`.
    #[must_use]
    pub fn new(
        element: impl Into<String>,
        binding: SamlBinding,
        location: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: Endpoint::new(element, binding, location),
            ..Self::default()
        }
    }

    /// Sets the index.
    #[must_use]
    pub fn with_index(mut self, index: u32) -> Self {
        self.set_index(index);
        self
    }

    /// Marks the endpoint as the default.
    #[must_use]
    pub fn as_default(mut self) -> Self {
        self.set_default(Some(true));
        self
    }

    /// The endpoint itself.
    #[must_use]
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Binding URI.
    #[must_use]
    pub fn binding(&self) -> &str {
        self.endpoint.binding()
    }

    /// Endpoint URL.
    #[must_use]
    pub fn location(&self) -> &str {
        self.endpoint.location()
    }

    /// Moves the endpoint.
    pub fn set_location(&mut self, location: impl Into<String>) {
        self.touch();
        self.endpoint.set_location(location);
    }
}

impl Indexed for IndexedEndpoint {
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

impl MarkupObject for IndexedEndpoint {
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
        self.endpoint.decode(node)?;
        self.index = node.parse_attribute("index")?;
        self.is_default = node.bool_attribute("isDefault")?;
        Ok(())
    }

    fn serialize(&self, builder: &mut MarkupBuilder) -> MarkupResult<()> {
        self.endpoint.write(builder, self.index_attributes())
    }
}
