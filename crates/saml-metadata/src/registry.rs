//! Element-name dispatch for the metadata vocabulary.
//!
//! Any recognized metadata element can be bound without knowing its type in
//! advance; the qualified name of the root selects the object to build.

use std::sync::LazyLock;

use saml_markup::{MarkupObject, MarkupResult, Registry, XmlNode};

use crate::types::{
    Attribute, AttributeConsumingService, AttributeStatement, Endpoint, EntityDescriptor,
    IndexedEndpoint, KeyDescriptor, RequestedAttribute, ServiceProvider, MD_NS, SAML_NS,
};

/// A bound metadata element of any recognized kind.
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataElement {
    /// `md:EntityDescriptor`
    EntityDescriptor(EntityDescriptor),
    /// `md:SPSSODescriptor`
    ServiceProvider(ServiceProvider),
    /// `md:AttributeConsumingService`
    AttributeConsumingService(AttributeConsumingService),
    /// `md:RequestedAttribute`
    RequestedAttribute(RequestedAttribute),
    /// `saml:Attribute`
    Attribute(Attribute),
    /// `saml:AttributeStatement`
    AttributeStatement(AttributeStatement),
    /// An endpoint without an index, such as `md:SingleLogoutService`.
    Endpoint(Endpoint),
    /// An indexed endpoint, such as `md:AssertionConsumerService`.
    IndexedEndpoint(IndexedEndpoint),
    /// `md:KeyDescriptor`
    KeyDescriptor(KeyDescriptor),
}

static REGISTRY: LazyLock<Registry<MetadataElement>> = LazyLock::new(|| {
    Registry::new()
        .register(MD_NS, "EntityDescriptor", |node| {
            EntityDescriptor::from_element(node).map(MetadataElement::EntityDescriptor)
        })
        .register(MD_NS, "SPSSODescriptor", |node| {
            ServiceProvider::from_element(node).map(MetadataElement::ServiceProvider)
        })
        .register(MD_NS, "AttributeConsumingService", |node| {
            AttributeConsumingService::from_element(node)
                .map(MetadataElement::AttributeConsumingService)
        })
        .register(MD_NS, "RequestedAttribute", |node| {
            RequestedAttribute::from_element(node).map(MetadataElement::RequestedAttribute)
        })
        .register(MD_NS, "AssertionConsumerService", indexed_endpoint)
        .register(MD_NS, "ArtifactResolutionService", indexed_endpoint)
        .register(MD_NS, "SingleLogoutService", endpoint)
        .register(MD_NS, "ManageNameIDService", endpoint)
        .register(MD_NS, "KeyDescriptor", |node| {
            KeyDescriptor::from_element(node).map(MetadataElement::KeyDescriptor)
        })
        .register(SAML_NS, "Attribute", |node| {
            Attribute::from_element(node).map(MetadataElement::Attribute)
        })
        .register(SAML_NS, "AttributeStatement", |node| {
            AttributeStatement::from_element(node).map(MetadataElement::AttributeStatement)
        })
});

fn endpoint(node: &XmlNode) -> MarkupResult<MetadataElement> {
    Endpoint::from_element(node).map(MetadataElement::Endpoint)
}

fn indexed_endpoint(node: &XmlNode) -> MarkupResult<MetadataElement> {
    IndexedEndpoint::from_element(node).map(MetadataElement::IndexedEndpoint)
}

/// The registry of every recognized metadata element.
#[must_use]
pub fn registry() -> &'static Registry<MetadataElement> {
    &REGISTRY
}

impl MetadataElement {
    /// Builds the object for `node`, chosen by its qualified name.
    pub fn from_node(node: &XmlNode) -> MarkupResult<Self> {
        registry().construct(node)
    }

    /// Parses a document whose root is any recognized metadata element.
    pub fn parse_str(xml: &str) -> MarkupResult<Self> {
        Self::from_node(&XmlNode::parse_str(xml)?)
    }

    /// The bound object.
    #[must_use]
    pub fn as_markup(&self) -> &dyn MarkupObject {
        match self {
            Self::EntityDescriptor(inner) => inner,
            Self::ServiceProvider(inner) => inner,
            Self::AttributeConsumingService(inner) => inner,
            Self::RequestedAttribute(inner) => inner,
            Self::Attribute(inner) => inner,
            Self::AttributeStatement(inner) => inner,
            Self::Endpoint(inner) => inner,
            Self::IndexedEndpoint(inner) => inner,
            Self::KeyDescriptor(inner) => inner,
        }
    }

    /// Textual form of the bound object.
    pub fn to_text(&self, pretty: bool) -> MarkupResult<String> {
        self.as_markup().to_text(pretty)
    }
}

#[cfg(test)]
mod tests {
    use saml_markup::MarkupError;

    use super::*;

    #[test]
    fn every_element_is_registered() {
        assert_eq!(registry().len(), 11);
    }

    #[test]
    fn dispatches_on_root_element() {
        let xml = r#"<md:RequestedAttribute xmlns:md="urn:oasis:names:tc:SAML:2.0:metadata" Name="mail" isRequired="true"/>"#;
        let element = MetadataElement::parse_str(xml).unwrap();
        match &element {
            MetadataElement::RequestedAttribute(requested) => assert!(requested.is_required()),
            other => panic!("unexpected element {other:?}"),
        }
        assert_eq!(element.to_text(false).unwrap(), xml);
    }

    #[test]
    fn endpoints_keep_their_kind() {
        let slo = MetadataElement::parse_str(
            r#"<md:SingleLogoutService xmlns:md="urn:oasis:names:tc:SAML:2.0:metadata" Binding="urn:oasis:names:tc:SAML:2.0:bindings:HTTP-Redirect" Location="https://sp.example.org/slo"/>"#,
        )
        .unwrap();
        assert!(matches!(slo, MetadataElement::Endpoint(ref endpoint) if endpoint.element() == "SingleLogoutService"));

        let acs = MetadataElement::parse_str(
            r#"<md:AssertionConsumerService xmlns:md="urn:oasis:names:tc:SAML:2.0:metadata" Binding="urn:oasis:names:tc:SAML:2.0:bindings:HTTP-POST" Location="https://sp.example.org/acs" index="3"/>"#,
        )
        .unwrap();
        assert!(matches!(acs, MetadataElement::IndexedEndpoint(_)));
    }

    #[test]
    fn unknown_root_is_rejected() {
        let err = MetadataElement::parse_str(
            r#"<md:IDPSSODescriptor xmlns:md="urn:oasis:names:tc:SAML:2.0:metadata"/>"#,
        )
        .unwrap_err();
        assert!(matches!(err, MarkupError::UnknownElement(name) if name.ends_with("IDPSSODescriptor")));
    }
}
