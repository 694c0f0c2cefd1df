//! Service provider role descriptors (`md:SPSSODescriptor`).

use saml_markup::{
    load_objects, load_string_array, Config, IndexedCollection, MarkupBuilder, MarkupObject,
    MarkupResult, MarkupState, Selector, XmlNode,
};
use tracing::debug;

use super::attribute_consuming_service::AttributeConsumingService;
use super::vocabulary::{NameIdFormat, MD_NS, NAMESPACES, PROTOCOL_SUPPORT};
use super::endpoint::{Endpoint, IndexedEndpoint};
use super::key_descriptor::KeyDescriptor;

/// The service provider role of an entity.
///
/// Owns its endpoint and attribute consuming service collections; both are
/// normalized by the index policy chosen at construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceProvider {
    protocol_support_enumeration: Vec<String>,
    authn_requests_signed: Option<bool>,
    want_assertions_signed: Option<bool>,
    keys: Vec<KeyDescriptor>,
    single_logout_services: Vec<Endpoint>,
    manage_name_id_services: Vec<Endpoint>,
    name_id_formats: Vec<String>,
    assertion_consumer_services: IndexedCollection<IndexedEndpoint>,
    attribute_consuming_services: IndexedCollection<AttributeConsumingService>,
    state: MarkupState,
}

impl ServiceProvider {
    /// Creates an empty SAML 2.0 service provider descriptor.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    /// Creates an empty descriptor whose collections use the configured
    /// index policy.
    #[must_use]
    pub fn with_config(config: &Config) -> Self {
        let policy = config.index_policy();
        Self {
            protocol_support_enumeration: vec![PROTOCOL_SUPPORT.to_string()],
            assertion_consumer_services: IndexedCollection::empty(policy.clone()),
            attribute_consuming_services: IndexedCollection::empty(policy),
            ..Self::default()
        }
    }

    /// Protocols this role supports.
    #[must_use]
    pub fn protocol_support_enumeration(&self) -> &[String] {
        &self.protocol_support_enumeration
    }

    /// Returns whether the protocol URI is listed.
    #[must_use]
    pub fn supports_protocol(&self, uri: &str) -> bool {
        self.protocol_support_enumeration.iter().any(|listed| listed == uri)
    }

    /// Returns whether the provider signs its authentication requests.
    #[must_use]
    pub fn authn_requests_signed(&self) -> bool {
        self.authn_requests_signed.unwrap_or(false)
    }

    /// Returns whether the provider wants assertions signed.
    #[must_use]
    pub fn want_assertions_signed(&self) -> bool {
        self.want_assertions_signed.unwrap_or(false)
    }

    /// Sets `AuthnRequestsSigned`.
    pub fn set_authn_requests_signed(&mut self, signed: Option<bool>) {
        self.touch();
        self.authn_requests_signed = signed;
    }

    /// Sets `WantAssertionsSigned`.
    pub fn set_want_assertions_signed(&mut self, signed: Option<bool>) {
        self.touch();
        self.want_assertions_signed = signed;
    }

    /// Published keys.
    #[must_use]
    pub fn keys(&self) -> &[KeyDescriptor] {
        &self.keys
    }

    /// Certificate of the first key usable for signing.
    #[must_use]
    pub fn signing_certificate(&self) -> Option<&str> {
        self.keys
            .iter()
            .filter(|key| key.is_signing())
            .find_map(KeyDescriptor::certificate)
    }

    /// Publishes a key.
    pub fn add_key(&mut self, key: KeyDescriptor) {
        self.touch();
        self.keys.push(key);
    }

    /// Single logout endpoints.
    #[must_use]
    pub fn single_logout_services(&self) -> &[Endpoint] {
        &self.single_logout_services
    }

    /// Adds a single logout endpoint.
    pub fn add_single_logout_service(&mut self, endpoint: Endpoint) {
        self.touch();
        self.single_logout_services.push(endpoint);
    }

    /// Name ID management endpoints.
    #[must_use]
    pub fn manage_name_id_services(&self) -> &[Endpoint] {
        &self.manage_name_id_services
    }

    /// Accepted name ID format URIs.
    #[must_use]
    pub fn name_id_formats(&self) -> &[String] {
        &self.name_id_formats
    }

    /// Returns whether the name ID format is accepted. A provider listing
    /// no formats accepts any.
    #[must_use]
    pub fn supports_name_id_format(&self, format: NameIdFormat) -> bool {
        self.name_id_formats.is_empty()
            || self.name_id_formats.iter().any(|listed| listed == format.uri())
    }

    /// Adds an accepted name ID format.
    pub fn add_name_id_format(&mut self, format: NameIdFormat) {
        self.touch();
        self.name_id_formats.push(format.uri().to_string());
    }

    /// Assertion consumer services, in index order.
    #[must_use]
    pub fn assertion_consumer_services(&self) -> &IndexedCollection<IndexedEndpoint> {
        &self.assertion_consumer_services
    }

    /// The assertion consumer service with `index`, or the default one.
    #[must_use]
    pub fn assertion_consumer_service(&self, index: Option<u32>) -> Option<&IndexedEndpoint> {
        self.assertion_consumer_services.resolve(index)
    }

    /// Adds an assertion consumer service.
    pub fn add_assertion_consumer_service(
        &mut self,
        endpoint: IndexedEndpoint,
    ) -> MarkupResult<()> {
        self.touch();
        self.assertion_consumer_services.push(endpoint)
    }

    /// Attribute consuming services, in index order.
    #[must_use]
    pub fn attribute_consuming_services(&self) -> &IndexedCollection<AttributeConsumingService> {
        &self.attribute_consuming_services
    }

    /// The attribute consuming service with `index`, or the default one.
    #[must_use]
    pub fn attribute_consuming_service(
        &self,
        index: Option<u32>,
    ) -> Option<&AttributeConsumingService> {
        self.attribute_consuming_services.resolve(index)
    }

    /// Adds an attribute consuming service.
    pub fn add_attribute_consuming_service(
        &mut self,
        service: AttributeConsumingService,
    ) -> MarkupResult<()> {
        self.touch();
        self.attribute_consuming_services.push(service)
    }
}

impl MarkupObject for ServiceProvider {
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
        self.protocol_support_enumeration = node
            .required_attribute("protocolSupportEnumeration")?
            .split_whitespace()
            .map(str::to_string)
            .collect();
        self.authn_requests_signed = node.bool_attribute("AuthnRequestsSigned")?;
        self.want_assertions_signed = node.bool_attribute("WantAssertionsSigned")?;
        self.keys = load_objects(node, Selector::new(MD_NS, "KeyDescriptor"))?;
        self.single_logout_services =
            load_objects(node, Selector::new(MD_NS, "SingleLogoutService"))?;
        self.manage_name_id_services =
            load_objects(node, Selector::new(MD_NS, "ManageNameIDService"))?;
        self.name_id_formats = load_string_array(node, Selector::new(MD_NS, "NameIDFormat"));
        self.assertion_consumer_services
            .replace(load_objects(node, Selector::new(MD_NS, "AssertionConsumerService"))?)?;
        self.attribute_consuming_services
            .replace(load_objects(node, Selector::new(MD_NS, "AttributeConsumingService"))?)?;
        debug!(
            acs = self.assertion_consumer_services.len(),
            attribute_services = self.attribute_consuming_services.len(),
            "decoded service provider"
        );
        Ok(())
    }

    fn serialize(&self, builder: &mut MarkupBuilder) -> MarkupResult<()> {
        let mut attributes = vec![(
            "protocolSupportEnumeration",
            self.protocol_support_enumeration.join(" "),
        )];
        if let Some(signed) = self.authn_requests_signed {
            attributes.push(("AuthnRequestsSigned", signed.to_string()));
        }
        if let Some(signed) = self.want_assertions_signed {
            attributes.push(("WantAssertionsSigned", signed.to_string()));
        }
        builder.element("md:SPSSODescriptor", &super::borrowed(&attributes), |builder| {
            for key in &self.keys {
                key.serialize(builder)?;
            }
            let endpoints = self
                .single_logout_services
                .iter()
                .chain(&self.manage_name_id_services);
            for endpoint in endpoints {
                endpoint.serialize(builder)?;
            }
            for format in &self.name_id_formats {
                builder.text_element("md:NameIDFormat", &[], format)?;
            }
            self.assertion_consumer_services.serialize(builder)?;
            self.attribute_consuming_services.serialize(builder)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{KeyUse, SamlBinding};
    use saml_markup::{Indexed, IndexingConfig, MarkupError};

    const DESCRIPTOR: &str = r#"<md:SPSSODescriptor xmlns:md="urn:oasis:names:tc:SAML:2.0:metadata"
        protocolSupportEnumeration="urn:oasis:names:tc:SAML:2.0:protocol" AuthnRequestsSigned="true">
      <md:SingleLogoutService Binding="urn:oasis:names:tc:SAML:2.0:bindings:HTTP-Redirect" Location="https://sp.example.org/slo"/>
      <md:NameIDFormat>
        urn:oasis:names:tc:SAML:2.0:nameid-format:persistent
      </md:NameIDFormat>
      <md:AssertionConsumerService Binding="urn:oasis:names:tc:SAML:2.0:bindings:HTTP-POST" Location="https://sp.example.org/acs/post" index="1"/>
      <md:AssertionConsumerService Binding="urn:oasis:names:tc:SAML:2.0:bindings:HTTP-Artifact" Location="https://sp.example.org/acs/artifact" index="0" isDefault="true"/>
      <md:AttributeConsumingService index="0">
        <md:ServiceName xml:lang="en">Portal</md:ServiceName>
        <md:RequestedAttribute Name="mail"/>
      </md:AttributeConsumingService>
    </md:SPSSODescriptor>"#;

    #[test]
    fn parse_reads_roles_and_collections() {
        let sp = ServiceProvider::from_xml(DESCRIPTOR).unwrap();
        assert!(sp.supports_protocol(PROTOCOL_SUPPORT));
        assert!(sp.authn_requests_signed());
        assert!(!sp.want_assertions_signed());
        assert_eq!(sp.single_logout_services().len(), 1);
        assert!(sp.supports_name_id_format(NameIdFormat::Persistent));
        assert!(!sp.supports_name_id_format(NameIdFormat::Transient));

        let indexes: Vec<_> = sp
            .assertion_consumer_services()
            .iter()
            .map(Indexed::index)
            .collect();
        assert_eq!(indexes, vec![Some(0), Some(1)]);
        assert_eq!(
            sp.assertion_consumer_service(None).map(IndexedEndpoint::location),
            Some("https://sp.example.org/acs/artifact")
        );
        assert_eq!(
            sp.attribute_consuming_service(Some(0))
                .map(|service| service.name().to_string()),
            Some("Portal".to_string())
        );
        assert!(sp.attribute_consuming_service(Some(4)).is_none());
    }

    #[test]
    fn strict_config_rejects_duplicate_indices() {
        let config = Config {
            indexing: IndexingConfig { strict: true },
            ..Config::default()
        };
        let duplicated = DESCRIPTOR.replace(r#"index="0" isDefault"#, r#"index="1" isDefault"#);
        let node = XmlNode::parse_str(&duplicated).unwrap();

        let mut strict = ServiceProvider::with_config(&config);
        assert!(matches!(strict.parse(&node), Err(MarkupError::Index(_))));

        let lenient = ServiceProvider::from_element(&node).unwrap();
        assert_eq!(lenient.assertion_consumer_services().len(), 2);
    }

    #[test]
    fn built_provider_reparses_equal() {
        let mut sp = ServiceProvider::new();
        sp.add_key(KeyDescriptor::new(Some(KeyUse::Signing), "MIIC"));
        sp.add_name_id_format(NameIdFormat::Email);
        sp.add_assertion_consumer_service(IndexedEndpoint::assertion_consumer_service(
            SamlBinding::HttpPost,
            "https://sp.example.org/acs",
        ))
        .unwrap();
        sp.add_attribute_consuming_service(AttributeConsumingService::new("Portal", Vec::new()))
            .unwrap();

        assert_eq!(sp.signing_certificate(), Some("MIIC"));
        let text = sp.to_text(true).unwrap();
        let reparsed = ServiceProvider::from_xml(&text).unwrap();
        assert_eq!(reparsed, sp);
        assert_eq!(reparsed.assertion_consumer_service(Some(0)).unwrap().index(), Some(0));
    }
}
