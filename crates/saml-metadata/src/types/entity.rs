//! Entity descriptors (`md:EntityDescriptor`), the root of a metadata
//! document.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use saml_markup::{
    Config, MarkupBuilder, MarkupError, MarkupObject, MarkupResult, MarkupState, Selector,
    XmlNode,
};
use tracing::debug;

use super::vocabulary::{MD_NS, NAMESPACES};
use super::service_provider::ServiceProvider;

/// A SAML entity and the roles it publishes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityDescriptor {
    entity_id: String,
    id: Option<String>,
    valid_until: Option<DateTime<Utc>>,
    service_providers: Vec<ServiceProvider>,
    config: Arc<Config>,
    state: MarkupState,
}

impl EntityDescriptor {
    /// Creates a descriptor with no roles.
    #[must_use]
    pub fn new(entity_id: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            ..Self::default()
        }
    }

    /// Creates an empty descriptor that parses roles with `config`.
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            ..Self::default()
        }
    }

    /// Parses a whole metadata document.
    pub fn parse_str(xml: &str, config: Config) -> MarkupResult<Self> {
        let mut entity = Self::with_config(config);
        entity.parse(&XmlNode::parse_str(xml)?)?;
        Ok(entity)
    }

    /// Sets `validUntil`.
    #[must_use]
    pub fn with_valid_until(mut self, valid_until: DateTime<Utc>) -> Self {
        self.touch();
        self.valid_until = Some(valid_until);
        self
    }

    /// The entity ID, which is also the issuer of this entity's messages.
    #[must_use]
    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    /// The document-unique `ID`, used as a signature reference.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// End of the metadata's validity period.
    #[must_use]
    pub fn valid_until(&self) -> Option<DateTime<Utc>> {
        self.valid_until
    }

    /// Returns whether the metadata is still valid at `now`.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.valid_until.map_or(true, |valid_until| now < valid_until)
    }

    /// Service provider roles, in document order.
    #[must_use]
    pub fn service_providers(&self) -> &[ServiceProvider] {
        &self.service_providers
    }

    /// The first service provider role.
    #[must_use]
    pub fn service_provider(&self) -> Option<&ServiceProvider> {
        self.service_providers.first()
    }

    /// Adds a service provider role.
    pub fn add_service_provider(&mut self, service_provider: ServiceProvider) {
        self.touch();
        self.service_providers.push(service_provider);
    }
}

impl MarkupObject for EntityDescriptor {
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
        if !node.is(MD_NS, "EntityDescriptor") {
            return Err(MarkupError::UnknownElement(node.clark_name()));
        }
        self.entity_id = node.required_attribute("entityID")?.to_string();
        self.id = node.attribute("ID").map(str::to_string);
        self.valid_until = node
            .attribute("validUntil")
            .map(|raw| {
                DateTime::parse_from_rfc3339(raw)
                    .map(|value| value.with_timezone(&Utc))
                    .map_err(|_| MarkupError::invalid_value("validUntil", raw))
            })
            .transpose()?;
        self.service_providers = node
            .select(Selector::new(MD_NS, "SPSSODescriptor"))
            .map(|role| {
                let mut service_provider = ServiceProvider::with_config(&self.config);
                service_provider.parse(role)?;
                Ok(service_provider)
            })
            .collect::<MarkupResult<_>>()?;
        debug!(
            entity_id = %self.entity_id,
            service_providers = self.service_providers.len(),
            "decoded entity descriptor"
        );
        Ok(())
    }

    fn serialize(&self, builder: &mut MarkupBuilder) -> MarkupResult<()> {
        let mut attributes = vec![("entityID", self.entity_id.clone())];
        if let Some(id) = &self.id {
            attributes.push(("ID", id.clone()));
        }
        if let Some(valid_until) = self.valid_until {
            attributes.push((
                "validUntil",
                valid_until.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            ));
        }
        builder.element("md:EntityDescriptor", &super::borrowed(&attributes), |builder| {
            self.service_providers
                .iter()
                .try_for_each(|service_provider| service_provider.serialize(builder))
        })
    }
}
