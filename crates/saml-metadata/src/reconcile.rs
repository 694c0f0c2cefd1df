//! Reconciliation of provided attributes against an attribute consuming
//! service.
//!
//! A service lists the attributes it requests, some required and some
//! constrained to a set of allowed values. Given the attributes available for
//! a subject, [`AttributeConsumingService::reconcile`] selects what to
//! release, in request order, or explains why nothing can be released.
//!
//! # Matching
//!
//! A provided attribute is found under its `(name, name format)` pair. One
//! that declares a format is also found by name alone, so it satisfies
//! requests that do not care about format. The reverse does not hold: an
//! attribute without a format never satisfies a request that names one.
//! Exact pairs win over name-only matches whatever the input order.

use std::collections::HashMap;
use std::fmt;

use saml_markup::MarkupObject;
use tracing::debug;

use crate::error::{MetadataError, MetadataResult};
use crate::types::{
    Attribute, AttributeConsumingService, AttributeStatement, RequestedAttribute, ServiceProvider,
    Value,
};

/// A provided value, either known up front or computed when first needed.
pub enum Provided<'a> {
    /// A value known up front.
    Literal(Value),
    /// A producer run at most once, and only if the attribute is selected.
    Deferred(Box<dyn FnOnce() -> Value + 'a>),
}

impl<'a> Provided<'a> {
    /// Wraps a producer.
    pub fn deferred(producer: impl FnOnce() -> Value + 'a) -> Self {
        Self::Deferred(Box::new(producer))
    }

    /// Runs a pending producer, caching its result.
    fn resolve(&mut self) -> Option<&Value> {
        if matches!(self, Self::Deferred(_)) {
            let pending = std::mem::replace(self, Self::Literal(Value::Multiple(Vec::new())));
            if let Self::Deferred(producer) = pending {
                *self = Self::Literal(producer());
            }
        }
        match self {
            Self::Literal(value) => Some(value),
            Self::Deferred(_) => None,
        }
    }
}

impl fmt::Debug for Provided<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

impl From<Value> for Provided<'_> {
    fn from(value: Value) -> Self {
        Self::Literal(value)
    }
}

/// An attribute available for release.
#[derive(Debug)]
pub struct ProvidedAttribute<'a> {
    attribute: Attribute,
    value: Option<Provided<'a>>,
}

impl<'a> ProvidedAttribute<'a> {
    /// Provides `attribute` with its own value, if any.
    #[must_use]
    pub fn new(mut attribute: Attribute) -> Self {
        let value = attribute.value().cloned().map(Provided::Literal);
        attribute.set_value(None);
        Self { attribute, value }
    }

    /// Provides the named attribute with a value.
    ///
    /// The name goes through [`Attribute::create`], so OID names get their
    /// format and friendly name.
    #[must_use]
    pub fn named(name: impl Into<String>, value: impl Into<Provided<'a>>) -> Self {
        Self {
            attribute: Attribute::create(name),
            value: Some(value.into()),
        }
    }

    /// Replaces the provided value.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<Provided<'a>>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// The attribute's name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.attribute.name()
    }

    /// Builds the released attribute, running a deferred producer if needed.
    fn release(&mut self) -> (Attribute, Option<&Value>) {
        let value = self.value.as_mut().and_then(Provided::resolve);
        let mut released = self.attribute.clone();
        released.set_value(value.cloned());
        (released, value)
    }
}

/// The attributes available for one subject.
#[derive(Debug, Default)]
pub struct ProvidedAttributes<'a> {
    entries: Vec<ProvidedAttribute<'a>>,
}

impl<'a> ProvidedAttributes<'a> {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a provided attribute.
    #[must_use]
    pub fn with(mut self, provided: ProvidedAttribute<'a>) -> Self {
        self.push(provided);
        self
    }

    /// Adds a provided attribute.
    pub fn push(&mut self, provided: ProvidedAttribute<'a>) {
        self.entries.push(provided);
    }

    /// Adds a named attribute with a literal value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.push(ProvidedAttribute::named(name, Provided::Literal(value.into())));
        self
    }

    /// Adds a named attribute whose value is computed only if released.
    pub fn insert_deferred(
        &mut self,
        name: impl Into<String>,
        producer: impl FnOnce() -> Value + 'a,
    ) -> &mut Self {
        self.push(ProvidedAttribute::named(name, Provided::deferred(producer)));
        self
    }

    /// Number of provided attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether nothing is provided.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<Attribute>> for ProvidedAttributes<'_> {
    fn from(attributes: Vec<Attribute>) -> Self {
        attributes.into_iter().collect()
    }
}

impl FromIterator<Attribute> for ProvidedAttributes<'_> {
    fn from_iter<I: IntoIterator<Item = Attribute>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(ProvidedAttribute::new).collect(),
        }
    }
}

impl<'a> FromIterator<ProvidedAttribute<'a>> for ProvidedAttributes<'a> {
    fn from_iter<I: IntoIterator<Item = ProvidedAttribute<'a>>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a, K, V> FromIterator<(K, V)> for ProvidedAttributes<'a>
where
    K: Into<String>,
    V: Into<Provided<'a>>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(name, value)| ProvidedAttribute::named(name, value))
            .collect()
    }
}

impl<'a, K, V> From<HashMap<K, V>> for ProvidedAttributes<'a>
where
    K: Into<String>,
    V: Into<Provided<'a>>,
{
    fn from(map: HashMap<K, V>) -> Self {
        map.into_iter().collect()
    }
}

type LookupKey = (String, Option<String>);

/// Positions of provided attributes by `(name, format URI)`, plus qualified
/// attributes by name alone.
struct Lookup {
    exact: HashMap<LookupKey, usize>,
    by_name: HashMap<String, usize>,
}

impl Lookup {
    fn build(entries: &[ProvidedAttribute<'_>]) -> Self {
        let mut exact = HashMap::with_capacity(entries.len());
        let mut by_name = HashMap::new();
        for (position, entry) in entries.iter().enumerate() {
            let attribute = &entry.attribute;
            let format = attribute.name_format().map(|format| format.uri().to_string());
            if format.is_some() {
                by_name.insert(attribute.name().to_string(), position);
            }
            exact.insert((attribute.name().to_string(), format), position);
        }
        Self { exact, by_name }
    }

    fn find(&self, requested: &RequestedAttribute) -> Option<usize> {
        let key = (
            requested.name().to_string(),
            requested.name_format().map(|format| format.uri().to_string()),
        );
        self.exact
            .get(&key)
            .or_else(|| self.by_name.get(requested.name()))
            .copied()
    }
}

impl AttributeConsumingService {
    /// Selects the provided attributes this service requests.
    ///
    /// Returns `Ok(None)` when nothing is released. Fails, without releasing
    /// anything, when a provided value is outside a request's allowed set or
    /// a required attribute is missing and has no single fixed value to fall
    /// back on. The service is not modified.
    pub fn reconcile<'a>(
        &self,
        provided: impl Into<ProvidedAttributes<'a>>,
    ) -> MetadataResult<Option<AttributeStatement>> {
        let mut provided: ProvidedAttributes<'a> = provided.into();
        let lookup = Lookup::build(&provided.entries);
        let mut released = Vec::with_capacity(self.requested_attributes().len());

        for requested in self.requested_attributes() {
            match lookup.find(requested) {
                Some(position) => {
                    let (attribute, value) = provided.entries[position].release();
                    if let Some(allowed) = requested.value() {
                        if !value.is_some_and(|value| allowed.allows(value)) {
                            return Err(MetadataError::invalid(requested, value.cloned()));
                        }
                    }
                    debug!(name = requested.name(), "releasing provided attribute");
                    released.push(attribute);
                }
                None if requested.is_required() => match requested.value() {
                    Some(fixed @ Value::Single(_)) => {
                        debug!(name = requested.name(), "releasing fixed requested value");
                        released.push(synthesize(requested, fixed.clone()));
                    }
                    _ => return Err(MetadataError::missing(requested)),
                },
                None => debug!(name = requested.name(), "optional attribute not provided"),
            }
        }

        if released.is_empty() {
            return Ok(None);
        }
        Ok(Some(AttributeStatement::new(released)))
    }
}

fn synthesize(requested: &RequestedAttribute, value: Value) -> Attribute {
    let mut attribute = Attribute::new(requested.name()).with_value(value);
    attribute.set_name_format(requested.name_format().cloned());
    attribute.set_friendly_name(requested.friendly_name().map(str::to_string));
    attribute.touch();
    attribute
}

impl ServiceProvider {
    /// Reconciles against the attribute consuming service with `index`, or
    /// the default one.
    ///
    /// A provider without attribute consuming services releases nothing.
    pub fn reconcile<'a>(
        &self,
        index: Option<u32>,
        provided: impl Into<ProvidedAttributes<'a>>,
    ) -> MetadataResult<Option<AttributeStatement>> {
        match self.attribute_consuming_service(index) {
            Some(service) => service.reconcile(provided),
            None => match index {
                Some(index) => Err(MetadataError::UnknownAttributeConsumingService(index)),
                None => Ok(None),
            },
        }
    }
}
