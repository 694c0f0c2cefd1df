//! SAML attributes and attribute statements.

use std::collections::HashMap;

use saml_markup::{
    load_object_array, Dispatch, Factory, MarkupBuilder, MarkupError, MarkupObject, MarkupResult,
    MarkupState, Selector, XmlNode,
};
use tracing::debug;

use super::vocabulary::{NameFormat, NAMESPACES, SAML_NS, XSI_NS};
use super::value::{Scalar, Value};
use super::x500;

/// SAML Attribute.
///
/// Fields are reached through accessors so that every mutation drops the
/// parsed source and any cached document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attribute {
    name: String,
    friendly_name: Option<String>,
    name_format: Option<NameFormat>,
    value: Option<Value>,
    state: MarkupState,
}

impl Attribute {
    /// Creates an attribute with just a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Creates an attribute, inferring the name format from the name.
    ///
    /// `urn:oid:` names use the URI format and pick up their friendly name
    /// from the X.500 attribute table. Other names get no format.
    #[must_use]
    pub fn create(name: impl Into<String>) -> Self {
        let name = name.into();
        let format = x500::is_oid_name(&name).then_some(NameFormat::Uri);
        Self::create_with_format(name, format)
    }

    /// Creates an attribute with the given format, applying that format's
    /// friendly-name default.
    #[must_use]
    pub fn create_with_format(name: impl Into<String>, format: Option<NameFormat>) -> Self {
        let name = name.into();
        let friendly_name = format
            .as_ref()
            .and_then(|format| format.default_friendly_name(&name));
        Self {
            name,
            friendly_name,
            name_format: format,
            ..Self::default()
        }
    }

    /// Sets the value.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.set_value(Some(value.into()));
        self
    }

    /// Sets the friendly name.
    #[must_use]
    pub fn with_friendly_name(mut self, friendly_name: impl Into<String>) -> Self {
        self.set_friendly_name(Some(friendly_name.into()));
        self
    }

    /// Sets the name format.
    #[must_use]
    pub fn with_name_format(mut self, name_format: NameFormat) -> Self {
        self.set_name_format(Some(name_format));
        self
    }

    /// The attribute name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The human-readable name, if declared.
    #[must_use]
    pub fn friendly_name(&self) -> Option<&str> {
        self.friendly_name.as_deref()
    }

    /// The name format, if declared.
    #[must_use]
    pub fn name_format(&self) -> Option<&NameFormat> {
        self.name_format.as_ref()
    }

    /// The value, if any.
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Every value as a slice; empty when there is none.
    #[must_use]
    pub fn values(&self) -> &[Scalar] {
        self.value.as_ref().map_or(&[], Value::scalars)
    }

    /// Renames the attribute.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.touch();
        self.name = name.into();
    }

    /// Sets or clears the friendly name.
    pub fn set_friendly_name(&mut self, friendly_name: Option<String>) {
        self.touch();
        self.friendly_name = friendly_name;
    }

    /// Sets or clears the name format.
    pub fn set_name_format(&mut self, name_format: Option<NameFormat>) {
        self.touch();
        self.name_format = name_format;
    }

    /// Sets or clears the value.
    pub fn set_value(&mut self, value: Option<Value>) {
        self.touch();
        self.value = value;
    }

    /// Reads the fields shared by `saml:Attribute` and `md:RequestedAttribute`.
    pub(crate) fn decode_fields(&mut self, node: &XmlNode) -> MarkupResult<()> {
        let name = node.required_attribute("Name")?;
        if name.is_empty() {
            return Err(MarkupError::missing_attribute(node.local_name(), "Name"));
        }
        self.name = name.to_string();
        self.friendly_name = node.attribute("FriendlyName").map(str::to_string);
        self.name_format = node.attribute("NameFormat").map(NameFormat::from_uri);

        let scalars = node
            .select(Selector::new(SAML_NS, "AttributeValue"))
            .map(|value| Scalar::parse(value.attribute_ns(XSI_NS, "type"), value.text().trim()))
            .collect::<MarkupResult<Vec<_>>>()?;
        self.value = Value::from_scalars(scalars);
        Ok(())
    }

    /// `Name`, `FriendlyName` and `NameFormat`, as present.
    pub(crate) fn markup_attributes(&self) -> Vec<(&'static str, String)> {
        let mut attributes = vec![("Name", self.name.clone())];
        if let Some(friendly_name) = &self.friendly_name {
            attributes.push(("FriendlyName", friendly_name.clone()));
        }
        if let Some(name_format) = &self.name_format {
            attributes.push(("NameFormat", name_format.uri().to_string()));
        }
        attributes
    }

    /// One `saml:AttributeValue` per scalar.
    pub(crate) fn serialize_values(&self, builder: &mut MarkupBuilder) -> MarkupResult<()> {
        for scalar in self.values() {
            builder.text_element(
                "saml:AttributeValue",
                &[("xsi:type", scalar.xsi_type())],
                &scalar.to_string(),
            )?;
        }
        Ok(())
    }
}

impl MarkupObject for Attribute {
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
        self.decode_fields(node)
    }

    fn serialize(&self, builder: &mut MarkupBuilder) -> MarkupResult<()> {
        let attributes = self.markup_attributes();
        builder.element("saml:Attribute", &super::borrowed(&attributes), |builder| {
            self.serialize_values(builder)
        })
    }
}

/// Statement children this crate can decode, by local name.
const STATEMENT_CHILDREN: &[(&str, Factory<Attribute>)] = &[("Attribute", Attribute::from_element)];

/// Attribute statement.
///
/// Contains attributes about the subject, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeStatement {
    attributes: Vec<Attribute>,
    state: MarkupState,
}

impl AttributeStatement {
    /// Creates a statement from attributes.
    #[must_use]
    pub fn new(attributes: Vec<Attribute>) -> Self {
        Self {
            attributes,
            state: MarkupState::default(),
        }
    }

    /// Creates a statement from a name to values map. Names go through
    /// [`Attribute::create`]; entries without values are skipped.
    #[must_use]
    pub fn from_map(attrs: HashMap<String, Vec<String>>) -> Self {
        let attributes = attrs
            .into_iter()
            .filter_map(|(name, values)| {
                let scalars = values.into_iter().map(Scalar::from).collect();
                Value::from_scalars(scalars).map(|value| Attribute::create(name).with_value(value))
            })
            .collect();
        Self::new(attributes)
    }

    /// Attributes in statement order.
    #[must_use]
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Mutable access to the attributes.
    pub fn attributes_mut(&mut self) -> &mut Vec<Attribute> {
        self.touch();
        &mut self.attributes
    }

    /// Appends an attribute.
    pub fn push(&mut self, attribute: Attribute) {
        self.touch();
        self.attributes.push(attribute);
    }

    /// First attribute with the given name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|attribute| attribute.name() == name)
    }

    /// Number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Returns whether the statement has no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Consumes the statement, returning its attributes.
    #[must_use]
    pub fn into_attributes(self) -> Vec<Attribute> {
        self.attributes
    }

    /// Attribute values keyed by name, in their lexical form.
    #[must_use]
    pub fn to_map(&self) -> HashMap<String, Vec<String>> {
        self.attributes
            .iter()
            .map(|attribute| {
                let values = attribute.values().iter().map(ToString::to_string).collect();
                (attribute.name().to_string(), values)
            })
            .collect()
    }
}

impl MarkupObject for AttributeStatement {
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
        self.attributes = load_object_array(
            node,
            Selector::any_in(SAML_NS),
            &Dispatch::Table(STATEMENT_CHILDREN),
        )?;
        debug!(attributes = self.attributes.len(), "decoded attribute statement");
        Ok(())
    }

    fn serialize(&self, builder: &mut MarkupBuilder) -> MarkupResult<()> {
        builder.element("saml:AttributeStatement", &[], |builder| {
            self.attributes
                .iter()
                .try_for_each(|attribute| attribute.serialize(builder))
        })
    }
}

impl<'a> IntoIterator for &'a AttributeStatement {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.attributes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ATTRIBUTE: &str = r#"<saml:Attribute xmlns:saml="urn:oasis:names:tc:SAML:2.0:assertion"
        xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
        Name="urn:oid:1.3.6.1.4.1.5923.1.1.1.1"
        NameFormat="urn:oasis:names:tc:SAML:2.0:attrname-format:uri">
        <saml:AttributeValue xsi:type="xs:string"> member </saml:AttributeValue>
        <saml:AttributeValue>staff</saml:AttributeValue>
    </saml:Attribute>"#;

    #[test]
    fn parse_reads_name_format_and_values() {
        let attribute = Attribute::from_xml(ATTRIBUTE).unwrap();
        assert_eq!(attribute.name(), "urn:oid:1.3.6.1.4.1.5923.1.1.1.1");
        assert_eq!(attribute.name_format(), Some(&NameFormat::Uri));
        assert_eq!(attribute.friendly_name(), None);
        assert_eq!(
            attribute.value(),
            Some(&["member", "staff"].into_iter().collect())
        );
        assert_eq!(attribute.to_text(true).unwrap(), ATTRIBUTE);
    }

    #[test]
    fn empty_name_is_rejected() {
        let err = Attribute::from_xml(
            r#"<saml:Attribute xmlns:saml="urn:oasis:names:tc:SAML:2.0:assertion" Name=""/>"#,
        )
        .unwrap_err();
        assert!(matches!(err, MarkupError::MissingAttribute { .. }));

        let err = Attribute::from_xml(
            r#"<saml:Attribute xmlns:saml="urn:oasis:names:tc:SAML:2.0:assertion"/>"#,
        )
        .unwrap_err();
        assert!(matches!(err, MarkupError::MissingAttribute { .. }));
    }

    #[test]
    fn create_infers_oid_format() {
        let attribute = Attribute::create("urn:oid:0.9.2342.19200300.100.1.3");
        assert_eq!(attribute.name_format(), Some(&NameFormat::Uri));
        assert_eq!(attribute.friendly_name(), Some("mail"));

        let plain = Attribute::create("eduPersonPrincipalName");
        assert_eq!(plain.name_format(), None);
        assert_eq!(plain.friendly_name(), None);

        let basic = Attribute::create_with_format("email", Some(NameFormat::Basic));
        assert_eq!(basic.friendly_name(), Some("email"));
    }

    #[test]
    fn build_writes_typed_values() {
        let attribute = Attribute::new("age").with_value(30_i64);
        assert_eq!(
            attribute.to_text(false).unwrap(),
            concat!(
                r#"<saml:Attribute xmlns:md="urn:oasis:names:tc:SAML:2.0:metadata" "#,
                r#"xmlns:saml="urn:oasis:names:tc:SAML:2.0:assertion" "#,
                r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" "#,
                r#"xmlns:xs="http://www.w3.org/2001/XMLSchema" Name="age">"#,
                r#"<saml:AttributeValue xsi:type="xs:integer">30</saml:AttributeValue>"#,
                "</saml:Attribute>"
            )
        );
    }

    #[test]
    fn mutation_rebuilds() {
        let mut attribute = Attribute::from_xml(ATTRIBUTE).unwrap();
        attribute.set_value(Some(Value::from(true)));
        let rebuilt = Attribute::from_xml(&attribute.to_text(false).unwrap()).unwrap();
        assert_eq!(rebuilt.value(), Some(&Value::from(true)));
        assert_eq!(rebuilt.name(), attribute.name());
    }

    #[test]
    fn statement_rejects_unknown_children() {
        let statement = AttributeStatement::from_xml(
            r#"<saml:AttributeStatement xmlns:saml="urn:oasis:names:tc:SAML:2.0:assertion">
                 <saml:Attribute Name="a"><saml:AttributeValue>1</saml:AttributeValue></saml:Attribute>
                 <saml:Attribute Name="b"/>
               </saml:AttributeStatement>"#,
        )
        .unwrap();
        assert_eq!(statement.len(), 2);
        assert_eq!(statement.get("b").and_then(Attribute::value), None);

        let err = AttributeStatement::from_xml(
            r#"<saml:AttributeStatement xmlns:saml="urn:oasis:names:tc:SAML:2.0:assertion">
                 <saml:EncryptedAttribute/>
               </saml:AttributeStatement>"#,
        )
        .unwrap_err();
        assert!(matches!(err, MarkupError::UnknownElement(_)));
    }

    #[test]
    fn statement_map_conversion() {
        let mut map = HashMap::new();
        map.insert(
            "roles".to_string(),
            vec!["admin".to_string(), "user".to_string()],
        );
        map.insert("empty".to_string(), Vec::new());
        let statement = AttributeStatement::from_map(map);
        assert_eq!(statement.len(), 1);
        assert_eq!(statement.get("roles").unwrap().values().len(), 2);
        assert_eq!(
            statement.to_map().get("roles"),
            Some(&vec!["admin".to_string(), "user".to_string()])
        );
    }
}
