//! Key descriptors (`md:KeyDescriptor`).
//!
//! Only the X.509 certificate is read; evaluating it is up to the caller.

use std::fmt;

use saml_markup::{
    MarkupBuilder, MarkupError, MarkupObject, MarkupResult, MarkupState, Selector, XmlNode,
};

use super::vocabulary::{NAMESPACES, XMLDSIG_NS};

/// What a key is declared for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyUse {
    /// Signing.
    Signing,
    /// Encryption.
    Encryption,
}

impl KeyUse {
    /// The `use` attribute value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Signing => "signing",
            Self::Encryption => "encryption",
        }
    }
}

impl fmt::Display for KeyUse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A key published in metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyDescriptor {
    key_use: Option<KeyUse>,
    certificate: Option<String>,
    state: MarkupState,
}

impl KeyDescriptor {
    /// Creates a descriptor for a base64 DER certificate.
    #[must_use]
    pub fn new(key_use: Option<KeyUse>, certificate: impl Into<String>) -> Self {
        Self {
            key_use,
            certificate: Some(certificate.into()),
            state: MarkupState::default(),
        }
    }

    /// Declared use; absent means the key serves both purposes.
    #[must_use]
    pub fn key_use(&self) -> Option<KeyUse> {
        self.key_use
    }

    /// Returns whether the key may be used for signing.
    #[must_use]
    pub fn is_signing(&self) -> bool {
        self.key_use != Some(KeyUse::Encryption)
    }

    /// Returns whether the key may be used for encryption.
    #[must_use]
    pub fn is_encryption(&self) -> bool {
        self.key_use != Some(KeyUse::Signing)
    }

    /// Base64 certificate with whitespace removed.
    #[must_use]
    pub fn certificate(&self) -> Option<&str> {
        self.certificate.as_deref()
    }
}

impl MarkupObject for KeyDescriptor {
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
        self.key_use = match node.attribute("use") {
            None => None,
            Some("signing") => Some(KeyUse::Signing),
            Some("encryption") => Some(KeyUse::Encryption),
            Some(other) => return Err(MarkupError::invalid_value("use", other)),
        };
        self.certificate = node
            .first(Selector::new(XMLDSIG_NS, "KeyInfo"))
            .and_then(|info| info.first(Selector::new(XMLDSIG_NS, "X509Data")))
            .and_then(|data| data.first(Selector::new(XMLDSIG_NS, "X509Certificate")))
            .map(|cert| cert.text().split_whitespace().collect());
        Ok(())
    }

    fn serialize(&self, builder: &mut MarkupBuilder) -> MarkupResult<()> {
        let key_use = self.key_use.map(|key_use| key_use.as_str());
        let attributes: Vec<(&str, &str)> = key_use.iter().map(|value| ("use", *value)).collect();
        builder.element("md:KeyDescriptor", &attributes, |builder| {
            builder.element("ds:KeyInfo", &[("xmlns:ds", XMLDSIG_NS)], |builder| {
                builder.element("ds:X509Data", &[], |builder| {
                    if let Some(certificate) = &self.certificate {
                        builder.text_element("ds:X509Certificate", &[], certificate)?;
                    }
                    Ok(())
                })
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESCRIPTOR: &str = r#"<md:KeyDescriptor xmlns:md="urn:oasis:names:tc:SAML:2.0:metadata" use="signing">
      <ds:KeyInfo xmlns:ds="http://www.w3.org/2000/09/xmldsig#">
        <ds:X509Data>
          <ds:X509Certificate>
            MIIC
            qzCC
          </ds:X509Certificate>
        </ds:X509Data>
      </ds:KeyInfo>
    </md:KeyDescriptor>"#;

    #[test]
    fn certificate_whitespace_is_removed() {
        let descriptor = KeyDescriptor::from_xml(DESCRIPTOR).unwrap();
        assert_eq!(descriptor.key_use(), Some(KeyUse::Signing));
        assert_eq!(descriptor.certificate(), Some("MIICqzCC"));
        assert!(descriptor.is_signing());
        assert!(!descriptor.is_encryption());
    }

    #[test]
    fn unknown_use_is_rejected() {
        let result = KeyDescriptor::from_xml(
            r#"<md:KeyDescriptor xmlns:md="urn:oasis:names:tc:SAML:2.0:metadata" use="both"/>"#,
        );
        assert!(matches!(result, Err(MarkupError::InvalidValue { .. })));
    }

    #[test]
    fn unqualified_use_serves_both() {
        let descriptor = KeyDescriptor::new(None, "MIIC");
        assert!(descriptor.is_signing() && descriptor.is_encryption());
        let reparsed = KeyDescriptor::from_xml(&descriptor.to_text(false).unwrap()).unwrap();
        assert_eq!(reparsed, descriptor);
    }
}
