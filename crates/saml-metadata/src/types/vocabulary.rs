//! URIs of the SAML 2.0 vocabulary that metadata documents refer to.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Metadata namespace.
pub const MD_NS: &str = "urn:oasis:names:tc:SAML:2.0:metadata";

/// Assertion namespace, home of `Attribute` and `AttributeValue`.
pub const SAML_NS: &str = "urn:oasis:names:tc:SAML:2.0:assertion";

/// XML signature namespace, home of `KeyInfo`.
pub const XMLDSIG_NS: &str = "http://www.w3.org/2000/09/xmldsig#";

/// Schema instance namespace, used for `xsi:type`.
pub const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Schema namespace, used for `xs:` value types.
pub const XS_NS: &str = "http://www.w3.org/2001/XMLSchema";

/// Protocol namespace, listed in `protocolSupportEnumeration`.
pub const PROTOCOL_SUPPORT: &str = "urn:oasis:names:tc:SAML:2.0:protocol";

/// Prefix bindings written on the root of every built document.
pub const NAMESPACES: &[(&str, &str)] = &[
    ("md", MD_NS),
    ("saml", SAML_NS),
    ("xsi", XSI_NS),
    ("xs", XS_NS),
];

/// Protocol bindings an endpoint can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SamlBinding {
    /// `HTTP-POST`.
    HttpPost,
    /// `HTTP-Redirect`.
    HttpRedirect,
    /// `HTTP-Artifact`.
    HttpArtifact,
}

impl SamlBinding {
    /// The `Binding` attribute value.
    #[must_use]
    pub const fn uri(self) -> &'static str {
        match self {
            Self::HttpPost => "urn:oasis:names:tc:SAML:2.0:bindings:HTTP-POST",
            Self::HttpRedirect => "urn:oasis:names:tc:SAML:2.0:bindings:HTTP-Redirect",
            Self::HttpArtifact => "urn:oasis:names:tc:SAML:2.0:bindings:HTTP-Artifact",
        }
    }

    /// The binding named by a `Binding` attribute, if it is one of ours.
    #[must_use]
    pub fn from_uri(uri: &str) -> Option<Self> {
        [Self::HttpPost, Self::HttpRedirect, Self::HttpArtifact]
            .into_iter()
            .find(|binding| binding.uri() == uri)
    }
}

/// The `NameFormat` of an attribute.
///
/// Decides the friendly name an attribute gets when it declares none: `Uri`
/// names are looked up in the X.500 OID table, `Basic` names stand for
/// themselves, anything else gets nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NameFormat {
    /// `unspecified`.
    Unspecified,
    /// `uri`, as used by the X.500/LDAP attribute profile.
    Uri,
    /// `basic`.
    Basic,
    /// A format URI outside the core three, kept verbatim.
    Other(String),
}

impl NameFormat {
    /// The `NameFormat` attribute value.
    #[must_use]
    pub fn uri(&self) -> &str {
        match self {
            Self::Unspecified => "urn:oasis:names:tc:SAML:2.0:attrname-format:unspecified",
            Self::Uri => "urn:oasis:names:tc:SAML:2.0:attrname-format:uri",
            Self::Basic => "urn:oasis:names:tc:SAML:2.0:attrname-format:basic",
            Self::Other(uri) => uri,
        }
    }

    /// Reads a `NameFormat` attribute value.
    #[must_use]
    pub fn from_uri(uri: &str) -> Self {
        [Self::Unspecified, Self::Uri, Self::Basic]
            .into_iter()
            .find(|format| format.uri() == uri)
            .unwrap_or_else(|| Self::Other(uri.to_string()))
    }

    /// Friendly name for `name` when the attribute declares none.
    #[must_use]
    pub fn default_friendly_name(&self, name: &str) -> Option<String> {
        match self {
            Self::Uri => super::x500::friendly_name(name).map(str::to_string),
            Self::Basic => Some(name.to_string()),
            Self::Unspecified | Self::Other(_) => None,
        }
    }
}

impl fmt::Display for NameFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.uri())
    }
}

impl From<String> for NameFormat {
    fn from(uri: String) -> Self {
        Self::from_uri(&uri)
    }
}

impl From<NameFormat> for String {
    fn from(format: NameFormat) -> Self {
        format.uri().to_string()
    }
}

/// Subject identifier formats a service provider can list as `NameIDFormat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameIdFormat {
    /// `emailAddress`.
    Email,
    /// `persistent`.
    Persistent,
    /// `transient`.
    Transient,
}

impl NameIdFormat {
    /// The `NameIDFormat` element text.
    #[must_use]
    pub const fn uri(self) -> &'static str {
        match self {
            Self::Email => "urn:oasis:names:tc:SAML:1.1:nameid-format:emailAddress",
            Self::Persistent => "urn:oasis:names:tc:SAML:2.0:nameid-format:persistent",
            Self::Transient => "urn:oasis:names:tc:SAML:2.0:nameid-format:transient",
        }
    }
}

macro_rules! status_uri {
    ($code:literal) => {
        concat!("urn:oasis:names:tc:SAML:2.0:status:", $code)
    };
}

/// Top-level status codes a failed reconciliation maps to.
pub mod status_codes {
    /// The request itself was at fault.
    pub const REQUESTER: &str = status_uri!("Requester");

    /// The request was fine but could not be satisfied.
    pub const RESPONDER: &str = status_uri!("Responder");
}

/// Second-level status codes narrowing a [`status_codes`] value.
pub mod sub_status_codes {
    /// An attribute value fell outside what was requested.
    pub const INVALID_ATTR_NAME_OR_VALUE: &str = status_uri!("InvalidAttrNameOrValue");

    /// A required attribute could not be released.
    pub const REQUEST_DENIED: &str = status_uri!("RequestDenied");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bindings_are_read_back_from_their_uri() {
        assert_eq!(
            SamlBinding::HttpRedirect.uri(),
            "urn:oasis:names:tc:SAML:2.0:bindings:HTTP-Redirect"
        );
        assert_eq!(
            SamlBinding::from_uri(SamlBinding::HttpArtifact.uri()),
            Some(SamlBinding::HttpArtifact)
        );
        assert_eq!(SamlBinding::from_uri("urn:oasis:names:tc:SAML:2.0:bindings:SOAP"), None);
    }

    #[test]
    fn status_codes_share_the_status_namespace() {
        assert_eq!(status_codes::REQUESTER, "urn:oasis:names:tc:SAML:2.0:status:Requester");
        assert_eq!(
            sub_status_codes::REQUEST_DENIED,
            "urn:oasis:names:tc:SAML:2.0:status:RequestDenied"
        );
    }

    #[test]
    fn unknown_name_format_is_preserved() {
        let format = NameFormat::from_uri("urn:mace:shibboleth:1.0:attributeNamespace:uri");
        assert_eq!(
            format,
            NameFormat::Other("urn:mace:shibboleth:1.0:attributeNamespace:uri".to_string())
        );
        assert_eq!(format.uri(), "urn:mace:shibboleth:1.0:attributeNamespace:uri");
        assert_eq!(NameFormat::from_uri(NameFormat::Basic.uri()), NameFormat::Basic);
    }

    #[test]
    fn friendly_name_defaults_by_format() {
        assert_eq!(
            NameFormat::Uri.default_friendly_name("urn:oid:0.9.2342.19200300.100.1.3"),
            Some("mail".to_string())
        );
        assert_eq!(NameFormat::Uri.default_friendly_name("urn:oid:1.2.3"), None);
        assert_eq!(
            NameFormat::Basic.default_friendly_name("email"),
            Some("email".to_string())
        );
        assert_eq!(NameFormat::Unspecified.default_friendly_name("email"), None);
    }

    #[test]
    fn name_format_serializes_as_uri() {
        let json = serde_json::to_string(&NameFormat::Uri).unwrap();
        assert_eq!(json, r#""urn:oasis:names:tc:SAML:2.0:attrname-format:uri""#);
        let parsed: NameFormat = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, NameFormat::Uri);
    }
}
