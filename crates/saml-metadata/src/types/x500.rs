//! X.500/LDAP attribute profile OIDs and their friendly names.

/// URN prefix of OID-named attributes.
pub const OID_PREFIX: &str = "urn:oid:";

const ATTRIBUTES: &[(&str, &str)] = &[
    ("urn:oid:0.9.2342.19200300.100.1.1", "uid"),
    ("urn:oid:0.9.2342.19200300.100.1.3", "mail"),
    ("urn:oid:2.5.4.3", "cn"),
    ("urn:oid:2.5.4.4", "sn"),
    ("urn:oid:2.5.4.10", "o"),
    ("urn:oid:2.5.4.11", "ou"),
    ("urn:oid:2.5.4.12", "title"),
    ("urn:oid:2.5.4.20", "telephoneNumber"),
    ("urn:oid:2.5.4.42", "givenName"),
    ("urn:oid:2.16.840.1.113730.3.1.3", "employeeNumber"),
    ("urn:oid:2.16.840.1.113730.3.1.241", "displayName"),
    ("urn:oid:1.3.6.1.4.1.5923.1.1.1.1", "eduPersonAffiliation"),
    ("urn:oid:1.3.6.1.4.1.5923.1.1.1.5", "eduPersonPrimaryAffiliation"),
    ("urn:oid:1.3.6.1.4.1.5923.1.1.1.6", "eduPersonPrincipalName"),
    ("urn:oid:1.3.6.1.4.1.5923.1.1.1.7", "eduPersonEntitlement"),
    ("urn:oid:1.3.6.1.4.1.5923.1.1.1.9", "eduPersonScopedAffiliation"),
    ("urn:oid:1.3.6.1.4.1.5923.1.1.1.10", "eduPersonTargetedID"),
    ("urn:oid:1.3.6.1.4.1.5923.1.1.1.13", "eduPersonUniqueId"),
    ("urn:oid:1.3.6.1.4.1.25178.1.2.9", "schacHomeOrganization"),
];

/// Friendly name registered for an OID-named attribute.
#[must_use]
pub fn friendly_name(name: &str) -> Option<&'static str> {
    ATTRIBUTES
        .iter()
        .find(|(oid, _)| *oid == name)
        .map(|(_, friendly)| *friendly)
}

/// OID name registered for a friendly name.
#[must_use]
pub fn oid_name(friendly: &str) -> Option<&'static str> {
    ATTRIBUTES
        .iter()
        .find(|(_, name)| *name == friendly)
        .map(|(oid, _)| *oid)
}

/// Returns whether the name uses the `urn:oid:` form.
#[must_use]
pub fn is_oid_name(name: &str) -> bool {
    name.starts_with(OID_PREFIX)
}
