//! Service provider metadata binding tests.
//!
//! Parse, query, verbatim output and rebuild of a complete SP metadata
//! document.

use std::collections::HashSet;

use chrono::Utc;
use saml_markup::{Config, IndexingConfig, Indexed, MarkupError, MarkupObject};
use saml_metadata::{
    EntityDescriptor, MetadataElement, NameIdFormat, SamlBinding, PROTOCOL_SUPPORT,
};

use crate::common::{fixture, sp_metadata};

const SIGNING_PREFIX: &str = "MIIE8TCCA9mgAwIBAgIJAITusxON60cKMA0GCSqGSIb3DQEBBQUAMIGrMQswCQYD";

/// Tests that the fixture parses and exposes its issuer.
#[test]
fn test_parse_finds_issuer() -> anyhow::Result<()> {
    let entity = sp_metadata()?;

    assert_eq!(entity.entity_id(), "http://siteadmin.instructure.com/saml2");
    assert_eq!(entity.id(), Some("_6a2bcd0f-3c7e-4f5b-9e1a-0d4c6b8a2f71"));
    assert!(entity.is_valid_at(Utc::now()));
    assert_eq!(entity.service_providers().len(), 1);

    let sp = entity.service_provider().expect("SP role");
    assert!(sp.supports_protocol(PROTOCOL_SUPPORT));
    assert!(sp.authn_requests_signed());
    assert!(sp.want_assertions_signed());
    Ok(())
}

/// Tests that assertion consumer services keep their declared indices.
#[test]
fn test_assertion_consumer_services() -> anyhow::Result<()> {
    let entity = sp_metadata()?;
    let sp = entity.service_provider().expect("SP role");
    let services = sp.assertion_consumer_services();

    assert_eq!(services.len(), 4);
    let indices: Vec<_> = services.iter().map(|acs| acs.index()).collect();
    assert_eq!(indices, vec![Some(0), Some(1), Some(2), Some(3)]);

    let default = sp.assertion_consumer_service(None).expect("default ACS");
    assert_eq!(default.location(), "https://siteadmin.instructure.com/saml_consume");

    let artifact = sp.assertion_consumer_service(Some(3)).expect("ACS 3");
    assert_eq!(artifact.endpoint().parsed_binding(), Some(SamlBinding::HttpArtifact));
    assert!(sp.assertion_consumer_service(Some(9)).is_none());
    Ok(())
}

/// Tests that the signing certificate is found among the keys.
#[test]
fn test_signing_certificate() -> anyhow::Result<()> {
    let entity = sp_metadata()?;
    let sp = entity.service_provider().expect("SP role");

    assert_eq!(sp.keys().len(), 2);
    let certificate = sp.signing_certificate().expect("signing certificate");
    assert!(certificate.starts_with(SIGNING_PREFIX));
    assert!(!certificate.contains(char::is_whitespace));
    assert!(sp.keys()[0].is_encryption());
    Ok(())
}

/// Tests endpoints, name ID formats and localized service names.
#[test]
fn test_services_and_formats() -> anyhow::Result<()> {
    let entity = sp_metadata()?;
    let sp = entity.service_provider().expect("SP role");

    assert_eq!(sp.single_logout_services().len(), 1);
    assert_eq!(
        sp.single_logout_services()[0].parsed_binding(),
        Some(SamlBinding::HttpRedirect)
    );
    assert!(sp.supports_name_id_format(NameIdFormat::Persistent));
    assert!(sp.supports_name_id_format(NameIdFormat::Email));
    assert!(!sp.supports_name_id_format(NameIdFormat::Transient));

    let services = sp.attribute_consuming_services();
    assert_eq!(services.len(), 2);
    let canvas = sp.attribute_consuming_service(None).expect("default service");
    assert_eq!(canvas.name().get(Some("en")), Some("Canvas"));
    assert_eq!(canvas.name().get(Some("es")), Some("Canvas (Español)"));
    assert_eq!(canvas.description().get(Some("en")), Some("Learning management"));
    assert_eq!(canvas.requested_attributes().len(), 3);

    let commons = sp.attribute_consuming_service(Some(1)).expect("service 1");
    let affiliation = &commons.requested_attributes()[0];
    assert!(affiliation.is_required());
    assert_eq!(affiliation.friendly_name(), Some("eduPersonAffiliation"));
    assert!(affiliation.value().is_some_and(|value| value.is_single()));
    Ok(())
}

/// Tests that well-formed markup with the wrong root, and non-markup, fail.
#[test]
fn test_invalid_documents() {
    let err = EntityDescriptor::parse_str("<xml></xml>", Config::default()).unwrap_err();
    assert!(matches!(err, MarkupError::UnknownElement(_)));

    let err = EntityDescriptor::parse_str("garbage", Config::default()).unwrap_err();
    assert!(!matches!(err, MarkupError::UnknownElement(_)));
}

/// Tests that an unmodified document is reproduced byte for byte.
#[test]
fn test_unmodified_output_is_verbatim() -> anyhow::Result<()> {
    let source = fixture("spmetadata.xml")?;
    let root = source
        .find("<md:EntityDescriptor")
        .map(|start| source[start..].trim_end())
        .expect("root element");

    let entity = sp_metadata()?;
    assert_eq!(entity.to_text(true)?, root);
    assert_eq!(entity.to_text(false)?, root);
    Ok(())
}

/// Tests that a rebuilt document binds back to an equal object.
#[test]
fn test_rebuilt_document_reparses_equal() -> anyhow::Result<()> {
    let mut entity = sp_metadata()?;
    let rebuilt = entity.to_document()?.as_str().to_string();

    assert!(rebuilt.contains(r#"entityID="http://siteadmin.instructure.com/saml2""#));
    assert!(rebuilt.contains(SIGNING_PREFIX));
    assert!(rebuilt.contains(r#"xsi:type="xs:string""#));

    let reparsed = EntityDescriptor::parse_str(&rebuilt, Config::default())?;
    assert_eq!(reparsed, entity);
    Ok(())
}

/// Tests duplicate index handling under both index policies.
#[test]
fn test_duplicate_indices() -> anyhow::Result<()> {
    let source = fixture("spmetadata.xml")?.replace(
        r#"saml_consume" index="1""#,
        r#"saml_consume" index="0""#,
    );

    let strict = Config {
        indexing: IndexingConfig { strict: true },
        ..Config::default()
    };
    let err = EntityDescriptor::parse_str(&source, strict).unwrap_err();
    assert!(matches!(err, MarkupError::Index(_)));

    let lenient = EntityDescriptor::parse_str(&source, Config::default())?;
    let services = lenient
        .service_provider()
        .expect("SP role")
        .assertion_consumer_services();
    let indices: HashSet<_> = services.iter().filter_map(|acs| acs.index()).collect();
    assert_eq!(indices.len(), 4);
    Ok(())
}

/// Tests that the registry binds the document by its root element.
#[test]
fn test_registry_dispatch() -> anyhow::Result<()> {
    let element = MetadataElement::parse_str(&fixture("spmetadata.xml")?)?;
    match element {
        MetadataElement::EntityDescriptor(entity) => {
            assert_eq!(entity.service_provider().map(|sp| sp.keys().len()), Some(2));
        }
        other => anyhow::bail!("unexpected element {other:?}"),
    }
    Ok(())
}
