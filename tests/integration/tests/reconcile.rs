//! Attribute reconciliation tests.
//!
//! Runs provided attribute sets against services built in code and services
//! parsed from the SP metadata fixture.

use std::cell::Cell;
use std::collections::HashMap;
use std::thread;

use saml_markup::MarkupObject;
use saml_metadata::{
    status_codes, sub_status_codes, x500, Attribute, AttributeConsumingService, MetadataError,
    NameFormat, ProvidedAttributes, RequestedAttribute, Value,
};

use crate::common::{init_tracing, sp_metadata};

fn directory_service() -> AttributeConsumingService {
    init_tracing();
    AttributeConsumingService::new(
        "Directory",
        vec![
            RequestedAttribute::new("eduPersonPrincipalName").with_required(true),
            RequestedAttribute::new("uid")
                .with_required(true)
                .with_allowed(["admin", "user"].into_iter().collect()),
        ],
    )
}

/// Tests that conforming attributes are released in request order.
#[test]
fn test_required_attributes_released_in_order() -> anyhow::Result<()> {
    let provided = HashMap::from([
        ("uid", Value::from("admin")),
        ("eduPersonPrincipalName", Value::from("alice@example.edu")),
    ]);

    let statement = directory_service()
        .reconcile(provided)?
        .expect("attribute statement");

    let released: Vec<_> = statement
        .attributes()
        .iter()
        .map(|attribute| (attribute.name(), attribute.value().cloned()))
        .collect();
    assert_eq!(
        released,
        vec![
            ("eduPersonPrincipalName", Some(Value::from("alice@example.edu"))),
            ("uid", Some(Value::from("admin"))),
        ]
    );
    Ok(())
}

/// Tests that a missing required attribute with two allowed values fails.
#[test]
fn test_missing_required_attribute() {
    let mut provided = ProvidedAttributes::new();
    provided.insert("eduPersonPrincipalName", "alice@example.edu");

    let err = directory_service().reconcile(provided).unwrap_err();
    assert!(matches!(err, MetadataError::RequiredAttributeMissing { .. }));
    assert_eq!(err.requested_attribute().map(RequestedAttribute::name), Some("uid"));
    assert_eq!(err.status_code(), status_codes::RESPONDER);
    assert_eq!(err.sub_status_code(), Some(sub_status_codes::REQUEST_DENIED));
    assert_eq!(err.to_string(), "required attribute uid not provided");
}

/// Tests that a value outside the allowed set is reported with the value.
#[test]
fn test_disallowed_value() {
    let mut provided = ProvidedAttributes::new();
    provided
        .insert("eduPersonPrincipalName", "alice@example.edu")
        .insert("uid", "root");

    let err = directory_service().reconcile(provided).unwrap_err();
    assert_eq!(err.provided_value(), Some(&Value::from("root")));
    assert_eq!(
        err.sub_status_code(),
        Some(sub_status_codes::INVALID_ATTR_NAME_OR_VALUE)
    );
}

/// Tests that an unmatched optional request yields no statement.
#[test]
fn test_optional_attribute_absent() -> anyhow::Result<()> {
    init_tracing();
    let service = AttributeConsumingService::new("Optional", vec![RequestedAttribute::new("mail")]);
    let provided: ProvidedAttributes<'_> = vec![Attribute::new("cn").with_value("Alice")].into();
    assert!(service.reconcile(provided)?.is_none());
    Ok(())
}

/// Tests reconciliation against the default service parsed from metadata.
#[test]
fn test_reconcile_against_parsed_service() -> anyhow::Result<()> {
    let entity = sp_metadata()?;
    let sp = entity.service_provider().expect("SP role");

    let mut provided = ProvidedAttributes::new();
    provided
        .insert(x500::oid_name("eduPersonPrincipalName").expect("oid"), "alice@example.edu")
        .insert(x500::oid_name("mail").expect("oid"), "alice@example.edu")
        .insert(x500::oid_name("telephoneNumber").expect("oid"), "555-0100");

    let statement = sp.reconcile(None, provided)?.expect("attribute statement");
    let friendly: Vec<_> = statement
        .attributes()
        .iter()
        .map(|attribute| attribute.friendly_name())
        .collect();
    assert_eq!(friendly, vec![Some("eduPersonPrincipalName"), Some("mail")]);
    assert!(statement
        .attributes()
        .iter()
        .all(|attribute| attribute.name_format() == Some(&NameFormat::Uri)));

    let text = statement.to_text(false)?;
    assert!(text.starts_with("<saml:AttributeStatement"));
    assert!(text.contains(r#"FriendlyName="mail""#));
    Ok(())
}

/// Tests that a single allowed value is released when nothing is provided.
#[test]
fn test_fixed_value_from_parsed_service() -> anyhow::Result<()> {
    let entity = sp_metadata()?;
    let sp = entity.service_provider().expect("SP role");

    let statement = sp
        .reconcile(Some(1), ProvidedAttributes::new())?
        .expect("attribute statement");
    assert_eq!(statement.len(), 1);
    let affiliation = &statement.attributes()[0];
    assert_eq!(affiliation.friendly_name(), Some("eduPersonAffiliation"));
    assert_eq!(affiliation.value(), Some(&Value::from("member")));

    let err = sp.reconcile(Some(5), ProvidedAttributes::new()).unwrap_err();
    assert_eq!(err.status_code(), status_codes::REQUESTER);
    Ok(())
}

/// Tests that deferred producers only run for released attributes.
#[test]
fn test_deferred_values_from_parsed_service() -> anyhow::Result<()> {
    let entity = sp_metadata()?;
    let sp = entity.service_provider().expect("SP role");
    let lookups = Cell::new(0);

    let mut provided = ProvidedAttributes::new();
    provided
        .insert(x500::oid_name("eduPersonPrincipalName").expect("oid"), "alice@example.edu")
        .insert_deferred(x500::oid_name("displayName").expect("oid"), || {
            lookups.set(lookups.get() + 1);
            Value::from("Alice Example")
        })
        .insert_deferred(x500::oid_name("employeeNumber").expect("oid"), || {
            lookups.set(lookups.get() + 10);
            Value::from("42")
        });

    let statement = sp.reconcile(None, provided)?.expect("attribute statement");
    assert_eq!(statement.len(), 2);
    assert_eq!(lookups.get(), 1);
    Ok(())
}

/// Tests concurrent reconciliation against one parsed service.
#[test]
fn test_concurrent_reconciliation() -> anyhow::Result<()> {
    let entity = sp_metadata()?;
    let service = entity
        .service_provider()
        .and_then(|sp| sp.attribute_consuming_service(None))
        .expect("default service");
    let eppn = x500::oid_name("eduPersonPrincipalName").expect("oid");

    thread::scope(|scope| {
        let workers: Vec<_> = (0..4)
            .map(|worker| {
                scope.spawn(move || {
                    let mut provided = ProvidedAttributes::new();
                    provided.insert(eppn, format!("user{worker}@example.edu"));
                    service.reconcile(provided)
                })
            })
            .collect();
        for (worker, handle) in workers.into_iter().enumerate() {
            let statement = handle
                .join()
                .expect("worker panicked")
                .expect("reconciled")
                .expect("attribute statement");
            assert_eq!(
                statement.attributes()[0].value(),
                Some(&Value::from(format!("user{worker}@example.edu")))
            );
        }
    });
    Ok(())
}
