//! Common test utilities and fixtures.

use saml_integration_tests::fixture_path;
use saml_markup::Config;
use saml_metadata::EntityDescriptor;

/// Initializes tracing once per test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("saml_metadata=debug,saml_markup=debug")
        .with_test_writer()
        .try_init();
}

/// Reads a fixture file.
pub fn fixture(name: &str) -> anyhow::Result<String> {
    Ok(std::fs::read_to_string(fixture_path(name))?)
}

/// Parses the service provider fixture with the default configuration.
pub fn sp_metadata() -> anyhow::Result<EntityDescriptor> {
    init_tracing();
    Ok(EntityDescriptor::parse_str(
        &fixture("spmetadata.xml")?,
        Config::default(),
    )?)
}
