//! SAML 2.0 metadata types.
//!
//! This module contains the bound objects of the metadata vocabulary, from
//! entity descriptors down to attributes and their typed values.

mod attribute;
mod attribute_consuming_service;
mod endpoint;
mod entity;
mod key_descriptor;
mod requested_attribute;
mod service_provider;
mod value;
mod vocabulary;
pub mod x500;

pub use attribute::*;
pub use attribute_consuming_service::*;
pub use endpoint::*;
pub use entity::*;
pub use key_descriptor::*;
pub use requested_attribute::*;
pub use service_provider::*;
pub use value::*;
pub use vocabulary::*;

/// Borrows owned attribute values for [`saml_markup::MarkupBuilder`].
fn borrowed<'a>(attributes: &'a [(&'static str, String)]) -> Vec<(&'static str, &'a str)> {
    attributes
        .iter()
        .map(|(name, value)| (*name, value.as_str()))
        .collect()
}
