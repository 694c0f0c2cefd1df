//! SAML 2.0 metadata objects and requested attribute reconciliation.
//!
//! This crate binds the service provider side of the SAML 2.0 metadata
//! vocabulary to typed objects on top of [`saml_markup`]:
//!
//! - **Entity and role descriptors** - entity IDs, validity, endpoints, keys
//! - **Attribute consuming services** - localized names and requested attributes
//! - **Attributes** - typed values, name formats and X.500 friendly names
//! - **Reconciliation** - selecting which provided attributes to release
//!
//! # Architecture
//!
//! - [`types`] - metadata objects and the SAML vocabulary they use
//! - [`reconcile`] - provided attributes and the reconciliation algorithm
//! - [`registry`] - binding any recognized element by its qualified name
//! - [`error`] - error types and their SAML status codes
//!
//! # Example
//!
//! ```rust,ignore
//! use saml_metadata::{EntityDescriptor, ProvidedAttributes};
//!
//! let entity = EntityDescriptor::parse_str(xml, Config::default())?;
//! let sp = entity.service_provider().ok_or("no SP role")?;
//!
//! let mut provided = ProvidedAttributes::new();
//! provided.insert("urn:oid:0.9.2342.19200300.100.1.3", "ada@example.org");
//! if let Some(statement) = sp.reconcile(None, provided)? {
//!     println!("{}", statement.to_text(true)?);
//! }
//! ```
//!
//! # SAML Specifications
//!
//! - [SAML 2.0 Metadata](https://docs.oasis-open.org/security/saml/v2.0/saml-metadata-2.0-os.pdf)
//! - [SAML 2.0 Core](https://docs.oasis-open.org/security/saml/v2.0/saml-core-2.0-os.pdf)

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod reconcile;
pub mod registry;
pub mod types;

pub use error::{MetadataError, MetadataResult};
pub use reconcile::{Provided, ProvidedAttribute, ProvidedAttributes};
pub use registry::MetadataElement;
pub use types::*;
