//! # saml-markup
//!
//! Binding framework between markup elements and in-memory objects.
//!
//! - [`node`] - namespace-aware element tree read with `quick-xml`
//! - [`builder`] - markup emission and built documents
//! - [`object`] - the [`MarkupObject`] contract and its two-state lifecycle
//! - [`loader`] - string and object loaders used while decoding children
//! - [`registry`] - qualified element name to factory dispatch
//! - [`localized`] - text keyed by language tag
//! - [`indexed`] - collections of indexed members with pluggable policies
//! - [`config`] - output and indexing options
//! - [`error`] - error types
//!
//! # Example
//!
//! ```rust,ignore
//! use saml_markup::{MarkupObject, XmlNode};
//!
//! let node = XmlNode::parse_str(xml)?;
//! let service = AttributeConsumingService::from_element(&node)?;
//! assert_eq!(service.to_text(false)?, node.source_text());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod builder;
pub mod config;
pub mod error;
pub mod indexed;
pub mod loader;
pub mod localized;
pub mod node;
pub mod object;
pub mod registry;

pub use builder::{Document, MarkupBuilder};
pub use config::{Config, IndexingConfig, OutputConfig};
pub use error::{MarkupError, MarkupResult};
pub use indexed::{IndexPolicy, IndexSlot, Indexed, IndexedCollection, NextFreeIndex, StrictIndex};
pub use loader::{load_object_array, load_objects, load_string_array, Dispatch};
pub use localized::LocalizedText;
pub use node::{Selector, XmlAttribute, XmlNode, XML_NS};
pub use object::{MarkupObject, MarkupState};
pub use registry::{Factory, Registry};
