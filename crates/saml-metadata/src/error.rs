//! Metadata error types.
//!
//! Markup failures are wrapped from [`saml_markup::MarkupError`]; the
//! remaining variants are raised while reconciling provided attributes
//! against an attribute consuming service.

use saml_markup::MarkupError;
use thiserror::Error;

use crate::types::{status_codes, sub_status_codes, RequestedAttribute, Value};

/// Result type for metadata operations.
pub type MetadataResult<T> = Result<T, MetadataError>;

/// Metadata and attribute reconciliation errors.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// Markup could not be read, decoded or built.
    #[error(transparent)]
    Markup(#[from] MarkupError),

    /// A required attribute was not provided and has no single fixed value.
    #[error("required attribute {} not provided", .requested.name())]
    RequiredAttributeMissing {
        /// The unsatisfied request.
        requested: Box<RequestedAttribute>,
    },

    /// A provided value is outside the requested attribute's allowed set.
    #[error(
        "attribute {} is provided value {}, but only allows {}",
        .requested.name(),
        describe(.provided.as_ref()),
        describe(.requested.value())
    )]
    InvalidAttributeValue {
        /// The request whose constraint was violated.
        requested: Box<RequestedAttribute>,
        /// The value that was offered.
        provided: Option<Value>,
    },

    /// No attribute consuming service carries the given index.
    #[error("no attribute consuming service with index {0}")]
    UnknownAttributeConsumingService(u32),
}

fn describe(value: Option<&Value>) -> String {
    value.map_or_else(|| "nothing".to_string(), ToString::to_string)
}

impl MetadataError {
    pub(crate) fn missing(requested: &RequestedAttribute) -> Self {
        Self::RequiredAttributeMissing {
            requested: Box::new(requested.clone()),
        }
    }

    pub(crate) fn invalid(requested: &RequestedAttribute, provided: Option<Value>) -> Self {
        Self::InvalidAttributeValue {
            requested: Box::new(requested.clone()),
            provided,
        }
    }

    /// The requested attribute a reconciliation error refers to.
    #[must_use]
    pub fn requested_attribute(&self) -> Option<&RequestedAttribute> {
        match self {
            Self::RequiredAttributeMissing { requested }
            | Self::InvalidAttributeValue { requested, .. } => Some(requested.as_ref()),
            _ => None,
        }
    }

    /// The offending value of an `InvalidAttributeValue` error.
    #[must_use]
    pub fn provided_value(&self) -> Option<&Value> {
        match self {
            Self::InvalidAttributeValue { provided, .. } => provided.as_ref(),
            _ => None,
        }
    }

    /// Returns the SAML status code for this error.
    ///
    /// Malformed input from the peer maps to `Requester`; failures to satisfy
    /// a service's attribute requirements are the responder's.
    #[must_use]
    pub fn status_code(&self) -> &'static str {
        match self {
            Self::Markup(err) if err.is_syntax_error() => status_codes::REQUESTER,
            Self::UnknownAttributeConsumingService(_) => status_codes::REQUESTER,
            _ => status_codes::RESPONDER,
        }
    }

    /// Returns a sub-status code if applicable.
    #[must_use]
    pub fn sub_status_code(&self) -> Option<&'static str> {
        match self {
            Self::InvalidAttributeValue { .. } => {
                Some(sub_status_codes::INVALID_ATTR_NAME_OR_VALUE)
            }
            Self::RequiredAttributeMissing { .. } => Some(sub_status_codes::REQUEST_DENIED),
            _ => None,
        }
    }
}
