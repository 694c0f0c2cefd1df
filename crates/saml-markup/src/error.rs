//! Error handling for the markup binding layer.
//!
//! Syntax errors come straight from `quick-xml`; everything else describes
//! markup that is well-formed but does not fit the object model.

use thiserror::Error;

/// Result type alias using the markup error type.
pub type MarkupResult<T> = std::result::Result<T, MarkupError>;

/// Errors raised while reading or writing bound markup.
#[derive(Debug, Error)]
pub enum MarkupError {
    /// The underlying XML reader or writer rejected the document.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Writing to the output buffer failed.
    #[error("write error: {0}")]
    Io(#[from] std::io::Error),

    /// Emitted markup was not valid UTF-8.
    #[error("invalid UTF-8 in markup: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// The document has no root element.
    #[error("document has no root element")]
    EmptyDocument,

    /// The document ended before an element was closed.
    #[error("element <{0}> is never closed")]
    Unclosed(String),

    /// A second element follows the root element.
    #[error("element <{0}> follows the root element")]
    ExtraRoot(String),

    /// A required attribute is absent from an element.
    #[error("element <{element}> is missing required attribute {attribute}")]
    MissingAttribute {
        /// Local name of the element.
        element: String,
        /// Name of the missing attribute.
        attribute: String,
    },

    /// A required child element is absent.
    #[error("element <{element}> is missing required child <{child}>")]
    MissingElement {
        /// Local name of the parent element.
        element: String,
        /// Local name of the missing child.
        child: String,
    },

    /// An attribute or text value could not be interpreted.
    #[error("invalid value {value:?} for {field}")]
    InvalidValue {
        /// The attribute or element carrying the value.
        field: String,
        /// The raw value as it appeared in the markup.
        value: String,
    },

    /// No factory is known for an element.
    #[error("no binding registered for element {0}")]
    UnknownElement(String),

    /// An indexed collection violates its indexing policy.
    #[error("index policy violation: {0}")]
    Index(String),
}

impl MarkupError {
    /// Creates a missing attribute error.
    pub fn missing_attribute(element: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::MissingAttribute {
            element: element.into(),
            attribute: attribute.into(),
        }
    }

    /// Creates an invalid value error.
    pub fn invalid_value(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Returns whether this error comes from malformed XML rather than from
    /// a document that does not fit the object model.
    #[must_use]
    pub const fn is_syntax_error(&self) -> bool {
        matches!(
            self,
            Self::Xml(_)
                | Self::Utf8(_)
                | Self::EmptyDocument
                | Self::Unclosed(_)
                | Self::ExtraRoot(_)
        )
    }
}

impl From<quick_xml::events::attributes::AttrError> for MarkupError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Self::Xml(err.into())
    }
}
