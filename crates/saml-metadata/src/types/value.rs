//! Typed attribute values.
//!
//! `<saml:AttributeValue>` elements carry an optional `xsi:type`; the value is
//! decoded into a [`Scalar`] of the matching kind and written back with the
//! same type.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use saml_markup::{MarkupError, MarkupResult};
use serde::{Deserialize, Serialize};

/// A single typed attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Scalar {
    /// `xs:string`, and any type this crate does not interpret.
    String(String),
    /// `xs:boolean`.
    Boolean(bool),
    /// `xs:integer` and its bounded subtypes.
    Integer(i64),
    /// `xs:dateTime`.
    DateTime(DateTime<Utc>),
}

impl Scalar {
    /// The `xsi:type` written for this value.
    #[must_use]
    pub const fn xsi_type(&self) -> &'static str {
        match self {
            Self::String(_) => "xs:string",
            Self::Boolean(_) => "xs:boolean",
            Self::Integer(_) => "xs:integer",
            Self::DateTime(_) => "xs:dateTime",
        }
    }

    /// Decodes element text according to its `xsi:type`.
    ///
    /// The type's prefix is ignored. Types other than boolean, the integer
    /// family and dateTime decode as strings.
    pub fn parse(xsi_type: Option<&str>, text: &str) -> MarkupResult<Self> {
        let kind = xsi_type.map(|ty| ty.rsplit(':').next().unwrap_or(ty));
        match kind {
            Some("boolean") => saml_markup::node::parse_xs_boolean(text)
                .map(Self::Boolean)
                .ok_or_else(|| MarkupError::invalid_value("xs:boolean", text)),
            Some("integer" | "int" | "long" | "short" | "byte" | "nonNegativeInteger"
                | "positiveInteger" | "unsignedInt") => text
                .parse()
                .map(Self::Integer)
                .map_err(|_| MarkupError::invalid_value("xs:integer", text)),
            Some("dateTime") => DateTime::parse_from_rfc3339(text)
                .map(|value| Self::DateTime(value.with_timezone(&Utc)))
                .map_err(|_| MarkupError::invalid_value("xs:dateTime", text)),
            _ => Ok(Self::String(text.to_string())),
        }
    }

    /// The string form, if this is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(value) => f.write_str(value),
            Self::Boolean(value) => write!(f, "{value}"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::DateTime(value) => {
                f.write_str(&value.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<DateTime<Utc>> for Scalar {
    fn from(value: DateTime<Utc>) -> Self {
        Self::DateTime(value)
    }
}

/// The value of an attribute: one scalar or several.
///
/// On a requested attribute the value is the set of values the requester
/// accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Exactly one value.
    Single(Scalar),
    /// Several values, in document order.
    Multiple(Vec<Scalar>),
}

impl Value {
    /// Collapses decoded scalars: none is no value, one is `Single`.
    #[must_use]
    pub fn from_scalars(mut scalars: Vec<Scalar>) -> Option<Self> {
        match scalars.len() {
            0 => None,
            1 => scalars.pop().map(Self::Single),
            _ => Some(Self::Multiple(scalars)),
        }
    }

    /// Every scalar of this value.
    #[must_use]
    pub fn scalars(&self) -> &[Scalar] {
        match self {
            Self::Single(scalar) => std::slice::from_ref(scalar),
            Self::Multiple(scalars) => scalars,
        }
    }

    /// Returns whether this is a single value.
    #[must_use]
    pub const fn is_single(&self) -> bool {
        matches!(self, Self::Single(_))
    }

    /// Treating `self` as an allowed set, returns whether `candidate` is in it.
    ///
    /// Only a single value can be a member; a list never is, even one whose
    /// entries are all allowed.
    #[must_use]
    pub fn allows(&self, candidate: &Self) -> bool {
        match candidate {
            Self::Single(scalar) => self.scalars().contains(scalar),
            Self::Multiple(_) => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(scalar) => write!(f, "{scalar:?}"),
            Self::Multiple(scalars) => {
                f.write_str("[")?;
                for (position, scalar) in scalars.iter().enumerate() {
                    if position > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{scalar:?}")?;
                }
                f.write_str("]")
            }
        }
    }
}

macro_rules! single_value_from {
    ($($source:ty),*) => {
        $(
            impl From<$source> for Value {
                fn from(value: $source) -> Self {
                    Self::Single(value.into())
                }
            }
        )*
    };
}

single_value_from!(Scalar, &str, String, bool, i64, DateTime<Utc>);

impl<T: Into<Scalar>> FromIterator<T> for Value {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::Multiple(iter.into_iter().map(Into::into).collect())
    }
}
