//! Namespace-aware element tree read with `quick-xml`.
//!
//! Every node keeps a handle to the shared source text and its own byte span,
//! so an element that was never modified can be written back exactly as it
//! was received.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;
use std::sync::Arc;

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;

use crate::error::{MarkupError, MarkupResult};

/// Namespace bound to the reserved `xml` prefix.
pub const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// An attribute with its namespace resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlAttribute {
    /// Namespace URI, if the attribute name was prefixed.
    pub namespace: Option<String>,
    /// Local part of the attribute name.
    pub local_name: String,
    /// Attribute name exactly as written.
    pub qualified_name: String,
    /// Unescaped attribute value.
    pub value: String,
}

/// Matches child elements by namespace and, optionally, local name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selector<'a> {
    namespace: Option<&'a str>,
    local_name: Option<&'a str>,
}

impl<'a> Selector<'a> {
    /// Matches elements with the given namespace and local name.
    #[must_use]
    pub const fn new(namespace: &'a str, local_name: &'a str) -> Self {
        Self {
            namespace: Some(namespace),
            local_name: Some(local_name),
        }
    }

    /// Matches every element in a namespace.
    #[must_use]
    pub const fn any_in(namespace: &'a str) -> Self {
        Self {
            namespace: Some(namespace),
            local_name: None,
        }
    }

    /// Matches unqualified elements with the given local name.
    #[must_use]
    pub const fn unqualified(local_name: &'a str) -> Self {
        Self {
            namespace: None,
            local_name: Some(local_name),
        }
    }

    /// Returns whether the node matches.
    #[must_use]
    pub fn matches(&self, node: &XmlNode) -> bool {
        node.namespace() == self.namespace
            && self.local_name.map_or(true, |name| node.local_name() == name)
    }
}

/// A parsed element.
#[derive(Clone)]
pub struct XmlNode {
    namespace: Option<String>,
    local_name: String,
    prefix: Option<String>,
    attributes: Vec<XmlAttribute>,
    children: Vec<XmlNode>,
    text: String,
    source: Arc<str>,
    span: Range<usize>,
}

impl XmlNode {
    /// Parses a document and returns its root element.
    pub fn parse_str(xml: &str) -> MarkupResult<Self> {
        let source: Arc<str> = Arc::from(xml);
        let mut reader = NsReader::from_str(xml);
        let mut open: Vec<XmlNode> = Vec::new();
        let mut root = None;

        loop {
            let start = tag_start(xml, offset(reader.buffer_position()));
            let (resolved, event) = reader.read_resolved_event()?;
            let namespace = namespace_of(resolved)?;

            match event {
                Event::Start(e) => {
                    open.push(Self::open(&reader, namespace, &e, &source, start)?);
                }
                Event::Empty(e) => {
                    let mut node = Self::open(&reader, namespace, &e, &source, start)?;
                    node.span.end = offset(reader.buffer_position());
                    attach(&mut open, &mut root, node)?;
                }
                Event::End(_) => {
                    if let Some(mut node) = open.pop() {
                        node.span.end = offset(reader.buffer_position());
                        attach(&mut open, &mut root, node)?;
                    }
                }
                Event::Text(text) => {
                    if let Some(node) = open.last_mut() {
                        node.text.push_str(&text.unescape()?);
                    }
                }
                Event::CData(data) => {
                    if let Some(node) = open.last_mut() {
                        node.text
                            .push_str(&String::from_utf8(data.into_inner().into_owned())?);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(node) = open.pop() {
            return Err(MarkupError::Unclosed(node.local_name));
        }
        root.ok_or(MarkupError::EmptyDocument)
    }

    fn open(
        reader: &NsReader<&[u8]>,
        namespace: Option<String>,
        start: &BytesStart<'_>,
        source: &Arc<str>,
        position: usize,
    ) -> MarkupResult<Self> {
        let name = start.name();
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr?;
            if attr.key.as_namespace_binding().is_some() {
                continue;
            }
            let qualified_name = lossy(attr.key.as_ref());
            let namespace = match attr.key.prefix() {
                Some(prefix) if prefix.as_ref() == b"xml" => Some(XML_NS.to_string()),
                Some(_) => namespace_of(reader.resolve_attribute(attr.key).0)?,
                None => None,
            };
            attributes.push(XmlAttribute {
                namespace,
                local_name: lossy(attr.key.local_name().as_ref()),
                qualified_name,
                value: attr.unescape_value()?.into_owned(),
            });
        }

        Ok(Self {
            namespace,
            local_name: lossy(name.local_name().as_ref()),
            prefix: name.prefix().map(|prefix| lossy(prefix.as_ref())),
            attributes,
            children: Vec::new(),
            text: String::new(),
            source: Arc::clone(source),
            span: position..position,
        })
    }

    /// Namespace URI of the element.
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Local part of the element name.
    #[must_use]
    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// Prefix the element was written with.
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Element name in Clark notation (`{namespace}local`).
    #[must_use]
    pub fn clark_name(&self) -> String {
        clark_name(self.namespace(), self.local_name())
    }

    /// Returns whether this element has the given namespace and local name.
    #[must_use]
    pub fn is(&self, namespace: &str, local_name: &str) -> bool {
        self.namespace() == Some(namespace) && self.local_name == local_name
    }

    /// All attributes except namespace declarations.
    #[must_use]
    pub fn attributes(&self) -> &[XmlAttribute] {
        &self.attributes
    }

    /// Value of an unqualified attribute.
    #[must_use]
    pub fn attribute(&self, local_name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.namespace.is_none() && attr.local_name == local_name)
            .map(|attr| attr.value.as_str())
    }

    /// Value of a namespaced attribute.
    #[must_use]
    pub fn attribute_ns(&self, namespace: &str, local_name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| {
                attr.namespace.as_deref() == Some(namespace) && attr.local_name == local_name
            })
            .map(|attr| attr.value.as_str())
    }

    /// Value of `xml:lang`.
    #[must_use]
    pub fn lang(&self) -> Option<&str> {
        self.attribute_ns(XML_NS, "lang")
    }

    /// Value of an unqualified attribute that must be present.
    pub fn required_attribute(&self, local_name: &str) -> MarkupResult<&str> {
        self.attribute(local_name)
            .ok_or_else(|| MarkupError::missing_attribute(&self.local_name, local_name))
    }

    /// Parses an optional unqualified attribute.
    pub fn parse_attribute<T: FromStr>(&self, local_name: &str) -> MarkupResult<Option<T>> {
        self.attribute(local_name)
            .map(|raw| {
                raw.trim()
                    .parse()
                    .map_err(|_| MarkupError::invalid_value(local_name, raw))
            })
            .transpose()
    }

    /// Parses an optional `xs:boolean` attribute.
    pub fn bool_attribute(&self, local_name: &str) -> MarkupResult<Option<bool>> {
        self.attribute(local_name)
            .map(|raw| parse_xs_boolean(raw).ok_or_else(|| MarkupError::invalid_value(local_name, raw)))
            .transpose()
    }

    /// Child elements in document order.
    #[must_use]
    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    /// Child elements matching a selector.
    pub fn select<'s>(&'s self, selector: Selector<'s>) -> impl Iterator<Item = &'s XmlNode> + 's {
        self.children
            .iter()
            .filter(move |child| selector.matches(child))
    }

    /// First child element matching a selector.
    #[must_use]
    pub fn first(&self, selector: Selector<'_>) -> Option<&XmlNode> {
        self.children.iter().find(|child| selector.matches(child))
    }

    /// Text content directly inside this element.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The element exactly as it appeared in the source document.
    #[must_use]
    pub fn source_text(&self) -> &str {
        &self.source[self.span.clone()]
    }
}

impl fmt::Debug for XmlNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XmlNode")
            .field("name", &self.clark_name())
            .field("attributes", &self.attributes.len())
            .field("children", &self.children.len())
            .field("span", &self.span)
            .finish()
    }
}

impl fmt::Display for XmlNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.source_text())
    }
}

/// Formats a name in Clark notation.
#[must_use]
pub fn clark_name(namespace: Option<&str>, local_name: &str) -> String {
    match namespace {
        Some(namespace) => format!("{{{namespace}}}{local_name}"),
        None => local_name.to_string(),
    }
}

/// Parses an `xs:boolean` lexical value.
#[must_use]
pub fn parse_xs_boolean(raw: &str) -> Option<bool> {
    match raw.trim() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

fn attach(open: &mut [XmlNode], root: &mut Option<XmlNode>, node: XmlNode) -> MarkupResult<()> {
    if let Some(parent) = open.last_mut() {
        parent.children.push(node);
    } else if root.is_some() {
        return Err(MarkupError::ExtraRoot(node.local_name));
    } else {
        *root = Some(node);
    }
    Ok(())
}

fn namespace_of(resolved: ResolveResult<'_>) -> MarkupResult<Option<String>> {
    match resolved {
        ResolveResult::Bound(Namespace(uri)) => Ok(Some(lossy(uri))),
        ResolveResult::Unbound => Ok(None),
        ResolveResult::Unknown(prefix) => Err(MarkupError::invalid_value(
            "namespace prefix",
            lossy(&prefix),
        )),
    }
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

// The reader may already have consumed the `<` that ended a text run.
fn tag_start(xml: &str, position: usize) -> usize {
    if xml.as_bytes().get(position) == Some(&b'<') {
        position
    } else {
        xml[..position.min(xml.len())].rfind('<').unwrap_or(position)
    }
}

fn offset<P: TryInto<usize>>(position: P) -> usize {
    position.try_into().unwrap_or(usize::MAX)
}
