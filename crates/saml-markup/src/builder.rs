//! Markup emission over `quick_xml::Writer`.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::reader::Reader;
use quick_xml::Writer;

use crate::config::OutputConfig;
use crate::error::{MarkupError, MarkupResult};
use crate::node::XmlNode;

/// Sink that objects serialize themselves into.
///
/// Namespace prefixes registered with [`MarkupBuilder::declare`] are bound on
/// the first (root) element written.
pub struct MarkupBuilder {
    writer: Writer<Vec<u8>>,
    namespaces: Vec<(&'static str, &'static str)>,
    depth: usize,
    roots: usize,
}

impl MarkupBuilder {
    /// Creates a builder with no namespace declarations.
    #[must_use]
    pub fn new() -> Self {
        Self {
            writer: Writer::new(Vec::new()),
            namespaces: Vec::new(),
            depth: 0,
            roots: 0,
        }
    }

    /// Creates a builder that binds the given `(prefix, uri)` pairs on the
    /// root element.
    #[must_use]
    pub fn with_namespaces(namespaces: &[(&'static str, &'static str)]) -> Self {
        let mut builder = Self::new();
        builder.namespaces.extend_from_slice(namespaces);
        builder
    }

    /// Adds a namespace declaration for the root element.
    #[must_use]
    pub fn declare(mut self, prefix: &'static str, uri: &'static str) -> Self {
        self.namespaces.push((prefix, uri));
        self
    }

    /// Writes an element and lets `body` fill in its content.
    pub fn element<F>(&mut self, name: &str, attributes: &[(&str, &str)], body: F) -> MarkupResult<()>
    where
        F: FnOnce(&mut Self) -> MarkupResult<()>,
    {
        let start = self.start_tag(name, attributes);
        self.writer.write_event(Event::Start(start))?;
        self.depth += 1;
        body(self)?;
        self.depth -= 1;
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    /// Writes an element with text content only.
    pub fn text_element(&mut self, name: &str, attributes: &[(&str, &str)], text: &str) -> MarkupResult<()> {
        self.element(name, attributes, |builder| builder.text(text))
    }

    /// Writes an element with no content.
    pub fn empty(&mut self, name: &str, attributes: &[(&str, &str)]) -> MarkupResult<()> {
        let start = self.start_tag(name, attributes);
        self.writer.write_event(Event::Empty(start))?;
        Ok(())
    }

    /// Writes escaped text at the current position.
    pub fn text(&mut self, text: &str) -> MarkupResult<()> {
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        Ok(())
    }

    /// Completes the document.
    pub fn finish(self) -> MarkupResult<Document> {
        if self.roots == 0 {
            return Err(MarkupError::EmptyDocument);
        }
        let markup = String::from_utf8(self.writer.into_inner())?;
        Ok(Document { markup })
    }

    fn start_tag<'n>(&mut self, name: &'n str, attributes: &[(&str, &str)]) -> BytesStart<'n> {
        let mut start = BytesStart::new(name);
        if self.depth == 0 {
            self.roots += 1;
            for (prefix, uri) in &self.namespaces {
                let key = format!("xmlns:{prefix}");
                start.push_attribute((key.as_str(), *uri));
            }
        }
        for attribute in attributes {
            start.push_attribute(*attribute);
        }
        start
    }
}

impl Default for MarkupBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Markup built from an object's current field values.
///
/// Held in compact form; pretty output is produced on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    markup: String,
}

impl Document {
    /// Compact markup, without a declaration.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.markup
    }

    /// Renders the document with the given options.
    ///
    /// Compact output is returned untouched; pretty output is re-indented
    /// and starts with an XML declaration.
    pub fn to_text(&self, options: &OutputConfig) -> MarkupResult<String> {
        if !options.pretty {
            return Ok(self.markup.clone());
        }
        let indent = u8::try_from(options.indent_char).map_err(|_| {
            MarkupError::invalid_value("indent_char", options.indent_char.to_string())
        })?;

        let mut reader = Reader::from_str(&self.markup);
        let mut writer = Writer::new_with_indent(Vec::new(), indent, options.indent_size);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        loop {
            match reader.read_event()? {
                Event::Eof => break,
                event => writer.write_event(event)?,
            }
        }
        Ok(String::from_utf8(writer.into_inner())?)
    }

    /// Parses the built markup into a navigable tree.
    pub fn to_node(&self) -> MarkupResult<XmlNode> {
        XmlNode::parse_str(&self.markup)
    }
}
