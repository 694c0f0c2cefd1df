//! Human-readable text keyed by language tag.

use std::fmt;

use crate::builder::MarkupBuilder;
use crate::error::MarkupResult;
use crate::node::XmlNode;

/// A string value that may vary by `xml:lang`.
///
/// Entries keep insertion order. The `None` tag stands for "no language":
/// such an entry is written without `xml:lang`, and looking up `None` returns
/// the first entry whatever its tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizedText {
    element: &'static str,
    entries: Vec<(Option<String>, String)>,
}

impl LocalizedText {
    /// Creates empty text that serializes as `element` (a qualified name
    /// such as `md:ServiceName`).
    #[must_use]
    pub const fn new(element: &'static str) -> Self {
        Self {
            element,
            entries: Vec::new(),
        }
    }

    /// Creates text with a single entry that has no language.
    #[must_use]
    pub fn with_text(element: &'static str, text: impl Into<String>) -> Self {
        let mut localized = Self::new(element);
        localized.insert(None, text);
        localized
    }

    /// The qualified element name used when serializing.
    #[must_use]
    pub const fn element(&self) -> &'static str {
        self.element
    }

    /// Looks up text by language.
    ///
    /// `Some(tag)` matches exactly; `None` returns the first entry, if any.
    #[must_use]
    pub fn get(&self, lang: Option<&str>) -> Option<&str> {
        match lang {
            None => self.entries.first().map(|(_, text)| text.as_str()),
            Some(tag) => self
                .entries
                .iter()
                .find(|(entry, _)| entry.as_deref() == Some(tag))
                .map(|(_, text)| text.as_str()),
        }
    }

    /// Every entry, in insertion order.
    pub fn all(&self) -> impl Iterator<Item = (Option<&str>, &str)> {
        self.entries
            .iter()
            .map(|(lang, text)| (lang.as_deref(), text.as_str()))
    }

    /// Sets the text for a language, returning the previous value. A replaced
    /// entry keeps its position.
    pub fn insert(&mut self, lang: Option<&str>, text: impl Into<String>) -> Option<String> {
        let text = text.into();
        match self
            .entries
            .iter_mut()
            .find(|(entry, _)| entry.as_deref() == lang)
        {
            Some((_, existing)) => Some(std::mem::replace(existing, text)),
            None => {
                self.entries.push((lang.map(str::to_string), text));
                None
            }
        }
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Replaces the entries with one per node, reading `xml:lang` and the
    /// trimmed text. A repeated language overwrites the earlier value.
    pub fn parse<'n>(&mut self, nodes: impl IntoIterator<Item = &'n XmlNode>) -> &mut Self {
        self.clear();
        for node in nodes {
            self.insert(node.lang(), node.text().trim());
        }
        self
    }

    /// Writes one element per entry.
    pub fn serialize(&self, builder: &mut MarkupBuilder) -> MarkupResult<()> {
        for (lang, text) in &self.entries {
            match lang {
                Some(lang) => {
                    builder.text_element(self.element, &[("xml:lang", lang.as_str())], text)?;
                }
                None => builder.text_element(self.element, &[], text)?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for LocalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.get(None).unwrap_or_default())
    }
}
