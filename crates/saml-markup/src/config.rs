//! Configuration for markup output and collection indexing.
//!
//! The defaults match what metadata consumers expect: pretty output with an
//! XML declaration, and lenient index assignment.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::indexed::{IndexPolicy, NextFreeIndex, StrictIndex};

/// Main configuration structure for the markup layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Serialization options.
    pub output: OutputConfig,
    /// Indexed collection options.
    pub indexing: IndexingConfig,
}

/// Serialization options used when building fresh markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Indent nested elements and emit an XML declaration.
    pub pretty: bool,
    /// Character used for indentation.
    pub indent_char: char,
    /// Number of indent characters per nesting level.
    pub indent_size: usize,
}

impl OutputConfig {
    /// Compact output: no declaration, no added whitespace.
    #[must_use]
    pub fn compact() -> Self {
        Self {
            pretty: false,
            ..Self::default()
        }
    }

    /// Returns these options with `pretty` overridden.
    #[must_use]
    pub const fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            indent_char: ' ',
            indent_size: 2,
        }
    }
}

/// Indexed collection options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexingConfig {
    /// Reject duplicate indices and multiple defaults instead of repairing them.
    pub strict: bool,
}

impl Config {
    /// Returns the index policy selected by this configuration.
    #[must_use]
    pub fn index_policy(&self) -> Arc<dyn IndexPolicy> {
        if self.indexing.strict {
            Arc::new(StrictIndex)
        } else {
            Arc::new(NextFreeIndex)
        }
    }
}
