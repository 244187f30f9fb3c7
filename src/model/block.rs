//! Classified content blocks.

use serde::Serialize;

use super::TextLine;

/// Kind of a content block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BlockKind {
    /// A single-line heading (level 1-4)
    Heading {
        /// Heading level
        level: u8,
    },
    /// Running text
    Paragraph,
    /// Consecutive list items
    List,
    /// Fenced or indented code
    Code,
    /// Quoted text
    Quote,
    /// Whitespace-aligned columns
    Table,
}

impl BlockKind {
    /// Short lowercase name of the kind.
    pub fn name(&self) -> &'static str {
        match self {
            BlockKind::Heading { .. } => "heading",
            BlockKind::Paragraph => "paragraph",
            BlockKind::List => "list",
            BlockKind::Code => "code",
            BlockKind::Quote => "quote",
            BlockKind::Table => "table",
        }
    }
}

/// A typed run of consecutive lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentBlock {
    /// Block kind
    #[serde(flatten)]
    pub kind: BlockKind,
    /// Kind-specific content, ready for rendering
    pub content: String,
    /// Lines the block was built from
    pub lines: Vec<TextLine>,
}

impl ContentBlock {
    /// Create a block.
    pub fn new(kind: BlockKind, content: impl Into<String>, lines: Vec<TextLine>) -> Self {
        Self {
            kind,
            content: content.into(),
            lines,
        }
    }

    /// Heading level, for heading blocks.
    pub fn level(&self) -> Option<u8> {
        match self.kind {
            BlockKind::Heading { level } => Some(level),
            _ => None,
        }
    }
}
