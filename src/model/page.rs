//! Per-page conversion output.

use serde::Serialize;

use super::ContentBlock;

/// The result of running the layout pipeline on one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageOutput {
    /// Page number (1-indexed)
    pub number: u32,
    /// Rendered Markdown for the page
    pub markdown: String,
    /// Classified blocks of the page
    pub blocks: Vec<ContentBlock>,
}

impl PageOutput {
    /// Whether the page contributes nothing to the document.
    pub fn is_empty(&self) -> bool {
        self.markdown.trim().is_empty()
    }
}
