//! Layout analysis: fragments to lines to typed blocks.

mod classify;
mod lines;
pub mod patterns;
mod pdf_source;

pub use classify::{
    average_font_size, classify, heading_level, StructureClassifier, DEFAULT_FONT_SIZE,
    HEADING_MAX_CHARS, HEADING_SIZE_RATIO,
};
pub use lines::{group_fragments, LineGrouper, LINE_PROXIMITY_RATIO};
pub use pdf_source::PdfSource;

use crate::error::{Error, Result};
use crate::model::PositionedTextFragment;

/// Anything that can hand out the positioned text fragments of its pages.
///
/// Pages are numbered from 1.
pub trait PageSource {
    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Fragments of one page, in extraction order.
    fn page_fragments(&self, page: u32) -> Result<Vec<PositionedTextFragment>>;
}

/// In-memory pages, e.g. decoded from a fragment dump.
impl PageSource for [Vec<PositionedTextFragment>] {
    fn page_count(&self) -> u32 {
        self.len() as u32
    }

    fn page_fragments(&self, page: u32) -> Result<Vec<PositionedTextFragment>> {
        page.checked_sub(1)
            .and_then(|idx| self.get(idx as usize))
            .cloned()
            .ok_or(Error::PageOutOfRange(page, self.page_count()))
    }
}

/// Decode a fragment dump: a JSON array of pages, each an array of
/// pdf.js-style text items.
pub fn fragments_from_json(json: &str) -> Result<Vec<Vec<PositionedTextFragment>>> {
    Ok(serde_json::from_str(json)?)
}
