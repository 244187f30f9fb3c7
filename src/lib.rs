//! # pdfmd
//!
//! Layout-aware PDF to Markdown conversion.
//!
//! Positioned text fragments extracted from each page are grouped into
//! visual lines, the lines are classified into headings, paragraphs, lists,
//! code, quotes and tables, and the blocks are rendered as Markdown.
//!
//! ## Quick Start
//!
//! ```no_run
//! fn main() -> pdfmd::Result<()> {
//!     let markdown = pdfmd::to_markdown("document.pdf")?;
//!     println!("{}", markdown);
//!     Ok(())
//! }
//! ```
//!
//! Fragments from another extractor (pdf.js text items, for instance) can
//! be fed in directly:
//!
//! ```
//! use pdfmd::PositionedTextFragment;
//!
//! let page = vec![
//!     PositionedTextFragment::new("Quarterly Report", 72.0, 740.0, 24.0),
//!     PositionedTextFragment::new("Revenue grew.", 72.0, 700.0, 10.0),
//! ];
//! let markdown = pdfmd::fragments_to_markdown(&[page]);
//! assert_eq!(markdown, "# Quarterly Report\n\nRevenue grew.");
//! ```
//!
//! ## Features
//!
//! - **Line grouping**: fragments merged by vertical proximity
//! - **Structure detection**: headings, lists, code, quotes, tables
//! - **Page selection**: `"1-3,5"` style ranges
//! - **Parallel processing**: Uses Rayon for multi-page documents
//! - **JSON output**: typed blocks per page via serde
//! - **Async**: `convert_file_async` behind the `async` feature

pub mod convert;
pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use convert::{
    convert_bytes, convert_file, convert_page, ConvertOptions, ConvertResult, PageAssembler,
};
#[cfg(feature = "async")]
pub use convert::convert_file_async;
pub use detect::{detect_input_from_bytes, detect_input_from_path, InputKind};
pub use error::{Error, Result};
pub use model::{BlockKind, ContentBlock, PageOutput, PositionedTextFragment, TextLine};
pub use parser::{fragments_from_json, PageSource, PdfSource};
pub use render::{JsonFormat, PageSelection, RenderOptions};

use std::path::Path;

/// Convert a PDF file to Markdown with default options.
///
/// # Example
///
/// ```no_run
/// let markdown = pdfmd::to_markdown("document.pdf").unwrap();
/// println!("{}", markdown);
/// ```
pub fn to_markdown<P: AsRef<Path>>(path: P) -> Result<String> {
    Ok(convert_file(path, &ConvertOptions::default())?.markdown)
}

/// Convert a PDF file to JSON (pages with their typed blocks).
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let result = convert_file(path, &ConvertOptions::default())?;
    render::to_json(&result.pages, format)
}

/// Convert in-memory pages of fragments to Markdown.
///
/// Never fails: malformed fragments are skipped and empty pages omitted.
pub fn fragments_to_markdown(pages: &[Vec<PositionedTextFragment>]) -> String {
    let assembler = PageAssembler::new(ConvertOptions::default().sequential());
    let outputs: Vec<PageOutput> = pages
        .iter()
        .zip(1u32..)
        .map(|(fragments, number)| convert_page(number, fragments))
        .collect();
    assembler.join(&outputs)
}

/// Builder for PDF conversion with custom options.
///
/// # Example
///
/// ```no_run
/// use pdfmd::{PageSelection, Pdfmd};
///
/// let result = Pdfmd::new()
///     .with_pages(PageSelection::Range(1..=3))
///     .sequential()
///     .convert("document.pdf")
///     .unwrap();
/// println!("{}", result.markdown);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Pdfmd {
    options: ConvertOptions,
}

impl Pdfmd {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.options = self.options.sequential();
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.options = self.options.with_pages(pages);
        self
    }

    /// Set the text placed between non-empty pages.
    pub fn with_page_separator(mut self, separator: impl Into<String>) -> Self {
        self.options.render = self.options.render.with_page_separator(separator);
        self
    }

    /// Options that will be used.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Convert a PDF file.
    pub fn convert<P: AsRef<Path>>(&self, path: P) -> Result<ConvertResult> {
        convert_file(path, &self.options)
    }

    /// Convert PDF bytes.
    pub fn convert_bytes(&self, data: &[u8]) -> Result<ConvertResult> {
        convert_bytes(data, &self.options)
    }

    /// Convert in-memory pages of fragments.
    pub fn convert_fragments(
        &self,
        pages: &[Vec<PositionedTextFragment>],
    ) -> Result<ConvertResult> {
        PageAssembler::new(self.options.clone()).assemble(pages)
    }
}
