//! Page assembly: running the layout pipeline over every page of a source.
//!
//! # Example
//!
//! ```no_run
//! use pdfmd::convert::{ConvertOptions, PageAssembler};
//! use pdfmd::parser::PdfSource;
//!
//! fn main() -> pdfmd::Result<()> {
//!     let source = PdfSource::open("document.pdf")?;
//!     let result = PageAssembler::new(ConvertOptions::default()).assemble(&source)?;
//!     println!("{}", result.markdown);
//!     Ok(())
//! }
//! ```

mod pdf;

pub use pdf::{convert_bytes, convert_file, open_source};
#[cfg(feature = "async")]
pub use pdf::convert_file_async;

use std::sync::atomic::{AtomicU32, Ordering};

use rayon::prelude::*;

use crate::error::Result;
use crate::model::{PageOutput, PositionedTextFragment};
use crate::parser::{average_font_size, group_fragments, PageSource, StructureClassifier};
use crate::render::{to_markdown, PageSelection, RenderOptions};

/// Options for document conversion.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Which pages to convert
    pub pages: PageSelection,

    /// Whether to process pages in parallel
    pub parallel: bool,

    /// Page joining options
    pub render: RenderOptions,
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set rendering options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render = options;
        self
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            pages: PageSelection::All,
            parallel: true,
            render: RenderOptions::default(),
        }
    }
}

/// Result of document conversion.
#[derive(Debug, Clone)]
pub struct ConvertResult {
    /// Joined Markdown of all selected pages
    pub markdown: String,

    /// Per-page output, in page order
    pub pages: Vec<PageOutput>,

    /// Total pages in the source document
    pub page_count: u32,
}

/// Run the pipeline on one page's fragments.
pub fn convert_page(number: u32, fragments: &[PositionedTextFragment]) -> PageOutput {
    let lines = group_fragments(fragments);
    let classifier = StructureClassifier::new(average_font_size(&lines));
    let blocks = classifier.classify(&lines);
    let markdown = to_markdown(&blocks);

    log::debug!(
        "page {}: {} fragments, {} lines, {} blocks (average font size {:.1})",
        number,
        fragments.len(),
        lines.len(),
        blocks.len(),
        classifier.average_font_size()
    );

    PageOutput {
        number,
        markdown,
        blocks,
    }
}

/// Drives per-page conversion over a [`PageSource`] and joins the results.
#[derive(Debug, Clone, Default)]
pub struct PageAssembler {
    options: ConvertOptions,
}

impl PageAssembler {
    /// Create an assembler.
    pub fn new(options: ConvertOptions) -> Self {
        Self { options }
    }

    /// Options in use.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Convert every selected page and join the non-empty ones.
    pub fn assemble<S>(&self, source: &S) -> Result<ConvertResult>
    where
        S: PageSource + ?Sized,
    {
        self.assemble_with_progress(source, |_, _| {})
    }

    /// Like [`assemble`](Self::assemble), calling `progress(done, total)`
    /// after each page completes.
    ///
    /// Pages are read from the source in order; with `parallel` set, the
    /// layout stages then run on the rayon pool.
    pub fn assemble_with_progress<S, F>(&self, source: &S, progress: F) -> Result<ConvertResult>
    where
        S: PageSource + ?Sized,
        F: Fn(u32, u32) + Sync,
    {
        let page_count = source.page_count();
        let selected = self.options.pages.resolve(page_count);
        let missing = self.options.pages.beyond(page_count);
        if missing > 0 {
            log::warn!(
                "{} selected page(s) beyond the document's {} pages ignored",
                missing,
                page_count
            );
        }

        let inputs = selected
            .iter()
            .map(|&number| {
                source
                    .page_fragments(number)
                    .map(|fragments| (number, fragments))
                    .map_err(|e| e.into_pdf_parse(format!("failed to read page {}", number)))
            })
            .collect::<Result<Vec<_>>>()?;

        let total = inputs.len() as u32;
        let done = AtomicU32::new(0);
        let run = |(number, fragments): &(u32, Vec<PositionedTextFragment>)| {
            let page = convert_page(*number, fragments);
            progress(done.fetch_add(1, Ordering::Relaxed) + 1, total);
            page
        };

        // rayon's collect keeps the output in page order.
        let pages: Vec<PageOutput> = if self.options.parallel && inputs.len() > 1 {
            inputs.par_iter().map(run).collect()
        } else {
            inputs.iter().map(run).collect()
        };

        let markdown = self.join(&pages);
        Ok(ConvertResult {
            markdown,
            pages,
            page_count,
        })
    }

    /// Join page Markdown, skipping empty pages.
    pub fn join(&self, pages: &[PageOutput]) -> String {
        pages
            .iter()
            .filter(|p| !p.is_empty())
            .map(|p| p.markdown.as_str())
            .collect::<Vec<_>>()
            .join(&self.options.render.page_separator)
    }
}
