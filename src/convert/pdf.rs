//! PDF entry points over [`PdfSource`].

use std::path::Path;

use crate::error::Result;
use crate::parser::{PageSource, PdfSource};

use super::{ConvertOptions, ConvertResult, PageAssembler};

/// Open a PDF file as a page source. Any failure is reported as
/// [`Error::PdfParse`](crate::Error::PdfParse).
pub fn open_source<P: AsRef<Path>>(path: P) -> Result<PdfSource> {
    let path = path.as_ref();
    PdfSource::open(path)
        .map_err(|e| e.into_pdf_parse(format!("failed to open {}", path.display())))
}

/// Convert a PDF file to Markdown.
pub fn convert_file<P: AsRef<Path>>(path: P, options: &ConvertOptions) -> Result<ConvertResult> {
    let source = open_source(path)?;
    log::debug!(
        "opened PDF {} with {} pages",
        source.version(),
        source.page_count()
    );
    PageAssembler::new(options.clone()).assemble(&source)
}

/// Convert PDF bytes to Markdown.
pub fn convert_bytes(data: &[u8], options: &ConvertOptions) -> Result<ConvertResult> {
    let source = PdfSource::from_bytes(data)
        .map_err(|e| e.into_pdf_parse("failed to load PDF from memory"))?;
    PageAssembler::new(options.clone()).assemble(&source)
}

/// Convert a PDF file to Markdown without blocking the async runtime.
///
/// The file is read with tokio; layout analysis runs on the blocking pool.
#[cfg(feature = "async")]
pub async fn convert_file_async<P: AsRef<Path>>(
    path: P,
    options: ConvertOptions,
) -> Result<ConvertResult> {
    let path = path.as_ref();
    let data = tokio::fs::read(path).await.map_err(|e| {
        crate::Error::from(e).into_pdf_parse(format!("failed to open {}", path.display()))
    })?;

    tokio::task::spawn_blocking(move || convert_bytes(&data, &options))
        .await
        .map_err(|e| crate::Error::pdf_parse_with("conversion task failed", e))?
}
