//! Error types for pdfmd library.

use std::io;
use thiserror::Error;

/// Result type alias for pdfmd operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed underlying cause carried by [`Error::PdfParse`].
pub type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error types that can occur while turning a PDF into Markdown.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// The source document could not be opened or one of its pages could
    /// not be read.
    #[error("PDF parsing error: {message}")]
    PdfParse {
        /// What was being read when the failure happened
        message: String,
        /// Underlying cause, if any
        #[source]
        source: Option<Cause>,
    },

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Invalid page range specification.
    #[error("Invalid page range: {0}")]
    InvalidPageRange(String),

    /// A fragment dump could not be decoded.
    #[error("Invalid fragment data: {0}")]
    Fragments(#[from] serde_json::Error),

    /// Error during rendering (Markdown, JSON).
    #[error("Rendering error: {0}")]
    Render(String),
}

impl Error {
    /// Build a [`Error::PdfParse`] without an underlying cause.
    pub fn pdf_parse(message: impl Into<String>) -> Self {
        Error::PdfParse {
            message: message.into(),
            source: None,
        }
    }

    /// Build a [`Error::PdfParse`] wrapping `cause`.
    pub fn pdf_parse_with(message: impl Into<String>, cause: impl Into<Cause>) -> Self {
        Error::PdfParse {
            message: message.into(),
            source: Some(cause.into()),
        }
    }

    /// Re-wrap any error as the single failure kind surfaced by page
    /// assembly. Errors that already are `PdfParse` pass through.
    pub(crate) fn into_pdf_parse(self, context: impl Into<String>) -> Self {
        match self {
            err @ Error::PdfParse { .. } => err,
            other => Error::pdf_parse_with(context, other),
        }
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::pdf_parse_with(err.to_string(), err),
        }
    }
}
