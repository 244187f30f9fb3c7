//! Input sniffing: PDF files versus JSON fragment dumps.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const PDF_MAGIC_LEN: usize = 5;
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// Bytes read from the head of a file when sniffing.
const SNIFF_LEN: usize = 16;

/// What kind of input a byte stream holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKind {
    /// A PDF document with its header version (e.g. "1.7").
    Pdf {
        /// Version from the `%PDF-x.y` header
        version: String,
    },
    /// A JSON dump of positioned text fragments.
    Fragments,
}

impl std::fmt::Display for InputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputKind::Pdf { version } => write!(f, "PDF {}", version),
            InputKind::Fragments => write!(f, "fragment dump (JSON)"),
        }
    }
}

/// Sniff the kind of input stored at `path`.
///
/// # Example
/// ```no_run
/// use pdfmd::detect::{detect_input_from_path, InputKind};
///
/// match detect_input_from_path("document.pdf").unwrap() {
///     InputKind::Pdf { version } => println!("PDF version: {}", version),
///     InputKind::Fragments => println!("fragment dump"),
/// }
/// ```
pub fn detect_input_from_path<P: AsRef<Path>>(path: P) -> Result<InputKind> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut header = Vec::with_capacity(SNIFF_LEN);
    reader.take(SNIFF_LEN as u64).read_to_end(&mut header)?;
    detect_input_from_bytes(&header)
}

/// Sniff the kind of input from the first bytes of a file.
pub fn detect_input_from_bytes(data: &[u8]) -> Result<InputKind> {
    if data.starts_with(PDF_MAGIC) {
        let version = pdf_version(data)?;
        return Ok(InputKind::Pdf { version });
    }

    // Fragment dumps are JSON arrays; tolerate a BOM and leading whitespace.
    let body = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);
    match body.iter().find(|b| !b.is_ascii_whitespace()) {
        Some(b'[') => Ok(InputKind::Fragments),
        _ => Err(Error::UnknownFormat),
    }
}

/// Read the PDF header version, validating the `%PDF-x.y` shape.
pub fn pdf_version(data: &[u8]) -> Result<String> {
    if data.len() < PDF_MAGIC_LEN + VERSION_LEN || !data.starts_with(PDF_MAGIC) {
        return Err(Error::UnknownFormat);
    }

    let version_bytes = &data[PDF_MAGIC_LEN..PDF_MAGIC_LEN + VERSION_LEN];
    let version = String::from_utf8_lossy(version_bytes).to_string();

    if !is_valid_version(&version) {
        return Err(Error::UnsupportedVersion(version));
    }
    Ok(version)
}

/// Check if a version string is valid.
fn is_valid_version(version: &str) -> bool {
    let bytes = version.as_bytes();
    bytes.len() == 3 && bytes[0].is_ascii_digit() && bytes[1] == b'.' && bytes[2].is_ascii_digit()
}
