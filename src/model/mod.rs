//! Data model for layout reconstruction.
//!
//! Fragments come in from a PDF text extractor, lines are built from
//! fragments, blocks are classified from lines, and a page output carries
//! the rendered result of one page.

mod block;
mod fragment;
mod line;
mod page;

pub use block::{BlockKind, ContentBlock};
pub use fragment::{FragmentGeometry, PositionedTextFragment};
pub use line::{detect_style, TextLine, BOLD_FONT_SIZE};
pub use page::PageOutput;
