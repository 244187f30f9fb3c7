//! Rendering module for converting classified blocks to output formats.

mod json;
mod markdown;
mod options;

pub use json::{to_json, JsonFormat};
pub use markdown::{normalize_markdown, to_markdown, MarkdownRenderer};
pub use options::{PageSelection, RenderOptions, PAGE_SEPARATOR};
