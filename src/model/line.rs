//! Reconstructed visual text lines.

use serde::Serialize;

/// Font size above which text is treated as bold regardless of font name.
pub const BOLD_FONT_SIZE: f32 = 14.0;

/// A visual text line built from fragments sharing a vertical position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextLine {
    /// Concatenated fragment text
    pub text: String,
    /// Largest fragment font size absorbed by the line
    pub font_size: f32,
    /// X position of the first fragment
    pub x: f32,
    /// Y position of the first fragment
    pub y: f32,
    /// Bold, as detected on the largest fragment
    pub is_bold: bool,
    /// Italic, as detected on the largest fragment
    pub is_italic: bool,
}

impl TextLine {
    /// Create a plain (non-styled) line.
    pub fn new(text: impl Into<String>, font_size: f32) -> Self {
        Self {
            text: text.into(),
            font_size,
            x: 0.0,
            y: 0.0,
            is_bold: false,
            is_italic: false,
        }
    }

    /// Mark bold.
    pub fn bold(mut self) -> Self {
        self.is_bold = true;
        self
    }

    /// Mark italic.
    pub fn italic(mut self) -> Self {
        self.is_italic = true;
        self
    }

    /// Text without surrounding whitespace.
    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }

    /// Whether the line holds only whitespace.
    pub fn is_blank(&self) -> bool {
        self.trimmed().is_empty()
    }
}

/// Detect `(bold, italic)` from a font name and size.
pub fn detect_style(font_name: &str, font_size: f32) -> (bool, bool) {
    let name = font_name.to_lowercase();
    let is_bold = name.contains("bold") || name.contains("heavy") || font_size > BOLD_FONT_SIZE;
    let is_italic = name.contains("italic") || name.contains("oblique");
    (is_bold, is_italic)
}
