//! Grouping positioned fragments into visual text lines.

use crate::model::{detect_style, PositionedTextFragment, TextLine};

/// A fragment joins the open line when its vertical distance from the line
/// is at most this fraction of the line's font size.
pub const LINE_PROXIMITY_RATIO: f32 = 0.6;

/// Incremental line grouper.
///
/// Fragments are fed in extraction order; a line is emitted whenever a
/// fragment lands too far from the open line vertically.
#[derive(Debug, Default)]
pub struct LineGrouper {
    lines: Vec<TextLine>,
    current: Option<TextLine>,
    skipped: usize,
}

impl LineGrouper {
    /// Create an empty grouper.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one fragment.
    pub fn push(&mut self, fragment: &PositionedTextFragment) {
        let (text, geometry) = match (fragment.text(), fragment.geometry()) {
            (Some(text), Some(geometry)) => (text, geometry),
            _ => {
                self.skipped += 1;
                return;
            }
        };

        let (is_bold, is_italic) = detect_style(fragment.font_name(), geometry.font_size);

        let starts_new_line = match &self.current {
            None => true,
            Some(line) => {
                (geometry.y - line.y).abs() > line.font_size * LINE_PROXIMITY_RATIO
            }
        };

        if starts_new_line {
            self.flush();
            self.current = Some(TextLine {
                text: text.to_string(),
                font_size: geometry.font_size,
                x: geometry.x,
                y: geometry.y,
                is_bold,
                is_italic,
            });
            return;
        }

        if let Some(line) = self.current.as_mut() {
            let needs_space = !line.text.is_empty()
                && !line.text.ends_with(char::is_whitespace)
                && !text.starts_with(char::is_whitespace);
            if needs_space {
                line.text.push(' ');
            }
            line.text.push_str(text);

            // The largest fragment decides the style of the whole line.
            if geometry.font_size > line.font_size {
                line.font_size = geometry.font_size;
                line.is_bold = is_bold;
                line.is_italic = is_italic;
            }
        }
    }

    /// Close the open line, keeping it only if it has visible text.
    fn flush(&mut self) {
        if let Some(line) = self.current.take() {
            if !line.is_blank() {
                self.lines.push(line);
            }
        }
    }

    /// Number of fragments dropped for missing text or geometry.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Finish grouping and return the lines in input order.
    pub fn finish(mut self) -> Vec<TextLine> {
        self.flush();
        if self.skipped > 0 {
            log::debug!("skipped {} fragments without text or transform", self.skipped);
        }
        self.lines
    }
}

/// Group fragments into lines.
pub fn group_fragments<'a, I>(fragments: I) -> Vec<TextLine>
where
    I: IntoIterator<Item = &'a PositionedTextFragment>,
{
    let mut grouper = LineGrouper::new();
    for fragment in fragments {
        grouper.push(fragment);
    }
    grouper.finish()
}
