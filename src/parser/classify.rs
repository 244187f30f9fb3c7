//! Structure classification: partitioning text lines into typed blocks.
//!
//! The classifier walks the lines once, left to right. At each position it
//! asks, in a fixed priority order, whether the line opens a heading, list,
//! code block, quote or table, and greedily extends the first match. Lines
//! that open none of these start a paragraph.

use crate::model::{BlockKind, ContentBlock, TextLine};

use super::patterns::{
    is_code_line, is_fence, is_list_item, is_quote, is_table_row, strip_code_indent,
    strip_quote_marker, table_columns, to_list_item, FENCE,
};

/// Average font size assumed for a page without lines.
pub const DEFAULT_FONT_SIZE: f32 = 12.0;

/// A line larger than `average * HEADING_SIZE_RATIO` is a heading candidate.
pub const HEADING_SIZE_RATIO: f32 = 1.2;

/// Headings are shorter than this many characters.
pub const HEADING_MAX_CHARS: usize = 100;

/// Arithmetic mean font size over all lines of a page.
pub fn average_font_size(lines: &[TextLine]) -> f32 {
    if lines.is_empty() {
        return DEFAULT_FONT_SIZE;
    }
    lines.iter().map(|l| l.font_size).sum::<f32>() / lines.len() as f32
}

/// Heading level from absolute font size.
pub fn heading_level(font_size: f32) -> u8 {
    if font_size > 20.0 {
        1
    } else if font_size > 16.0 {
        2
    } else if font_size > 14.0 {
        3
    } else {
        4
    }
}

/// Classify lines using the page's own average font size.
pub fn classify(lines: &[TextLine]) -> Vec<ContentBlock> {
    StructureClassifier::new(average_font_size(lines)).classify(lines)
}

type Predicate = fn(&StructureClassifier, &TextLine) -> bool;
type Extractor = fn(&StructureClassifier, &[TextLine], usize) -> (ContentBlock, usize);

/// Block rules in priority order. Paragraph is the fallback.
const RULES: [(Predicate, Extractor); 5] = [
    (StructureClassifier::opens_heading, StructureClassifier::extract_heading),
    (StructureClassifier::opens_list, StructureClassifier::extract_list),
    (StructureClassifier::opens_code, StructureClassifier::extract_code),
    (StructureClassifier::opens_quote, StructureClassifier::extract_quote),
    (StructureClassifier::opens_table, StructureClassifier::extract_table),
];

/// Line-to-block classifier for one page.
#[derive(Debug, Clone, Copy)]
pub struct StructureClassifier {
    average_font_size: f32,
}

impl StructureClassifier {
    /// Create a classifier for a page with the given average font size.
    pub fn new(average_font_size: f32) -> Self {
        Self { average_font_size }
    }

    /// The baseline font size headings are measured against.
    pub fn average_font_size(&self) -> f32 {
        self.average_font_size
    }

    /// Partition `lines` into blocks. Blank lines belong to no block.
    pub fn classify(&self, lines: &[TextLine]) -> Vec<ContentBlock> {
        let mut blocks = Vec::new();
        let mut i = 0;

        while i < lines.len() {
            let line = &lines[i];
            if line.is_blank() {
                i += 1;
                continue;
            }

            let extractor = RULES
                .iter()
                .find(|(opens, _)| opens(self, line))
                .map(|(_, extract)| *extract)
                .unwrap_or(Self::extract_paragraph);

            let (block, next) = extractor(self, lines, i);
            debug_assert!(next > i, "block extraction must consume its first line");
            log::trace!(
                "lines {}..{} -> {} ({} lines)",
                i,
                next,
                block.kind.name(),
                block.lines.len()
            );
            blocks.push(block);
            i = next.max(i + 1);
        }

        blocks
    }

    /// Whether the line opens any non-paragraph block.
    fn opens_structured_block(&self, line: &TextLine) -> bool {
        RULES.iter().any(|(opens, _)| opens(self, line))
    }

    /// Large or bold-and-not-small, and short.
    pub fn is_heading(&self, line: &TextLine) -> bool {
        let avg = self.average_font_size;
        let larger_font = line.font_size > avg * HEADING_SIZE_RATIO;
        let bold_title = line.is_bold && line.font_size >= avg;
        let short = line.trimmed().chars().count() < HEADING_MAX_CHARS;
        (larger_font || bold_title) && short
    }

    fn opens_heading(&self, line: &TextLine) -> bool {
        self.is_heading(line)
    }

    fn opens_list(&self, line: &TextLine) -> bool {
        is_list_item(line.trimmed())
    }

    fn opens_code(&self, line: &TextLine) -> bool {
        is_code_line(line.trimmed())
    }

    fn opens_quote(&self, line: &TextLine) -> bool {
        is_quote(line.trimmed())
    }

    fn opens_table(&self, line: &TextLine) -> bool {
        is_table_row(line.trimmed())
    }

    fn extract_heading(&self, lines: &[TextLine], start: usize) -> (ContentBlock, usize) {
        let line = &lines[start];
        let block = ContentBlock::new(
            BlockKind::Heading {
                level: heading_level(line.font_size),
            },
            line.trimmed(),
            vec![line.clone()],
        );
        (block, start + 1)
    }

    fn extract_list(&self, lines: &[TextLine], start: usize) -> (ContentBlock, usize) {
        let end = run_end(lines, start, |l| is_list_item(l.trimmed()));
        let items = &lines[start..end];

        let content = items
            .iter()
            .map(|l| to_list_item(l.trimmed()))
            .collect::<Vec<_>>()
            .join("\n");

        (ContentBlock::new(BlockKind::List, content, items.to_vec()), end)
    }

    fn extract_code(&self, lines: &[TextLine], start: usize) -> (ContentBlock, usize) {
        let mut code_lines = vec![lines[start].clone()];
        let mut i = start + 1;

        if is_fence(lines[start].trimmed()) {
            while i < lines.len() && !is_fence(lines[i].trimmed()) {
                code_lines.push(lines[i].clone());
                i += 1;
            }
            // closing fence
            if i < lines.len() {
                code_lines.push(lines[i].clone());
                i += 1;
            }
        } else {
            while i < lines.len() {
                let line = &lines[i];
                if !line.is_blank() {
                    if !(is_code_line(&line.text) || is_code_line(line.trimmed())) {
                        break;
                    }
                    code_lines.push(line.clone());
                }
                i += 1;
            }
        }

        let raw = code_lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let content = if raw.trim_start().starts_with(FENCE) {
            raw
        } else {
            let body = code_lines
                .iter()
                .map(|l| strip_code_indent(&l.text))
                .collect::<Vec<_>>()
                .join("\n");
            format!("{FENCE}\n{body}\n{FENCE}")
        };

        (ContentBlock::new(BlockKind::Code, content, code_lines), i)
    }

    fn extract_quote(&self, lines: &[TextLine], start: usize) -> (ContentBlock, usize) {
        let mut quote_lines = Vec::new();
        let mut i = start;

        while i < lines.len() {
            let line = &lines[i];
            if !line.is_blank() {
                if !is_quote(line.trimmed()) {
                    break;
                }
                quote_lines.push(line.clone());
            }
            i += 1;
        }

        let content = quote_lines
            .iter()
            .map(|l| strip_quote_marker(l.trimmed()))
            .collect::<Vec<_>>()
            .join("\n");

        (ContentBlock::new(BlockKind::Quote, content, quote_lines), i)
    }

    fn extract_table(&self, lines: &[TextLine], start: usize) -> (ContentBlock, usize) {
        let end = run_end(lines, start, |l| is_table_row(l.trimmed()));
        let rows = &lines[start..end];

        let mut rendered: Vec<String> = rows
            .iter()
            .map(|l| format!("| {} |", table_columns(l.trimmed()).join(" | ")))
            .collect();

        // No header detection: the first row is always treated as the header.
        let column_count = table_columns(rows[0].trimmed()).len();
        rendered.insert(1, format!("|{}", " --- |".repeat(column_count)));

        (
            ContentBlock::new(BlockKind::Table, rendered.join("\n"), rows.to_vec()),
            end,
        )
    }

    fn extract_paragraph(&self, lines: &[TextLine], start: usize) -> (ContentBlock, usize) {
        let mut para_lines = Vec::new();
        let mut i = start;

        while i < lines.len() {
            let line = &lines[i];
            if line.is_blank() {
                i += 1;
                break;
            }
            if i > start && self.opens_structured_block(line) {
                break;
            }
            para_lines.push(line.clone());
            i += 1;
        }

        let text = para_lines
            .iter()
            .map(|l| l.trimmed())
            .collect::<Vec<_>>()
            .join(" ");
        let content = apply_paragraph_style(text, &para_lines);

        (ContentBlock::new(BlockKind::Paragraph, content, para_lines), i)
    }
}

/// End index (exclusive) of the run of lines starting at `start` that
/// satisfy `keep`.
fn run_end(lines: &[TextLine], start: usize, keep: impl Fn(&TextLine) -> bool) -> usize {
    lines[start..]
        .iter()
        .position(|l| !keep(l))
        .map_or(lines.len(), |offset| start + offset)
}

/// Wrap the whole paragraph in emphasis if any of its lines is styled.
fn apply_paragraph_style(text: String, lines: &[TextLine]) -> String {
    let any_bold = lines.iter().any(|l| l.is_bold);
    let any_italic = lines.iter().any(|l| l.is_italic);

    match (any_bold, any_italic) {
        (true, true) => format!("***{}***", text),
        (true, false) => format!("**{}**", text),
        (false, true) => format!("*{}*", text),
        (false, false) => text,
    }
}
