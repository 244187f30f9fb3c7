//! Markdown rendering for classified blocks.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{BlockKind, ContentBlock};
use crate::parser::patterns::FENCE;

static EXCESS_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Render blocks to a Markdown string.
pub fn to_markdown(blocks: &[ContentBlock]) -> String {
    MarkdownRenderer::new().render(blocks)
}

/// Markdown renderer.
#[derive(Debug, Clone, Default)]
pub struct MarkdownRenderer {
    _private: (),
}

impl MarkdownRenderer {
    /// Create a new Markdown renderer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Render blocks, then normalize blank lines.
    pub fn render(&self, blocks: &[ContentBlock]) -> String {
        let mut output = String::new();
        for block in blocks {
            self.render_block(&mut output, block);
        }
        normalize_markdown(&output)
    }

    fn render_block(&self, output: &mut String, block: &ContentBlock) {
        match block.kind {
            BlockKind::Heading { level } => {
                output.push_str(&"#".repeat(level as usize));
                output.push(' ');
                output.push_str(&block.content);
            }
            BlockKind::Paragraph | BlockKind::List | BlockKind::Table => {
                output.push_str(&block.content);
            }
            BlockKind::Code => {
                if block.content.contains(FENCE) {
                    output.push_str(&block.content);
                } else {
                    output.push_str(FENCE);
                    output.push('\n');
                    output.push_str(&block.content);
                    output.push('\n');
                    output.push_str(FENCE);
                }
            }
            BlockKind::Quote => {
                let quoted = block
                    .content
                    .split('\n')
                    .map(|line| format!("> {}", line))
                    .collect::<Vec<_>>()
                    .join("\n");
                output.push_str(&quoted);
            }
        }
        output.push_str("\n\n");
    }
}

/// Trim the document and collapse runs of three or more newlines to one
/// blank line.
pub fn normalize_markdown(markdown: &str) -> String {
    EXCESS_NEWLINES
        .replace_all(markdown.trim(), "\n\n")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TextLine;

    fn block(kind: BlockKind, content: &str) -> ContentBlock {
        ContentBlock::new(kind, content, vec![TextLine::new(content, 12.0)])
    }

    #[test]
    fn test_render_heading() {
        let md = to_markdown(&[block(BlockKind::Heading { level: 3 }, "Usage")]);
        assert_eq!(md, "### Usage");
    }

    #[test]
    fn test_blocks_separated_by_blank_line() {
        let md = to_markdown(&[
            block(BlockKind::Heading { level: 1 }, "Title"),
            block(BlockKind::Paragraph, "Body text."),
            block(BlockKind::List, "- a\n- b"),
        ]);
        assert_eq!(md, "# Title\n\nBody text.\n\n- a\n- b");
    }

    #[test]
    fn test_code_with_fence_not_rewrapped() {
        let md = to_markdown(&[block(BlockKind::Code, "```\nlet x = 1;\n```")]);
        assert_eq!(md, "```\nlet x = 1;\n```");
    }

    #[test]
    fn test_code_without_fence_wrapped() {
        let md = to_markdown(&[block(BlockKind::Code, "let x = 1;")]);
        assert_eq!(md, "```\nlet x = 1;\n```");
    }

    #[test]
    fn test_quote_prefixes_every_line() {
        let md = to_markdown(&[block(BlockKind::Quote, "first\nsecond")]);
        assert_eq!(md, "> first\n> second");
    }

    #[test]
    fn test_table_verbatim() {
        let table = "| a | b |\n| --- | --- |\n| 1 | 2 |";
        assert_eq!(to_markdown(&[block(BlockKind::Table, table)]), table);
    }

    #[test]
    fn test_normalize_collapses_newlines() {
        assert_eq!(normalize_markdown("\n\na\n\n\n\nb\n\n\n"), "a\n\nb");
        assert_eq!(normalize_markdown("a\n\nb"), "a\n\nb");
    }

    #[test]
    fn test_empty_blocks_render_empty() {
        assert_eq!(to_markdown(&[]), "");
    }

    #[test]
    fn test_paragraph_with_inner_blank_lines_collapsed() {
        let md = to_markdown(&[
            block(BlockKind::Paragraph, "one\n\n\n\ntwo"),
            block(BlockKind::Paragraph, "three"),
        ]);
        assert!(!md.contains("\n\n\n"));
        assert_eq!(md, "one\n\ntwo\n\nthree");
    }
}
