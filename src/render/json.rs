//! JSON rendering of per-page blocks.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::PageOutput;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    page_count: usize,
    pages: &'a [PageOutput],
}

/// Serialize page outputs, with their typed blocks, to JSON.
pub fn to_json(pages: &[PageOutput], format: JsonFormat) -> Result<String> {
    let doc = JsonDocument {
        page_count: pages.len(),
        pages,
    };
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(&doc),
        JsonFormat::Compact => serde_json::to_string(&doc),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BlockKind, ContentBlock, TextLine};

    fn page() -> PageOutput {
        PageOutput {
            number: 1,
            markdown: "# Title".to_string(),
            blocks: vec![ContentBlock::new(
                BlockKind::Heading { level: 1 },
                "Title",
                vec![TextLine::new("Title", 24.0)],
            )],
        }
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&[page()], JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"type\": \"heading\""));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&[page()], JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["page_count"], 1);
        assert_eq!(value["pages"][0]["blocks"][0]["level"], 1);
    }
}
