//! Positioned text fragments, the atomic input of layout reconstruction.

use serde::{Deserialize, Serialize};

/// Minimum transform length carrying scale and translation components.
const TRANSFORM_LEN: usize = 6;

/// One positioned run of extracted PDF text.
///
/// Field names follow the item shape produced by pdf.js `getTextContent()`
/// so that fragment dumps can be deserialized directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionedTextFragment {
    /// Text content, possibly absent
    #[serde(rename = "str", default)]
    pub text: Option<String>,
    /// Affine transform `[a, b, c, d, e, f]`
    #[serde(default)]
    pub transform: Option<Vec<f32>>,
    /// Advance width of the run
    #[serde(default)]
    pub width: Option<f32>,
    /// Height of the run
    #[serde(default)]
    pub height: Option<f32>,
    /// Font name (e.g., "Helvetica-Bold")
    #[serde(default)]
    pub font_name: Option<String>,
}

/// Geometry derived from a fragment's transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FragmentGeometry {
    /// Font size, `|transform[3]|`
    pub font_size: f32,
    /// X position, `transform[4]`
    pub x: f32,
    /// Y position, `transform[5]`
    pub y: f32,
}

impl PositionedTextFragment {
    /// Create a fragment at `(x, y)` with an unrotated transform of `font_size`.
    pub fn new(text: impl Into<String>, x: f32, y: f32, font_size: f32) -> Self {
        Self {
            text: Some(text.into()),
            transform: Some(vec![font_size, 0.0, 0.0, font_size, x, y]),
            ..Default::default()
        }
    }

    /// Set the font name.
    pub fn with_font_name(mut self, name: impl Into<String>) -> Self {
        self.font_name = Some(name.into());
        self
    }

    /// Set the full transform.
    pub fn with_transform(mut self, transform: Vec<f32>) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Non-empty text, if any.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.is_empty())
    }

    /// Position and size, or `None` when the transform is missing or short.
    pub fn geometry(&self) -> Option<FragmentGeometry> {
        let t = self.transform.as_deref()?;
        if t.len() < TRANSFORM_LEN {
            return None;
        }
        Some(FragmentGeometry {
            font_size: t[3].abs(),
            x: t[4],
            y: t[5],
        })
    }

    /// Font name, or the empty string.
    pub fn font_name(&self) -> &str {
        self.font_name.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_from_transform() {
        let frag = PositionedTextFragment::new("Hi", 72.0, 700.0, 12.0);
        let g = frag.geometry().unwrap();
        assert_eq!(g.font_size, 12.0);
        assert_eq!(g.x, 72.0);
        assert_eq!(g.y, 700.0);
    }

    #[test]
    fn test_geometry_uses_absolute_vertical_scale() {
        let frag = PositionedTextFragment::default()
            .with_transform(vec![10.0, 0.0, 0.0, -18.0, 5.0, 6.0]);
        assert_eq!(frag.geometry().unwrap().font_size, 18.0);
    }

    #[test]
    fn test_geometry_missing_or_short() {
        let mut frag = PositionedTextFragment::new("x", 0.0, 0.0, 10.0);
        frag.transform = None;
        assert!(frag.geometry().is_none());

        let frag = frag.with_transform(vec![1.0, 0.0, 0.0, 1.0]);
        assert!(frag.geometry().is_none());
    }

    #[test]
    fn test_empty_text_is_absent() {
        let mut frag = PositionedTextFragment::new("", 0.0, 0.0, 10.0);
        assert!(frag.text().is_none());
        frag.text = None;
        assert!(frag.text().is_none());
    }

    #[test]
    fn test_deserialize_pdfjs_item() {
        let json = r#"{"str":"Title","dir":"ltr","transform":[24,0,0,24,72,720],
                       "width":120.5,"height":24,"fontName":"g_d0_f1","hasEOL":false}"#;
        let frag: PositionedTextFragment = serde_json::from_str(json).unwrap();
        assert_eq!(frag.text(), Some("Title"));
        assert_eq!(frag.font_name(), "g_d0_f1");
        assert_eq!(frag.width, Some(120.5));
        assert_eq!(frag.geometry().unwrap().font_size, 24.0);
    }

    #[test]
    fn test_deserialize_marked_content_item() {
        // pdf.js emits marked-content items without text or transform
        let frag: PositionedTextFragment =
            serde_json::from_str(r#"{"type":"beginMarkedContent"}"#).unwrap();
        assert!(frag.text().is_none());
        assert!(frag.geometry().is_none());
    }
}
