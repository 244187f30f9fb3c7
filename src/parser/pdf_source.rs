//! Positioned text fragments from PDF content streams, using lopdf.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use lopdf::{Document as LopdfDocument, Object, ObjectId};

use crate::detect::pdf_version;
use crate::error::{Error, Result};
use crate::model::PositionedTextFragment;

use super::PageSource;

/// TJ adjustments beyond this many thousandths of an em are word gaps.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Leading used by `T*` and friends when the stream never sets `TL`.
const DEFAULT_LEADING: f32 = 12.0;

/// A PDF document exposing its pages as fragment lists.
pub struct PdfSource {
    doc: LopdfDocument,
    pages: BTreeMap<u32, ObjectId>,
}

impl PdfSource {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Load a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        pdf_version(data)?;
        let doc = LopdfDocument::load_mem(data)?;
        if doc.is_encrypted() {
            log::warn!("document is encrypted; text may not decode");
        }
        let pages = doc.get_pages();
        Ok(Self { doc, pages })
    }

    /// PDF version from the document header.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    /// Check if the document is encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.doc.is_encrypted()
    }

    /// Get page content stream.
    fn page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = self.doc.get_dictionary(page_id)?;
        let contents = match page_dict.get(b"Contents") {
            Ok(contents) => contents,
            // A page without a content stream has no text.
            Err(_) => return Ok(Vec::new()),
        };

        match contents {
            Object::Reference(r) => match self.doc.get_object(*r)? {
                Object::Stream(s) => stream_content(s),
                _ => Err(Error::pdf_parse("Invalid content stream")),
            },
            Object::Array(arr) => {
                let mut content = Vec::new();
                for obj in arr {
                    if let Object::Reference(r) = obj {
                        if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                            content.extend_from_slice(&stream_content(s)?);
                            content.push(b' ');
                        }
                    }
                }
                Ok(content)
            }
            _ => Err(Error::pdf_parse("Invalid content stream")),
        }
    }

    /// Walk a decoded content stream and collect text-showing operations.
    fn parse_content_stream(
        &self,
        content: &[u8],
        fonts: &BTreeMap<Vec<u8>, &lopdf::Dictionary>,
        base_fonts: &HashMap<Vec<u8>, String>,
    ) -> Result<Vec<PositionedTextFragment>> {
        let content = lopdf::content::Content::decode(content)?;

        let mut fragments = Vec::new();
        let mut state = TextState::default();

        for op in content.operations {
            let operands = &op.operands;
            match op.operator.as_str() {
                "q" => state.ctm_stack.push(state.ctm),
                "Q" => {
                    if let Some(ctm) = state.ctm_stack.pop() {
                        state.ctm = ctm;
                    } else {
                        log::warn!("Q without matching q");
                    }
                }
                "cm" => match matrix_operands(operands) {
                    Some(m) => state.ctm = m.multiply(&state.ctm),
                    None => log::warn!("cm with unusable operands: {:?}", operands),
                },
                "BT" => {
                    state.in_text = true;
                    state.matrix = Matrix::IDENTITY;
                }
                "ET" => state.in_text = false,
                "Tf" => {
                    if let (Some(Object::Name(name)), Some(size)) =
                        (operands.first(), operands.get(1).and_then(get_number))
                    {
                        state.font_key = name.clone();
                        state.font_name = base_fonts
                            .get(name.as_slice())
                            .cloned()
                            .unwrap_or_else(|| String::from_utf8_lossy(name).to_string());
                        state.font_size = size;
                    } else {
                        log::warn!("Tf with unusable operands: {:?}", operands);
                    }
                }
                "TL" => {
                    if let Some(leading) = operands.first().and_then(get_number) {
                        state.leading = leading;
                    }
                }
                "Td" | "TD" => {
                    if let (Some(tx), Some(ty)) = (
                        operands.first().and_then(get_number),
                        operands.get(1).and_then(get_number),
                    ) {
                        if op.operator == "TD" {
                            state.leading = -ty;
                        }
                        state.matrix.translate(tx, ty);
                    }
                }
                "Tm" => match matrix_operands(operands) {
                    Some(m) => state.matrix = m,
                    None => log::warn!("Tm with unusable operands: {:?}", operands),
                },
                "T*" => state.next_line(),
                "Tj" | "TJ" | "'" | "\"" => {
                    if op.operator == "'" || op.operator == "\"" {
                        state.next_line();
                    }
                    if !state.in_text {
                        continue;
                    }

                    let encoding = fonts
                        .get(&state.font_key)
                        .and_then(|f| f.get_font_encoding(&self.doc).ok());
                    let decode = |bytes: &[u8]| match encoding {
                        Some(ref enc) => LopdfDocument::decode_text(enc, bytes).unwrap_or_default(),
                        None => decode_text_simple(bytes),
                    };

                    let text = match (op.operator.as_str(), operands.as_slice()) {
                        ("TJ", [Object::Array(items), ..]) => decode_tj_array(items, &decode),
                        ("\"", [_, _, Object::String(bytes, _), ..]) => decode(bytes.as_slice()),
                        (_, [Object::String(bytes, _), ..]) => decode(bytes.as_slice()),
                        _ => String::new(),
                    };

                    if !text.is_empty() {
                        fragments.push(state.fragment(text));
                    }
                }
                _ => {}
            }
        }

        Ok(fragments)
    }
}

impl PageSource for PdfSource {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_fragments(&self, page: u32) -> Result<Vec<PositionedTextFragment>> {
        let page_id = *self
            .pages
            .get(&page)
            .ok_or(Error::PageOutOfRange(page, self.page_count()))?;

        let fonts = self.doc.get_page_fonts(page_id)?;
        let base_fonts: HashMap<Vec<u8>, String> = fonts
            .iter()
            .map(|(key, font)| {
                let base = font
                    .get(b"BaseFont")
                    .ok()
                    .and_then(|o| o.as_name().ok())
                    .map(|n| String::from_utf8_lossy(n).to_string())
                    .unwrap_or_else(|| String::from_utf8_lossy(key).to_string());
                (key.clone(), base)
            })
            .collect();

        let content = self.page_content(page_id)?;
        self.parse_content_stream(&content, &fonts, &base_fonts)
    }
}

/// Concatenate a TJ array, turning large negative kerning into spaces.
fn decode_tj_array(items: &[Object], decode: impl Fn(&[u8]) -> String) -> String {
    let mut combined = String::new();
    for item in items {
        match item {
            Object::String(bytes, _) => combined.push_str(&decode(bytes.as_slice())),
            Object::Integer(_) | Object::Real(_) => {
                let adjustment = -get_number(item).unwrap_or(0.0);
                let last = combined.chars().last();
                if adjustment > TJ_SPACE_THRESHOLD
                    && last.is_some_and(|c| !c.is_whitespace() && !is_spaceless_script_char(c))
                {
                    combined.push(' ');
                }
            }
            _ => {}
        }
    }
    combined
}

/// Text and graphics state tracked while walking a stream.
///
/// Text advance after a show operator is not tracked, so the text matrix
/// doubles as the line matrix.
#[derive(Debug)]
struct TextState {
    in_text: bool,
    font_key: Vec<u8>,
    font_name: String,
    font_size: f32,
    /// `TL`; text state, so it survives `BT`/`ET`
    leading: f32,
    matrix: Matrix,
    ctm: Matrix,
    ctm_stack: Vec<Matrix>,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            in_text: false,
            font_key: Vec::new(),
            font_name: String::new(),
            font_size: 0.0,
            leading: DEFAULT_LEADING,
            matrix: Matrix::IDENTITY,
            ctm: Matrix::IDENTITY,
            ctm_stack: Vec::new(),
        }
    }
}

impl TextState {
    fn next_line(&mut self) {
        self.matrix.translate(0.0, -self.leading);
    }

    /// Fragment at the current text position, with the pdf.js transform
    /// convention: text matrix times CTM, scaled by font size.
    fn fragment(&self, text: String) -> PositionedTextFragment {
        let m = self.matrix.multiply(&self.ctm);
        let size = if self.font_size > 0.0 { self.font_size } else { 12.0 };
        PositionedTextFragment {
            text: Some(text),
            transform: Some(vec![m.a * size, m.b * size, m.c * size, m.d * size, m.e, m.f]),
            width: None,
            height: Some((m.d * size).abs()),
            font_name: Some(self.font_name.clone()),
        }
    }
}

/// Affine matrix `[a b 0; c d 0; e f 1]` in PDF row-vector convention.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32, // X translation
    f: f32, // Y translation
}

impl Matrix {
    const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    /// `self × other`: apply `self`, then `other`.
    fn multiply(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }
}

/// Six numeric operands of `cm`/`Tm`.
fn matrix_operands(operands: &[Object]) -> Option<Matrix> {
    let values: Vec<f32> = operands.iter().filter_map(get_number).collect();
    match values.as_slice() {
        &[a, b, c, d, e, f] => Some(Matrix { a, b, c, d, e, f }),
        _ => None,
    }
}

/// Stream bytes with any filters undone; unfiltered streams are returned as is.
fn stream_content(stream: &lopdf::Stream) -> Result<Vec<u8>> {
    if stream.dict.has(b"Filter") {
        Ok(stream.decompressed_content()?)
    } else {
        Ok(stream.content.clone())
    }
}

fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Check if character is from a script that doesn't use word spaces.
/// Chinese and Japanese don't use spaces between words, but Korean does.
fn is_spaceless_script_char(c: char) -> bool {
    matches!(c as u32,
        0x4E00..=0x9FFF       // CJK Unified Ideographs
        | 0x3400..=0x4DBF     // Extension A
        | 0x20000..=0x2EBEF   // Extensions B-F
        | 0x3040..=0x30FF     // Hiragana, Katakana
        | 0x3000..=0x303F)    // CJK Symbols and Punctuation
}

/// Simple text decoding fallback when no encoding is available.
fn decode_text_simple(bytes: &[u8]) -> String {
    if let Some(body) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let utf16: Vec<u16> = body
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        // Latin-1
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}
