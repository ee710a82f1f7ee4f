//! Content-stream tokenizer producing positioned text runs.
//!
//! Walks each page's text operators (`BT`/`ET`, `Tf`, `Td`/`TD`, `Tm`,
//! `TL`, `T*`, `Tj`/`TJ`/`'`/`"`) and emits one [`TextRun`] per show-text
//! operation, with the text matrix tracked well enough to recover the run
//! origin and effective size. The graphics state (`q`/`Q`/`cm`) is tracked
//! too, so runs are reported in page space.

use std::collections::HashMap;

use super::backend::{decode_text, BackendFontInfo, ContentOp, PageId, PdfBackend, PdfValue};
use super::options::ErrorMode;
use crate::error::Result;
use crate::model::{PageRuns, TextRun};

/// Average glyph advance as a fraction of the font size.
const AVG_GLYPH_WIDTH: f32 = 0.5;

/// TJ adjustments (thousandths of an em) beyond this read as a word gap.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Produces [`PageRuns`] for every page of a document.
pub struct RunTokenizer<'a, B: PdfBackend> {
    backend: &'a B,
    error_mode: ErrorMode,
}

impl<'a, B: PdfBackend> RunTokenizer<'a, B> {
    /// Create a tokenizer over a backend.
    pub fn new(backend: &'a B, error_mode: ErrorMode) -> Self {
        Self {
            backend,
            error_mode,
        }
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.backend.pages().len()
    }

    /// Tokenize every page, in page order.
    ///
    /// In lenient mode a page that fails to decode is logged and yields an
    /// empty page; in strict mode the first failure is returned.
    pub fn pages(&self) -> Result<Vec<PageRuns>> {
        self.backend
            .pages()
            .into_iter()
            .map(|(number, page_id)| match self.page_runs(page_id) {
                Ok(page) => Ok(page),
                Err(e) if self.error_mode == ErrorMode::Lenient => {
                    log::warn!("Failed to extract runs from page {}: {}", number, e);
                    Ok(PageRuns::new(self.backend.page_height(page_id)))
                }
                Err(e) => Err(e),
            })
            .collect()
    }

    /// Tokenize a single page.
    pub fn page_runs(&self, page_id: PageId) -> Result<PageRuns> {
        let fonts: HashMap<Vec<u8>, BackendFontInfo> = self
            .backend
            .page_fonts(page_id)?
            .into_iter()
            .map(|f| (f.name.clone(), f))
            .collect();
        let content = self.backend.page_content(page_id)?;
        let ops = self.backend.decode_content(&content)?;

        let mut page = PageRuns::new(self.backend.page_height(page_id));
        page.runs = walk_operations(&ops, &fonts);
        Ok(page)
    }
}

/// Affine matrix `[a b c d e f]` as used by `cm` and `Tm`.
type Affine = [f32; 6];

const IDENTITY: Affine = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

/// `m × n` in PDF row-vector convention (apply `m` first, then `n`).
fn multiply(m: Affine, n: Affine) -> Affine {
    let [a, b, c, d, e, f] = m;
    let [a2, b2, c2, d2, e2, f2] = n;
    [
        a * a2 + b * c2,
        a * b2 + b * d2,
        c * a2 + d * c2,
        c * b2 + d * d2,
        e * a2 + f * c2 + e2,
        e * b2 + f * d2 + f2,
    ]
}

/// The parts of the graphics state that `q`/`Q` save and restore.
#[derive(Clone)]
struct GraphicsState<'f> {
    ctm: Affine,
    font: Option<&'f BackendFontInfo>,
    font_label: String,
    font_size: f32,
    leading: f32,
}

/// Text state carried across operators inside one content stream.
struct TextState<'f> {
    font: Option<&'f BackendFontInfo>,
    font_label: String,
    font_size: f32,
    leading: f32,
    matrix: TextMatrix,
    in_text: bool,
    ctm: Affine,
    saved: Vec<GraphicsState<'f>>,
}

impl<'f> TextState<'f> {
    fn new() -> Self {
        Self {
            font: None,
            font_label: String::new(),
            font_size: 12.0,
            leading: 0.0,
            matrix: TextMatrix::default(),
            in_text: false,
            ctm: IDENTITY,
            saved: Vec::new(),
        }
    }

    fn save(&mut self) {
        self.saved.push(GraphicsState {
            ctm: self.ctm,
            font: self.font,
            font_label: self.font_label.clone(),
            font_size: self.font_size,
            leading: self.leading,
        });
    }

    /// Unbalanced `Q` operators are ignored.
    fn restore(&mut self) {
        if let Some(gs) = self.saved.pop() {
            self.ctm = gs.ctm;
            self.font = gs.font;
            self.font_label = gs.font_label;
            self.font_size = gs.font_size;
            self.leading = gs.leading;
        }
    }

    fn decode(&self, bytes: &[u8]) -> String {
        decode_text(self.font.and_then(|f| f.encoding.as_deref()), bytes)
    }

    /// Emit a run at the current position, then advance past it.
    fn show(&mut self, text: String, adjustment: f32, runs: &mut Vec<TextRun>) {
        let chars = text.chars().count() as f32;
        let advance = (chars * AVG_GLYPH_WIDTH - adjustment / 1000.0) * self.font_size;
        if !text.is_empty() {
            let [a, b, c, d, e, f] = multiply(self.matrix.components(), self.ctm);
            let scale = (a * a + c * c).sqrt();
            runs.push(TextRun {
                text,
                font_name: self.font_label.clone(),
                height: self.font_size * scale,
                width: (advance * scale).max(0.0),
                transform: [
                    self.font_size * a,
                    self.font_size * b,
                    self.font_size * c,
                    self.font_size * d,
                    e,
                    f,
                ],
            });
        }
        self.matrix.advance(advance);
    }
}

/// Walk decoded operators and collect runs.
fn walk_operations(ops: &[ContentOp], fonts: &HashMap<Vec<u8>, BackendFontInfo>) -> Vec<TextRun> {
    let mut runs = Vec::new();
    let mut state = TextState::new();

    for op in ops {
        match op.operator.as_str() {
            "BT" => {
                state.in_text = true;
                state.matrix = TextMatrix::default();
            }
            "ET" => state.in_text = false,
            "q" => state.save(),
            "Q" => state.restore(),
            "cm" => {
                if op.operands.len() >= 6 {
                    let m = [0, 1, 2, 3, 4, 5].map(|i| op.number(i).unwrap_or(IDENTITY[i]));
                    state.ctm = multiply(m, state.ctm);
                }
            }
            "Tf" => {
                if let Some(PdfValue::Name(name)) = op.operands.first() {
                    state.font = fonts.get(name);
                    state.font_label = match state.font {
                        Some(info) => info.base_font.clone(),
                        None => String::from_utf8_lossy(name).to_string(),
                    };
                }
                state.font_size = op.number(1).unwrap_or(12.0);
            }
            "TL" => state.leading = op.number(0).unwrap_or(0.0),
            "Td" | "TD" => {
                let tx = op.number(0).unwrap_or(0.0);
                let ty = op.number(1).unwrap_or(0.0);
                if op.operator == "TD" {
                    state.leading = -ty;
                }
                state.matrix.translate(tx, ty);
            }
            "Tm" => {
                if op.operands.len() >= 6 {
                    state.matrix.set([
                        op.number(0).unwrap_or(1.0),
                        op.number(1).unwrap_or(0.0),
                        op.number(2).unwrap_or(0.0),
                        op.number(3).unwrap_or(1.0),
                        op.number(4).unwrap_or(0.0),
                        op.number(5).unwrap_or(0.0),
                    ]);
                }
            }
            "T*" => state.matrix.translate(0.0, -state.leading),
            "Tj" => {
                if let (true, Some(PdfValue::Str(bytes))) = (state.in_text, op.operands.first()) {
                    let text = state.decode(bytes);
                    state.show(text, 0.0, &mut runs);
                }
            }
            "TJ" => {
                if let (true, Some(PdfValue::Array(items))) = (state.in_text, op.operands.first()) {
                    let (text, adjustment) = combine_tj(&state, items);
                    state.show(text, adjustment, &mut runs);
                }
            }
            "'" | "\"" => {
                state.matrix.translate(0.0, -state.leading);
                let idx = if op.operator == "\"" { 2 } else { 0 };
                if let (true, Some(PdfValue::Str(bytes))) = (state.in_text, op.operands.get(idx)) {
                    let text = state.decode(bytes);
                    state.show(text, 0.0, &mut runs);
                }
            }
            _ => {}
        }
    }

    runs
}

/// Join a TJ array into text, inserting a space at large negative kerns.
///
/// Returns the text and the summed kerning adjustment.
fn combine_tj(state: &TextState<'_>, items: &[PdfValue]) -> (String, f32) {
    let mut combined = String::new();
    let mut adjustment = 0.0;

    for item in items {
        match item {
            PdfValue::Str(bytes) => combined.push_str(&state.decode(bytes)),
            PdfValue::Integer(_) | PdfValue::Real(_) => {
                let n = super::backend::get_number_from_value(item).unwrap_or(0.0);
                adjustment += n;
                let ends_spaced = combined.ends_with(' ') || combined.ends_with('\u{00A0}');
                if -n > TJ_SPACE_THRESHOLD && !combined.is_empty() && !ends_spaced {
                    if let Some(c) = combined.chars().last() {
                        if !is_spaceless_script_char(c) {
                            combined.push(' ');
                        }
                    }
                }
            }
            _ => {}
        }
    }

    (combined, adjustment)
}

/// Text matrix `[a b c d e f]`.
#[derive(Debug, Clone, Copy)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
    // Start of the current line, which Td/T* are relative to
    line_e: f32,
    line_f: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
            line_e: 0.0,
            line_f: 0.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, [a, b, c, d, e, f]: [f32; 6]) {
        *self = Self {
            a,
            b,
            c,
            d,
            e,
            f,
            line_e: e,
            line_f: f,
        };
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.line_e += tx * self.a + ty * self.c;
        self.line_f += tx * self.b + ty * self.d;
        self.e = self.line_e;
        self.f = self.line_f;
    }

    /// Move along the baseline by `tx` text-space units.
    fn advance(&mut self, tx: f32) {
        self.e += tx * self.a;
        self.f += tx * self.b;
    }

    fn components(&self) -> Affine {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }
}

/// Check if character is from a script that doesn't use word spaces.
/// Chinese and Japanese don't use spaces between words, but Korean does.
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and Extension A
    (0x4E00..=0x9FFF).contains(&code)
    || (0x3400..=0x4DBF).contains(&code)
    // Extensions B-F
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana, Katakana
    || (0x3040..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(operator: &str, operands: Vec<PdfValue>) -> ContentOp {
        ContentOp {
            operator: operator.to_string(),
            operands,
        }
    }

    fn font(name: &str, base: &str) -> (Vec<u8>, BackendFontInfo) {
        (
            name.as_bytes().to_vec(),
            BackendFontInfo {
                name: name.as_bytes().to_vec(),
                base_font: base.to_string(),
                encoding: Some("WinAnsiEncoding".to_string()),
            },
        )
    }

    #[test]
    fn test_tj_run_position_and_size() {
        let fonts: HashMap<_, _> = [font("F1", "Helvetica-Bold")].into_iter().collect();
        let ops = vec![
            op("BT", vec![]),
            op("Tf", vec![PdfValue::Name(b"F1".to_vec()), PdfValue::Integer(18)]),
            op("Td", vec![PdfValue::Integer(72), PdfValue::Integer(700)]),
            op("Tj", vec![PdfValue::Str(b"Quote".to_vec())]),
            op("ET", vec![]),
        ];
        let runs = walk_operations(&ops, &fonts);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text, "Quote");
        assert_eq!(runs[0].font_name, "Helvetica-Bold");
        assert_eq!(runs[0].height, 18.0);
        assert_eq!(runs[0].x(), 72.0);
        assert_eq!(runs[0].y(), 700.0);
    }

    #[test]
    fn test_tm_scales_size() {
        let fonts = HashMap::new();
        let ops = vec![
            op("BT", vec![]),
            op("Tf", vec![PdfValue::Name(b"F9".to_vec()), PdfValue::Integer(1)]),
            op(
                "Tm",
                vec![
                    PdfValue::Integer(14),
                    PdfValue::Integer(0),
                    PdfValue::Integer(0),
                    PdfValue::Integer(14),
                    PdfValue::Integer(50),
                    PdfValue::Integer(400),
                ],
            ),
            op("Tj", vec![PdfValue::Str(b"scaled".to_vec())]),
            op("ET", vec![]),
        ];
        let runs = walk_operations(&ops, &fonts);
        assert_eq!(runs[0].height, 14.0);
        assert_eq!(runs[0].font_name, "F9");
        assert_eq!(runs[0].transform[0], 14.0);
        assert_eq!((runs[0].x(), runs[0].y()), (50.0, 400.0));
    }

    #[test]
    fn test_leading_and_next_line() {
        let fonts = HashMap::new();
        let ops = vec![
            op("BT", vec![]),
            op("Tf", vec![PdfValue::Name(b"F1".to_vec()), PdfValue::Integer(10)]),
            op("TL", vec![PdfValue::Integer(14)]),
            op("Td", vec![PdfValue::Integer(40), PdfValue::Integer(500)]),
            op("Tj", vec![PdfValue::Str(b"one".to_vec())]),
            op("T*", vec![]),
            op("Tj", vec![PdfValue::Str(b"two".to_vec())]),
            op("'", vec![PdfValue::Str(b"three".to_vec())]),
            op("ET", vec![]),
        ];
        let runs = walk_operations(&ops, &fonts);
        let ys: Vec<f32> = runs.iter().map(|r| r.y()).collect();
        assert_eq!(ys, vec![500.0, 486.0, 472.0]);
        assert!(runs.iter().all(|r| r.x() == 40.0));
    }

    #[test]
    fn test_tj_array_inserts_word_space() {
        let fonts = HashMap::new();
        let ops = vec![
            op("BT", vec![]),
            op(
                "TJ",
                vec![PdfValue::Array(vec![
                    PdfValue::Str(b"Hello".to_vec()),
                    PdfValue::Integer(-250),
                    PdfValue::Str(b"world".to_vec()),
                    PdfValue::Integer(-20),
                    PdfValue::Str(b"!".to_vec()),
                ])],
            ),
            op("ET", vec![]),
        ];
        let runs = walk_operations(&ops, &fonts);
        assert_eq!(runs[0].text, "Hello world!");
    }

    #[test]
    fn test_text_outside_bt_ignored() {
        let fonts = HashMap::new();
        let ops = vec![op("Tj", vec![PdfValue::Str(b"stray".to_vec())])];
        assert!(walk_operations(&ops, &fonts).is_empty());
    }

    #[test]
    fn test_empty_strings_are_not_emitted() {
        let fonts = HashMap::new();
        let ops = vec![
            op("BT", vec![]),
            op("Tj", vec![PdfValue::Str(Vec::new())]),
            op("Tj", vec![PdfValue::Str(b"   ".to_vec())]),
            op("ET", vec![]),
        ];
        let runs = walk_operations(&ops, &fonts);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text, "   ");
    }

    fn number_ops(operator: &str, values: &[f32]) -> ContentOp {
        op(operator, values.iter().map(|&v| PdfValue::Real(v)).collect())
    }

    #[test]
    fn test_cm_scales_runs_into_page_space() {
        let fonts = HashMap::new();
        let mut ops = vec![
            op("Tf", vec![PdfValue::Name(b"F1".to_vec()), PdfValue::Integer(16)]),
            op("q", vec![]),
            number_ops("cm", &[0.75, 0.0, 0.0, 0.75, 0.0, 0.0]),
            op("BT", vec![]),
        ];
        for y in [900.0, 870.0, 840.0, 810.0, 780.0] {
            ops.push(number_ops("Tm", &[1.0, 0.0, 0.0, 1.0, 96.0, y]));
            ops.push(op("Tj", vec![PdfValue::Str(b"Scaled body".to_vec())]));
        }
        ops.extend([
            op("Tf", vec![PdfValue::Name(b"F1".to_vec()), PdfValue::Integer(30)]),
            op("ET", vec![]),
            op("Q", vec![]),
            op("BT", vec![]),
            number_ops("Tm", &[1.0, 0.0, 0.0, 1.0, 96.0, 100.0]),
            op("Tj", vec![PdfValue::Str(b"After restore".to_vec())]),
            op("ET", vec![]),
        ]);

        let runs = walk_operations(&ops, &fonts);
        assert_eq!(runs.len(), 6);
        assert_eq!(runs[0].height, 12.0);
        assert_eq!(runs[0].transform[0], 12.0);
        assert_eq!((runs[0].x(), runs[0].y()), (72.0, 675.0));
        assert_eq!(runs[4].y(), 585.0);

        // Q restores both the matrix and the font size
        assert_eq!(runs[5].height, 16.0);
        assert_eq!((runs[5].x(), runs[5].y()), (96.0, 100.0));
    }

    #[test]
    fn test_cm_flip_keeps_positions_positive() {
        let fonts = HashMap::new();
        let ops = vec![
            number_ops("cm", &[1.0, 0.0, 0.0, -1.0, 0.0, 792.0]),
            op("BT", vec![]),
            op("Tf", vec![PdfValue::Name(b"F1".to_vec()), PdfValue::Integer(10)]),
            number_ops("Tm", &[1.0, 0.0, 0.0, -1.0, 50.0, 100.0]),
            op("Tj", vec![PdfValue::Str(b"Flipped".to_vec())]),
            op("ET", vec![]),
        ];
        let runs = walk_operations(&ops, &fonts);
        assert_eq!(runs[0].height, 10.0);
        assert_eq!((runs[0].x(), runs[0].y()), (50.0, 692.0));
    }

    #[test]
    fn test_unbalanced_restore_ignored() {
        let fonts = HashMap::new();
        let ops = vec![
            op("Q", vec![]),
            op("BT", vec![]),
            op("Td", vec![PdfValue::Integer(10), PdfValue::Integer(20)]),
            op("Tj", vec![PdfValue::Str(b"ok".to_vec())]),
            op("ET", vec![]),
        ];
        let runs = walk_operations(&ops, &fonts);
        assert_eq!((runs[0].x(), runs[0].y()), (10.0, 20.0));
    }
}
