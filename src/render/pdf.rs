//! Paginated PDF rendering of estimate content.
//!
//! Output uses the standard Helvetica faces with WinAnsi encoding, so no
//! font files are embedded. Content streams are left uncompressed.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

use crate::error::{Error, Result};
use crate::model::{ParsedContent, StyleProfile};
use crate::parser::encode_win_ansi;

use super::RenderOptions;

const DEFAULT_TITLE: &str = "Project Estimate";
const DEFAULT_HEADING: &str = "Section";

const REGULAR: &str = "F1";
const BOLD: &str = "F2";

/// Average Helvetica advance as a fraction of the font size.
const AVG_GLYPH_WIDTH: f32 = 0.5;
const LINE_HEIGHT: f32 = 1.2;
const LINE_GAP: f32 = 3.0;
const ACCENT_BAR_HEIGHT: f32 = 7.0;
const BULLET_INDENT: f32 = 12.0;

/// Start a new page before a heading when less than this much space is left.
const SECTION_BREAK_SPACE: f32 = 120.0;
/// Start a new page after a bullet when less than this much space is left.
const BULLET_BREAK_SPACE: f32 = 80.0;

/// Render content as a PDF styled after `profile`.
pub fn to_pdf(
    content: &ParsedContent,
    profile: &StyleProfile,
    options: &RenderOptions,
) -> Result<Vec<u8>> {
    PdfRenderer::new(options).render(content, profile)
}

/// Lays out estimate content on fixed-size pages.
pub struct PdfRenderer<'a> {
    options: &'a RenderOptions,
}

impl<'a> PdfRenderer<'a> {
    pub fn new(options: &'a RenderOptions) -> Self {
        Self { options }
    }

    pub fn render(&self, content: &ParsedContent, profile: &StyleProfile) -> Result<Vec<u8>> {
        let opts = self.options;
        let [ink, accent, muted] = opts.palette(&profile.colors).map(hex_to_rgb);
        let heading_size = size_or(profile.sizes.heading, opts.default_heading_size).max(14.0);
        let body_size = size_or(profile.sizes.body, opts.default_body_size).max(10.0);
        let title_size = (heading_size * 1.18).round();

        let margin = opts.margin;
        let text_width = opts.page_width - 2.0 * margin;
        let mut layout = PageLayout::new(opts.page_height, margin);

        layout.ops.push(fill_color(accent));
        layout.ops.push(Operation::new(
            "re",
            vec![
                margin.into(),
                (opts.page_height - margin - ACCENT_BAR_HEIGHT).into(),
                text_width.into(),
                ACCENT_BAR_HEIGHT.into(),
            ],
        ));
        layout.ops.push(Operation::new("f", vec![]));
        layout.y = margin + 16.0;

        let title = non_empty(&content.title).unwrap_or(DEFAULT_TITLE);
        layout.paragraph(title, BOLD, title_size, ink, margin, text_width, 0.0);
        layout.y += 8.0;

        layout.paragraph(&content.intro, REGULAR, body_size, muted, margin, text_width, LINE_GAP);
        layout.y += 14.0;

        let bullet_x = margin + BULLET_INDENT;
        let bullet_width = opts.page_width - margin - bullet_x;
        for section in &content.sections {
            if layout.y > opts.page_height - SECTION_BREAK_SPACE {
                layout.new_page();
            }
            let heading = non_empty(&section.heading).unwrap_or(DEFAULT_HEADING);
            layout.paragraph(heading, BOLD, heading_size, ink, margin, text_width, 0.0);
            layout.y += 6.0;

            for bullet in &section.bullets {
                let line = format!("• {}", bullet);
                layout.paragraph(&line, REGULAR, body_size, ink, bullet_x, bullet_width, LINE_GAP);
                layout.y += 4.0;
                if layout.y > opts.page_height - BULLET_BREAK_SPACE {
                    layout.new_page();
                }
            }
            layout.y += 8.0;
        }

        let pages = layout.finish();
        log::debug!(
            "Rendered PDF: {} pages, {} sections",
            pages.len(),
            content.sections.len()
        );
        self.assemble(pages)
    }

    fn assemble(&self, pages: Vec<Vec<Operation>>) -> Result<Vec<u8>> {
        let opts = self.options;
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let regular = doc.add_object(type1_font("Helvetica"));
        let bold = doc.add_object(type1_font("Helvetica-Bold"));
        let resources = doc.add_object(dictionary! {
            "Font" => dictionary! {
                REGULAR => regular,
                BOLD => bold,
            },
        });

        let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
        for operations in pages {
            let data = Content { operations }
                .encode()
                .map_err(|e| Error::Render(format!("content stream encoding failed: {}", e)))?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, data));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), opts.page_width.into(), opts.page_height.into()],
                "Resources" => resources,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id: ObjectId = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut output = Vec::new();
        doc.save_to(&mut output)
            .map_err(|e| Error::Render(format!("failed to serialise PDF: {}", e)))?;
        Ok(output)
    }
}

/// Top-down cursor over a sequence of pages.
struct PageLayout {
    page_height: f32,
    margin: f32,
    finished: Vec<Vec<Operation>>,
    ops: Vec<Operation>,
    /// Distance from the top edge of the current page
    y: f32,
}

impl PageLayout {
    fn new(page_height: f32, margin: f32) -> Self {
        Self {
            page_height,
            margin,
            finished: Vec::new(),
            ops: Vec::new(),
            y: margin,
        }
    }

    fn new_page(&mut self) {
        self.finished.push(std::mem::take(&mut self.ops));
        self.y = self.margin;
    }

    /// Set wrapped text starting at the cursor and advance past it.
    #[allow(clippy::too_many_arguments)]
    fn paragraph(
        &mut self,
        text: &str,
        font: &str,
        size: f32,
        color: [f32; 3],
        x: f32,
        width: f32,
        gap: f32,
    ) {
        let lines = wrap_text(text, size, width);
        if lines.is_empty() {
            return;
        }
        self.ops.push(fill_color(color));
        for line in lines {
            if self.y + size > self.page_height - self.margin {
                self.new_page();
                self.ops.push(fill_color(color));
            }
            let baseline = self.page_height - self.y - size;
            self.ops.extend([
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec![Object::Name(font.as_bytes().to_vec()), size.into()]),
                Operation::new(
                    "Tm",
                    vec![1.into(), 0.into(), 0.into(), 1.into(), x.into(), baseline.into()],
                ),
                Operation::new("Tj", vec![Object::string_literal(encode_win_ansi(&line))]),
                Operation::new("ET", vec![]),
            ]);
            self.y += size * LINE_HEIGHT + gap;
        }
    }

    fn finish(mut self) -> Vec<Vec<Operation>> {
        if !self.ops.is_empty() || self.finished.is_empty() {
            self.finished.push(self.ops);
        }
        self.finished
    }
}

/// Greedy word wrap using an average glyph width.
///
/// Words longer than a line are kept whole on their own line.
fn wrap_text(text: &str, size: f32, width: f32) -> Vec<String> {
    let max_chars = ((width / (size * AVG_GLYPH_WIDTH)).floor() as usize).max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn type1_font(base: &str) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base,
        "Encoding" => "WinAnsiEncoding",
    }
}

fn fill_color([r, g, b]: [f32; 3]) -> Operation {
    Operation::new("rg", vec![r.into(), g.into(), b.into()])
}

/// Parse `#rrggbb` into unit RGB; anything else becomes slate ink.
fn hex_to_rgb(hex: &str) -> [f32; 3] {
    let clean = hex.trim().trim_start_matches('#');
    let channel = |i: usize| {
        clean
            .get(i..i + 2)
            .and_then(|s| u8::from_str_radix(s, 16).ok())
    };
    match (clean.len(), channel(0), channel(2), channel(4)) {
        (6, Some(r), Some(g), Some(b)) => [r, g, b].map(|c| c as f32 / 255.0),
        _ => [15.0 / 255.0, 23.0 / 255.0, 42.0 / 255.0],
    }
}

fn size_or(value: f64, fallback: f64) -> f32 {
    let size = if value > 0.0 && value.is_finite() {
        value
    } else {
        fallback
    };
    size.round() as f32
}

fn non_empty(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Section;

    #[test]
    fn test_wrap_text() {
        // 100pt at 10pt: 20 characters per line
        let lines = wrap_text("alpha beta gamma delta epsilon", 10.0, 100.0);
        assert_eq!(lines, vec!["alpha beta gamma", "delta epsilon"]);
        assert!(wrap_text("   ", 10.0, 100.0).is_empty());
        assert_eq!(wrap_text("abcdefghijklmnopqrstuvwxyz", 10.0, 50.0).len(), 1);
    }

    #[test]
    fn test_hex_to_rgb() {
        assert_eq!(hex_to_rgb("#ff0000"), [1.0, 0.0, 0.0]);
        assert_eq!(hex_to_rgb("#336699"), [0.2, 0.4, 0.6]);
        assert_eq!(hex_to_rgb("nope"), [15.0 / 255.0, 23.0 / 255.0, 42.0 / 255.0]);
    }

    #[test]
    fn test_render_produces_pdf() {
        let content = ParsedContent::new(
            "Estimate",
            "Intro",
            vec![Section::with_bullets("Scope", ["One", "Two"])],
        );
        let bytes = to_pdf(&content, &StyleProfile::default(), &RenderOptions::default()).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_long_content_breaks_pages() {
        let bullets: Vec<String> = (0..120).map(|i| format!("Line item number {}", i)).collect();
        let content = ParsedContent::new("Big", "", vec![Section::with_bullets("Items", bullets)]);
        let bytes = to_pdf(&content, &StyleProfile::default(), &RenderOptions::default()).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert!(doc.get_pages().len() > 1);
    }
}
