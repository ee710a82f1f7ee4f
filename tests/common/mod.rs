//! Synthetic PDF builder shared by the integration tests.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

/// One line of text placed on a page.
pub struct Line {
    pub font: &'static str,
    pub size: f32,
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub color: Option<[f32; 3]>,
}

impl Line {
    pub fn new(font: &'static str, size: f32, x: f32, y: f32, text: impl Into<String>) -> Self {
        Self {
            font,
            size,
            x,
            y,
            text: text.into(),
            color: None,
        }
    }

    pub fn colored(mut self, rgb: [f32; 3]) -> Self {
        self.color = Some(rgb);
        self
    }
}

/// Build an uncompressed US Letter PDF, one `Vec<Line>` per page.
pub fn build_pdf(pages: Vec<Vec<Line>>) -> Vec<u8> {
    build_transformed_pdf(pages, None)
}

/// Like [`build_pdf`], with every page's content wrapped in `q <cm> ... Q`.
pub fn build_transformed_pdf(pages: Vec<Vec<Line>>, cm: Option<[f32; 6]>) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut font_names: Vec<&'static str> = Vec::new();
    for line in pages.iter().flatten() {
        if !font_names.contains(&line.font) {
            font_names.push(line.font);
        }
    }
    let mut fonts = lopdf::Dictionary::new();
    for (i, base) in font_names.iter().enumerate() {
        let id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => *base,
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(format!("F{}", i + 1), id);
    }
    let resources = doc.add_object(dictionary! { "Font" => fonts });

    let mut kids: Vec<Object> = Vec::new();
    for lines in pages {
        let mut operations = Vec::new();
        if let Some(m) = cm {
            operations.push(Operation::new("q", vec![]));
            operations.push(Operation::new("cm", m.iter().map(|&v| v.into()).collect()));
        }
        for line in lines {
            let idx = font_names.iter().position(|f| *f == line.font).unwrap();
            if let Some([r, g, b]) = line.color {
                operations.push(Operation::new("rg", vec![r.into(), g.into(), b.into()]));
            }
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new(
                "Tf",
                vec![Object::Name(format!("F{}", idx + 1).into_bytes()), line.size.into()],
            ));
            operations.push(Operation::new(
                "Tm",
                vec![1.into(), 0.into(), 0.into(), 1.into(), line.x.into(), line.y.into()],
            ));
            operations.push(Operation::new(
                "Tj",
                vec![Object::string_literal(line.text.into_bytes())],
            ));
            operations.push(Operation::new("ET", vec![]));
        }
        if cm.is_some() {
            operations.push(Operation::new("Q", vec![]));
        }
        let data = Content { operations }.encode().unwrap();
        let content_id = doc.add_object(Stream::new(dictionary! {}, data));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
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
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out).unwrap();
    out
}

/// A single-page PDF with one line per `(font, size, text)` entry,
/// stacked from the top of the page.
pub fn simple_pdf(lines: &[(&'static str, f32, &str)]) -> Vec<u8> {
    let page = lines
        .iter()
        .enumerate()
        .map(|(i, &(font, size, text))| Line::new(font, size, 72.0, 720.0 - 20.0 * i as f32, text))
        .collect();
    build_pdf(vec![page])
}
