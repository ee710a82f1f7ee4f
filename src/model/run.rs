//! Page-level run types produced by the tokenizer.

use serde::{Deserialize, Serialize};

/// One positioned, styled span of text as emitted by the tokenizer.
///
/// The transform follows the PDF text-space convention: components 0..4
/// carry the scaled glyph matrix and components 4/5 the origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRun {
    /// Raw text content (not yet normalized)
    pub text: String,

    /// Font name as declared by the document (e.g., "ABCDEF+Helvetica-Bold")
    pub font_name: String,

    /// Glyph height in points (0 when the tokenizer could not determine it)
    pub height: f32,

    /// Advance width of the run in points (0 when unknown)
    pub width: f32,

    /// Text rendering matrix `[a, b, c, d, e, f]`
    pub transform: [f32; 6],
}

impl TextRun {
    /// Create a run at `(x, y)` with an upright matrix scaled to `size`.
    pub fn new(
        text: impl Into<String>,
        font_name: impl Into<String>,
        size: f32,
        x: f32,
        y: f32,
    ) -> Self {
        Self {
            text: text.into(),
            font_name: font_name.into(),
            height: size,
            width: 0.0,
            transform: [size, 0.0, 0.0, size, x, y],
        }
    }

    /// Set the advance width.
    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    /// Horizontal origin in points.
    pub fn x(&self) -> f32 {
        self.transform[4]
    }

    /// Vertical origin in points (PDF coordinates, bottom-up).
    pub fn y(&self) -> f32 {
        self.transform[5]
    }

    /// Best-effort font size for this run.
    ///
    /// Prefers the glyph height, then the horizontal scale of the matrix,
    /// then the run width. Returns 0 when none is available.
    pub fn size_hint(&self) -> f32 {
        if self.height > 0.0 {
            self.height.abs()
        } else if self.transform[0] != 0.0 {
            self.transform[0].abs()
        } else if self.width > 0.0 {
            self.width.abs()
        } else {
            0.0
        }
    }
}

/// The runs of a single page together with the page height.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRuns {
    /// Page height in points, used to flip y into a top-left origin
    pub height: f32,

    /// Runs in content-stream order
    pub runs: Vec<TextRun>,
}

impl PageRuns {
    /// Create an empty page of the given height.
    pub fn new(height: f32) -> Self {
        Self {
            height,
            runs: Vec::new(),
        }
    }

    /// Create an empty US Letter page.
    pub fn letter() -> Self {
        Self::new(792.0)
    }

    /// Create an empty A4 page.
    pub fn a4() -> Self {
        Self::new(842.0)
    }

    /// Append a run.
    pub fn push(&mut self, run: TextRun) {
        self.runs.push(run);
    }

    /// Builder-style variant of [`PageRuns::push`].
    pub fn with_run(mut self, run: TextRun) -> Self {
        self.runs.push(run);
        self
    }

    /// Check if the page produced no runs.
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_hint_prefers_height() {
        let run = TextRun::new("Hello", "Helvetica", 12.0, 72.0, 700.0);
        assert_eq!(run.size_hint(), 12.0);
        assert_eq!(run.x(), 72.0);
        assert_eq!(run.y(), 700.0);
    }

    #[test]
    fn test_size_hint_fallback_chain() {
        let mut run = TextRun::new("Hello", "Helvetica", 0.0, 0.0, 0.0);
        run.transform[0] = -9.5;
        assert_eq!(run.size_hint(), 9.5);

        run.transform[0] = 0.0;
        run.width = 30.0;
        assert_eq!(run.size_hint(), 30.0);

        run.width = 0.0;
        assert_eq!(run.size_hint(), 0.0);
    }

    #[test]
    fn test_page_runs_builder() {
        let page = PageRuns::a4().with_run(TextRun::new("A", "Times", 10.0, 0.0, 0.0));
        assert_eq!(page.height, 842.0);
        assert!(!page.is_empty());
        assert!(PageRuns::letter().is_empty());
    }
}
