//! Raw statistics accumulated over the runs of one document.

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use super::{ExtractOptions, FrequencyTable};
use crate::model::{PageRuns, Punctuation, TextRun};

/// Font name cleanup and weight classification.
#[derive(Debug, Clone)]
pub struct FontClassifier {
    subset_prefix: Regex,
    bold: Regex,
}

impl FontClassifier {
    /// Compile the font name patterns.
    pub fn new() -> Self {
        Self {
            subset_prefix: Regex::new(r"^\w+\+").unwrap(),
            bold: Regex::new(r"(?i)bold|semi ?bold|black|heavy|extra ?bold").unwrap(),
        }
    }

    /// Strip the subset tag (`ABCDEF+`), turn `-`/`_` into spaces and trim.
    pub fn normalize(&self, font_name: &str) -> String {
        let name = if font_name.trim().is_empty() {
            "Unknown"
        } else {
            font_name
        };
        self.subset_prefix
            .replace(name, "")
            .replace(['-', '_'], " ")
            .trim()
            .to_string()
    }

    /// Check if a (normalized) font name denotes a bold-like weight.
    pub fn is_bold(&self, font_name: &str) -> bool {
        self.bold.is_match(font_name)
    }
}

impl Default for FontClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Collapse whitespace runs, trim, and compose to NFC.
pub(crate) fn normalize_text(text: &str) -> String {
    let composed: String = text.nfc().collect();
    composed.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Everything [`RunCollector`] learned about a document.
#[derive(Debug, Clone, Default)]
pub struct RunStatistics {
    /// Pages seen (including pages without runs)
    pub pages: u32,
    /// Runs seen before normalization
    pub runs: usize,
    /// Characters of normalized text
    pub text_chars: usize,
    /// Font names ranked by character count
    pub fonts: Vec<(String, u64)>,
    /// Retained font size samples, in observation order
    pub sizes: Vec<f32>,
    /// Punctuation counters
    pub punctuation: Punctuation,
    /// Characters set in bold-like faces
    pub bold_chars: u64,
    /// Characters set in other faces
    pub regular_chars: u64,
    /// Left edges of positioned runs
    pub xs: Vec<f32>,
    /// Top-origin y of positioned runs
    pub ys: Vec<f32>,
    /// Normalized text blocks kept for the sample, in document order
    pub sample_blocks: Vec<String>,
}

/// Accumulates per-run statistics for one document.
pub struct RunCollector<'a> {
    options: &'a ExtractOptions,
    fonts: &'a FontClassifier,
    font_chars: FrequencyTable,
    stats: RunStatistics,
}

impl<'a> RunCollector<'a> {
    /// Create a collector bound to extraction options and a font classifier.
    pub fn new(options: &'a ExtractOptions, fonts: &'a FontClassifier) -> Self {
        Self {
            options,
            fonts,
            font_chars: FrequencyTable::new(),
            stats: RunStatistics::default(),
        }
    }

    /// Feed every run of a page.
    pub fn add_page(&mut self, page: &PageRuns) {
        self.stats.pages += 1;
        for run in &page.runs {
            self.add_run(run, page.height);
        }
    }

    /// Feed a single run from a page of the given height.
    pub fn add_run(&mut self, run: &TextRun, page_height: f32) {
        self.stats.runs += 1;

        let text = normalize_text(&run.text);
        if text.is_empty() {
            return;
        }
        let chars = text.chars().count();
        self.stats.text_chars += chars;

        let font = self.fonts.normalize(&run.font_name);
        self.font_chars.add(&font, chars as u64);
        if self.fonts.is_bold(&font) {
            self.stats.bold_chars += chars as u64;
        } else {
            self.stats.regular_chars += chars as u64;
        }

        let size = run.size_hint();
        if size > 0.0 && size < self.options.max_font_size {
            self.stats.sizes.push(size);
        }

        let (x, y) = (run.x(), run.y());
        if x >= 0.0 && y >= 0.0 {
            self.stats.xs.push(x);
            self.stats.ys.push(page_height - y);
        }

        self.stats.punctuation.tally(&text);

        let kept = self.stats.sample_blocks.len();
        if kept < self.options.sample_blocks_always
            || (chars > self.options.sample_block_min_chars
                && kept < self.options.sample_blocks_max)
        {
            self.stats.sample_blocks.push(text);
        }
    }

    /// Consume the collector and return its statistics.
    pub fn finish(mut self) -> RunStatistics {
        self.stats.fonts = self.font_chars.ranked();
        log::debug!(
            "Collected {} runs over {} pages: {} chars, {} fonts, {} size samples",
            self.stats.runs,
            self.stats.pages,
            self.stats.text_chars,
            self.stats.fonts.len(),
            self.stats.sizes.len()
        );
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(pages: &[PageRuns]) -> RunStatistics {
        let options = ExtractOptions::default();
        let fonts = FontClassifier::new();
        let mut collector = RunCollector::new(&options, &fonts);
        for page in pages {
            collector.add_page(page);
        }
        collector.finish()
    }

    #[test]
    fn test_font_name_normalization() {
        let fonts = FontClassifier::new();
        assert_eq!(fonts.normalize("ABCDEF+Helvetica-Bold"), "Helvetica Bold");
        assert_eq!(fonts.normalize("Open_Sans-Regular"), "Open Sans Regular");
        assert_eq!(fonts.normalize(""), "Unknown");
    }

    #[test]
    fn test_bold_classification() {
        let fonts = FontClassifier::new();
        assert!(fonts.is_bold("Helvetica Bold"));
        assert!(fonts.is_bold("Inter SemiBold"));
        assert!(fonts.is_bold("Arial Black"));
        assert!(fonts.is_bold("Roboto Heavy"));
        assert!(!fonts.is_bold("Georgia Italic"));
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  Hello \n\t world  "), "Hello world");
        assert_eq!(normalize_text(" \u{00A0} "), "");
        assert_eq!(normalize_text("e\u{0301}"), "é");
    }

    #[test]
    fn test_fonts_weighted_by_characters() {
        let page = PageRuns::letter()
            .with_run(TextRun::new(
                "A very long caption in body text",
                "Times",
                10.0,
                72.0,
                700.0,
            ))
            .with_run(TextRun::new("Big", "Impact", 40.0, 72.0, 760.0));
        let stats = collect(&[page]);
        assert_eq!(stats.fonts[0].0, "Times");
        assert_eq!(stats.fonts[1], ("Impact".to_string(), 3));
    }

    #[test]
    fn test_noise_sizes_and_negative_positions_skipped() {
        let page = PageRuns::new(800.0)
            .with_run(TextRun::new("huge", "Arial", 250.0, 10.0, 10.0))
            .with_run(TextRun::new("offpage", "Arial", 12.0, -5.0, 100.0))
            .with_run(TextRun::new("   ", "Arial", 12.0, 50.0, 50.0));
        let stats = collect(&[page]);
        assert_eq!(stats.sizes, vec![12.0]);
        assert_eq!(stats.xs, vec![10.0]);
        assert_eq!(stats.ys, vec![790.0]);
        assert_eq!(stats.runs, 3);
        assert_eq!(stats.text_chars, 11);
    }

    #[test]
    fn test_sample_blocks_limits() {
        let mut page = PageRuns::letter();
        for i in 0..80 {
            page.push(TextRun::new(format!("short {}", i), "Arial", 10.0, 0.0, 0.0));
        }
        for i in 0..80 {
            page.push(TextRun::new(
                format!("a considerably longer block number {}", i),
                "Arial",
                10.0,
                0.0,
                0.0,
            ));
        }
        let stats = collect(&[page]);
        assert_eq!(stats.sample_blocks.len(), 100);
        assert_eq!(stats.sample_blocks[59], "short 59");
        assert_eq!(stats.sample_blocks[60], "a considerably longer block number 0");
    }

    #[test]
    fn test_bold_split() {
        let page = PageRuns::letter()
            .with_run(TextRun::new("Bold", "Helvetica-Bold", 12.0, 0.0, 0.0))
            .with_run(TextRun::new("Regular", "Helvetica", 12.0, 0.0, 0.0));
        let stats = collect(&[page]);
        assert_eq!(stats.bold_chars, 4);
        assert_eq!(stats.regular_chars, 7);
        assert_eq!(stats.pages, 1);
    }
}
