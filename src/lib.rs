//! # docstyle
//!
//! Document style profiling for PDF reference documents.
//!
//! This library reads PDFs, summarizes their typography, palette, margins
//! and punctuation habits into a [`StyleProfile`], merges profiles across
//! documents, and drafts new estimate documents that follow the merged
//! style.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docstyle::{analyze_file, compose, render};
//!
//! fn main() -> docstyle::Result<()> {
//!     // Profile a reference document
//!     let profile = analyze_file("brochure.pdf")?;
//!
//!     // Draft content and render it in the same style
//!     let content = compose::parse_fallback("Need a logo redesign\nBudget is flexible");
//!     let html = render::to_html(&content, &profile, &render::RenderOptions::default())?;
//!     println!("{}", html);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Style profiles**: fonts ranked by usage, body/heading sizes, palette, margins
//! - **Batch merging**: document-frequency ranking across up to ten files
//! - **Fallback outlines**: line-pattern parsing when no generative backend answers
//! - **Output**: HTML, PDF, Markdown and JSON renderers
//! - **Parallel processing**: Uses Rayon for multi-document batches

pub mod analysis;
pub mod compose;
pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use analysis::{
    analyze_batch, merge_profiles, BatchReport, DocumentFailure, DocumentInput, DocumentSummary,
    ExtractOptions, ProfileMerger, StyleProfileExtractor,
};
pub use compose::{compose_content, parse_backend_reply, parse_fallback, ContentBackend};
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_pdf_bytes, PdfFormat};
pub use error::{Error, Result};
pub use model::{
    ColorSample, Margins, MergedStyleProfile, PageRuns, ParsedContent, Section, SizeStats,
    StyleProfile, TextRun,
};
pub use parser::{AnalyzeOptions, ErrorMode};
pub use render::{JsonFormat, RenderOptions};

use std::path::Path;

/// Analyze a PDF file and return its style profile.
///
/// # Example
///
/// ```no_run
/// use docstyle::analyze_file;
///
/// let profile = analyze_file("brochure.pdf").unwrap();
/// println!("Primary font: {}", profile.primary_font);
/// ```
pub fn analyze_file<P: AsRef<Path>>(path: P) -> Result<StyleProfile> {
    analyze_file_with_options(path, &AnalyzeOptions::default())
}

/// Analyze a PDF file with custom options.
pub fn analyze_file_with_options<P: AsRef<Path>>(
    path: P,
    options: &AnalyzeOptions,
) -> Result<StyleProfile> {
    let data = std::fs::read(path)?;
    analysis::analyze_document(&data, options)
}

/// Analyze a PDF from bytes.
///
/// # Example
///
/// ```no_run
/// use docstyle::analyze_bytes;
///
/// let data = std::fs::read("brochure.pdf").unwrap();
/// let profile = analyze_bytes(&data).unwrap();
/// ```
pub fn analyze_bytes(data: &[u8]) -> Result<StyleProfile> {
    analysis::analyze_document(data, &AnalyzeOptions::default())
}

/// Analyze a PDF from bytes with custom options.
pub fn analyze_bytes_with_options(data: &[u8], options: &AnalyzeOptions) -> Result<StyleProfile> {
    analysis::analyze_document(data, options)
}

/// Builder for batch analysis and estimate drafting.
///
/// # Example
///
/// ```no_run
/// use docstyle::Docstyle;
///
/// let report = Docstyle::new()
///     .sequential()
///     .analyze_files(["a.pdf", "b.pdf"])?;
/// let content = Docstyle::new().compose("Need a logo redesign", &report.profile);
/// # Ok::<(), docstyle::Error>(())
/// ```
pub struct Docstyle<'b> {
    analyze_options: AnalyzeOptions,
    backend: Option<&'b dyn ContentBackend>,
}

impl<'b> Docstyle<'b> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            analyze_options: AnalyzeOptions::default(),
            backend: None,
        }
    }

    /// Fail documents on the first page error.
    pub fn strict(mut self) -> Self {
        self.analyze_options = self.analyze_options.with_error_mode(ErrorMode::Strict);
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.analyze_options = self.analyze_options.sequential();
        self
    }

    /// Replace the extraction options.
    pub fn with_extract_options(mut self, extract: ExtractOptions) -> Self {
        self.analyze_options = self.analyze_options.with_extract_options(extract);
        self
    }

    /// Use a generative backend when composing.
    pub fn with_backend(mut self, backend: &'b dyn ContentBackend) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Analyze and merge in-memory documents.
    pub fn analyze(&self, inputs: &[DocumentInput]) -> Result<BatchReport> {
        analyze_batch(inputs, &self.analyze_options)
    }

    /// Read, analyze and merge files.
    ///
    /// Unreadable files are reported as failures alongside documents that
    /// fail analysis.
    pub fn analyze_files<I, P>(&self, paths: I) -> Result<BatchReport>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut inputs = Vec::new();
        let mut unreadable = Vec::new();
        for path in paths {
            let path = path.as_ref();
            match DocumentInput::from_path(path) {
                Ok(input) => inputs.push(input),
                Err(e) => {
                    log::warn!("Cannot read {}: {}", path.display(), e);
                    unreadable.push(DocumentFailure::new(path.display().to_string(), e.to_string()));
                }
            }
        }

        if inputs.is_empty() && !unreadable.is_empty() {
            return Err(Error::NoDocumentsAnalyzed(unreadable));
        }

        match self.analyze(&inputs) {
            Ok(mut report) => {
                report.failures.extend(unreadable);
                Ok(report)
            }
            Err(Error::NoDocumentsAnalyzed(mut failures)) => {
                failures.extend(unreadable);
                Err(Error::NoDocumentsAnalyzed(failures))
            }
            Err(e) => Err(e),
        }
    }

    /// Draft estimate content for a request in the style of `profile`.
    pub fn compose(&self, prompt: &str, profile: &StyleProfile) -> ParsedContent {
        compose_content(prompt, profile, self.backend)
    }

    /// Get the analysis options.
    pub fn analyze_options(&self) -> &AnalyzeOptions {
        &self.analyze_options
    }
}

impl Default for Docstyle<'_> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let builder = Docstyle::new().strict().sequential();
        assert_eq!(builder.analyze_options().error_mode, ErrorMode::Strict);
        assert!(!builder.analyze_options().parallel);
    }

    #[test]
    fn test_analyze_bytes_rejects_non_pdf() {
        assert!(matches!(analyze_bytes(b""), Err(Error::EmptyFile)));
        assert!(matches!(analyze_bytes(b"%PDF"), Err(Error::UnknownFormat)));
        assert!(matches!(
            analyze_bytes(b"<!DOCTYPE html><html></html>"),
            Err(Error::UnknownFormat)
        ));
    }

    #[test]
    fn test_analyze_bytes_broken_pdf() {
        let result = analyze_bytes(b"%PDF-1.4\nthis is not a pdf body");
        assert!(result.is_err());
    }

    #[test]
    fn test_analyze_files_missing() {
        let result = Docstyle::new().analyze_files(["/nonexistent/a.pdf"]);
        match result {
            Err(Error::NoDocumentsAnalyzed(failures)) => {
                assert_eq!(failures.len(), 1);
                assert!(failures[0].identifier.ends_with("a.pdf"));
            }
            other => panic!("unexpected: {:?}", other.map(|r| r.documents)),
        }
    }

    #[test]
    fn test_compose_without_backend() {
        let content = Docstyle::new().compose("## Plan\n- one", &StyleProfile::default());
        assert_eq!(content.sections.len(), 1);
    }
}
