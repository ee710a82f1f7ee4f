//! Analysis options and configuration.

use crate::analysis::ExtractOptions;

/// Largest number of documents accepted in one batch.
pub const DEFAULT_MAX_DOCUMENTS: usize = 10;

/// Largest accepted document, in bytes (20 MiB).
pub const DEFAULT_MAX_DOCUMENT_BYTES: usize = 20 * 1024 * 1024;

/// Options for analyzing PDF documents.
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    /// Error handling mode for per-page failures
    pub error_mode: ErrorMode,

    /// Whether to analyze batch documents in parallel
    pub parallel: bool,

    /// Batch size limit (0 = unlimited)
    pub max_documents: usize,

    /// Per-document size limit in bytes (0 = unlimited)
    pub max_document_bytes: usize,

    /// Profile extraction tuning
    pub extract: ExtractOptions,
}

impl AnalyzeOptions {
    /// Create new analyze options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (skip pages that fail to decode).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set the batch size limit.
    pub fn with_max_documents(mut self, max: usize) -> Self {
        self.max_documents = max;
        self
    }

    /// Set the per-document size limit.
    pub fn with_max_document_bytes(mut self, bytes: usize) -> Self {
        self.max_document_bytes = bytes;
        self
    }

    /// Replace the extraction options.
    pub fn with_extract_options(mut self, extract: ExtractOptions) -> Self {
        self.extract = extract;
        self
    }
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Lenient,
            parallel: true,
            max_documents: DEFAULT_MAX_DOCUMENTS,
            max_document_bytes: DEFAULT_MAX_DOCUMENT_BYTES,
            extract: ExtractOptions::default(),
        }
    }
}

/// Error handling mode during run extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail the document on any page error
    Strict,
    /// Skip pages that fail and continue
    #[default]
    Lenient,
}
