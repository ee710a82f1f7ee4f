//! Error types for docstyle library.

use std::io;
use thiserror::Error;

use crate::analysis::DocumentFailure;

/// Result type alias for docstyle operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while analyzing documents or composing output.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// No page of the document produced a single text run.
    #[error("PDF appears to be empty or corrupted")]
    EmptyDocument,

    /// Every text run normalized to an empty string.
    #[error("No extractable text found in PDF")]
    NoExtractableText,

    /// A merge was requested over zero profiles.
    #[error("Cannot merge an empty set of style profiles")]
    EmptyInput,

    /// More documents were submitted than a batch accepts.
    #[error("Too many documents: {given} given, at most {limit} allowed")]
    TooManyDocuments { given: usize, limit: usize },

    /// A submitted document has no bytes at all.
    #[error("Document is empty (0 bytes)")]
    EmptyFile,

    /// A document exceeds the configured size limit.
    #[error("Document is {size} bytes, limit is {limit} bytes")]
    DocumentTooLarge { size: usize, limit: usize },

    /// Every document of a batch failed to analyze.
    #[error("Failed to analyze any documents ({} failed)", .0.len())]
    NoDocumentsAnalyzed(Vec<DocumentFailure>),

    /// Error during rendering (HTML, PDF, JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// The generative backend failed or returned an unusable reply.
    #[error("Content backend error: {0}")]
    Backend(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}
