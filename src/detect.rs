//! PDF format detection and upload validation.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// PDF format information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfFormat {
    /// PDF version (e.g., "1.7", "2.0")
    pub version: String,
    /// Whether the header area declares a linearization dictionary
    pub linearized: bool,
}

impl std::fmt::Display for PdfFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.linearized {
            write!(f, "PDF {} (linearized)", self.version)
        } else {
            write!(f, "PDF {}", self.version)
        }
    }
}

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// The linearization dictionary must be the first object in the file.
const LINEARIZED_WINDOW: usize = 1024;

/// Detect PDF format from a file path.
///
/// Only the first kilobyte of the file is read.
///
/// # Example
/// ```no_run
/// use docstyle::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("brochure.pdf").unwrap();
/// println!("{}", format);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<PdfFormat> {
    let mut header = Vec::with_capacity(LINEARIZED_WINDOW);
    File::open(path)?
        .take(LINEARIZED_WINDOW as u64)
        .read_to_end(&mut header)?;
    detect_format_from_bytes(&header)
}

/// Detect PDF format from the leading bytes of a document.
///
/// # Returns
/// * `Ok(PdfFormat)` if the data starts with a valid PDF header
/// * `Err(Error::UnknownFormat)` if the data is not a PDF
/// * `Err(Error::UnsupportedVersion)` if the version is malformed
pub fn detect_format_from_bytes(data: &[u8]) -> Result<PdfFormat> {
    let rest = data.strip_prefix(PDF_MAGIC).ok_or(Error::UnknownFormat)?;
    let version_bytes = rest.get(..VERSION_LEN).ok_or(Error::UnknownFormat)?;
    let version = String::from_utf8_lossy(version_bytes).to_string();

    if !is_valid_version(&version) {
        return Err(Error::UnsupportedVersion(version));
    }

    let window = &data[..data.len().min(LINEARIZED_WINDOW)];
    let linearized = window.windows(11).any(|w| w == b"/Linearized");

    Ok(PdfFormat {
        version,
        linearized,
    })
}

/// Check if a version string looks like `d.d`.
fn is_valid_version(version: &str) -> bool {
    matches!(version.as_bytes(), [major, b'.', minor] if major.is_ascii_digit() && minor.is_ascii_digit())
}

/// Check if bytes start with a valid PDF header.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    detect_format_from_bytes(data).is_ok()
}

/// Validate an uploaded document before analysis.
///
/// Rejects empty input, input over `max_bytes` (0 disables the limit),
/// and anything without a PDF header.
pub fn validate_document(data: &[u8], max_bytes: usize) -> Result<PdfFormat> {
    if data.is_empty() {
        return Err(Error::EmptyFile);
    }
    if max_bytes > 0 && data.len() > max_bytes {
        return Err(Error::DocumentTooLarge {
            size: data.len(),
            limit: max_bytes,
        });
    }
    detect_format_from_bytes(data)
}
