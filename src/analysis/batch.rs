//! Multi-document analysis: validate, extract and merge.

use std::path::Path;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::{ProfileMerger, StyleProfileExtractor};
use crate::detect::validate_document;
use crate::error::{Error, Result};
use crate::model::{MergedStyleProfile, StyleProfile};
use crate::parser::{AnalyzeOptions, LopdfBackend, RunTokenizer};

/// One document submitted for analysis.
#[derive(Debug, Clone)]
pub struct DocumentInput {
    /// Display name used in summaries and failures (usually the file name)
    pub identifier: String,
    /// Raw file content
    pub bytes: Vec<u8>,
}

impl DocumentInput {
    /// Create an input from in-memory bytes.
    pub fn new(identifier: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            identifier: identifier.into(),
            bytes,
        }
    }

    /// Read an input from disk, named after the file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let identifier = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { identifier, bytes })
    }
}

/// A document that could not be analyzed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentFailure {
    pub identifier: String,
    pub reason: String,
}

impl DocumentFailure {
    pub fn new(identifier: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            reason: reason.into(),
        }
    }
}

/// Per-document highlights reported next to the merged profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    pub identifier: String,
    pub pages: u32,
    pub primary_font: String,
    pub heading_size: f64,
    pub body_size: f64,
    pub colors: Vec<String>,
}

impl DocumentSummary {
    /// Summarize a document's profile.
    pub fn from_profile(identifier: impl Into<String>, profile: &StyleProfile) -> Self {
        Self {
            identifier: identifier.into(),
            pages: profile.page_count,
            primary_font: profile.primary_font.clone(),
            heading_size: profile.sizes.heading,
            body_size: profile.sizes.body,
            colors: profile.colors.clone(),
        }
    }
}

/// Outcome of [`analyze_batch`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    /// Merged profile over every document that succeeded
    pub profile: MergedStyleProfile,
    /// Summaries of the successful documents, in input order
    pub documents: Vec<DocumentSummary>,
    /// Documents that were rejected or failed, in input order
    pub failures: Vec<DocumentFailure>,
}

/// Analyze a single document's bytes.
///
/// Validates size and header, tokenizes every page, then extracts the
/// profile. Page failures follow `options.error_mode`.
pub fn analyze_document(data: &[u8], options: &AnalyzeOptions) -> Result<StyleProfile> {
    let format = validate_document(data, options.max_document_bytes)?;
    log::debug!("Analyzing {} ({} bytes)", format, data.len());

    let backend = LopdfBackend::load_bytes(data)?;
    let pages = RunTokenizer::new(&backend, options.error_mode).pages()?;
    StyleProfileExtractor::with_options(options.extract.clone()).extract(data, pages)
}

/// Analyze several documents and merge their profiles.
///
/// Documents are processed in parallel when `options.parallel` is set;
/// summaries and failures always come back in input order. A document that
/// fails is recorded and skipped, so the batch succeeds as long as one
/// document yields a profile.
///
/// # Errors
///
/// * [`Error::EmptyInput`] if `inputs` is empty
/// * [`Error::TooManyDocuments`] if the batch exceeds `options.max_documents`
/// * [`Error::NoDocumentsAnalyzed`] if every document failed
pub fn analyze_batch(inputs: &[DocumentInput], options: &AnalyzeOptions) -> Result<BatchReport> {
    if inputs.is_empty() {
        return Err(Error::EmptyInput);
    }
    if options.max_documents > 0 && inputs.len() > options.max_documents {
        return Err(Error::TooManyDocuments {
            given: inputs.len(),
            limit: options.max_documents,
        });
    }

    let analyze = |input: &DocumentInput| analyze_document(&input.bytes, options);
    let results: Vec<Result<StyleProfile>> = if options.parallel {
        inputs.par_iter().map(analyze).collect()
    } else {
        inputs.iter().map(analyze).collect()
    };

    let mut profiles = Vec::new();
    let mut documents = Vec::new();
    let mut failures = Vec::new();
    for (input, result) in inputs.iter().zip(results) {
        match result {
            Ok(profile) => {
                documents.push(DocumentSummary::from_profile(&input.identifier, &profile));
                profiles.push(profile);
            }
            Err(e) => {
                log::warn!("Skipping {}: {}", input.identifier, e);
                failures.push(DocumentFailure::new(&input.identifier, e.to_string()));
            }
        }
    }

    if profiles.is_empty() {
        return Err(Error::NoDocumentsAnalyzed(failures));
    }

    let profile = ProfileMerger::new().merge(&profiles)?;
    log::info!(
        "Analyzed {} of {} documents",
        documents.len(),
        inputs.len()
    );

    Ok(BatchReport {
        profile,
        documents,
        failures,
    })
}
