//! Generative backend seam and reply sanitization.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::fallback::FallbackParser;
use crate::analysis::truncate_chars;
use crate::error::Result;
use crate::model::{ParsedContent, Punctuation, Section, SizeStats, StyleProfile};

/// Reference text sent to the backend is cut to this many characters.
pub const REFERENCE_TEXT_MAX_CHARS: usize = 8000;

const DEFAULT_TITLE: &str = "Project Estimate";
const DEFAULT_HEADING: &str = "Section";

/// The style facts a backend needs to match the house tone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleHint {
    pub primary_font: String,
    pub secondary_font: String,
    pub sizes: SizeStats,
    pub punctuation: Punctuation,
    pub bold_ratio: f64,
    pub colors: Vec<String>,
}

impl StyleHint {
    /// Pick the hint fields out of a profile (first three colors only).
    pub fn from_profile(profile: &StyleProfile) -> Self {
        Self {
            primary_font: profile.primary_font.clone(),
            secondary_font: profile.secondary_font.clone(),
            sizes: profile.sizes,
            punctuation: profile.punctuation,
            bold_ratio: profile.emphasis.bold_ratio,
            colors: profile.colors.iter().take(3).cloned().collect(),
        }
    }
}

/// Everything a backend receives for one generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRequest {
    /// The client's free-text request
    pub prompt: String,
    /// Style summary of the reference documents
    pub style: StyleHint,
    /// Sample text from the reference documents
    pub reference_text: String,
}

impl ContentRequest {
    pub fn new(prompt: impl Into<String>, profile: &StyleProfile) -> Self {
        Self {
            prompt: prompt.into(),
            style: StyleHint::from_profile(profile),
            reference_text: truncate_chars(&profile.sample_text, REFERENCE_TEXT_MAX_CHARS),
        }
    }
}

/// A generative service that drafts estimate content.
///
/// Implementations return the raw reply text; validation happens in
/// [`parse_backend_reply`].
pub trait ContentBackend {
    /// Produce a raw reply for `request`.
    fn generate(&self, request: &ContentRequest) -> Result<String>;
}

/// Validates and cleans backend replies.
#[derive(Debug, Clone)]
pub struct ReplySanitizer {
    fence: Regex,
}

impl ReplySanitizer {
    pub fn new() -> Self {
        Self {
            fence: Regex::new(r"```(?:json)?\s*(\{[\s\S]*\})\s*```").unwrap(),
        }
    }

    /// Parse a reply into content, or `None` if nothing usable remains.
    ///
    /// Accepts bare JSON or JSON inside a fenced block. Sections without a
    /// heading or bullets are dropped; bullets are trimmed and blanks removed.
    pub fn sanitize(&self, raw: &str) -> Option<ParsedContent> {
        let json_text = self
            .fence
            .captures(raw)
            .and_then(|caps| caps.get(1))
            .map_or(raw, |m| m.as_str());

        let value: Value = match serde_json::from_str(json_text) {
            Ok(v) => v,
            Err(e) => {
                log::warn!("Failed to parse backend reply as JSON: {}", e);
                return None;
            }
        };

        let sections: Vec<Section> = value
            .get("sections")?
            .as_array()?
            .iter()
            .filter_map(sanitize_section)
            .collect();
        if sections.is_empty() {
            return None;
        }

        let title = text_field(&value, "title")
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());
        let intro = text_field(&value, "intro").unwrap_or_default();

        Some(ParsedContent {
            title,
            intro,
            sections,
        })
    }
}

impl Default for ReplySanitizer {
    fn default() -> Self {
        Self::new()
    }
}

fn text_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Null => None,
        other => Some(other.to_string().trim().to_string()),
    }
}

fn sanitize_section(value: &Value) -> Option<Section> {
    let raw_heading = value.get("heading").filter(|h| match h {
        Value::String(s) => !s.is_empty(),
        Value::Null | Value::Bool(false) => false,
        _ => true,
    })?;
    let bullets: Vec<String> = value
        .get("bullets")?
        .as_array()?
        .iter()
        .filter_map(|b| match b {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Null => None,
            other => Some(other.to_string()),
        })
        .filter(|b| !b.is_empty())
        .collect();

    if bullets.is_empty() {
        return None;
    }

    let heading = match raw_heading {
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    };
    Some(Section {
        heading: if heading.is_empty() {
            DEFAULT_HEADING.to_string()
        } else {
            heading
        },
        bullets,
    })
}

/// Sanitize a raw backend reply with a default [`ReplySanitizer`].
pub fn parse_backend_reply(raw: &str) -> Option<ParsedContent> {
    ReplySanitizer::new().sanitize(raw)
}

/// Draft content for `prompt`, preferring the backend when one is given.
///
/// Backend errors and unusable replies fall through to the line-pattern
/// parser, so this always returns valid content.
pub fn compose_content(
    prompt: &str,
    profile: &StyleProfile,
    backend: Option<&dyn ContentBackend>,
) -> ParsedContent {
    if let Some(backend) = backend {
        let request = ContentRequest::new(prompt, profile);
        match backend.generate(&request) {
            Ok(raw) => match parse_backend_reply(&raw) {
                Some(content) => return content,
                None => log::warn!("Backend reply had no usable sections, using fallback outline"),
            },
            Err(e) => log::warn!("Content backend failed, using fallback outline: {}", e),
        }
    }
    FallbackParser::new().parse(prompt)
}
