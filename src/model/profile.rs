//! Style profile value types.

use serde::{Deserialize, Serialize};

/// A distinct color and how often it was seen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorSample {
    /// Lowercase `#rrggbb`
    pub hex: String,

    /// Occurrence count (≥ 1)
    pub hits: u64,
}

impl ColorSample {
    /// Create a new color sample.
    pub fn new(hex: impl Into<String>, hits: u64) -> Self {
        Self {
            hex: hex.into(),
            hits,
        }
    }

    /// Check that `hex` is a lowercase `#rrggbb` string.
    pub fn is_valid_hex(hex: &str) -> bool {
        let bytes = hex.as_bytes();
        bytes.len() == 7
            && bytes[0] == b'#'
            && bytes[1..]
                .iter()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(b))
    }
}

/// Inferred font sizes in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeStats {
    pub body: f64,
    pub heading: f64,
    pub avg: f64,
}

impl Default for SizeStats {
    fn default() -> Self {
        Self {
            body: 11.0,
            heading: 16.0,
            avg: 0.0,
        }
    }
}

/// Weight distribution of the sampled text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Emphasis {
    /// Share of characters set in a bold-like face, in `[0, 1]`
    pub bold_ratio: f64,
}

/// Punctuation habit counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Punctuation {
    pub commas: u64,
    pub periods: u64,
    pub colons: u64,
    pub semicolons: u64,
    pub bullets: u64,
}

impl Punctuation {
    /// Count punctuation marks in `text` and add them to the counters.
    pub fn tally(&mut self, text: &str) {
        for c in text.chars() {
            match c {
                ',' => self.commas += 1,
                '.' => self.periods += 1,
                ':' => self.colons += 1,
                ';' => self.semicolons += 1,
                '•' | '●' | '▪' | '◦' => self.bullets += 1,
                _ => {}
            }
        }
    }
}

/// Page margins in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Margins {
    /// Margins with the same value on every side.
    pub fn uniform(value: f64) -> Self {
        Self {
            left: value,
            top: value,
            right: value,
            bottom: value,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(32.0)
    }
}

/// Normalized summary of a document's typography, palette, spacing and
/// punctuation habits.
///
/// Profiles are plain values: built once by the extractor or the merger
/// and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleProfile {
    /// Number of pages seen
    pub page_count: u32,

    /// Most-used font families, best first
    pub fonts: Vec<String>,

    /// Dominant font family
    pub primary_font: String,

    /// Runner-up font family
    pub secondary_font: String,

    /// Body/heading/average sizes
    pub sizes: SizeStats,

    /// Palette, most frequent first
    pub colors: Vec<String>,

    /// Palette with hit counts
    pub colors_detailed: Vec<ColorSample>,

    /// Bold usage
    pub emphasis: Emphasis,

    /// Punctuation counters
    pub punctuation: Punctuation,

    /// Inferred margins
    pub margins: Margins,

    /// Representative text excerpt
    pub sample_text: String,
}

impl Default for StyleProfile {
    fn default() -> Self {
        Self {
            page_count: 0,
            fonts: Vec::new(),
            primary_font: "Helvetica".to_string(),
            secondary_font: "Helvetica".to_string(),
            sizes: SizeStats::default(),
            colors: Vec::new(),
            colors_detailed: Vec::new(),
            emphasis: Emphasis::default(),
            punctuation: Punctuation::default(),
            margins: Margins::default(),
            sample_text: String::new(),
        }
    }
}

/// A style profile aggregated over several documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedStyleProfile {
    /// Number of profiles merged (≥ 1)
    pub doc_count: usize,

    /// Aggregated profile
    #[serde(flatten)]
    pub profile: StyleProfile,
}

impl std::ops::Deref for MergedStyleProfile {
    type Target = StyleProfile;

    fn deref(&self) -> &StyleProfile {
        &self.profile
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_punctuation_tally() {
        let mut p = Punctuation::default();
        p.tally("Hello, world. Items: a; b • c ● d ▪ e ◦ f");
        assert_eq!(p.commas, 1);
        assert_eq!(p.periods, 1);
        assert_eq!(p.colons, 1);
        assert_eq!(p.semicolons, 1);
        assert_eq!(p.bullets, 4);
    }

    #[test]
    fn test_hex_validation() {
        assert!(ColorSample::is_valid_hex("#1f2937"));
        assert!(!ColorSample::is_valid_hex("#1F2937"));
        assert!(!ColorSample::is_valid_hex("1f2937"));
        assert!(!ColorSample::is_valid_hex("#1f293"));
    }

    #[test]
    fn test_profile_json_is_camel_case() {
        let json = serde_json::to_string(&StyleProfile::default()).unwrap();
        assert!(json.contains("\"pageCount\""));
        assert!(json.contains("\"primaryFont\""));
        assert!(json.contains("\"colorsDetailed\""));
        assert!(json.contains("\"boldRatio\""));
        assert!(json.contains("\"sampleText\""));
    }

    #[test]
    fn test_merged_profile_flattens() {
        let merged = MergedStyleProfile {
            doc_count: 2,
            profile: StyleProfile::default(),
        };
        let value = serde_json::to_value(&merged).unwrap();
        assert_eq!(value["docCount"], 2);
        assert_eq!(value["primaryFont"], "Helvetica");
        assert_eq!(merged.primary_font, "Helvetica");

        let back: MergedStyleProfile = serde_json::from_value(value).unwrap();
        assert_eq!(back, merged);
    }
}
