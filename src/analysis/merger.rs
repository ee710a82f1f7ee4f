//! Cross-document profile aggregation.

use super::{mean, round_to, truncate_chars, FrequencyTable};
use crate::error::{Error, Result};
use crate::model::{
    ColorSample, Emphasis, Margins, MergedStyleProfile, Punctuation, SizeStats, StyleProfile,
};

/// Combines per-document profiles into one aggregate profile.
///
/// Fonts and colors are ranked by how many documents use them, so a value
/// that shows up consistently beats one that dominates a single document.
#[derive(Debug, Clone)]
pub struct ProfileMerger {
    max_fonts: usize,
    max_colors: usize,
    sample_text_max_chars: usize,
    default_font: String,
}

impl ProfileMerger {
    /// Create a merger with default caps.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the merged sample text cap.
    pub fn with_sample_limit(mut self, chars: usize) -> Self {
        self.sample_text_max_chars = chars;
        self
    }

    /// Set the number of colors kept in the merged palette.
    pub fn with_max_colors(mut self, max: usize) -> Self {
        self.max_colors = max;
        self
    }

    /// Merge profiles in input order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyInput`] when `profiles` is empty.
    pub fn merge(&self, profiles: &[StyleProfile]) -> Result<MergedStyleProfile> {
        if profiles.is_empty() {
            return Err(Error::EmptyInput);
        }

        let mut font_docs = FrequencyTable::new();
        let mut color_docs = FrequencyTable::new();
        for profile in profiles {
            for font in &profile.fonts {
                font_docs.add(font, 1);
            }
            for color in &profile.colors {
                color_docs.add(color, 1);
            }
        }

        let ranked_fonts: Vec<String> = font_docs.ranked().into_iter().map(|(f, _)| f).collect();
        let primary_font = ranked_fonts
            .first()
            .cloned()
            .unwrap_or_else(|| self.default_font.clone());
        let secondary_font = ranked_fonts
            .get(1)
            .cloned()
            .unwrap_or_else(|| primary_font.clone());

        let colors_detailed: Vec<ColorSample> = color_docs
            .ranked()
            .into_iter()
            .take(self.max_colors)
            .map(|(hex, docs)| ColorSample::new(hex, docs))
            .collect();

        let avg = |field: fn(&StyleProfile) -> f64| -> f64 {
            mean(&profiles.iter().map(field).collect::<Vec<_>>())
        };

        let sample_text = profiles
            .iter()
            .map(|p| p.sample_text.as_str())
            .filter(|t| !t.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n\n");

        let merged = StyleProfile {
            page_count: profiles.iter().map(|p| p.page_count).sum(),
            fonts: ranked_fonts.iter().take(self.max_fonts).cloned().collect(),
            primary_font,
            secondary_font,
            sizes: SizeStats {
                body: round_to(avg(|p| p.sizes.body), 1),
                heading: round_to(avg(|p| p.sizes.heading), 1),
                avg: round_to(avg(|p| p.sizes.avg), 1),
            },
            colors: colors_detailed.iter().map(|c| c.hex.clone()).collect(),
            colors_detailed,
            emphasis: Emphasis {
                bold_ratio: round_to(avg(|p| p.emphasis.bold_ratio), 2),
            },
            punctuation: Punctuation {
                commas: avg(|p| p.punctuation.commas as f64).round() as u64,
                periods: avg(|p| p.punctuation.periods as f64).round() as u64,
                colons: avg(|p| p.punctuation.colons as f64).round() as u64,
                semicolons: avg(|p| p.punctuation.semicolons as f64).round() as u64,
                bullets: avg(|p| p.punctuation.bullets as f64).round() as u64,
            },
            margins: Margins {
                left: avg(|p| p.margins.left).round(),
                top: avg(|p| p.margins.top).round(),
                right: avg(|p| p.margins.right).round(),
                bottom: avg(|p| p.margins.bottom).round(),
            },
            sample_text: truncate_chars(&sample_text, self.sample_text_max_chars),
        };

        log::debug!(
            "Merged {} profiles: primary font {}, {} colors",
            profiles.len(),
            merged.primary_font,
            merged.colors.len()
        );

        Ok(MergedStyleProfile {
            doc_count: profiles.len(),
            profile: merged,
        })
    }
}

impl Default for ProfileMerger {
    fn default() -> Self {
        Self {
            max_fonts: 6,
            max_colors: 6,
            sample_text_max_chars: 12000,
            default_font: "Helvetica".to_string(),
        }
    }
}

/// Merge profiles with the default [`ProfileMerger`].
pub fn merge_profiles(profiles: &[StyleProfile]) -> Result<MergedStyleProfile> {
    ProfileMerger::new().merge(profiles)
}
