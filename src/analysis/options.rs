//! Extraction tuning knobs.

/// Constants used while turning runs into a [`StyleProfile`].
///
/// [`StyleProfile`]: crate::model::StyleProfile
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractOptions {
    /// Body size when no usable size was observed
    pub default_body_size: f64,

    /// Heading size when no usable size was observed
    pub default_heading_size: f64,

    /// Minimum heading/body ratio
    pub heading_ratio: f64,

    /// Sizes at or above this are treated as noise
    pub max_font_size: f32,

    /// Number of font names kept in the profile
    pub max_fonts: usize,

    /// Number of colors kept in the profile
    pub max_colors: usize,

    /// Blocks always kept for the sample text
    pub sample_blocks_always: usize,

    /// Hard cap on sample blocks
    pub sample_blocks_max: usize,

    /// Blocks past `sample_blocks_always` must be longer than this
    pub sample_block_min_chars: usize,

    /// Sample text character cap
    pub sample_text_max_chars: usize,

    /// Margin used for unmeasured sides
    pub default_margin: f64,

    /// Font reported when nothing was detected
    pub default_font: String,

    /// Palette reported when no color was found
    pub fallback_palette: Vec<String>,
}

impl ExtractOptions {
    /// Create extraction options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sample text cap.
    pub fn with_sample_limit(mut self, chars: usize) -> Self {
        self.sample_text_max_chars = chars;
        self
    }

    /// Set the font reported when nothing was detected.
    pub fn with_default_font(mut self, font: impl Into<String>) -> Self {
        self.default_font = font.into();
        self
    }

    /// Set the palette reported when no color was found.
    pub fn with_fallback_palette<I, S>(mut self, palette: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fallback_palette = palette.into_iter().map(Into::into).collect();
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            default_body_size: 11.0,
            default_heading_size: 16.0,
            heading_ratio: 1.35,
            max_font_size: 200.0,
            max_fonts: 6,
            max_colors: 8,
            sample_blocks_always: 60,
            sample_blocks_max: 100,
            sample_block_min_chars: 20,
            sample_text_max_chars: 5000,
            default_margin: 32.0,
            default_font: "Helvetica".to_string(),
            fallback_palette: vec![
                "#000000".to_string(),
                "#1f2937".to_string(),
                "#4b5563".to_string(),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ExtractOptions::default();
        assert_eq!(options.max_fonts, 6);
        assert_eq!(options.max_colors, 8);
        assert_eq!(options.sample_text_max_chars, 5000);
        assert_eq!(options.fallback_palette.len(), 3);
    }

    #[test]
    fn test_options_builder() {
        let options = ExtractOptions::new()
            .with_sample_limit(100)
            .with_default_font("Inter")
            .with_fallback_palette(["#ffffff"]);
        assert_eq!(options.sample_text_max_chars, 100);
        assert_eq!(options.default_font, "Inter");
        assert_eq!(options.fallback_palette, vec!["#ffffff"]);
    }
}
