//! Rendering options and configuration.

/// A4 width in points.
pub const A4_WIDTH: f32 = 595.28;

/// A4 height in points.
pub const A4_HEIGHT: f32 = 841.89;

/// Options for rendering estimate content.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Ink, accent and muted colors used when the profile has no palette
    pub fallback_palette: Vec<String>,

    /// Heading size when the profile reports none
    pub default_heading_size: f64,

    /// Body size when the profile reports none
    pub default_body_size: f64,

    /// Logo image as a `data:` URI (HTML only)
    pub logo_data_uri: Option<String>,

    /// Page width in points (PDF only)
    pub page_width: f32,

    /// Page height in points (PDF only)
    pub page_height: f32,

    /// Page margin in points (PDF only)
    pub margin: f32,

    /// Character to use for unordered list markers (Markdown only)
    pub list_marker: char,

    /// Escape special Markdown characters
    pub escape_special_chars: bool,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fallback palette.
    pub fn with_fallback_palette<I, S>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fallback_palette = colors.into_iter().map(Into::into).collect();
        self
    }

    /// Embed a logo, given as a `data:` URI.
    pub fn with_logo(mut self, data_uri: impl Into<String>) -> Self {
        self.logo_data_uri = Some(data_uri.into());
        self
    }

    /// Set the page size in points.
    pub fn with_page_size(mut self, width: f32, height: f32) -> Self {
        self.page_width = width;
        self.page_height = height;
        self
    }

    /// Set the page margin in points.
    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin;
        self
    }

    /// Set the list marker character.
    pub fn with_list_marker(mut self, marker: char) -> Self {
        self.list_marker = marker;
        self
    }

    /// Enable or disable Markdown escaping.
    pub fn with_escaping(mut self, escape: bool) -> Self {
        self.escape_special_chars = escape;
        self
    }

    /// Ink, accent and muted colors for a profile palette.
    ///
    /// Missing entries fall back to the previous color, so a one-color
    /// palette yields the same color three times.
    pub fn palette<'a>(&'a self, colors: &'a [String]) -> [&'a str; 3] {
        let colors = if colors.is_empty() {
            &self.fallback_palette[..]
        } else {
            colors
        };
        let ink = colors.first().map_or("#000000", String::as_str);
        let accent = colors.get(1).map_or(ink, String::as_str);
        let muted = colors.get(2).map_or(accent, String::as_str);
        [ink, accent, muted]
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            fallback_palette: vec![
                "#0f172a".to_string(),
                "#334155".to_string(),
                "#64748b".to_string(),
            ],
            default_heading_size: 20.0,
            default_body_size: 12.0,
            logo_data_uri: None,
            page_width: A4_WIDTH,
            page_height: A4_HEIGHT,
            margin: 44.0,
            list_marker: '-',
            escape_special_chars: true,
        }
    }
}
