//! Per-document style profile extraction.

use super::collector::{FontClassifier, RunCollector, RunStatistics};
use super::{mean, round_to, truncate_chars, ColorSampler, ExtractOptions};
use crate::error::{Error, Result};
use crate::model::{Emphasis, Margins, PageRuns, SizeStats, StyleProfile};

/// Turns one document's runs and raw bytes into a [`StyleProfile`].
#[derive(Debug, Clone)]
pub struct StyleProfileExtractor {
    options: ExtractOptions,
    fonts: FontClassifier,
    colors: ColorSampler,
}

impl StyleProfileExtractor {
    /// Create an extractor with default options.
    pub fn new() -> Self {
        Self::with_options(ExtractOptions::default())
    }

    /// Create an extractor with custom options.
    pub fn with_options(options: ExtractOptions) -> Self {
        let colors = ColorSampler::new(options.max_colors);
        Self {
            options,
            fonts: FontClassifier::new(),
            colors,
        }
    }

    /// Get the extraction options.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Build a profile from the document bytes and its pages of runs.
    ///
    /// Pages are consumed lazily, one at a time.
    ///
    /// # Errors
    ///
    /// * [`Error::EmptyDocument`] if no page yields a run
    /// * [`Error::NoExtractableText`] if every run normalizes to empty text
    pub fn extract<I>(&self, raw: &[u8], pages: I) -> Result<StyleProfile>
    where
        I: IntoIterator<Item = PageRuns>,
    {
        let mut collector = RunCollector::new(&self.options, &self.fonts);
        for page in pages {
            collector.add_page(&page);
        }
        let stats = collector.finish();

        if stats.runs == 0 {
            return Err(Error::EmptyDocument);
        }
        if stats.text_chars == 0 {
            return Err(Error::NoExtractableText);
        }

        Ok(self.build_profile(raw, stats))
    }

    fn build_profile(&self, raw: &[u8], stats: RunStatistics) -> StyleProfile {
        let opts = &self.options;

        let primary_font = stats
            .fonts
            .first()
            .map(|(name, _)| name.clone())
            .unwrap_or_else(|| opts.default_font.clone());
        let secondary_font = stats
            .fonts
            .get(1)
            .map(|(name, _)| name.clone())
            .unwrap_or_else(|| primary_font.clone());
        let fonts = stats
            .fonts
            .iter()
            .take(opts.max_fonts)
            .map(|(name, _)| name.clone())
            .collect();

        let colors_detailed = self.colors.sample(raw);
        let colors = if colors_detailed.is_empty() {
            opts.fallback_palette.clone()
        } else {
            colors_detailed.iter().map(|c| c.hex.clone()).collect()
        };

        let weighted = stats.bold_chars + stats.regular_chars;
        let bold_ratio = stats.bold_chars as f64 / weighted.max(1) as f64;

        let sample_text = truncate_chars(
            &stats.sample_blocks.join(" "),
            opts.sample_text_max_chars,
        );

        StyleProfile {
            page_count: stats.pages,
            fonts,
            primary_font,
            secondary_font,
            sizes: self.infer_sizes(&stats.sizes),
            colors,
            colors_detailed,
            emphasis: Emphasis {
                bold_ratio: round_to(bold_ratio, 2),
            },
            punctuation: stats.punctuation,
            margins: self.infer_margins(&stats.xs, &stats.ys),
            sample_text,
        }
    }

    /// Percentile-based body/heading inference over a sorted copy of the
    /// samples.
    fn infer_sizes(&self, samples: &[f32]) -> SizeStats {
        let opts = &self.options;
        let values: Vec<f64> = samples.iter().map(|&s| s as f64).collect();

        let mut sorted = values.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let (body, heading) = if sorted.is_empty() {
            (opts.default_body_size, opts.default_heading_size)
        } else {
            let body = percentile(&sorted, 0.5);
            let heading = percentile(&sorted, 0.9).max(body * opts.heading_ratio);
            (body, heading)
        };

        SizeStats {
            body: round_to(body, 1),
            heading: round_to(heading, 1),
            avg: round_to(mean(&values), 1),
        }
    }

    /// Left/top from the smallest observed offsets; right/bottom are not
    /// measured.
    fn infer_margins(&self, xs: &[f32], ys: &[f32]) -> Margins {
        let fallback = self.options.default_margin;
        let min_or = |values: &[f32]| -> f64 {
            values
                .iter()
                .copied()
                .reduce(f32::min)
                .map(|v| round_to(v.max(0.0) as f64, 1))
                .unwrap_or(fallback)
        };

        Margins {
            left: min_or(xs),
            top: min_or(ys),
            right: fallback,
            bottom: fallback,
        }
    }
}

impl Default for StyleProfileExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Value at index `floor(len * q)` of an ascending, non-empty slice.
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let idx = ((sorted.len() as f64) * q).floor() as usize;
    sorted[idx.min(sorted.len() - 1)]
}
