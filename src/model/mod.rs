//! Value types for style analysis.
//!
//! Runs flow in from the tokenizer, profiles flow out of the extractor and
//! merger, and parsed content flows from the composer to the renderers.
//! Every type here serializes to a flat camelCase JSON record.

mod content;
mod profile;
mod run;

pub use content::{ParsedContent, Section};
pub use profile::{
    ColorSample, Emphasis, Margins, MergedStyleProfile, Punctuation, SizeStats, StyleProfile,
};
pub use run::{PageRuns, TextRun};
