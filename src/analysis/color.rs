//! Palette sampling over the raw document bytes.
//!
//! PDF color operators are plain ASCII inside content streams, so the
//! scanner works on bytes directly and never needs the file to be valid
//! UTF-8. Compressed streams simply yield no matches.

use regex::bytes::Regex;

use super::FrequencyTable;
use crate::model::ColorSample;

/// Ranks the colors found in a document's byte stream.
#[derive(Debug, Clone)]
pub struct ColorSampler {
    rgb_operator: Regex,
    hex_literal: Regex,
    max_colors: usize,
}

impl ColorSampler {
    /// Create a sampler keeping at most `max_colors` entries.
    pub fn new(max_colors: usize) -> Self {
        Self {
            rgb_operator: Regex::new(r"(?-u)(\d*\.?\d+)\s+(\d*\.?\d+)\s+(\d*\.?\d+)\s+(rg|RG)")
                .unwrap(),
            hex_literal: Regex::new(r"(?-u)#([0-9a-fA-F]{6})\b").unwrap(),
            max_colors,
        }
    }

    /// Scan `raw` for `r g b rg|RG` operators and `#rrggbb` literals.
    ///
    /// Returns at most `max_colors` samples, most hits first.
    pub fn sample(&self, raw: &[u8]) -> Vec<ColorSample> {
        let mut counts = FrequencyTable::new();

        for caps in self.rgb_operator.captures_iter(raw) {
            let components = [
                parse_unit(&caps[1]),
                parse_unit(&caps[2]),
                parse_unit(&caps[3]),
            ];
            if let [Some(r), Some(g), Some(b)] = components {
                counts.add(&rgb_to_hex(r, g, b), 1);
            }
        }

        for caps in self.hex_literal.captures_iter(raw) {
            let hex = String::from_utf8_lossy(&caps[1]).to_ascii_lowercase();
            counts.add(&format!("#{}", hex), 1);
        }

        log::debug!("Color sampler found {} distinct colors", counts.len());

        counts
            .ranked()
            .into_iter()
            .take(self.max_colors)
            .map(|(hex, hits)| ColorSample::new(hex, hits))
            .collect()
    }
}

impl Default for ColorSampler {
    fn default() -> Self {
        Self::new(8)
    }
}

/// Parse a color component, rejecting anything outside `[0, 1]`.
fn parse_unit(bytes: &[u8]) -> Option<f64> {
    let value: f64 = std::str::from_utf8(bytes).ok()?.parse().ok()?;
    (0.0..=1.0).contains(&value).then_some(value)
}

fn channel(value: f64) -> u8 {
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Encode unit-range RGB components as lowercase `#rrggbb`.
pub(crate) fn rgb_to_hex(r: f64, g: f64, b: f64) -> String {
    format!("#{:02x}{:02x}{:02x}", channel(r), channel(g), channel(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_operators() {
        let sampler = ColorSampler::default();
        let colors = sampler.sample(b"q 1 0 0 rg 0 0 1 RG 1 0 0 rg .5 .5 .5 rg Q");
        assert_eq!(colors[0], ColorSample::new("#ff0000", 2));
        assert!(colors.contains(&ColorSample::new("#0000ff", 1)));
        assert!(colors.contains(&ColorSample::new("#808080", 1)));
    }

    #[test]
    fn test_out_of_range_triples_discarded() {
        let sampler = ColorSampler::default();
        assert!(sampler.sample(b"2 0 0 rg 0 1.5 0 RG").is_empty());
    }

    #[test]
    fn test_hex_literals_lowercased() {
        let sampler = ColorSampler::default();
        let colors = sampler.sample(b"color: #1F2937; border: #1f2937 #abcdef12");
        assert_eq!(colors, vec![ColorSample::new("#1f2937", 2)]);
    }

    #[test]
    fn test_binary_noise_is_harmless() {
        let sampler = ColorSampler::default();
        let mut raw = vec![0xFF, 0xFE, 0x00, 0x9C];
        raw.extend_from_slice(b" 0 0 0 rg ");
        raw.extend_from_slice(&[0xC3, 0x28]);
        assert_eq!(sampler.sample(&raw), vec![ColorSample::new("#000000", 1)]);
    }

    #[test]
    fn test_cap_and_ordering() {
        let mut raw = String::new();
        for i in 0..10u32 {
            for _ in 0..=i {
                raw.push_str(&format!("#0000{:02x} ", i));
            }
        }
        let sampler = ColorSampler::default();
        let colors = sampler.sample(raw.as_bytes());
        assert_eq!(colors.len(), 8);
        assert_eq!(colors[0].hex, "#000009");
        assert!(colors.windows(2).all(|w| w[0].hits >= w[1].hits));
        assert!(colors.iter().all(|c| ColorSample::is_valid_hex(&c.hex)));
    }

    #[test]
    fn test_rgb_to_hex() {
        assert_eq!(rgb_to_hex(1.0, 1.0, 1.0), "#ffffff");
        assert_eq!(rgb_to_hex(0.0, 0.2, 0.4), "#003366");
    }
}
