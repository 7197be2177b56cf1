//! Advance-width estimation.
//!
//! Real glyph advances win when a font is loaded and has the glyph;
//! otherwise a script-range table approximates the Wenquanyi cell widths.

use crate::config::FontMetrics;
use crate::font::FontCodec;

use super::utf8::{Decoded, LayoutUnits};

/// Maps codepoints to pen advances in pixels
#[derive(Debug, Clone, Copy)]
pub struct WidthEstimator<'a> {
    font: &'a FontCodec<'a>,
    metrics: FontMetrics,
}

impl<'a> WidthEstimator<'a> {
    pub fn new(font: &'a FontCodec<'a>, metrics: FontMetrics) -> Self {
        Self { font, metrics }
    }

    /// Fallback metrics in use
    pub fn metrics(&self) -> &FontMetrics {
        &self.metrics
    }

    /// Advance for a codepoint
    pub fn advance_for(&self, codepoint: u32) -> u16 {
        self.font
            .advance(codepoint)
            .unwrap_or_else(|| estimate(&self.metrics, codepoint))
    }

    /// Advance for a decoded unit; wide replacements always take a CJK cell
    pub fn advance_of(&self, unit: &Decoded) -> u16 {
        if unit.replacement && unit.wide {
            self.metrics.cjk_width
        } else {
            self.advance_for(unit.codepoint)
        }
    }

    /// Total advance of a byte run
    pub fn measure(&self, bytes: &[u8]) -> u32 {
        LayoutUnits::new(bytes)
            .map(|(_, unit)| u32::from(self.advance_of(&unit)))
            .sum()
    }
}

/// Script-range heuristic used when no glyph metrics are available
pub fn estimate(metrics: &FontMetrics, codepoint: u32) -> u16 {
    let cjk = metrics.cjk_width;
    let ascii = metrics.ascii_width;

    match codepoint {
        0x00..=0x7F => ascii,
        // Emoji and everything outside the BMP
        0x10000.. => cjk.saturating_mul(2),
        // Hangul Jamo, CJK radicals through Yi, Hangul syllables
        0x1100..=0x11FF | 0x2E80..=0xA4CF | 0xAC00..=0xD7AF => cjk,
        // Latin-1 supplement through Cyrillic, Latin Extended Additional and Greek Extended
        0x00A0..=0x04FF | 0x1E00..=0x1FFF => ascii + cjk.saturating_sub(ascii) / 2,
        _ => cjk,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::testutil::build_font;
    use crate::font::Endian;

    fn metrics() -> FontMetrics {
        FontMetrics::from_cjk(16, 18)
    }

    #[test]
    fn test_heuristic_ranges() {
        let m = metrics();
        assert_eq!(estimate(&m, u32::from(b'a')), 8);
        assert_eq!(estimate(&m, 0x4E2D), 16);
        assert_eq!(estimate(&m, 0xAC00), 16);
        assert_eq!(estimate(&m, 0x1F600), 32);
        assert_eq!(estimate(&m, 0x10400), 32);
        assert_eq!(estimate(&m, 0xE9), 12);
        assert_eq!(estimate(&m, 0x0416), 12);
        assert_eq!(estimate(&m, 0x2603), 16);
    }

    #[test]
    fn test_glyph_advance_preferred() {
        let data = build_font(&[(u32::from(b'a'), 5, 1, 6, 0)], 1, Endian::Little);
        let font = FontCodec::load(&data).unwrap();
        let widths = WidthEstimator::new(&font, metrics());

        assert_eq!(widths.advance_for(u32::from(b'a')), 6);
        // Missing glyph falls back to the table
        assert_eq!(widths.advance_for(u32::from(b'b')), 8);
    }

    #[test]
    fn test_wide_replacement_uses_cjk_width() {
        let font = FontCodec::unloaded();
        let widths = WidthEstimator::new(&font, metrics());
        assert_eq!(widths.measure(&[0x80, b'A']), 16 + 8);
    }

    #[test]
    fn test_measure_mixed() {
        let font = FontCodec::unloaded();
        let widths = WidthEstimator::new(&font, metrics());
        assert_eq!(widths.measure("ab中".as_bytes()), 8 + 8 + 16);
    }
}
