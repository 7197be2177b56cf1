//! Drawing text with a loaded glyph font.

use inkchat_hal::{Color, RenderError, Renderer};

use super::FontCodec;
use crate::text::LayoutUnits;

/// Draw one glyph with its pen at (`x`, `baseline_y`)
///
/// Returns the pen advance. A codepoint the font lacks draws nothing and
/// advances 0.
pub fn draw_glyph<R: Renderer>(
    renderer: &mut R,
    font: &FontCodec<'_>,
    codepoint: u32,
    x: i16,
    baseline_y: i16,
    color: Color,
) -> Result<i16, RenderError> {
    let Some((entry, bitmap)) = font.glyph(codepoint) else {
        return Ok(0);
    };

    if entry.width > 0 && entry.height > 0 {
        let left = x.saturating_add(entry.x_offset);
        let height = i16::try_from(entry.height).unwrap_or(i16::MAX);
        let top = baseline_y.saturating_sub(entry.y_offset.saturating_add(height));
        renderer.draw_bitmap(bitmap, left, top, entry.width, entry.height, color)?;
    }

    Ok(i16::try_from(entry.advance).unwrap_or(i16::MAX))
}

/// Draw a byte run left to right, returning the final pen x
///
/// Line breaks are ignored; callers lay out lines beforehand.
pub fn draw_text<R: Renderer>(
    renderer: &mut R,
    font: &FontCodec<'_>,
    text: &[u8],
    x: i16,
    baseline_y: i16,
    color: Color,
) -> Result<i16, RenderError> {
    let mut pen = x;
    for (_, unit) in LayoutUnits::new(text) {
        if !unit.replacement && (unit.codepoint == 0x0A || unit.codepoint == 0x0D) {
            continue;
        }
        let advance = draw_glyph(renderer, font, unit.codepoint, pen, baseline_y, color)?;
        pen = pen.saturating_add(advance);
    }
    Ok(pen)
}
