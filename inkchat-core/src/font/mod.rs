//! Glyph font codec
//!
//! A [`FontCodec`] is a validated, non-owning view over a binary glyph
//! container. Validation happens once, up front: either every entry is
//! sorted and every bitmap span fits, or the codec stays unloaded and serves
//! no glyphs at all.

pub mod draw;
pub mod format;

pub use draw::{draw_glyph, draw_text};
pub use format::{
    bitmap_len, Endian, FontHeader, GlyphEntry, LoadError, FONT_MAGIC, GLYPH_ENTRY_SIZE,
    HEADER_SIZE,
};

use format::table_end;

/// Tables of a successfully validated container
#[derive(Debug, Clone, Copy)]
struct Tables<'a> {
    header: FontHeader,
    endian: Endian,
    entries: &'a [u8],
    bitmaps: &'a [u8],
}

/// Validated view over a glyph container
///
/// The backing buffer is borrowed for the codec's lifetime; lookups return
/// copies of entry metadata and bitmap access hands out bounded sub-slices.
#[derive(Debug, Clone, Copy, Default)]
pub struct FontCodec<'a> {
    tables: Option<Tables<'a>>,
}

impl<'a> FontCodec<'a> {
    /// A codec that serves no glyphs
    pub const fn unloaded() -> Self {
        Self { tables: None }
    }

    /// Validate `data` and build a codec over it
    ///
    /// Byte order is inferred (see [`Endian::detect`]). Every glyph entry is
    /// checked: codepoints must be strictly ascending and every bitmap span
    /// must fit in the bitmap section.
    pub fn load(data: &'a [u8]) -> Result<Self, LoadError> {
        if data.len() < HEADER_SIZE {
            return Err(LoadError::TooShort);
        }
        if data[..4] != FONT_MAGIC {
            return Err(LoadError::BadMagic);
        }

        let endian = Endian::detect(data)?;
        let header = FontHeader::parse(data, endian)?;

        // detect() already guarantees the table fits
        let table_end = table_end(header.glyph_count) as usize;
        let entries = &data[HEADER_SIZE..table_end];
        let bitmaps = &data[table_end..];

        let mut prev: Option<u32> = None;
        for (index, raw) in entries.chunks_exact(GLYPH_ENTRY_SIZE).enumerate() {
            let entry = GlyphEntry::parse(raw, endian);
            let index = index as u32;

            if prev.is_some_and(|p| entry.codepoint <= p) {
                return Err(LoadError::UnsortedCodepoints { index });
            }
            prev = Some(entry.codepoint);

            if entry.bitmap_end() > bitmaps.len() as u64 {
                return Err(LoadError::BitmapOutOfBounds { index });
            }
        }

        Ok(Self {
            tables: Some(Tables {
                header,
                endian,
                entries,
                bitmaps,
            }),
        })
    }

    /// Whether a container was validated successfully
    pub fn is_loaded(&self) -> bool {
        self.tables.is_some()
    }

    /// Parsed header, if loaded
    pub fn header(&self) -> Option<&FontHeader> {
        self.tables.as_ref().map(|t| &t.header)
    }

    /// Inferred byte order, if loaded
    pub fn endian(&self) -> Option<Endian> {
        self.tables.as_ref().map(|t| t.endian)
    }

    /// Number of glyphs served (0 when unloaded)
    pub fn glyph_count(&self) -> u32 {
        self.tables.as_ref().map_or(0, |t| t.header.glyph_count)
    }

    /// Exact-match lookup, O(log n) over the ascending codepoint table
    pub fn find_glyph(&self, codepoint: u32) -> Option<GlyphEntry> {
        let tables = self.tables.as_ref()?;

        let mut lo = 0usize;
        let mut hi = tables.header.glyph_count as usize;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let raw = &tables.entries[mid * GLYPH_ENTRY_SIZE..(mid + 1) * GLYPH_ENTRY_SIZE];
            let mid_cp = tables.endian.u32_at(raw, 0);

            match mid_cp.cmp(&codepoint) {
                core::cmp::Ordering::Equal => return Some(GlyphEntry::parse(raw, tables.endian)),
                core::cmp::Ordering::Less => lo = mid + 1,
                core::cmp::Ordering::Greater => hi = mid,
            }
        }
        None
    }

    /// Bitmap bytes for `entry`
    ///
    /// The span is recomputed from the entry's dimensions and re-checked
    /// against the bitmap section, so a stale or foreign entry yields `None`
    /// rather than a wrong slice.
    pub fn glyph_bitmap(&self, entry: &GlyphEntry) -> Option<&'a [u8]> {
        let tables = self.tables.as_ref()?;
        let start = usize::try_from(entry.bitmap_offset).ok()?;
        let end = start.checked_add(entry.bitmap_len())?;
        tables.bitmaps.get(start..end)
    }

    /// Entry and bitmap for `codepoint`
    pub fn glyph(&self, codepoint: u32) -> Option<(GlyphEntry, &'a [u8])> {
        let entry = self.find_glyph(codepoint)?;
        let bitmap = self.glyph_bitmap(&entry)?;
        Some((entry, bitmap))
    }

    /// Pen advance for `codepoint`, if the font has it
    pub fn advance(&self, codepoint: u32) -> Option<u16> {
        self.find_glyph(codepoint).map(|g| g.advance)
    }
}

/// Builders for synthetic containers used across the crate's tests
#[cfg(test)]
pub(crate) mod testutil {
    use super::*;

    /// (codepoint, width, height, advance, bitmap_offset)
    pub type GlyphSpec = (u32, u16, u16, u16, u32);

    pub fn build_font(glyphs: &[GlyphSpec], bitmap_bytes: usize, endian: Endian) -> Vec<u8> {
        let u16b = |v: u16| match endian {
            Endian::Little => v.to_le_bytes(),
            Endian::Big => v.to_be_bytes(),
        };
        let u32b = |v: u32| match endian {
            Endian::Little => v.to_le_bytes(),
            Endian::Big => v.to_be_bytes(),
        };

        let mut out = Vec::new();
        out.extend_from_slice(&FONT_MAGIC);
        out.push(1);
        out.extend_from_slice(&u16b(14));
        out.extend_from_slice(&u16b(4));
        out.extend_from_slice(&u32b(glyphs.len() as u32));
        for v in [16u16, 18, 0, 0xFFFC] {
            out.extend_from_slice(&u16b(v));
        }
        assert_eq!(out.len(), HEADER_SIZE);

        for &(cp, w, h, adv, off) in glyphs {
            out.extend_from_slice(&u32b(cp));
            out.extend_from_slice(&u16b(w));
            out.extend_from_slice(&u16b(h));
            out.extend_from_slice(&u16b(0));
            out.extend_from_slice(&u16b(0xFFFE));
            out.extend_from_slice(&u16b(adv));
            out.extend_from_slice(&u32b(off));
        }

        out.extend((0..bitmap_bytes).map(|i| i as u8));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::testutil::build_font;
    use super::*;

    #[test]
    fn test_single_cjk_glyph() {
        let data = build_font(&[(0x4E2D, 16, 16, 16, 0)], 32, Endian::Little);
        let font = FontCodec::load(&data).unwrap();

        assert!(font.is_loaded());
        assert_eq!(font.glyph_count(), 1);
        assert_eq!(font.endian(), Some(Endian::Little));

        let entry = font.find_glyph(0x4E2D).unwrap();
        assert_eq!(entry.width, 16);
        assert_eq!(entry.height, 16);
        assert_eq!(entry.advance, 16);
        assert_eq!(entry.y_offset, -2);
        assert!(font.find_glyph(0x4E2E).is_none());

        let bitmap = font.glyph_bitmap(&entry).unwrap();
        assert_eq!(bitmap.len(), 32);
        assert_eq!(bitmap[31], 31);
    }

    #[test]
    fn test_big_endian_container() {
        let data = build_font(&[(0x41, 8, 12, 8, 0), (0x4E2D, 16, 16, 16, 12)], 44, Endian::Big);
        let font = FontCodec::load(&data).unwrap();

        assert_eq!(font.endian(), Some(Endian::Big));
        assert_eq!(font.header().unwrap().bbox_y, -4);
        assert_eq!(font.advance(0x41), Some(8));
        assert_eq!(font.advance(0x4E2D), Some(16));
    }

    #[test]
    fn test_duplicate_codepoint_rejected() {
        let data = build_font(&[(0x41, 8, 1, 8, 0), (0x41, 8, 1, 8, 1)], 2, Endian::Little);
        assert_eq!(
            FontCodec::load(&data).unwrap_err(),
            LoadError::UnsortedCodepoints { index: 1 }
        );
    }

    #[test]
    fn test_descending_codepoint_rejected() {
        let data = build_font(&[(0x42, 8, 1, 8, 0), (0x41, 8, 1, 8, 1)], 2, Endian::Little);
        assert!(matches!(
            FontCodec::load(&data),
            Err(LoadError::UnsortedCodepoints { .. })
        ));
    }

    #[test]
    fn test_last_bitmap_out_of_bounds_rejected() {
        // Second glyph needs bytes 32..64 but only 63 exist
        let data = build_font(
            &[(0x4E2D, 16, 16, 16, 0), (0x4E2E, 16, 16, 16, 32)],
            63,
            Endian::Little,
        );
        assert_eq!(
            FontCodec::load(&data).unwrap_err(),
            LoadError::BitmapOutOfBounds { index: 1 }
        );
    }

    #[test]
    fn test_bad_magic_and_short_input() {
        let mut data = build_font(&[(0x41, 8, 1, 8, 0)], 1, Endian::Little);
        assert_eq!(FontCodec::load(&data[..10]).unwrap_err(), LoadError::TooShort);
        data[0] = b'X';
        assert_eq!(FontCodec::load(&data).unwrap_err(), LoadError::BadMagic);
    }

    #[test]
    fn test_truncated_table_rejected() {
        let data = build_font(&[(0x41, 8, 1, 8, 0), (0x42, 8, 1, 8, 1)], 0, Endian::Little);
        // Cut into the second entry
        let cut = HEADER_SIZE + GLYPH_ENTRY_SIZE + 4;
        assert_eq!(
            FontCodec::load(&data[..cut]).unwrap_err(),
            LoadError::NoPlausibleEndianness
        );
    }

    #[test]
    fn test_unloaded_serves_nothing() {
        let font = FontCodec::unloaded();
        assert!(!font.is_loaded());
        assert_eq!(font.glyph_count(), 0);
        assert!(font.find_glyph(0x41).is_none());
        assert!(font.header().is_none());
    }

    #[test]
    fn test_foreign_entry_bitmap_rechecked() {
        let data = build_font(&[(0x41, 8, 4, 8, 0)], 4, Endian::Little);
        let font = FontCodec::load(&data).unwrap();

        let mut entry = font.find_glyph(0x41).unwrap();
        assert!(font.glyph_bitmap(&entry).is_some());

        entry.height = 5;
        assert!(font.glyph_bitmap(&entry).is_none());
        entry.height = 4;
        entry.bitmap_offset = u32::MAX;
        assert!(font.glyph_bitmap(&entry).is_none());
    }

    #[test]
    fn test_binary_search_many_glyphs() {
        let glyphs: Vec<_> = (0..200u32).map(|i| (0x20 + i * 3, 8, 1, 8, i)).collect();
        let data = build_font(&glyphs, 200, Endian::Little);
        let font = FontCodec::load(&data).unwrap();

        for i in 0..200u32 {
            let cp = 0x20 + i * 3;
            assert_eq!(font.find_glyph(cp).unwrap().bitmap_offset, i);
            assert!(font.find_glyph(cp + 1).is_none());
        }
        assert!(font.find_glyph(0x1F).is_none());
    }
}
