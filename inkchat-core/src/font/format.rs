//! Binary glyph-font container layout.
//!
//! Container format:
//! ```text
//! ┌────────────────────┬──────────────────────────┬────────────────┐
//! │ HEADER (21B)       │ GLYPH TABLE (18B × n)    │ BITMAP SECTION │
//! └────────────────────┴──────────────────────────┴────────────────┘
//!
//! Header:  magic[4] "BDFB" │ version u8 │ ascent u16 │ descent u16 │
//!          glyph_count u32 │ bbox_w i16 │ bbox_h i16 │ bbox_x i16 │ bbox_y i16
//! Entry:   codepoint u32 │ width u16 │ height u16 │ x_offset i16 │
//!          y_offset i16 │ advance u16 │ bitmap_offset u32
//! ```
//!
//! Numeric fields share one byte order, which the format does not declare.
//! Bitmaps are 1bpp, row-major, MSB first, `ceil(width / 8)` bytes per row.

/// Container magic tag
pub const FONT_MAGIC: [u8; 4] = *b"BDFB";

/// Packed header size in bytes
pub const HEADER_SIZE: usize = 21;

/// Packed glyph entry size in bytes
pub const GLYPH_ENTRY_SIZE: usize = 18;

// Header field offsets
const HDR_VERSION: usize = 4;
const HDR_ASCENT: usize = 5;
const HDR_DESCENT: usize = 7;
const HDR_GLYPH_COUNT: usize = 9;
const HDR_BBOX_W: usize = 13;
const HDR_BBOX_H: usize = 15;
const HDR_BBOX_X: usize = 17;
const HDR_BBOX_Y: usize = 19;

// Glyph entry field offsets
const ENT_CODEPOINT: usize = 0;
const ENT_WIDTH: usize = 4;
const ENT_HEIGHT: usize = 6;
const ENT_X_OFFSET: usize = 8;
const ENT_Y_OFFSET: usize = 10;
const ENT_ADVANCE: usize = 12;
const ENT_BITMAP_OFFSET: usize = 14;

/// Errors that can occur while validating a font container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoadError {
    /// Buffer shorter than the header
    TooShort,
    /// Magic tag mismatch
    BadMagic,
    /// Neither byte order yields a non-empty glyph table that fits the buffer
    NoPlausibleEndianness,
    /// Codepoint at `index` is not greater than its predecessor
    UnsortedCodepoints { index: u32 },
    /// Bitmap of glyph at `index` extends past the bitmap section
    BitmapOutOfBounds { index: u32 },
}

/// Byte order of the numeric fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Endian {
    Little,
    Big,
}

impl Endian {
    pub(crate) fn u16_at(self, bytes: &[u8], at: usize) -> u16 {
        let raw = [bytes[at], bytes[at + 1]];
        match self {
            Endian::Little => u16::from_le_bytes(raw),
            Endian::Big => u16::from_be_bytes(raw),
        }
    }

    pub(crate) fn i16_at(self, bytes: &[u8], at: usize) -> i16 {
        self.u16_at(bytes, at) as i16
    }

    pub(crate) fn u32_at(self, bytes: &[u8], at: usize) -> u32 {
        let raw = [bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]];
        match self {
            Endian::Little => u32::from_le_bytes(raw),
            Endian::Big => u32::from_be_bytes(raw),
        }
    }

    /// Infer the byte order from the glyph count.
    ///
    /// An interpretation is plausible when its glyph count is non-zero and the
    /// resulting glyph table fits in `data`. Little-endian wins ties.
    pub fn detect(data: &[u8]) -> Result<Self, LoadError> {
        if data.len() < HEADER_SIZE {
            return Err(LoadError::TooShort);
        }

        let plausible = |endian: Endian| {
            let count = endian.u32_at(data, HDR_GLYPH_COUNT);
            count > 0 && table_end(count) <= data.len() as u64
        };

        if plausible(Endian::Little) {
            Ok(Endian::Little)
        } else if plausible(Endian::Big) {
            Ok(Endian::Big)
        } else {
            Err(LoadError::NoPlausibleEndianness)
        }
    }
}

/// Byte offset where the bitmap section starts for `glyph_count` glyphs
pub(crate) fn table_end(glyph_count: u32) -> u64 {
    HEADER_SIZE as u64 + u64::from(glyph_count) * GLYPH_ENTRY_SIZE as u64
}

/// Bytes occupied by a `width` × `height` 1bpp bitmap
pub fn bitmap_len(width: u16, height: u16) -> usize {
    (width as usize).div_ceil(8) * height as usize
}

/// Font container header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FontHeader {
    pub magic: [u8; 4],
    pub version: u8,
    pub ascent: u16,
    pub descent: u16,
    pub glyph_count: u32,
    pub bbox_w: i16,
    pub bbox_h: i16,
    pub bbox_x: i16,
    pub bbox_y: i16,
}

impl FontHeader {
    /// Parse the header with a known byte order
    pub fn parse(data: &[u8], endian: Endian) -> Result<Self, LoadError> {
        if data.len() < HEADER_SIZE {
            return Err(LoadError::TooShort);
        }

        let magic = [data[0], data[1], data[2], data[3]];
        if magic != FONT_MAGIC {
            return Err(LoadError::BadMagic);
        }

        Ok(Self {
            magic,
            version: data[HDR_VERSION],
            ascent: endian.u16_at(data, HDR_ASCENT),
            descent: endian.u16_at(data, HDR_DESCENT),
            glyph_count: endian.u32_at(data, HDR_GLYPH_COUNT),
            bbox_w: endian.i16_at(data, HDR_BBOX_W),
            bbox_h: endian.i16_at(data, HDR_BBOX_H),
            bbox_x: endian.i16_at(data, HDR_BBOX_X),
            bbox_y: endian.i16_at(data, HDR_BBOX_Y),
        })
    }
}

/// One glyph table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GlyphEntry {
    /// Unicode scalar value
    pub codepoint: u32,
    /// Bitmap width (px)
    pub width: u16,
    /// Bitmap height (px)
    pub height: u16,
    /// Horizontal offset of the bitmap from the pen position
    pub x_offset: i16,
    /// Offset from the baseline to the bitmap's lower edge
    pub y_offset: i16,
    /// Pen movement after this glyph
    pub advance: u16,
    /// Offset into the bitmap section
    pub bitmap_offset: u32,
}

impl GlyphEntry {
    /// Parse one packed entry (`raw` must hold at least [`GLYPH_ENTRY_SIZE`] bytes)
    pub(crate) fn parse(raw: &[u8], endian: Endian) -> Self {
        Self {
            codepoint: endian.u32_at(raw, ENT_CODEPOINT),
            width: endian.u16_at(raw, ENT_WIDTH),
            height: endian.u16_at(raw, ENT_HEIGHT),
            x_offset: endian.i16_at(raw, ENT_X_OFFSET),
            y_offset: endian.i16_at(raw, ENT_Y_OFFSET),
            advance: endian.u16_at(raw, ENT_ADVANCE),
            bitmap_offset: endian.u32_at(raw, ENT_BITMAP_OFFSET),
        }
    }

    /// Bytes needed for this glyph's bitmap
    pub fn bitmap_len(&self) -> usize {
        bitmap_len(self.width, self.height)
    }

    /// Exclusive end of this glyph's bitmap within the bitmap section
    pub(crate) fn bitmap_end(&self) -> u64 {
        u64::from(self.bitmap_offset) + self.bitmap_len() as u64
    }
}
