//! Fault-tolerant UTF-8 decoding for layout.
//!
//! Unlike `core::str` decoding this never rejects input: malformed runs
//! collapse into a single U+FFFD flagged as wide, so width estimation never
//! undercounts, and every call consumes at least one byte.

/// Unicode replacement character
pub const REPLACEMENT: u32 = 0xFFFD;

/// Largest Unicode scalar value
const MAX_SCALAR: u32 = 0x10FFFF;

/// One decoded layout unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Decoded {
    /// Decoded scalar, or [`REPLACEMENT`]
    pub codepoint: u32,
    /// Bytes consumed (always >= 1)
    pub len: usize,
    /// Input was malformed
    pub replacement: bool,
    /// Replacement should be measured as full-width
    pub wide: bool,
}

impl Decoded {
    fn scalar(codepoint: u32, len: usize) -> Self {
        Self {
            codepoint,
            len,
            replacement: false,
            wide: false,
        }
    }

    fn malformed(len: usize) -> Self {
        Self {
            codepoint: REPLACEMENT,
            len,
            replacement: true,
            wide: true,
        }
    }

    /// Decoded scalar as a `char`
    pub fn as_char(&self) -> char {
        char::from_u32(self.codepoint).unwrap_or(char::REPLACEMENT_CHARACTER)
    }

    /// Whether this unit is a break-eligible blank (space or tab)
    pub fn is_blank(&self) -> bool {
        !self.replacement && (self.codepoint == u32::from(b' ') || self.codepoint == u32::from(b'\t'))
    }
}

#[inline]
fn is_continuation(byte: u8) -> bool {
    byte & 0xC0 == 0x80
}

/// Decode the unit starting at `pos`
///
/// Returns `None` only when `pos` is at or past the end of `buf`.
pub fn decode(buf: &[u8], pos: usize) -> Option<Decoded> {
    let rest = buf.get(pos..).filter(|r| !r.is_empty())?;
    let b0 = rest[0];

    if b0 < 0x80 {
        return Some(Decoded::scalar(u32::from(b0), 1));
    }

    // Stray continuation run: one replacement for the whole run
    if is_continuation(b0) {
        let run = rest.iter().take_while(|&&b| is_continuation(b)).count();
        return Some(Decoded::malformed(run));
    }

    let (expected, min_cp, lead_bits) = match b0 {
        0xC0..=0xDF => (2, 0x80, u32::from(b0 & 0x1F)),
        0xE0..=0xEF => (3, 0x800, u32::from(b0 & 0x0F)),
        0xF0..=0xF7 => (4, 0x10000, u32::from(b0 & 0x07)),
        _ => return Some(Decoded::malformed(1)),
    };

    // Consume continuation bytes up to the expected length
    let present = 1 + rest[1..]
        .iter()
        .take(expected - 1)
        .take_while(|&&b| is_continuation(b))
        .count();
    if present != expected {
        return Some(Decoded::malformed(present));
    }

    let cp = rest[1..expected]
        .iter()
        .fold(lead_bits, |acc, &b| (acc << 6) | u32::from(b & 0x3F));

    let invalid = cp < min_cp || cp > MAX_SCALAR || (0xD800..=0xDFFF).contains(&cp);
    if invalid {
        Some(Decoded::malformed(expected))
    } else {
        Some(Decoded::scalar(cp, expected))
    }
}

/// Iterator over `(byte_offset, unit)` pairs of a byte buffer
#[derive(Debug, Clone)]
pub struct LayoutUnits<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> LayoutUnits<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }
}

impl Iterator for LayoutUnits<'_> {
    type Item = (usize, Decoded);

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.pos;
        let unit = decode(self.buf, start)?;
        self.pos += unit.len;
        Some((start, unit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_ascii() {
        assert_eq!(decode(b"A", 0), Some(Decoded::scalar(0x41, 1)));
        assert_eq!(decode(b"A", 1), None);
        assert_eq!(decode(b"", 0), None);
    }

    #[test]
    fn test_multibyte() {
        let s = "é中😀".as_bytes();
        let units: Vec<_> = LayoutUnits::new(s).map(|(_, u)| (u.codepoint, u.len)).collect();
        assert_eq!(units, vec![(0xE9, 2), (0x4E2D, 3), (0x1F600, 4)]);
    }

    #[test]
    fn test_lone_continuation_then_ascii() {
        let buf = [0x80, b'A'];
        let first = decode(&buf, 0).unwrap();
        assert_eq!(first.codepoint, REPLACEMENT);
        assert_eq!(first.len, 1);
        assert!(first.replacement && first.wide);

        let second = decode(&buf, 1).unwrap();
        assert_eq!(second, Decoded::scalar(u32::from(b'A'), 1));
    }

    #[test]
    fn test_continuation_run_collapses() {
        let buf = [0x80, 0xBF, 0x80, b'x'];
        let unit = decode(&buf, 0).unwrap();
        assert_eq!(unit.len, 3);
        assert!(unit.replacement);
    }

    #[test]
    fn test_truncated_sequence() {
        // 3-byte lead with one continuation, then end of input
        let unit = decode(&[0xE4, 0xB8], 0).unwrap();
        assert_eq!(unit, Decoded::malformed(2));

        // broken by an ASCII byte
        let unit = decode(&[0xE4, b'a', b'b'], 0).unwrap();
        assert_eq!(unit, Decoded::malformed(1));
    }

    #[test]
    fn test_overlong_surrogate_and_range() {
        // Overlong '/'
        assert_eq!(decode(&[0xC0, 0xAF], 0), Some(Decoded::malformed(2)));
        // U+D800
        assert_eq!(decode(&[0xED, 0xA0, 0x80], 0), Some(Decoded::malformed(3)));
        // 0x110000
        assert_eq!(decode(&[0xF4, 0x90, 0x80, 0x80], 0), Some(Decoded::malformed(4)));
        // Invalid lead
        assert_eq!(decode(&[0xFF, b'a'], 0), Some(Decoded::malformed(1)));
    }

    #[test]
    fn test_is_blank() {
        assert!(decode(b" ", 0).unwrap().is_blank());
        assert!(decode(b"\t", 0).unwrap().is_blank());
        assert!(!decode(b"x", 0).unwrap().is_blank());
    }

    proptest! {
        #[test]
        fn prop_always_progresses(buf in proptest::collection::vec(any::<u8>(), 0..64)) {
            let mut pos = 0;
            let mut calls = 0;
            while pos < buf.len() {
                let unit = decode(&buf, pos).unwrap();
                prop_assert!(unit.len >= 1);
                prop_assert!(pos + unit.len <= buf.len());
                pos += unit.len;
                calls += 1;
            }
            prop_assert!(calls <= buf.len());
        }

        #[test]
        fn prop_valid_utf8_roundtrips(s in "\\PC{0,32}") {
            let decoded: Vec<char> = LayoutUnits::new(s.as_bytes()).map(|(_, u)| {
                assert!(!u.replacement);
                u.as_char()
            }).collect();
            let expected: Vec<char> = s.chars().collect();
            prop_assert_eq!(decoded, expected);
        }
    }
}
