//! Greedy line wrapping.
//!
//! Breaks a message into display lines that fit a pixel width. Lines break
//! at the last space or tab when possible and hard-break before the
//! overflowing character otherwise. `\n` always ends a line, `\r` is dropped.
//! Output is bounded: extra lines are silently discarded.

use heapless::Vec;

use super::utf8::{decode, LayoutUnits};
use super::width::WidthEstimator;

/// Maximum bytes stored per display line
pub const MAX_LINE_BYTES: usize = 64;

/// Maximum lines kept per message
pub const MAX_LINES_PER_MESSAGE: usize = 40;

/// Printable form of a line; every malformed byte may grow to a 3-byte U+FFFD
pub type LineText = heapless::String<{ MAX_LINE_BYTES * 3 }>;

/// Wrapped output of one message
pub type WrappedLines = Vec<DisplayLine, MAX_LINES_PER_MESSAGE>;

/// One laid-out line of text
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayLine {
    bytes: Vec<u8, MAX_LINE_BYTES>,
    width_px: u16,
}

impl DisplayLine {
    /// Raw line bytes, trailing blanks trimmed
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Line text with each malformed run shown as U+FFFD
    pub fn text(&self) -> LineText {
        let mut out = LineText::new();
        for (_, unit) in LayoutUnits::new(&self.bytes) {
            let _ = out.push(unit.as_char());
        }
        out
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Rendered width, clamped to the wrap area
    pub fn width_px(&self) -> u16 {
        self.width_px
    }
}

/// Bounds applied to one message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WrapLimits {
    /// Pixel width of the text area
    pub area_width_px: u16,
    /// Lines kept (clamped to 1..=[`MAX_LINES_PER_MESSAGE`])
    pub max_lines: usize,
    /// Bytes per line (clamped to 4..=[`MAX_LINE_BYTES`])
    pub max_line_bytes: usize,
}

impl Default for WrapLimits {
    fn default() -> Self {
        Self {
            area_width_px: 334,
            max_lines: MAX_LINES_PER_MESSAGE,
            max_line_bytes: MAX_LINE_BYTES,
        }
    }
}

#[inline]
fn is_blank_byte(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

fn trimmed_len(bytes: &[u8]) -> usize {
    bytes.iter().rposition(|&b| !is_blank_byte(b)).map_or(0, |i| i + 1)
}

/// Line under construction
struct PendingLine {
    bytes: Vec<u8, MAX_LINE_BYTES>,
    width: u32,
    last_blank: Option<usize>,
}

impl PendingLine {
    fn new() -> Self {
        Self {
            bytes: Vec::new(),
            width: 0,
            last_blank: None,
        }
    }

    fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    fn push(&mut self, raw: &[u8], advance: u32, blank: bool) {
        let at = self.bytes.len();
        if self.bytes.extend_from_slice(raw).is_ok() {
            self.width += advance;
            if blank {
                self.last_blank = Some(at);
            }
        }
    }

    fn clear(&mut self) {
        self.bytes.clear();
        self.width = 0;
        self.last_blank = None;
    }

    /// Drop everything before `from` and recompute width and break point
    fn keep_from(&mut self, from: usize, widths: &WidthEstimator<'_>) {
        let remaining = self.bytes.len() - from;
        self.bytes.copy_within(from.., 0);
        self.bytes.truncate(remaining);

        self.width = 0;
        self.last_blank = None;
        for (pos, unit) in LayoutUnits::new(&self.bytes) {
            if unit.is_blank() {
                self.last_blank = Some(pos);
            }
            self.width += u32::from(widths.advance_of(&unit));
        }
    }
}

/// Finished lines plus their bounds
struct LineSink<'w> {
    lines: WrappedLines,
    max_lines: usize,
    area: u32,
    widths: &'w WidthEstimator<'w>,
}

impl LineSink<'_> {
    fn is_full(&self) -> bool {
        self.lines.len() >= self.max_lines
    }

    fn emit(&mut self, raw: &[u8]) {
        if self.is_full() {
            return;
        }
        let raw = &raw[..trimmed_len(raw)];
        let width = self.widths.measure(raw).min(self.area) as u16;

        let mut bytes = Vec::new();
        let _ = bytes.extend_from_slice(raw);
        let _ = self.lines.push(DisplayLine {
            bytes,
            width_px: width,
        });
    }

    /// Emit the whole pending line
    fn flush(&mut self, line: &mut PendingLine) {
        if line.is_empty() {
            return;
        }
        self.emit(&line.bytes);
        line.clear();
    }

    /// Emit up to the blank at `at`, carry over what follows the blank run
    fn break_at(&mut self, line: &mut PendingLine, at: usize) {
        self.emit(&line.bytes[..at]);

        let skip = line.bytes[at..]
            .iter()
            .position(|&b| !is_blank_byte(b))
            .map_or(line.bytes.len(), |i| at + i);
        line.keep_from(skip, self.widths);
    }
}

/// Wrap `text` into display lines
///
/// Always returns at least one line (possibly empty) so every message takes
/// visible space.
pub fn wrap(text: &[u8], limits: &WrapLimits, widths: &WidthEstimator<'_>) -> WrappedLines {
    let area = u32::from(limits.area_width_px.max(1));
    let max_line_bytes = limits.max_line_bytes.clamp(4, MAX_LINE_BYTES);

    let mut sink = LineSink {
        lines: Vec::new(),
        max_lines: limits.max_lines.clamp(1, MAX_LINES_PER_MESSAGE),
        area,
        widths,
    };
    let mut line = PendingLine::new();
    let mut pos = 0;

    while !sink.is_full() {
        let Some(unit) = decode(text, pos) else {
            break;
        };
        let raw = &text[pos..pos + unit.len];
        pos += unit.len;

        if !unit.replacement {
            match unit.codepoint {
                0x0D => continue,
                0x0A => {
                    sink.flush(&mut line);
                    continue;
                }
                _ => {}
            }
        }

        let blank = unit.is_blank();
        // Lines never start with invisible width
        if blank && line.is_empty() {
            continue;
        }

        let advance = u32::from(widths.advance_of(&unit));
        if line.width + advance > area && !line.is_empty() {
            if blank {
                // The overflowing blank is itself the break point
                sink.flush(&mut line);
                continue;
            }
            while line.width + advance > area && !line.is_empty() && !sink.is_full() {
                match line.last_blank {
                    Some(at) => sink.break_at(&mut line, at),
                    None => sink.flush(&mut line),
                }
            }
            if sink.is_full() {
                break;
            }
        }

        if line.bytes.len() + raw.len() > max_line_bytes {
            sink.flush(&mut line);
            if sink.is_full() {
                break;
            }
            // A malformed run longer than a whole line is dropped
            if raw.len() > max_line_bytes {
                continue;
            }
        }

        line.push(raw, advance, blank);
    }

    sink.flush(&mut line);

    if sink.lines.is_empty() {
        let _ = sink.lines.push(DisplayLine::default());
    }
    sink.lines
}
