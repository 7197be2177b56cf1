//! Panel renderer trait
//!
//! Defines the drawing interface of the e-paper collaborator.

/// Renderer errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RenderError {
    /// Communication error with the panel
    Communication,
    /// Invalid coordinates or dimensions
    InvalidCoordinates,
    /// Panel not initialized
    NotInitialized,
    /// Bitmap shorter than its declared dimensions
    BitmapTooShort,
}

/// Pixel color for 1-bit panels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Color {
    /// Ink
    #[default]
    Black,
    /// Paper
    White,
}

/// Built-in fixed-size font selection for [`Renderer::draw_text`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FontSize {
    Px12,
    Px16,
    Px24,
    Px32,
}

impl FontSize {
    /// Pick the built-in size closest to a layout line height
    pub fn for_line_height(line_height: u16) -> Self {
        match line_height {
            0..=14 => FontSize::Px12,
            15..=18 => FontSize::Px16,
            19..=24 => FontSize::Px24,
            _ => FontSize::Px32,
        }
    }

    /// Nominal pixel height
    pub fn pixels(self) -> u16 {
        match self {
            FontSize::Px12 => 12,
            FontSize::Px16 => 16,
            FontSize::Px24 => 24,
            FontSize::Px32 => 32,
        }
    }
}

/// Panel renderer
///
/// `clear` and the `draw_*` calls only touch the off-panel frame buffer.
/// `display` and `display_window` are the only calls that perform a physical,
/// visible refresh; callers are expected to rate-limit them.
pub trait Renderer {
    /// Fill the frame buffer with paper color
    fn clear(&mut self) -> Result<(), RenderError>;

    /// Draw UTF-8 text with the panel's built-in font
    ///
    /// - `x`, `y`: top-left of the first line
    /// - `size`: built-in font size
    fn draw_text(&mut self, text: &str, x: i16, y: i16, size: FontSize) -> Result<(), RenderError>;

    /// Draw a 1bpp, row-major, MSB-first bitmap with its top-left at (`x`, `y`)
    fn draw_bitmap(
        &mut self,
        bitmap: &[u8],
        x: i16,
        y: i16,
        width: u16,
        height: u16,
        color: Color,
    ) -> Result<(), RenderError>;

    /// Refresh the whole panel
    ///
    /// `partial = true` requests the faster, lower-fidelity waveform.
    fn display(&mut self, partial: bool) -> Result<(), RenderError>;

    /// Refresh a window of the panel
    fn display_window(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        partial: bool,
    ) -> Result<(), RenderError>;

    /// Panel width in pixels
    fn width(&self) -> u16;

    /// Panel height in pixels
    fn height(&self) -> u16;
}
