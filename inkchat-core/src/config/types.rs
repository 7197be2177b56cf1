//! Configuration type definitions
//!
//! These types describe the conversation screen geometry and font choice.
//! They are persisted as postcard-serialized binary data.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::conversation::{BubbleMetrics, Role};
use crate::text::{WrapLimits, MAX_LINES_PER_MESSAGE, MAX_LINE_BYTES};

/// Current persisted config layout version
pub const CONFIG_VERSION: u8 = 1;

/// Wenquanyi bitmap font point size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FontPt {
    Pt9,
    Pt10,
    #[default]
    Pt11,
    Pt12,
    Pt13,
}

impl FontPt {
    /// Map a point size to the nearest supported size (clamped to 9..=13)
    pub fn from_points(points: i32) -> Self {
        match points {
            i32::MIN..=9 => FontPt::Pt9,
            10 => FontPt::Pt10,
            11 => FontPt::Pt11,
            12 => FontPt::Pt12,
            _ => FontPt::Pt13,
        }
    }

    /// Point size as a number
    pub fn points(self) -> u8 {
        match self {
            FontPt::Pt9 => 9,
            FontPt::Pt10 => 10,
            FontPt::Pt11 => 11,
            FontPt::Pt12 => 12,
            FontPt::Pt13 => 13,
        }
    }

    /// Layout metrics for this size
    ///
    /// Widths and heights are measured from the rendered Wenquanyi cells,
    /// they do not scale linearly with the point size.
    pub fn metrics(self) -> FontMetrics {
        let (cjk_width, line_height) = match self {
            FontPt::Pt9 => (12, 14),
            FontPt::Pt10 => (13, 14),
            FontPt::Pt11 => (16, 18),
            FontPt::Pt12 => (16, 19),
            FontPt::Pt13 => (14, 15),
        };
        FontMetrics::from_cjk(cjk_width, line_height)
    }
}

/// Fixed-advance metrics used when glyph data is unavailable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FontMetrics {
    /// Advance of a full-width (CJK) cell
    pub cjk_width: u16,
    /// Advance of an ASCII cell
    pub ascii_width: u16,
    /// Distance between consecutive baselines
    pub line_height: u16,
}

impl FontMetrics {
    /// Derive metrics from the full-width cell, Latin being roughly half-width
    pub fn from_cjk(cjk_width: u16, line_height: u16) -> Self {
        Self {
            cjk_width,
            ascii_width: ((cjk_width + 1) / 2).max(1),
            line_height,
        }
    }
}

impl Default for FontMetrics {
    fn default() -> Self {
        FontPt::default().metrics()
    }
}

/// Avatar bitmap dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AvatarSize {
    pub width: u16,
    pub height: u16,
}

impl Default for AvatarSize {
    fn default() -> Self {
        Self {
            width: 20,
            height: 20,
        }
    }
}

/// Conversation screen geometry and history limits
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConversationLayout {
    /// Drawable region width (px)
    pub region_width: u16,
    /// Drawable region height (px)
    pub region_height: u16,
    /// Horizontal margin on both sides (px)
    pub margin_x: u16,
    /// Vertical margin on top and bottom (px)
    pub margin_y: u16,
    /// Padding above and below bubble content (px)
    pub bubble_padding_y: u16,
    /// Gap between consecutive bubbles (px)
    pub bubble_gap_y: u16,
    /// Gap between an avatar and the text area (px)
    pub text_gap_x: u16,
    /// User avatar, drawn on the right
    pub user_avatar: AvatarSize,
    /// Counterpart avatar, drawn on the left
    pub counterpart_avatar: AvatarSize,
    /// Total wrapped lines kept across the whole history
    pub max_history_lines: u16,
    /// Lines kept per message; extra lines are dropped
    pub max_lines_per_message: u8,
    /// Bytes per display line
    pub max_line_bytes: u8,
}

impl Default for ConversationLayout {
    fn default() -> Self {
        Self {
            region_width: 400,
            region_height: 300,
            margin_x: 8,
            margin_y: 8,
            bubble_padding_y: 1,
            bubble_gap_y: 3,
            text_gap_x: 5,
            user_avatar: AvatarSize::default(),
            counterpart_avatar: AvatarSize::default(),
            max_history_lines: 50,
            max_lines_per_message: MAX_LINES_PER_MESSAGE as u8,
            max_line_bytes: MAX_LINE_BYTES as u8,
        }
    }
}

/// Convert a pixel length to a screen coordinate, saturating at `i16::MAX`
pub fn coord(px: u16) -> i16 {
    i16::try_from(px).unwrap_or(i16::MAX)
}

fn clamp_coord(v: i32) -> i16 {
    v.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
}

impl ConversationLayout {
    fn avatar_width(&self, role: Role) -> u16 {
        match role {
            Role::User => self.user_avatar.width,
            Role::Counterpart => self.counterpart_avatar.width,
        }
    }

    /// Avatar size for `role`
    pub fn avatar(&self, role: Role) -> AvatarSize {
        match role {
            Role::User => self.user_avatar,
            Role::Counterpart => self.counterpart_avatar,
        }
    }

    /// Left edge of the avatar for `role`
    pub fn avatar_x(&self, role: Role) -> i16 {
        match role {
            Role::User => clamp_coord(
                i32::from(self.region_width) - i32::from(self.margin_x) - i32::from(self.avatar_width(role)),
            ),
            Role::Counterpart => coord(self.margin_x),
        }
    }

    /// Left edge of the text area
    pub fn text_area_left(&self) -> i16 {
        clamp_coord(
            i32::from(self.margin_x) + i32::from(self.counterpart_avatar.width) + i32::from(self.text_gap_x),
        )
    }

    /// Right edge of the text area
    pub fn text_area_right(&self) -> i16 {
        clamp_coord(
            i32::from(self.region_width)
                - i32::from(self.margin_x)
                - i32::from(self.user_avatar.width)
                - i32::from(self.text_gap_x),
        )
    }

    /// Width available to a line of text (at least 1px)
    pub fn text_area_width(&self) -> u16 {
        let width = i32::from(self.text_area_right()) - i32::from(self.text_area_left());
        width.clamp(1, i32::from(u16::MAX)) as u16
    }

    /// Left edge of multi-line user text
    pub fn user_text_left(&self) -> i16 {
        clamp_coord(i32::from(self.text_area_right()) - i32::from(self.text_area_width()))
    }

    /// Vertical space available to bubbles
    pub fn height_budget(&self) -> u16 {
        self.region_height.saturating_sub(self.margin_y.saturating_mul(2))
    }

    /// Whether the geometry leaves room for text inside the panel
    ///
    /// Coordinates must stay within `i16` and the text area must have a
    /// positive width and height.
    pub fn is_valid(&self) -> bool {
        let max = i32::from(i16::MAX);
        let right = i32::from(self.region_width)
            - i32::from(self.margin_x)
            - i32::from(self.user_avatar.width)
            - i32::from(self.text_gap_x);
        let left =
            i32::from(self.margin_x) + i32::from(self.counterpart_avatar.width) + i32::from(self.text_gap_x);

        i32::from(self.region_width) <= max
            && i32::from(self.region_height) <= max
            && left < right
            && self.height_budget() > 0
    }

    /// Wrapping limits for one message
    pub fn wrap_limits(&self) -> WrapLimits {
        WrapLimits {
            area_width_px: self.text_area_width(),
            max_lines: self.max_lines_per_message as usize,
            max_line_bytes: self.max_line_bytes as usize,
        }
    }

    /// Bubble sizing used by the history view
    pub fn bubble_metrics(&self) -> BubbleMetrics {
        BubbleMetrics {
            padding_y: self.bubble_padding_y,
            gap_y: self.bubble_gap_y,
            user_avatar_height: self.user_avatar.height,
            counterpart_avatar_height: self.counterpart_avatar.height,
        }
    }
}

/// Complete display configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayConfig {
    /// Layout version, see [`CONFIG_VERSION`]
    pub version: u8,
    /// Bitmap font size
    pub font_pt: FontPt,
    /// Minimum time between physical panel refreshes (0 disables throttling)
    pub refresh_interval_ms: u32,
    /// Conversation screen geometry
    pub layout: ConversationLayout,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            font_pt: FontPt::default(),
            refresh_interval_ms: 500,
            layout: ConversationLayout::default(),
        }
    }
}
