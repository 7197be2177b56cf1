//! One wrapped message

use crate::text::{wrap, DisplayLine, WidthEstimator, WrapLimits, WrappedLines};

/// Who sent a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Role {
    /// Local user, drawn on the right
    User,
    /// Remote party, drawn on the left
    Counterpart,
}

impl Role {
    pub fn from_is_user(is_user: bool) -> Self {
        if is_user {
            Role::User
        } else {
            Role::Counterpart
        }
    }
}

/// A message laid out into display lines
///
/// Immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConversationEntry {
    role: Role,
    lines: WrappedLines,
}

impl ConversationEntry {
    pub fn new(role: Role, lines: WrappedLines) -> Self {
        Self { role, lines }
    }

    /// Wrap `text` and build an entry from it
    pub fn wrap(role: Role, text: &[u8], limits: &WrapLimits, widths: &WidthEstimator<'_>) -> Self {
        Self::new(role, wrap(text, limits, widths))
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    /// Lines in reading order
    pub fn lines(&self) -> &[DisplayLine] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FontMetrics;
    use crate::font::FontCodec;

    #[test]
    fn test_wrap_builds_lines() {
        let font = FontCodec::unloaded();
        let widths = WidthEstimator::new(&font, FontMetrics::from_cjk(16, 18));
        let limits = WrapLimits {
            area_width_px: 32,
            ..Default::default()
        };

        let entry = ConversationEntry::wrap(Role::from_is_user(true), b"hello world", &limits, &widths);
        assert!(entry.is_user());
        assert_eq!(entry.line_count(), 4);
        assert_eq!(entry.lines()[0].text().as_str(), "hell");
        assert_eq!(entry.lines()[1].text().as_str(), "o");
    }

    #[test]
    fn test_empty_message_has_one_line() {
        let font = FontCodec::unloaded();
        let widths = WidthEstimator::new(&font, FontMetrics::default());
        let entry = ConversationEntry::wrap(Role::Counterpart, b"", &WrapLimits::default(), &widths);
        assert_eq!(entry.line_count(), 1);
        assert!(!entry.is_user());
    }
}
