//! Render commands
//!
//! A [`Command`] is a self-contained value: payloads are copied into bounded
//! owned buffers when the command is built, so producers keep nothing that
//! the render consumer later reads. Oversized payloads are truncated at a
//! character boundary.

use heapless::{String, Vec};

use crate::conversation::Role;

/// Menu entries per menu
pub const MAX_MENU_ITEMS: usize = 8;
/// Bytes per menu entry
pub const MAX_MENU_ITEM_LEN: usize = 32;
/// Bytes per conversation message
pub const MAX_MESSAGE_BYTES: usize = 512;
/// Bytes per card body
pub const MAX_CARD_BYTES: usize = 512;
/// Physical buttons with a hint slot
pub const BUTTON_COUNT: usize = 6;
/// Bytes per button hint
pub const MAX_HINT_LEN: usize = 16;

pub type MenuItem = String<MAX_MENU_ITEM_LEN>;
pub type MenuItems = Vec<MenuItem, MAX_MENU_ITEMS>;
pub type ButtonHints = [String<MAX_HINT_LEN>; BUTTON_COUNT];

/// Copy as much of `src` as fits, cutting at a char boundary
pub fn bounded<const N: usize>(src: &str) -> String<N> {
    let mut end = src.len().min(N);
    while !src.is_char_boundary(end) {
        end -= 1;
    }
    let mut out = String::new();
    let _ = out.push_str(&src[..end]);
    out
}

/// Work item for the render consumer
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Draw the built-in main menu
    ShowDefaultMenu,
    /// Draw a menu with one highlighted entry
    ShowMenu { items: MenuItems, selected: usize },
    /// Draw a text card; `<...>` tags are stripped
    ShowCard { html: String<MAX_CARD_BYTES> },
    /// Append a message to the history and redraw the conversation
    UpdateConversation {
        role: Role,
        text: String<MAX_MESSAGE_BYTES>,
    },
    /// Record which screen is active
    SetActiveScreen(u8),
    /// Replace the button hint labels
    SetButtonHints(ButtonHints),
    /// Draw the current button hints
    DrawButtonHints,
    /// Change the minimum time between physical refreshes (0 disables)
    SetRefreshInterval(u32),
}

/// Command discriminant, for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandKind {
    ShowDefaultMenu,
    ShowMenu,
    ShowCard,
    UpdateConversation,
    SetActiveScreen,
    SetButtonHints,
    DrawButtonHints,
    SetRefreshInterval,
}

impl Command {
    pub fn update_conversation(is_user: bool, text: &str) -> Self {
        Command::UpdateConversation {
            role: Role::from_is_user(is_user),
            text: bounded(text),
        }
    }

    /// Build a menu; entries past [`MAX_MENU_ITEMS`] are dropped
    pub fn show_menu<S: AsRef<str>>(items: &[S], selected: usize) -> Self {
        let items = items
            .iter()
            .take(MAX_MENU_ITEMS)
            .map(|item| bounded(item.as_ref()))
            .collect();
        Command::ShowMenu { items, selected }
    }

    pub fn show_card(html: &str) -> Self {
        Command::ShowCard { html: bounded(html) }
    }

    /// Build button hints; missing labels are left empty
    pub fn set_button_hints<S: AsRef<str>>(labels: &[S]) -> Self {
        let mut hints: ButtonHints = Default::default();
        for (slot, label) in hints.iter_mut().zip(labels) {
            *slot = bounded(label.as_ref());
        }
        Command::SetButtonHints(hints)
    }

    pub fn kind(&self) -> CommandKind {
        match self {
            Command::ShowDefaultMenu => CommandKind::ShowDefaultMenu,
            Command::ShowMenu { .. } => CommandKind::ShowMenu,
            Command::ShowCard { .. } => CommandKind::ShowCard,
            Command::UpdateConversation { .. } => CommandKind::UpdateConversation,
            Command::SetActiveScreen(_) => CommandKind::SetActiveScreen,
            Command::SetButtonHints(_) => CommandKind::SetButtonHints,
            Command::DrawButtonHints => CommandKind::DrawButtonHints,
            Command::SetRefreshInterval(_) => CommandKind::SetRefreshInterval,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_cuts_at_char_boundary() {
        let s: String<4> = bounded("ab中");
        assert_eq!(s.as_str(), "ab");
        let s: String<5> = bounded("ab中");
        assert_eq!(s.as_str(), "ab中");
    }

    #[test]
    fn test_show_menu_truncates() {
        let items = ["one"; 12];
        match Command::show_menu(&items, 2) {
            Command::ShowMenu { items, selected } => {
                assert_eq!(items.len(), MAX_MENU_ITEMS);
                assert_eq!(selected, 2);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_button_hints_padded() {
        let cmd = Command::set_button_hints(&["Up", "Down"]);
        match cmd {
            Command::SetButtonHints(hints) => {
                assert_eq!(hints[0].as_str(), "Up");
                assert_eq!(hints[1].as_str(), "Down");
                assert!(hints[2..].iter().all(|h| h.is_empty()));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_update_conversation_role_and_kind() {
        let cmd = Command::update_conversation(false, "你好");
        assert_eq!(cmd.kind(), CommandKind::UpdateConversation);
        match cmd {
            Command::UpdateConversation { role, text } => {
                assert_eq!(role, Role::Counterpart);
                assert_eq!(text.as_str(), "你好");
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
