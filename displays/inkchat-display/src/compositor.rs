//! Render consumer state
//!
//! The [`Compositor`] owns everything the render consumer mutates: the
//! renderer handle, the conversation history, avatars, the refresh limiter
//! and the button hint labels. Only the consumer task calls into it.

use core::fmt::Write;

use embassy_time::Instant;
use heapless::String;

use inkchat_core::command::{
    ButtonHints, Command, MenuItems, BUTTON_COUNT, MAX_CARD_BYTES, MAX_HINT_LEN, MAX_MENU_ITEMS,
    MAX_MENU_ITEM_LEN,
};
use inkchat_core::config::{coord, DisplayConfig, FontMetrics};
use inkchat_core::conversation::{ConversationEntry, ConversationStore, Role};
use inkchat_core::font::{draw_text as draw_font_text, FontCodec};
use inkchat_core::text::WidthEstimator;
use inkchat_hal::{AssetStorage, Color, FontSize, RenderError, Renderer};

use crate::assets::Avatars;
use crate::refresh::RefreshLimiter;

/// Messages kept in the history
pub const HISTORY_CAPACITY: usize = 20;

/// Title of the built-in menu
pub const DEFAULT_MENU_TITLE: &str = "Main Menu";

const MENU_ORIGIN: (i16, i16) = (0, 10);
const CARD_ORIGIN: (i16, i16) = (0, 20);
/// Distance of the hint line from the bottom edge
const HINTS_BOTTOM_OFFSET: i16 = 40;
const SCREEN_FONT: FontSize = FontSize::Px16;

const MENU_TEXT_LEN: usize = MAX_MENU_ITEMS * (MAX_MENU_ITEM_LEN + 3);
const HINTS_TEXT_LEN: usize = BUTTON_COUNT * (MAX_HINT_LEN + 6);

/// What handling a command did to the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// Frame buffer drawn and panel refreshed
    Refreshed,
    /// Frame buffer drawn, physical refresh held back by the limiter
    Deferred,
    /// Consumer state updated, nothing drawn
    StateOnly,
}

/// Consumer-owned display state
pub struct Compositor<'f, R: Renderer> {
    renderer: R,
    font: FontCodec<'f>,
    config: DisplayConfig,
    metrics: FontMetrics,
    store: ConversationStore<HISTORY_CAPACITY>,
    limiter: RefreshLimiter,
    avatars: Avatars,
    active_screen: u8,
    hints: ButtonHints,
}

impl<'f, R: Renderer> Compositor<'f, R> {
    /// `font` may be unloaded; text then uses estimated widths and the
    /// renderer's built-in font.
    pub fn new(renderer: R, font: FontCodec<'f>, config: DisplayConfig) -> Self {
        Self {
            renderer,
            font,
            metrics: config.font_pt.metrics(),
            store: ConversationStore::new(config.layout.max_history_lines as usize),
            limiter: RefreshLimiter::new(config.refresh_interval_ms),
            avatars: Avatars::new(),
            active_screen: 0,
            hints: Default::default(),
            config,
        }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    pub fn font(&self) -> &FontCodec<'f> {
        &self.font
    }

    pub fn store(&self) -> &ConversationStore<HISTORY_CAPACITY> {
        &self.store
    }

    pub fn limiter(&self) -> &RefreshLimiter {
        &self.limiter
    }

    pub fn active_screen(&self) -> u8 {
        self.active_screen
    }

    pub fn hints(&self) -> &ButtonHints {
        &self.hints
    }

    /// Execute one command
    ///
    /// `storage` is only touched the first time a conversation is drawn, to
    /// load the avatars.
    pub async fn handle<S: AssetStorage>(
        &mut self,
        command: Command,
        storage: &mut S,
        now: Instant,
    ) -> Result<Outcome, RenderError> {
        match command {
            Command::ShowDefaultMenu => self.show_screen_text(DEFAULT_MENU_TITLE, MENU_ORIGIN, now),
            Command::ShowMenu { items, selected } => {
                let text = menu_text(&items, selected);
                self.show_screen_text(&text, MENU_ORIGIN, now)
            }
            Command::ShowCard { html } => {
                let text = strip_tags(&html);
                self.show_screen_text(&text, CARD_ORIGIN, now)
            }
            Command::UpdateConversation { role, text } => {
                debug!(
                    "Conversation {=str}: {} bytes",
                    if role == Role::User { "user" } else { "counterpart" },
                    text.len()
                );
                self.avatars.ensure_loaded(storage).await;
                self.append_message(role, text.as_bytes());
                self.render_conversation()?;
                self.present(now, true)
            }
            Command::SetActiveScreen(screen) => {
                self.active_screen = screen;
                Ok(Outcome::StateOnly)
            }
            Command::SetButtonHints(hints) => {
                self.hints = hints;
                Ok(Outcome::StateOnly)
            }
            Command::DrawButtonHints => self.draw_button_hints(now),
            Command::SetRefreshInterval(interval_ms) => {
                info!("Refresh interval set to {} ms", interval_ms);
                self.limiter.set_interval_ms(interval_ms);
                Ok(Outcome::StateOnly)
            }
        }
    }

    /// Wrap a message and add it to the history
    fn append_message(&mut self, role: Role, text: &[u8]) {
        let widths = WidthEstimator::new(&self.font, self.metrics);
        let entry = ConversationEntry::wrap(role, text, &self.config.layout.wrap_limits(), &widths);
        let lines = entry.line_count();

        let evicted = self.store.insert(entry);
        trace!(
            "History: +{} lines, {} evicted, {} entries / {} lines",
            lines,
            evicted,
            self.store.len(),
            self.store.total_lines()
        );
    }

    /// Draw the visible part of the history into the frame buffer
    fn render_conversation(&mut self) -> Result<(), RenderError> {
        let Self {
            renderer,
            font,
            config,
            metrics,
            store,
            avatars,
            ..
        } = self;
        let layout = &config.layout;
        let line_height = metrics.line_height;
        let line_step = coord(line_height);

        let text_left = layout.text_area_left();
        let text_right = layout.text_area_right();
        let text_left_user = layout.user_text_left();

        let visible =
            store.visible_from_newest(layout.height_budget(), line_height, &layout.bubble_metrics());

        renderer.clear()?;

        let mut cursor_y = coord(layout.margin_y);
        for item in &visible {
            let entry = item.entry;
            let role = entry.role();
            let avatar = layout.avatar(role);
            let avatar_x = layout.avatar_x(role);
            let avatar_y = cursor_y.saturating_add(coord(layout.bubble_padding_y));

            let slot = avatars.slot_mut(role);
            match slot.bitmap(avatar) {
                Some(bitmap) => renderer.draw_bitmap(
                    bitmap,
                    avatar_x,
                    avatar_y,
                    avatar.width,
                    avatar.height,
                    Color::Black,
                )?,
                None => {
                    if slot.note_missing() {
                        warn!("Avatar {=str} not drawn (missing or too short)", slot.path());
                    }
                }
            }

            let content_height = item.text_height.max(avatar.height);
            let mut text_y = avatar_y.saturating_add(coord((content_height - item.text_height) / 2));
            let single_line_user = entry.is_user() && entry.line_count() <= 1;

            for line in entry.lines() {
                let text_x = match role {
                    Role::User if single_line_user => {
                        text_left_user.max(text_right.saturating_sub(coord(line.width_px())))
                    }
                    Role::User => text_left_user,
                    Role::Counterpart => text_left,
                };

                if font.is_loaded() {
                    draw_font_text(
                        renderer,
                        font,
                        line.as_bytes(),
                        text_x,
                        text_y.saturating_add(line_step),
                        Color::Black,
                    )?;
                } else {
                    renderer.draw_text(
                        &line.text(),
                        text_x,
                        text_y,
                        FontSize::for_line_height(line_height),
                    )?;
                }
                text_y = text_y.saturating_add(line_step);
            }

            cursor_y = cursor_y
                .saturating_add(coord(item.bubble_height))
                .saturating_add(coord(layout.bubble_gap_y));
        }

        Ok(())
    }

    /// Full-screen text screen: clear, draw, refresh
    fn show_screen_text(&mut self, text: &str, origin: (i16, i16), now: Instant) -> Result<Outcome, RenderError> {
        self.renderer.clear()?;
        self.renderer.draw_text(text, origin.0, origin.1, SCREEN_FONT)?;
        self.present(now, false)
    }

    fn draw_button_hints(&mut self, now: Instant) -> Result<Outcome, RenderError> {
        let line = hints_text(&self.hints);
        if line.is_empty() {
            return Ok(Outcome::StateOnly);
        }

        let y = coord(self.renderer.height()).saturating_sub(HINTS_BOTTOM_OFFSET);
        self.renderer.draw_text(&line, 0, y, SCREEN_FONT)?;
        self.present(now, false)
    }

    /// Partial refresh of the conversation region or the whole panel,
    /// subject to the limiter
    fn present(&mut self, now: Instant, conversation: bool) -> Result<Outcome, RenderError> {
        if !self.limiter.allows(now) {
            debug!("Refresh deferred by limiter");
            return Ok(Outcome::Deferred);
        }

        if conversation {
            let layout = &self.config.layout;
            self.renderer
                .display_window(0, 0, layout.region_width, layout.region_height, true)?;
        } else {
            self.renderer.display(true)?;
        }

        self.limiter.record(now);
        Ok(Outcome::Refreshed)
    }
}

/// Menu entries one per line, the selected one marked with `> `
pub fn menu_text(items: &MenuItems, selected: usize) -> String<MENU_TEXT_LEN> {
    let mut out = String::new();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            let _ = out.push('\n');
        }
        let _ = out.push_str(if i == selected { "> " } else { "  " });
        let _ = out.push_str(item);
    }
    out
}

/// Drop everything between `<` and the next `>`, inclusive
pub fn strip_tags(html: &str) -> String<MAX_CARD_BYTES> {
    let mut out = String::new();
    let mut in_tag = false;
    for c in html.chars() {
        match (in_tag, c) {
            (false, '<') => in_tag = true,
            (true, '>') => in_tag = false,
            (false, _) => {
                let _ = out.push(c);
            }
            (true, _) => {}
        }
    }
    out
}

/// `B<n>:<label>` for each non-empty hint, joined by ` | `
pub fn hints_text(hints: &ButtonHints) -> String<HINTS_TEXT_LEN> {
    let mut out = String::new();
    for (i, label) in hints.iter().enumerate().filter(|(_, l)| !l.is_empty()) {
        if !out.is_empty() {
            let _ = out.push_str(" | ");
        }
        let _ = write!(out, "B{}:{}", i + 1, label.as_str());
    }
    out
}
