//! Render queue and consumer for the Inkchat conversation display
//!
//! Producers talk to the display only through a [`RenderQueue`]. A single
//! consumer ([`task::run`]) dequeues commands in FIFO order and applies them
//! through a [`Compositor`], which owns the renderer, the conversation
//! history and the loaded assets.
//!
//! ```text
//! producers ──enqueue──▶ RenderQueue ──dequeue──▶ consumer
//!                         (bounded)                  │
//!                                                    ▼
//!                                  Compositor: wrap ▸ store ▸ draw ▸ refresh
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// Must come first so the logging macros are visible to the other modules
mod fmt;

pub mod assets;
pub mod compositor;
pub mod config;
pub mod queue;
pub mod refresh;
pub mod task;

#[cfg(test)]
mod mock;

pub use assets::{load_font, Avatars, FontAssetError};
pub use compositor::{Compositor, Outcome, HISTORY_CAPACITY};
pub use config::{load_config, load_config_or_default, ConfigError};
pub use queue::{EnqueueError, Phase, RenderQueue, ENQUEUE_TIMEOUT, QUEUE_CAPACITY};
pub use refresh::RefreshLimiter;
