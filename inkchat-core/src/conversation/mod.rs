//! Conversation history
//!
//! Messages are wrapped once on arrival and stored as immutable
//! [`ConversationEntry`] values in a bounded [`ConversationStore`].

pub mod entry;
pub mod store;

pub use entry::{ConversationEntry, Role};
pub use store::{BubbleMetrics, ConversationStore, VisibleEntry};
