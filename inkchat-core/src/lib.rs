//! Board-agnostic core logic for the conversation display
//!
//! This crate contains all layout and history logic that does not depend on
//! a specific panel or storage medium:
//!
//! - Binary glyph-font container codec and glyph drawing
//! - Fault-tolerant UTF-8 decoding for layout
//! - Advance-width estimation (glyph metrics or script heuristics)
//! - Greedy line wrapping into bounded display lines
//! - Ring-buffered conversation history
//! - Render command definitions
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod command;
pub mod config;
pub mod conversation;
pub mod font;
pub mod text;
