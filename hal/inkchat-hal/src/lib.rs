//! Inkchat Hardware Abstraction Layer
//!
//! This crate defines the capabilities the conversation core consumes from
//! the board: a panel renderer and a byte-blob asset store. Board crates
//! implement these traits for their e-paper driver and SD card / assets
//! partition.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  inkchat-display (render consumer)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  inkchat-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ e-paper panel │       │ SD / assets   │
//! │    driver     │       │   partition   │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`renderer::Renderer`] - Off-panel drawing plus rate-limited refresh
//! - [`storage::AssetStorage`] - Byte blob loader by path

#![no_std]
#![deny(unsafe_code)]

pub mod renderer;
pub mod storage;

// Re-export key traits at crate root for convenience
pub use renderer::{Color, FontSize, RenderError, Renderer};
pub use storage::{AssetStorage, StorageError};
