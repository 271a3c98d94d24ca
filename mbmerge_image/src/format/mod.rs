//! This module defines and re-exports image format handlers (JPEG, PNG, WebP).
//! The `all` module dispatches on [`TileFormat`](mbmerge_core::TileFormat) and detects the format
//! of an encoded tile.

mod all;

pub mod jpeg;
pub mod png;
pub mod webp;
pub use all::*;
