//! # mbmerge
//!
//! Merges several raster MBTiles archives into one. Tiles found at the same coordinate in more
//! than one source are alpha-composited: the first source is the base, every further source is
//! drawn on top of it in the order given.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use mbmerge::{MergeConfig, TilesMerger};
//! use std::path::{Path, PathBuf};
//!
//! fn main() -> anyhow::Result<()> {
//!     let sources = [PathBuf::from("satellite.mbtiles"), PathBuf::from("labels.mbtiles")];
//!     let config = MergeConfig::from_paths(Path::new("merged.mbtiles"), &sources)?;
//!     let summary = TilesMerger::new(config).run()?;
//!     println!("{} tiles written", summary.tiles_written);
//!     Ok(())
//! }
//! ```

mod config;
mod merger;

pub use config::*;
pub use merger::*;

pub use mbmerge_container as container;
pub use mbmerge_core as core;
pub use mbmerge_image as image;
