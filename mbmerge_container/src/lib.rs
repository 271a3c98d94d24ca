//! Tile stores on disk and the plumbing between them and the compositor.
//!
//! - [`TileStore`]: read-only access to one tile archive, implemented by [`MBTilesReader`].
//! - [`MBTilesWriter`]: creates the destination archive and receives merged tiles as a [`TileSink`].
//! - [`TileBatchWriter`]: buffers merged tiles and flushes them to a sink in fixed-size batches.
//! - [`CoverageResolver`]: decides per zoom level which coordinates get merged.
//!
//! # Features
//! - `test`: fixtures for integration tests in downstream crates (see [`testing`]).

mod batch;
mod coverage;
mod mbtiles;
mod types;

pub use batch::*;
pub use coverage::*;
pub use mbtiles::*;
pub use types::*;

#[cfg(any(test, feature = "test"))]
pub mod testing;
