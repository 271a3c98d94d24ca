//! Contains types like coordinates, extents, formats and blobs.

mod blob;
pub use blob::*;

mod coverage_policy;
pub use coverage_policy::*;

mod merged_tile;
pub use merged_tile::*;

mod tile_coord;
pub use tile_coord::*;

mod tile_extent;
pub use tile_extent::*;

mod tile_format;
pub use tile_format::*;
