use anyhow::Result;
use mbmerge_core::{Blob, TileCoord, TileExtent, TileFormat};
use std::fmt::Debug;

/// Read-only access to one tile archive.
///
/// All coverage math goes through per-zoom `MIN`/`MAX` queries, so nothing here loads the full
/// tile set into memory. "Not found" is never an error; only failures of the underlying store are.
pub trait TileStore: Debug {
	/// Name used in log and error messages, usually the path.
	fn name(&self) -> &str;

	/// Distinct zoom levels present, ascending.
	fn zoom_levels(&self) -> Result<Vec<u8>>;

	/// Column/row bounds at `level`. Invalid if the level has no tiles.
	fn extent_at(&self, level: u8) -> Result<TileExtent>;

	/// Raw bytes of the tile at exactly `coord`, if there is one.
	fn get_tile(&self, coord: &TileCoord) -> Result<Option<Blob>>;

	/// Encoding of the first of a few sampled tiles whose format can be determined.
	fn detect_format(&self) -> Result<Option<TileFormat>>;

	/// `(name, value)` pairs of the metadata table.
	fn metadata(&self) -> Result<Vec<(String, String)>>;
}
