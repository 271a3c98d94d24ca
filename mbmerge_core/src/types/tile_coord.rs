//! Tile coordinates as they are stored in the `tiles` table.
//!
//! A [`TileCoord`] carries `zoom_level`, `tile_column` and `tile_row` verbatim. Whether rows count
//! from the north (XYZ) or from the south (TMS) is a property of the store; merging never converts
//! between the two conventions. [`TileCoord::flip_row`] is available for tooling that has to.
//!
//! # Examples
//!
//! ```
//! use mbmerge_core::TileCoord;
//!
//! let coord = TileCoord::new(5, 10, 7).unwrap();
//! assert_eq!(coord.level, 5);
//! assert_eq!(coord.column, 10);
//! assert_eq!(coord.row, 7);
//!
//! // TMS <-> XYZ
//! assert_eq!(coord.flip_row().unwrap().row, 24);
//! ```

use anyhow::{Result, ensure};
use std::fmt::{self, Debug};

/// Highest zoom level a tile coordinate can address.
pub const MAX_LEVEL: u8 = 31;

/// Address of a single tile inside one store.
#[derive(Eq, PartialEq, Clone, Hash, Copy)]
pub struct TileCoord {
	/// The zoom level of the tile.
	pub level: u8,
	/// The `tile_column` value.
	pub column: u32,
	/// The `tile_row` value, in whatever row convention the store uses.
	pub row: u32,
}

impl TileCoord {
	/// Create a new `TileCoord`.
	///
	/// Column and row are not checked against the level: stores are merged as they are,
	/// including tiles outside the regular pyramid.
	///
	/// # Errors
	/// Returns an error if `level` > 31.
	pub fn new(level: u8, column: u32, row: u32) -> Result<TileCoord> {
		ensure!(level <= MAX_LEVEL, "level ({level}) must be <= {MAX_LEVEL}");
		Ok(TileCoord { level, column, row })
	}

	/// Largest valid column/row index at this level: `2^level - 1`.
	#[must_use]
	pub fn max_value(&self) -> u32 {
		(1u64 << self.level).saturating_sub(1) as u32
	}

	/// Converts between the TMS and XYZ row conventions: `row' = 2^level - 1 - row`.
	///
	/// The operation is its own inverse.
	///
	/// # Errors
	/// Returns an error if `row` lies outside the pyramid of this level.
	pub fn flip_row(&self) -> Result<TileCoord> {
		let max = self.max_value();
		ensure!(
			self.row <= max,
			"row ({}) out of bounds for level {}, cannot flip",
			self.row,
			self.level
		);
		Ok(TileCoord {
			level: self.level,
			column: self.column,
			row: max - self.row,
		})
	}
}

impl Debug for TileCoord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "TileCoord({}, [{}, {}])", self.level, self.column, self.row)
	}
}

/// Row-major ordering: first by `level`, then `row`, then `column`. This is the order in which
/// coordinates of one zoom level are merged.
impl Ord for TileCoord {
	fn cmp(&self, other: &Self) -> std::cmp::Ordering {
		self
			.level
			.cmp(&other.level)
			.then(self.row.cmp(&other.row))
			.then(self.column.cmp(&other.column))
	}
}

impl PartialOrd for TileCoord {
	fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
		Some(self.cmp(other))
	}
}
