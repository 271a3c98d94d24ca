//! Rectangular column/row range of one zoom level.
//!
//! A [`TileExtent`] is computed from `MIN`/`MAX` queries against a single store. Each bound is
//! optional because the aggregates return `NULL` for a zoom level without rows; such an extent is
//! *invalid* and produces no coordinates.
//!
//! ```
//! use mbmerge_core::TileExtent;
//!
//! let extent = TileExtent::new(1, 2, 0, 1).unwrap();
//! assert!(extent.is_valid());
//! assert_eq!(extent.count_tiles(), 4);
//!
//! let coords: Vec<(u32, u32)> = extent.iter_coords(2).map(|c| (c.column, c.row)).collect();
//! assert_eq!(coords, vec![(1, 0), (2, 0), (1, 1), (2, 1)]);
//! ```

use crate::TileCoord;
use anyhow::{Result, ensure};
use std::fmt::{self, Debug};

/// Column and row bounds (inclusive) of the tiles at one zoom level.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct TileExtent {
	pub min_column: Option<u32>,
	pub max_column: Option<u32>,
	pub min_row: Option<u32>,
	pub max_row: Option<u32>,
}

impl TileExtent {
	/// Creates a valid extent.
	///
	/// # Errors
	/// Returns an error if a minimum is larger than its maximum.
	pub fn new(min_column: u32, max_column: u32, min_row: u32, max_row: u32) -> Result<TileExtent> {
		TileExtent::from_options(Some(min_column), Some(max_column), Some(min_row), Some(max_row))
	}

	/// The extent of a zoom level without any tiles.
	#[must_use]
	pub fn new_invalid() -> TileExtent {
		TileExtent::default()
	}

	/// Builds an extent from nullable query results.
	///
	/// # Errors
	/// Returns an error if all bounds are present but a minimum exceeds its maximum.
	pub fn from_options(
		min_column: Option<u32>,
		max_column: Option<u32>,
		min_row: Option<u32>,
		max_row: Option<u32>,
	) -> Result<TileExtent> {
		let extent = TileExtent {
			min_column,
			max_column,
			min_row,
			max_row,
		};
		if let Some((c0, c1, r0, r1)) = extent.bounds() {
			ensure!(c0 <= c1, "min_column ({c0}) must be <= max_column ({c1})");
			ensure!(r0 <= r1, "min_row ({r0}) must be <= max_row ({r1})");
		}
		Ok(extent)
	}

	/// An extent is valid iff all four bounds are present.
	#[must_use]
	pub fn is_valid(&self) -> bool {
		self.bounds().is_some()
	}

	/// `(min_column, max_column, min_row, max_row)` of a valid extent.
	#[must_use]
	pub fn bounds(&self) -> Option<(u32, u32, u32, u32)> {
		Some((self.min_column?, self.max_column?, self.min_row?, self.max_row?))
	}

	/// Smallest extent containing both `self` and `other`. Invalid extents are neutral.
	#[must_use]
	pub fn union(&self, other: &TileExtent) -> TileExtent {
		match (self.bounds(), other.bounds()) {
			(Some(a), Some(b)) => TileExtent {
				min_column: Some(a.0.min(b.0)),
				max_column: Some(a.1.max(b.1)),
				min_row: Some(a.2.min(b.2)),
				max_row: Some(a.3.max(b.3)),
			},
			(Some(_), None) => *self,
			(None, _) => *other,
		}
	}

	/// Number of coordinates the extent spans.
	#[must_use]
	pub fn count_tiles(&self) -> u64 {
		match self.bounds() {
			Some((c0, c1, r0, r1)) => u64::from(c1 - c0 + 1) * u64::from(r1 - r0 + 1),
			None => 0,
		}
	}

	/// Iterates all coordinates at `level` in row-major order: rows ascending, and columns
	/// ascending within each row. Yields nothing for an invalid extent.
	pub fn iter_coords(&self, level: u8) -> impl Iterator<Item = TileCoord> + use<> {
		let (c0, c1, r0, r1) = self.bounds().unwrap_or((1, 0, 1, 0));
		(r0..=r1).flat_map(move |row| (c0..=c1).map(move |column| TileCoord { level, column, row }))
	}
}

impl Debug for TileExtent {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.bounds() {
			Some((c0, c1, r0, r1)) => write!(
				f,
				"TileExtent(columns {c0}..={c1}, rows {r0}..={r1}, {}x{})",
				c1 - c0 + 1,
				r1 - r0 + 1
			),
			None => write!(f, "TileExtent(invalid)"),
		}
	}
}
