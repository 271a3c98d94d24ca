//! Which coordinates a merge visits.
//!
//! With [`CoveragePolicy::Base`] only the base store decides: its zoom levels, and per level the
//! bounding box of its tiles. Overlay tiles outside of that are dropped. With
//! [`CoveragePolicy::Union`] levels and bounding boxes of all sources are combined.
//!
//! Bounding boxes come from per-level `MIN`/`MAX` queries, so a sparse base may yield
//! coordinates it has no tile for.

use crate::TileStore;
use anyhow::{Context, Result, bail};
use mbmerge_core::{CoveragePolicy, MAX_LEVEL, MergeError, TileCoord, TileExtent};
use std::collections::BTreeMap;

/// Extent per zoom level, ascending by level. Levels without tiles are left out.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Coverage {
	levels: BTreeMap<u8, TileExtent>,
}

impl Coverage {
	pub fn levels(&self) -> impl Iterator<Item = (u8, &TileExtent)> {
		self.levels.iter().map(|(level, extent)| (*level, extent))
	}

	pub fn extent_at(&self, level: u8) -> Option<&TileExtent> {
		self.levels.get(&level)
	}

	pub fn is_empty(&self) -> bool {
		self.levels.is_empty()
	}

	pub fn min_level(&self) -> Option<u8> {
		self.levels.keys().next().copied()
	}

	pub fn max_level(&self) -> Option<u8> {
		self.levels.keys().next_back().copied()
	}

	pub fn count_tiles(&self) -> u64 {
		self.levels.values().map(TileExtent::count_tiles).sum()
	}

	/// All coordinates, ascending by level, then row-major.
	pub fn iter_coords(&self) -> impl Iterator<Item = TileCoord> + '_ {
		self
			.levels
			.iter()
			.flat_map(|(level, extent)| extent.iter_coords(*level))
	}

	fn include(&mut self, level: u8, extent: TileExtent) {
		if !extent.is_valid() {
			return;
		}
		let merged = match self.levels.get(&level) {
			Some(existing) => existing.union(&extent),
			None => extent,
		};
		self.levels.insert(level, merged);
	}
}

pub struct CoverageResolver;

impl CoverageResolver {
	/// Resolves the coverage of `sources`, the first being the base store.
	///
	/// # Errors
	/// A [`MergeError::EmptySource`] if the base store has no tiles at all, or any store error.
	pub fn resolve(policy: CoveragePolicy, sources: &[&dyn TileStore]) -> Result<Coverage> {
		let Some(base) = sources.first() else {
			bail!(MergeError::Precondition("no sources given".to_string()));
		};

		let considered = match policy {
			CoveragePolicy::Base => &sources[..1],
			CoveragePolicy::Union => sources,
		};

		let mut coverage = Coverage::default();
		for (index, store) in considered.iter().enumerate() {
			let levels = store.zoom_levels()?;
			if index == 0 && levels.is_empty() {
				bail!(MergeError::EmptySource(format!("'{}' contains no zoom levels", base.name())));
			}
			for level in levels {
				if level > MAX_LEVEL {
					bail!(MergeError::Store(format!(
						"'{}' has zoom level {level}, the maximum is {MAX_LEVEL}",
						store.name()
					)));
				}
				let extent = store
					.extent_at(level)
					.with_context(|| format!("resolving coverage of level {level}"))?;
				if extent.is_valid() {
					log::trace!("level {level} of '{}': {extent:?}", store.name());
				} else {
					log::debug!("level {level} of '{}' has no tiles, skipping it", store.name());
				}
				coverage.include(level, extent);
			}
		}

		if coverage.is_empty() {
			bail!(MergeError::EmptySource(format!("'{}' contains no tiles", base.name())));
		}

		log::debug!(
			"coverage ({policy}): levels {:?}..={:?}, {} coordinates",
			coverage.min_level(),
			coverage.max_level(),
			coverage.count_tiles()
		);
		Ok(coverage)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::MockTileStore;
	use pretty_assertions::assert_eq;

	fn extent(c0: u32, c1: u32, r0: u32, r1: u32) -> TileExtent {
		TileExtent::new(c0, c1, r0, r1).unwrap()
	}

	#[test]
	fn base_levels_and_extents() -> Result<()> {
		let base = MockTileStore::new("base")
			.with_tile(2, 1, 0)
			.with_tile(2, 2, 1)
			.with_tile(3, 4, 4);
		let overlay = MockTileStore::new("overlay").with_tile(5, 0, 0).with_tile(2, 0, 3);

		let coverage = CoverageResolver::resolve(CoveragePolicy::Base, &[&base, &overlay])?;
		assert_eq!(
			coverage.levels().collect::<Vec<_>>(),
			vec![(2, &extent(1, 2, 0, 1)), (3, &extent(4, 4, 4, 4))]
		);
		assert_eq!(coverage.count_tiles(), 5);

		let coords: Vec<String> = coverage.iter_coords().map(|c| format!("{c:?}")).collect();
		assert_eq!(
			coords,
			vec![
				"TileCoord(2, [1, 0])",
				"TileCoord(2, [2, 0])",
				"TileCoord(2, [1, 1])",
				"TileCoord(2, [2, 1])",
				"TileCoord(3, [4, 4])"
			]
		);
		Ok(())
	}

	#[test]
	fn invalid_extents_are_skipped() -> Result<()> {
		let base = MockTileStore::new("base")
			.with_tile(2, 0, 0)
			.with_extent(3, TileExtent::new_invalid());

		let coverage = CoverageResolver::resolve(CoveragePolicy::Base, &[&base])?;
		assert_eq!(coverage.levels().map(|(l, _)| l).collect::<Vec<_>>(), vec![2]);
		assert_eq!(coverage.extent_at(3), None);
		Ok(())
	}

	#[test]
	fn union_of_all_sources() -> Result<()> {
		let base = MockTileStore::new("base").with_tile(2, 1, 1);
		let overlay = MockTileStore::new("overlay").with_tile(2, 3, 0).with_tile(4, 7, 7);

		let coverage = CoverageResolver::resolve(CoveragePolicy::Union, &[&base, &overlay])?;
		assert_eq!(
			coverage.levels().collect::<Vec<_>>(),
			vec![(2, &extent(1, 3, 0, 1)), (4, &extent(7, 7, 7, 7))]
		);
		assert_eq!((coverage.min_level(), coverage.max_level()), (Some(2), Some(4)));
		Ok(())
	}

	#[test]
	fn empty_base_fails() {
		let base = MockTileStore::new("base");
		let overlay = MockTileStore::new("overlay").with_tile(1, 0, 0);
		for policy in [CoveragePolicy::Base, CoveragePolicy::Union] {
			let err = CoverageResolver::resolve(policy, &[&base, &overlay]).unwrap_err();
			assert!(matches!(MergeError::classify(&err), Some(MergeError::EmptySource(_))));
		}
	}

	#[test]
	fn base_with_only_invalid_levels_fails() {
		let base = MockTileStore::new("base").with_extent(1, TileExtent::new_invalid());
		let err = CoverageResolver::resolve(CoveragePolicy::Base, &[&base]).unwrap_err();
		assert!(matches!(MergeError::classify(&err), Some(MergeError::EmptySource(_))));
	}

	#[test]
	fn zoom_level_above_maximum_fails() {
		let base = MockTileStore::new("base")
			.with_tile(3, 0, 0)
			.with_extent(32, extent(0, 0, 0, 0));
		let err = CoverageResolver::resolve(CoveragePolicy::Base, &[&base]).unwrap_err();
		assert!(matches!(MergeError::classify(&err), Some(MergeError::Store(_))));
		assert!(err.to_string().contains("zoom level 32"), "{err}");

		let overlay = MockTileStore::new("overlay").with_extent(40, extent(0, 0, 0, 0));
		let base = MockTileStore::new("base").with_tile(3, 0, 0);
		assert!(CoverageResolver::resolve(CoveragePolicy::Base, &[&base, &overlay]).is_ok());
		assert!(CoverageResolver::resolve(CoveragePolicy::Union, &[&base, &overlay]).is_err());
	}

	#[test]
	fn no_sources() {
		let err = CoverageResolver::resolve(CoveragePolicy::Base, &[]).unwrap_err();
		assert!(matches!(MergeError::classify(&err), Some(MergeError::Precondition(_))));
	}
}
