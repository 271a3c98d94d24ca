//! The merge run, from validating the inputs to the final commit.
//!
//! A run goes through these steps, stopping at the first fatal error:
//!
//! 1. Validate the [`MergeConfig`]: destination absent, all sources present.
//! 2. Open every source once and keep it open for the whole run.
//! 3. Resolve the coverage and detect the tile format of the base source.
//! 4. Create the destination, copy the base metadata and open the write transaction.
//! 5. Visit every coordinate, zoom levels ascending, rows ascending, then columns ascending.
//!    The tiles found there form a stack in source order, which is composited into one tile.
//! 6. Flush the last batch, commit once, close the destination.
//!
//! Coordinates whose tiles cannot be composited are logged and skipped. Store failures end the
//! run; since only the final commit makes tiles durable, the destination then holds no tiles.

use crate::MergeConfig;
use anyhow::{Context, Result, bail};
use mbmerge_container::{
	Coverage, CoverageResolver, MBTilesReader, MBTilesWriter, TileBatchWriter, TileSink, TileStore,
};
use mbmerge_core::{Blob, CoveragePolicy, MergeError, MergedTile, TileCoord, TileFormat};
use mbmerge_image::TileCompositor;

/// Outcome of a successful run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MergeSummary {
	/// Zoom levels that were merged, ascending.
	pub zoom_levels: Vec<u8>,
	pub tiles_written: u64,
	/// Coordinates with a tile stack that could not be composited.
	pub tiles_skipped: u64,
	pub batches: u64,
}

pub struct TilesMerger {
	config: MergeConfig,
}

impl TilesMerger {
	pub fn new(config: MergeConfig) -> TilesMerger {
		TilesMerger { config }
	}

	/// Runs the merge.
	///
	/// # Errors
	/// Any fatal [`MergeError`]: a failed precondition, an empty base source, a store failure or
	/// an integrity violation in the destination.
	pub fn run(&self) -> Result<MergeSummary> {
		let config = &self.config;
		log::debug!("merge {:?} into {:?}", config.source_paths().collect::<Vec<_>>(), config.destination_path);

		config.validate()?;

		let sources = config
			.source_paths()
			.map(MBTilesReader::open_path)
			.collect::<Result<Vec<_>>>()?;
		let stores: Vec<&dyn TileStore> = sources.iter().map(|s| s as &dyn TileStore).collect();

		let coverage = CoverageResolver::resolve(config.coverage, &stores)?;
		let format = detect_base_format(stores[0])?;
		log::debug!("output format: {format}");

		let mut writer = MBTilesWriter::create(&config.destination_path)?;
		write_metadata(&writer, stores[0], &coverage, format)?;
		writer.begin()?;

		let mut batch = TileBatchWriter::new(writer, config.batch_size)?;
		let (zoom_levels, tiles_skipped) =
			self.merge_coverage(&stores, &coverage, &TileCompositor::new(format), &mut batch)?;
		let (writer, stats) = batch.finalize()?;
		writer.close()?;

		let summary = MergeSummary {
			zoom_levels,
			tiles_written: stats.tiles,
			tiles_skipped,
			batches: stats.batches,
		};
		log::info!(
			"merged {} tiles in {} batches into {:?}, skipped {}",
			summary.tiles_written,
			summary.batches,
			config.destination_path,
			summary.tiles_skipped
		);
		Ok(summary)
	}

	/// Composites every coordinate of `coverage` and queues the results.
	///
	/// Returns the merged zoom levels and the number of skipped coordinates.
	fn merge_coverage<S: TileSink>(
		&self,
		stores: &[&dyn TileStore],
		coverage: &Coverage,
		compositor: &TileCompositor,
		batch: &mut TileBatchWriter<S>,
	) -> Result<(Vec<u8>, u64)> {
		let mut levels = Vec::new();
		let mut skipped = 0;

		for (level, extent) in coverage.levels() {
			log::debug!("merge level {level}: {extent:?}");
			levels.push(level);

			for coord in extent.iter_coords(level) {
				let Some(stack) = self.collect_stack(stores, &coord)? else {
					continue;
				};
				match compositor.compose(&stack) {
					Ok(blob) => batch.add(MergedTile::new(coord, blob))?,
					Err(err) => {
						if MergeError::classify(&err).is_some_and(MergeError::is_recoverable) {
							log::warn!("skipping {coord:?}, base tile is not an image: {err:#}");
						} else {
							log::warn!("skipping {coord:?}, compositing failed: {err:#}");
						}
						skipped += 1;
					}
				}
			}
		}

		Ok((levels, skipped))
	}

	/// Tiles at `coord` in source order. `None` if there is nothing to merge there.
	///
	/// With [`CoveragePolicy::Base`] the base tile is mandatory. With [`CoveragePolicy::Union`] the
	/// first non-empty tile of any source becomes the bottom layer.
	fn collect_stack(&self, stores: &[&dyn TileStore], coord: &TileCoord) -> Result<Option<Vec<Blob>>> {
		let mut stack = Vec::with_capacity(stores.len());

		for (index, store) in stores.iter().enumerate() {
			let tile = store
				.get_tile(coord)
				.with_context(|| format!("collecting tiles at {coord:?}"))?;

			match tile {
				Some(blob) if !(stack.is_empty() && blob.is_empty()) => stack.push(blob),
				_ if index == 0 && self.config.coverage == CoveragePolicy::Base => {
					log::trace!("no base tile at {coord:?}");
					return Ok(None);
				}
				_ => {}
			}
		}

		Ok(if stack.is_empty() { None } else { Some(stack) })
	}
}

fn detect_base_format(base: &dyn TileStore) -> Result<TileFormat> {
	match base.detect_format()? {
		Some(format) => Ok(format),
		None => bail!(MergeError::EmptySource(format!(
			"no tile of '{}' has a known image format",
			base.name()
		))),
	}
}

/// Copies the base metadata, then records format and zoom range of the merged archive.
fn write_metadata(writer: &MBTilesWriter, base: &dyn TileStore, coverage: &Coverage, format: TileFormat) -> Result<()> {
	for (name, value) in base.metadata()? {
		writer.set_metadata(&name, &value)?;
	}
	writer.set_metadata("format", format.as_str())?;
	if let (Some(min), Some(max)) = (coverage.min_level(), coverage.max_level()) {
		writer.set_metadata("minzoom", &min.to_string())?;
		writer.set_metadata("maxzoom", &max.to_string())?;
	}
	Ok(())
}
