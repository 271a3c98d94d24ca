//! End-to-end runs of the merge against MBTiles files on disk.

use mbmerge::{MergeConfig, MergeSummary, TilesMerger};
use mbmerge_container::{
	MBTilesReader, TileStore,
	testing::{create_store, insert_text_tile, pixel_of, solid_tile},
};
use mbmerge_core::{CoveragePolicy, MergeError, TileExtent, TileFormat};
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};
use test_utilities::*;

fn merge(output: &Path, sources: &[PathBuf]) -> anyhow::Result<MergeSummary> {
	TilesMerger::new(MergeConfig::from_paths(output, sources)?).run()
}

#[test]
fn red_under_half_transparent_blue() -> anyhow::Result<()> {
	let (dir, output) = get_temp_output("merged.mbtiles");
	let base = solid_store(dir.path(), "base.mbtiles", RED, &[tc(5, 10, 7)]);
	let overlay = solid_store(dir.path(), "overlay.mbtiles", HALF_BLUE, &[tc(5, 10, 7)]);

	let summary = merge(&output, &[base, overlay])?;
	assert_eq!(
		summary,
		MergeSummary {
			zoom_levels: vec![5],
			tiles_written: 1,
			tiles_skipped: 0,
			batches: 1,
		}
	);

	let reader = MBTilesReader::open_path(&output)?;
	assert_eq!(reader.zoom_levels()?, vec![5]);
	assert_eq!(reader.extent_at(5)?, TileExtent::new(10, 10, 7, 7)?);

	let tile = reader.get_tile(&tc(5, 10, 7))?.expect("merged tile");
	assert_eq!(mbmerge_image::detect_format(&tile), Some(mbmerge_core::TileFormat::PNG));
	for (x, y) in [(0, 0), (8, 8), (15, 15)] {
		assert_eq!(pixel_of(&tile, x, y), [127, 0, 128, 255]);
	}
	Ok(())
}

#[test]
fn destination_metadata() -> anyhow::Result<()> {
	let (dir, output) = get_temp_output("merged.mbtiles");
	let base = solid_store(dir.path(), "base.mbtiles", RED, &[tc(3, 1, 1), tc(6, 2, 2)]);

	merge(&output, &[base])?;

	let mut metadata = MBTilesReader::open_path(&output)?.metadata()?;
	metadata.sort();
	let expected: Vec<(String, String)> = [
		("format", "png"),
		("maxzoom", "6"),
		("minzoom", "3"),
		("name", "base.mbtiles"),
	]
	.iter()
	.map(|(k, v)| (k.to_string(), v.to_string()))
	.collect();
	assert_eq!(metadata, expected);
	Ok(())
}

#[test]
fn base_metadata_is_copied_and_format_replaced() -> anyhow::Result<()> {
	let (dir, output) = get_temp_output("merged.mbtiles");
	let base = dir.path().join("base.mbtiles");
	create_store(
		&base,
		&[(tc(2, 1, 1), solid_tile(RED, TileFormat::PNG))],
		&[("format", "jpg"), ("name", "base")],
	)?;
	let overlay = dir.path().join("overlay.mbtiles");
	create_store(
		&overlay,
		&[(tc(2, 1, 1), solid_tile(HALF_BLUE, TileFormat::PNG))],
		&[("attribution", "overlay"), ("name", "overlay")],
	)?;

	merge(&output, &[base, overlay])?;

	let mut metadata = MBTilesReader::open_path(&output)?.metadata()?;
	metadata.sort();
	let metadata: Vec<(&str, &str)> = metadata.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
	assert_eq!(
		metadata,
		vec![("format", "png"), ("maxzoom", "2"), ("minzoom", "2"), ("name", "base")]
	);
	Ok(())
}

#[test]
fn text_cells_do_not_abort_the_run() -> anyhow::Result<()> {
	let (dir, output) = get_temp_output("merged.mbtiles");
	let base = solid_store(dir.path(), "base.mbtiles", RED, &[tc(3, 0, 0)]);
	insert_text_tile(&base, &tc(3, 1, 1), "not an image")?;
	let overlay = solid_store(dir.path(), "overlay.mbtiles", HALF_BLUE, &[tc(3, 1, 1)]);
	insert_text_tile(&overlay, &tc(3, 0, 0), "not an image either")?;

	let summary = merge(&output, &[base, overlay])?;
	assert_eq!((summary.tiles_written, summary.tiles_skipped), (1, 1));

	let reader = MBTilesReader::open_path(&output)?;
	assert_eq!(pixel_of(&reader.get_tile(&tc(3, 0, 0))?.expect("base tile"), 2, 2), RED);
	assert_eq!(reader.get_tile(&tc(3, 1, 1))?, None);
	Ok(())
}

#[test]
fn overlay_outside_of_base_is_dropped() -> anyhow::Result<()> {
	let (dir, output) = get_temp_output("merged.mbtiles");
	let base = solid_store(dir.path(), "base.mbtiles", RED, &[tc(2, 0, 0), tc(2, 1, 1)]);
	let overlay = solid_store(dir.path(), "overlay.mbtiles", HALF_BLUE, &[tc(2, 1, 0), tc(4, 3, 3)]);

	let summary = merge(&output, &[base, overlay])?;
	assert_eq!(summary.tiles_written, 2);

	let reader = MBTilesReader::open_path(&output)?;
	assert_eq!(reader.zoom_levels()?, vec![2]);
	assert_eq!(reader.get_tile(&tc(2, 1, 0))?, None);
	assert_eq!(pixel_of(&reader.get_tile(&tc(2, 1, 1))?.expect("base tile"), 0, 0), RED);
	Ok(())
}

#[test]
fn union_coverage() -> anyhow::Result<()> {
	let (dir, output) = get_temp_output("merged.mbtiles");
	let base = solid_store(dir.path(), "base.mbtiles", RED, &[tc(2, 0, 0)]);
	let overlay = solid_store(dir.path(), "overlay.mbtiles", HALF_BLUE, &[tc(2, 0, 0), tc(4, 3, 3)]);

	let config = MergeConfig::from_paths(&output, &[base, overlay])?.with_coverage(CoveragePolicy::Union);
	let summary = TilesMerger::new(config).run()?;
	assert_eq!(summary.zoom_levels, vec![2, 4]);
	assert_eq!(summary.tiles_written, 2);

	let reader = MBTilesReader::open_path(&output)?;
	assert_eq!(pixel_of(&reader.get_tile(&tc(2, 0, 0))?.expect("merged"), 1, 1), [127, 0, 128, 255]);
	assert_eq!(pixel_of(&reader.get_tile(&tc(4, 3, 3))?.expect("overlay only"), 1, 1), HALF_BLUE);
	Ok(())
}

#[test]
fn many_tiles_in_batches() -> anyhow::Result<()> {
	let (dir, output) = get_temp_output("merged.mbtiles");
	let coords: Vec<_> = (0..23).map(|i| tc(6, i % 8, i / 8)).collect();
	let base = solid_store(dir.path(), "base.mbtiles", RED, &coords);

	let summary = merge(&output, &[base])?;
	assert_eq!((summary.tiles_written, summary.batches), (23, 3));

	let reader = MBTilesReader::open_path(&output)?;
	assert_eq!(reader.extent_at(6)?, TileExtent::new(0, 7, 0, 2)?);
	Ok(())
}

#[test]
fn existing_destination_fails_without_writing() -> anyhow::Result<()> {
	let (dir, output) = get_temp_output("merged.mbtiles");
	let base = solid_store(dir.path(), "base.mbtiles", RED, &[tc(5, 10, 7)]);
	std::fs::write(&output, "")?;

	let err = merge(&output, &[base]).unwrap_err();
	assert!(matches!(MergeError::classify(&err), Some(MergeError::Precondition(_))));
	assert_eq!(std::fs::read(&output)?, Vec::<u8>::new());
	Ok(())
}

#[test]
fn empty_base_fails_before_creating_the_destination() -> anyhow::Result<()> {
	let (dir, output) = get_temp_output("merged.mbtiles");
	let base = solid_store(dir.path(), "base.mbtiles", RED, &[]);

	let err = merge(&output, &[base]).unwrap_err();
	assert!(matches!(MergeError::classify(&err), Some(MergeError::EmptySource(_))));
	assert!(!output.exists());
	Ok(())
}
