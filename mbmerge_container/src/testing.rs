//! Fixtures for tests: in-memory stores, a recording sink and helpers that create small MBTiles
//! files of solid-color tiles.

use crate::{MBTilesWriter, TileSink, TileStore};
use anyhow::{Result, bail};
use mbmerge_core::{Blob, MergedTile, TileCoord, TileExtent, TileFormat};
use mbmerge_image::{DynamicImage, RgbaImage, Rgba};
use r2d2_sqlite::rusqlite::{Connection, params};
use std::{collections::BTreeMap, path::Path};

/// Edge length of fixture tiles.
pub const TILE_SIZE: u32 = 16;

/// Encodes a `TILE_SIZE`² tile filled with `rgba`. JPEG tiles lose the alpha channel.
pub fn solid_tile(rgba: [u8; 4], format: TileFormat) -> Blob {
	let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(TILE_SIZE, TILE_SIZE, Rgba(rgba)));
	let image = match format {
		TileFormat::JPG => DynamicImage::ImageRgb8(image.into_rgb8()),
		_ => image,
	};
	mbmerge_image::encode(&image, format).expect("encoding a fixture tile")
}

/// Color of the pixel at `(x, y)` of an encoded tile.
pub fn pixel_of(blob: &Blob, x: u32, y: u32) -> [u8; 4] {
	let image = mbmerge_image::decode_any(blob).expect("decoding a tile");
	image.to_rgba8().get_pixel(x, y).0
}

/// Writes a complete MBTiles file with the given tiles and metadata.
pub fn create_store(path: &Path, tiles: &[(TileCoord, Blob)], metadata: &[(&str, &str)]) -> Result<()> {
	let mut writer = MBTilesWriter::create(path)?;
	for (name, value) in metadata {
		writer.set_metadata(name, value)?;
	}
	writer.begin()?;
	let tiles: Vec<MergedTile> = tiles
		.iter()
		.map(|(coord, blob)| MergedTile::new(*coord, blob.clone()))
		.collect();
	writer.write_batch(&tiles)?;
	writer.commit()?;
	writer.close()
}

/// Stores `text` as a TEXT cell at `coord` of an existing MBTiles file, the way broken
/// archives sometimes hold tile data.
pub fn insert_text_tile(path: &Path, coord: &TileCoord, text: &str) -> Result<()> {
	let conn = Connection::open(path)?;
	conn.execute(
		"INSERT INTO tiles (zoom_level, tile_column, tile_row, tile_data) VALUES (?1, ?2, ?3, ?4)",
		params![coord.level, coord.column, coord.row, text],
	)?;
	Ok(())
}

/// In-memory [`TileStore`].
#[derive(Debug, Default)]
pub struct MockTileStore {
	name: String,
	tiles: BTreeMap<TileCoord, Blob>,
	extents: BTreeMap<u8, TileExtent>,
	format: Option<TileFormat>,
	metadata: Vec<(String, String)>,
	broken: bool,
}

impl MockTileStore {
	pub fn new(name: &str) -> Self {
		MockTileStore {
			name: name.to_string(),
			..Default::default()
		}
	}

	/// Adds a placeholder tile at the coordinate.
	pub fn with_tile(self, level: u8, column: u32, row: u32) -> Self {
		let coord = TileCoord::new(level, column, row).expect("valid coordinate");
		self.with_blob(coord, Blob::from(b"mock tile"))
	}

	pub fn with_blob(mut self, coord: TileCoord, blob: Blob) -> Self {
		self.tiles.insert(coord, blob);
		self
	}

	/// Reports `extent` for `level`, regardless of the tiles.
	pub fn with_extent(mut self, level: u8, extent: TileExtent) -> Self {
		self.extents.insert(level, extent);
		self
	}

	pub fn with_format(mut self, format: TileFormat) -> Self {
		self.format = Some(format);
		self
	}

	pub fn with_metadata(mut self, name: &str, value: &str) -> Self {
		self.metadata.push((name.to_string(), value.to_string()));
		self
	}

	/// Every query fails.
	pub fn broken(mut self) -> Self {
		self.broken = true;
		self
	}

	fn check(&self) -> Result<()> {
		if self.broken {
			bail!("mock store '{}' is broken", self.name);
		}
		Ok(())
	}
}

impl TileStore for MockTileStore {
	fn name(&self) -> &str {
		&self.name
	}

	fn zoom_levels(&self) -> Result<Vec<u8>> {
		self.check()?;
		let mut levels: Vec<u8> = self.tiles.keys().map(|c| c.level).chain(self.extents.keys().copied()).collect();
		levels.sort_unstable();
		levels.dedup();
		Ok(levels)
	}

	fn extent_at(&self, level: u8) -> Result<TileExtent> {
		self.check()?;
		if let Some(extent) = self.extents.get(&level) {
			return Ok(*extent);
		}
		let mut extent = TileExtent::new_invalid();
		for coord in self.tiles.keys().filter(|c| c.level == level) {
			extent = extent.union(&TileExtent::new(coord.column, coord.column, coord.row, coord.row)?);
		}
		Ok(extent)
	}

	fn get_tile(&self, coord: &TileCoord) -> Result<Option<Blob>> {
		self.check()?;
		Ok(self.tiles.get(coord).cloned())
	}

	fn detect_format(&self) -> Result<Option<TileFormat>> {
		self.check()?;
		Ok(self.format)
	}

	fn metadata(&self) -> Result<Vec<(String, String)>> {
		self.check()?;
		Ok(self.metadata.clone())
	}
}

/// [`TileSink`] that remembers what it received.
#[derive(Debug, Default)]
pub struct RecordingSink {
	pub batch_sizes: Vec<usize>,
	pub tiles: Vec<MergedTile>,
	pub commits: usize,
	/// 1-based number of the `write_batch` call that fails.
	pub fail_on_batch: Option<usize>,
}

impl TileSink for RecordingSink {
	fn write_batch(&mut self, tiles: &[MergedTile]) -> Result<()> {
		if self.fail_on_batch == Some(self.batch_sizes.len() + 1) {
			bail!("recording sink fails on batch {}", self.batch_sizes.len() + 1);
		}
		self.batch_sizes.push(tiles.len());
		self.tiles.extend_from_slice(tiles);
		Ok(())
	}

	fn commit(&mut self) -> Result<()> {
		self.commits += 1;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use assert_fs::TempDir;
	use pretty_assertions::assert_eq;

	#[test]
	fn mock_store_extent_from_tiles() -> Result<()> {
		let store = MockTileStore::new("mock").with_tile(3, 2, 5).with_tile(3, 4, 1);
		assert_eq!(store.zoom_levels()?, vec![3]);
		assert_eq!(store.extent_at(3)?, TileExtent::new(2, 4, 1, 5)?);
		assert!(!store.extent_at(4)?.is_valid());
		Ok(())
	}

	#[test]
	fn broken_mock_store() {
		let store = MockTileStore::new("mock").with_tile(0, 0, 0).broken();
		assert!(store.zoom_levels().is_err());
		assert!(store.get_tile(&TileCoord::new(0, 0, 0).unwrap()).is_err());
	}

	#[test]
	fn solid_tiles() {
		assert_eq!(pixel_of(&solid_tile([0, 0, 255, 128], TileFormat::PNG), 3, 3), [0, 0, 255, 128]);
		assert_eq!(pixel_of(&solid_tile([0, 0, 0, 255], TileFormat::WEBP), 0, 0), [0, 0, 0, 255]);
		assert_eq!(
			mbmerge_image::detect_format(&solid_tile([9, 9, 9, 255], TileFormat::JPG)),
			Some(TileFormat::JPG)
		);
	}

	#[test]
	fn created_store_is_readable() -> Result<()> {
		let dir = TempDir::new()?;
		let path = dir.path().join("fixture.mbtiles");
		create_store(
			&path,
			&[(TileCoord::new(1, 0, 1)?, Blob::from(b"data"))],
			&[("name", "fixture")],
		)?;
		let reader = crate::MBTilesReader::open_path(&path)?;
		assert_eq!(reader.get_tile(&TileCoord::new(1, 0, 1)?)?, Some(Blob::from(b"data")));
		Ok(())
	}
}
