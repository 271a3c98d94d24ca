//! Read tiles and metadata from an MBTiles (SQLite) database.
//!
//! The `MBTilesReader` answers the questions the merge needs: which zoom levels exist, which
//! column/row range each level covers, what bytes a coordinate holds and how the tiles are
//! encoded. Coordinates are passed to SQLite as they are; no row flipping happens here.
//!
//! ## Usage
//! ```rust,no_run
//! use mbmerge_container::{MBTilesReader, TileStore};
//! use mbmerge_core::TileCoord;
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//!     let reader = MBTilesReader::open_path(Path::new("base.mbtiles"))?;
//!     for level in reader.zoom_levels()? {
//!         println!("{level}: {:?}", reader.extent_at(level)?);
//!     }
//!     let tile = reader.get_tile(&TileCoord::new(5, 10, 7)?)?;
//!     println!("{tile:?}");
//!     Ok(())
//! }
//! ```
//!
//! ## Errors
//! Every failing query is tagged as [`MergeError::Store`]. A missing file is a
//! [`MergeError::Precondition`].

use crate::TileStore;
use anyhow::{Context, Result};
use mbmerge_core::{Blob, MergeError, MergeErrorContext, TileCoord, TileExtent, TileFormat};
use r2d2::Pool;
use r2d2_sqlite::{
	SqliteConnectionManager,
	rusqlite::{OpenFlags, OptionalExtension, params, types::ValueRef},
};
use std::path::Path;

/// Number of tiles inspected by [`MBTilesReader::detect_format`].
const FORMAT_SAMPLE_SIZE: u32 = 10;

/// Reader for MBTiles (SQLite) archives.
///
/// Holds a single read-only connection for its whole lifetime.
pub struct MBTilesReader {
	name: String,
	pool: Pool<SqliteConnectionManager>,
}

impl MBTilesReader {
	/// Opens an existing MBTiles file read-only.
	///
	/// # Errors
	/// Returns an error if the file does not exist or SQLite cannot open it.
	pub fn open_path(path: &Path) -> Result<MBTilesReader> {
		log::debug!("open {path:?}");

		if !path.exists() {
			return Err(MergeError::Precondition(format!("source {path:?} does not exist")).into());
		}

		let name = path.to_string_lossy().to_string();
		let manager = SqliteConnectionManager::file(path).with_flags(OpenFlags::SQLITE_OPEN_READ_ONLY);
		let pool = Pool::builder()
			.max_size(1)
			.max_lifetime(None)
			.idle_timeout(None)
			.build(manager)
			.merge_context(|| MergeError::Store(format!("opening '{name}'")))?;

		Ok(MBTilesReader { name, pool })
	}

	/// Runs a query that returns a single row of nullable integers.
	fn query_values<const N: usize>(&self, sql: &str, level: u8) -> Result<[Option<i64>; N]> {
		log::trace!("SQL: {sql} [{level}]");

		let conn = self.pool.get()?;
		let mut stmt = conn.prepare_cached(sql)?;
		Ok(stmt.query_row(params![level], |row| {
			let mut values = [None; N];
			for (i, value) in values.iter_mut().enumerate() {
				*value = row.get::<_, Option<i64>>(i)?;
			}
			Ok(values)
		})?)
	}

	fn extent_from_queries(&self, level: u8) -> Result<TileExtent> {
		let [x0, x1] = self.query_values::<2>(
			"SELECT MIN(tile_column), MAX(tile_column) FROM tiles WHERE zoom_level = ?1",
			level,
		)?;
		let (Some(x0), Some(x1)) = (x0, x1) else {
			return Ok(TileExtent::new_invalid());
		};

		/*
			MIN/MAX over tile_row is slow on large tables: SQLite can only use the
			(zoom_level, tile_column, tile_row) index efficiently for the leftmost columns.

			So the row range is first estimated on three known columns, which is a few index
			lookups. The exact MIN/MAX is then computed over rows beyond that estimate only,
			which lets SQLite skip most of the level.
		*/
		let xc = (x0 + x1) / 2;
		let columns = format!("(tile_column = {x0} OR tile_column = {xc} OR tile_column = {x1})");
		let [y0_estimate, y1_estimate] = self.query_values::<2>(
			&format!("SELECT MIN(tile_row), MAX(tile_row) FROM tiles WHERE zoom_level = ?1 AND {columns}"),
			level,
		)?;
		let (Some(y0_estimate), Some(y1_estimate)) = (y0_estimate, y1_estimate) else {
			return Ok(TileExtent::new_invalid());
		};

		let [y0] = self.query_values::<1>(
			&format!("SELECT MIN(tile_row) FROM tiles WHERE zoom_level = ?1 AND tile_row <= {y0_estimate}"),
			level,
		)?;
		let [y1] = self.query_values::<1>(
			&format!("SELECT MAX(tile_row) FROM tiles WHERE zoom_level = ?1 AND tile_row >= {y1_estimate}"),
			level,
		)?;

		TileExtent::from_options(
			Some(to_index(x0, "tile_column")?),
			Some(to_index(x1, "tile_column")?),
			y0.map(|v| to_index(v, "tile_row")).transpose()?,
			y1.map(|v| to_index(v, "tile_row")).transpose()?,
		)
	}

	fn read_tile(&self, coord: &TileCoord) -> Result<Option<Blob>> {
		let conn = self.pool.get()?;
		let mut stmt =
			conn.prepare_cached("SELECT tile_data FROM tiles WHERE zoom_level = ?1 AND tile_column = ?2 AND tile_row = ?3")?;
		let data = stmt
			.query_row(params![coord.level, coord.column, coord.row], |row| {
				Ok(cell_to_blob(row.get_ref(0)?))
			})
			.optional()?;
		Ok(data)
	}

	fn sample_format(&self) -> Result<Option<TileFormat>> {
		let conn = self.pool.get()?;
		let mut stmt = conn.prepare("SELECT tile_data FROM tiles LIMIT ?1")?;
		let mut rows = stmt.query(params![FORMAT_SAMPLE_SIZE])?;
		while let Some(row) = rows.next()? {
			let ValueRef::Blob(data) = row.get_ref(0)? else {
				continue;
			};
			if let Some(format) = mbmerge_image::detect_format(&Blob::from(data)) {
				return Ok(Some(format));
			}
		}
		Ok(None)
	}

	fn read_metadata(&self) -> Result<Vec<(String, String)>> {
		let conn = self.pool.get()?;
		let has_table = conn
			.query_row(
				"SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'metadata'",
				[],
				|_| Ok(()),
			)
			.optional()?
			.is_some();
		if !has_table {
			return Ok(Vec::new());
		}

		let mut stmt = conn.prepare("SELECT name, value FROM metadata")?;
		let entries = stmt.query_map([], |row| {
			Ok((row.get::<_, Option<String>>(0)?, row.get::<_, Option<String>>(1)?))
		})?;

		let mut metadata = Vec::new();
		for entry in entries {
			if let (Some(name), Some(value)) = entry? {
				metadata.push((name, value));
			}
		}
		Ok(metadata)
	}
}

impl TileStore for MBTilesReader {
	fn name(&self) -> &str {
		&self.name
	}

	fn zoom_levels(&self) -> Result<Vec<u8>> {
		let query = || -> Result<Vec<u8>> {
			let conn = self.pool.get()?;
			let mut stmt = conn.prepare("SELECT DISTINCT zoom_level FROM tiles ORDER BY zoom_level")?;
			let levels = stmt.query_map([], |row| row.get::<_, Option<i64>>(0))?;

			let mut result = Vec::new();
			for level in levels {
				// rows without a zoom level cannot be addressed
				if let Some(level) = level? {
					result.push(u8::try_from(level).with_context(|| format!("invalid zoom_level {level}"))?);
				}
			}
			Ok(result)
		};
		query().merge_context(|| MergeError::Store(format!("querying zoom levels of '{}'", self.name)))
	}

	fn extent_at(&self, level: u8) -> Result<TileExtent> {
		self
			.extent_from_queries(level)
			.merge_context(|| MergeError::Store(format!("querying extent of level {level} in '{}'", self.name)))
	}

	fn get_tile(&self, coord: &TileCoord) -> Result<Option<Blob>> {
		log::trace!("read tile {coord:?} from '{}'", self.name);
		self
			.read_tile(coord)
			.merge_context(|| MergeError::Store(format!("reading tile {coord:?} from '{}'", self.name)))
	}

	fn detect_format(&self) -> Result<Option<TileFormat>> {
		self
			.sample_format()
			.merge_context(|| MergeError::Store(format!("sampling tiles of '{}'", self.name)))
	}

	fn metadata(&self) -> Result<Vec<(String, String)>> {
		self
			.read_metadata()
			.merge_context(|| MergeError::Store(format!("reading metadata of '{}'", self.name)))
	}
}

impl std::fmt::Debug for MBTilesReader {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MBTilesReader").field("name", &self.name).finish()
	}
}

/// Bytes of a `tile_data` cell, whatever type SQLite stored it as.
///
/// `NULL` reads as an empty tile. Text and numbers keep their bytes, so they fail later as
/// undecodable images instead of failing the query.
fn cell_to_blob(value: ValueRef<'_>) -> Blob {
	match value {
		ValueRef::Null => Blob::new_empty(),
		ValueRef::Blob(bytes) | ValueRef::Text(bytes) => Blob::from(bytes),
		ValueRef::Integer(number) => Blob::from(number.to_string().into_bytes()),
		ValueRef::Real(number) => Blob::from(number.to_string().into_bytes()),
	}
}

fn to_index(value: i64, column: &str) -> Result<u32> {
	u32::try_from(value).with_context(|| format!("{column} {value} is not a valid tile index"))
}
