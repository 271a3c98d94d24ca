//! Write merged tiles and metadata into a new MBTiles (SQLite) database.
//!
//! `MBTilesWriter::create` refuses to touch an existing file, then sets up the `tiles` and
//! `metadata` tables. Metadata is written immediately; tiles are written through the
//! [`TileSink`] interface inside one explicit transaction, opened with
//! [`begin`](MBTilesWriter::begin) and made durable by [`commit`](TileSink::commit).
//!
//! Coordinates are inserted exactly as read from the sources. Both sides use the same row
//! convention, so no flipping happens here.
//!
//! ## Example
//! ```rust,no_run
//! use mbmerge_container::{MBTilesWriter, TileSink};
//! use mbmerge_core::{Blob, MergedTile, TileCoord};
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut writer = MBTilesWriter::create(Path::new("merged.mbtiles"))?;
//!     writer.set_metadata("format", "png")?;
//!     writer.begin()?;
//!     writer.write_batch(&[MergedTile::new(TileCoord::new(0, 0, 0)?, Blob::from(b"tile"))])?;
//!     writer.commit()?;
//!     writer.close()
//! }
//! ```

use crate::{MBTILES_SCHEMA, TileSink};
use anyhow::{Context, Result, bail};
use mbmerge_core::{MergeError, MergeErrorContext, MergedTile};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::{
	SqliteConnectionManager,
	rusqlite::{ErrorCode, params},
};
use std::path::{Path, PathBuf};

/// Writer for a fresh MBTiles (SQLite) archive.
///
/// Keeps one connection checked out for its whole lifetime, so the transaction opened by
/// [`begin`](MBTilesWriter::begin) spans all batches.
pub struct MBTilesWriter {
	path: PathBuf,
	conn: PooledConnection<SqliteConnectionManager>,
	in_transaction: bool,
}

impl MBTilesWriter {
	/// Creates the database file at `path` and applies [`MBTILES_SCHEMA`].
	///
	/// # Errors
	/// A [`MergeError::Precondition`] if `path` already exists, a [`MergeError::Store`] if the
	/// database cannot be created.
	pub fn create(path: &Path) -> Result<MBTilesWriter> {
		log::debug!("create {path:?}");

		if path.exists() {
			bail!(MergeError::Precondition(format!("destination {path:?} already exists")));
		}

		let setup = || -> Result<PooledConnection<SqliteConnectionManager>> {
			let manager = SqliteConnectionManager::file(path);
			let pool = Pool::builder()
				.max_size(1)
				.max_lifetime(None)
				.idle_timeout(None)
				.build(manager)?;
			let conn = pool.get()?;
			MBTILES_SCHEMA.apply(&conn)?;
			Ok(conn)
		};
		let conn = setup().merge_context(|| MergeError::Store(format!("creating {path:?}")))?;

		Ok(MBTilesWriter {
			path: path.to_path_buf(),
			conn,
			in_transaction: false,
		})
	}

	/// Inserts or replaces one metadata entry.
	pub fn set_metadata(&self, name: &str, value: &str) -> Result<()> {
		log::trace!("set metadata {name} = {value}");
		self
			.conn
			.execute(
				"INSERT OR REPLACE INTO metadata (name, value) VALUES (?1, ?2)",
				params![name, value],
			)
			.merge_context(|| MergeError::Store(format!("setting metadata '{name}'")))?;
		Ok(())
	}

	/// Opens the transaction that receives all tile batches.
	pub fn begin(&mut self) -> Result<()> {
		if self.in_transaction {
			bail!("a transaction is already open on {:?}", self.path);
		}
		self
			.conn
			.execute_batch("BEGIN")
			.merge_context(|| MergeError::Store(format!("starting transaction on {:?}", self.path)))?;
		self.in_transaction = true;
		Ok(())
	}

	/// Releases the connection. An uncommitted transaction is rolled back.
	pub fn close(mut self) -> Result<()> {
		if self.in_transaction {
			log::warn!("closing {:?} with an open transaction, rolling back", self.path);
			self.in_transaction = false;
			self.conn.execute_batch("ROLLBACK").context("rolling back")?;
		}
		log::debug!("closed {:?}", self.path);
		Ok(())
	}

	fn insert(&self, tile: &MergedTile) -> Result<()> {
		let coord = &tile.coord;
		let mut stmt = self
			.conn
			.prepare_cached("INSERT INTO tiles (zoom_level, tile_column, tile_row, tile_data) VALUES (?1, ?2, ?3, ?4)")
			.merge_context(|| MergeError::Store("preparing tile insert".to_string()))?;

		match stmt.execute(params![coord.level, coord.column, coord.row, tile.blob.as_slice()]) {
			Ok(_) => Ok(()),
			Err(err) if err.sqlite_error_code() == Some(ErrorCode::ConstraintViolation) => Err(err)
				.merge_context(|| MergeError::IntegrityViolation(format!("tile {coord:?} was already written"))),
			Err(err) => Err(err).merge_context(|| MergeError::Store(format!("inserting tile {coord:?}"))),
		}
	}
}

impl TileSink for MBTilesWriter {
	fn write_batch(&mut self, tiles: &[MergedTile]) -> Result<()> {
		log::trace!("write batch of {} tiles to {:?}", tiles.len(), self.path);
		if !self.in_transaction {
			bail!("no open transaction on {:?}", self.path);
		}
		for tile in tiles {
			self.insert(tile)?;
		}
		Ok(())
	}

	fn commit(&mut self) -> Result<()> {
		if !self.in_transaction {
			bail!("no open transaction on {:?}", self.path);
		}
		self
			.conn
			.execute_batch("COMMIT")
			.merge_context(|| MergeError::Store(format!("committing {:?}", self.path)))?;
		self.in_transaction = false;
		log::debug!("committed {:?}", self.path);
		Ok(())
	}
}

impl std::fmt::Debug for MBTilesWriter {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MBTilesWriter")
			.field("path", &self.path)
			.field("in_transaction", &self.in_transaction)
			.finish()
	}
}
