use anyhow::{Context, Result};
use r2d2_sqlite::rusqlite::Connection;

/// A fixed list of DDL statements that set up an empty store.
#[derive(Debug)]
pub struct StoreSchema {
	pub statements: &'static [&'static str],
}

/// Tables and indices of an MBTiles archive.
pub const MBTILES_SCHEMA: StoreSchema = StoreSchema {
	statements: &[
		"CREATE TABLE tiles (zoom_level integer, tile_column integer, tile_row integer, tile_data blob)",
		"CREATE TABLE metadata (name text, value text)",
		"CREATE UNIQUE INDEX name ON metadata (name)",
		"CREATE UNIQUE INDEX tile_index ON tiles (zoom_level, tile_column, tile_row)",
	],
};

impl StoreSchema {
	/// Executes all statements in order.
	pub fn apply(&self, conn: &Connection) -> Result<()> {
		for sql in self.statements {
			log::trace!("SQL: {sql}");
			conn.execute(sql, []).with_context(|| format!("executing '{sql}'"))?;
		}
		Ok(())
	}
}
