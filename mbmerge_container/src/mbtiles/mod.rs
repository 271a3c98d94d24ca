//! `SQLite` file `*.mbtiles` as tile store
//!
//! - `MBTilesReader`: reads zoom levels, extents, tiles and metadata of an existing archive.
//! - `MBTilesWriter`: creates a new archive and writes merged tiles into it.
//! - `MBTILES_SCHEMA`: the statements that create the tables and indices of a new archive.

mod reader;
mod schema;
mod writer;

pub use reader::MBTilesReader;
pub use schema::*;
pub use writer::MBTilesWriter;
