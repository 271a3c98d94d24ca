use crate::{Blob, TileCoord};

/// One composited output tile, ready to be inserted into the destination `tiles` table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergedTile {
	pub coord: TileCoord,
	pub blob: Blob,
}

impl MergedTile {
	#[must_use]
	pub fn new(coord: TileCoord, blob: Blob) -> MergedTile {
		MergedTile { coord, blob }
	}
}
