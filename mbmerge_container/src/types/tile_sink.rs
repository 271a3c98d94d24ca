use anyhow::Result;
use mbmerge_core::MergedTile;

/// Destination of merged tiles.
///
/// Batches are written uncommitted; nothing is durable before [`commit`](TileSink::commit).
pub trait TileSink {
	fn write_batch(&mut self, tiles: &[MergedTile]) -> Result<()>;

	/// Makes everything written so far durable. Called once, at the end of a run.
	fn commit(&mut self) -> Result<()>;
}
