//! Buffers merged tiles and hands them to a [`TileSink`] in fixed-size batches.
//!
//! Batches are written as soon as they are full, but only [`TileBatchWriter::finalize`]
//! commits. A run that fails midway therefore leaves nothing durable behind.

use crate::TileSink;
use anyhow::{Context, Result, ensure};
use mbmerge_core::MergedTile;

/// What a [`TileBatchWriter`] has written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchStats {
	pub batches: u64,
	pub tiles: u64,
}

pub struct TileBatchWriter<S: TileSink> {
	sink: S,
	batch_size: usize,
	pending: Vec<MergedTile>,
	stats: BatchStats,
}

impl<S: TileSink> TileBatchWriter<S> {
	pub fn new(sink: S, batch_size: usize) -> Result<Self> {
		ensure!(batch_size >= 1, "batch size must be at least 1");
		Ok(TileBatchWriter {
			sink,
			batch_size,
			pending: Vec::with_capacity(batch_size),
			stats: BatchStats::default(),
		})
	}

	/// Queues a tile, writing the batch once it is full.
	pub fn add(&mut self, tile: MergedTile) -> Result<()> {
		self.pending.push(tile);
		if self.pending.len() >= self.batch_size {
			self.flush()?;
		}
		Ok(())
	}

	/// Writes the pending tiles, if any.
	pub fn flush(&mut self) -> Result<()> {
		if self.pending.is_empty() {
			return Ok(());
		}
		log::trace!("flush batch {} with {} tiles", self.stats.batches + 1, self.pending.len());
		self
			.sink
			.write_batch(&self.pending)
			.with_context(|| format!("writing batch of {} tiles", self.pending.len()))?;
		self.stats.batches += 1;
		self.stats.tiles += self.pending.len() as u64;
		self.pending.clear();
		Ok(())
	}

	/// Writes the remaining tiles, commits once and returns the sink.
	pub fn finalize(mut self) -> Result<(S, BatchStats)> {
		self.flush()?;
		self.sink.commit().context("committing merged tiles")?;
		log::debug!(
			"committed {} tiles in {} batches",
			self.stats.tiles,
			self.stats.batches
		);
		Ok((self.sink, self.stats))
	}

	pub fn stats(&self) -> BatchStats {
		self.stats
	}
}
