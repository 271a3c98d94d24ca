//! Stacks the layers found for one coordinate into a single output tile.
//!
//! The first layer is the base tile; every further layer is drawn over the accumulated image in
//! stack order, so the last source ends up on top. A stack with a single layer is returned
//! byte-for-byte, without decoding or re-encoding.
//!
//! Overlay layers are best effort: an empty buffer is skipped silently, a buffer that cannot be
//! decoded or composited is logged and skipped. Only a broken base layer fails the tile, tagged
//! as [`MergeError::TileDecode`] so the caller can skip the coordinate.

use crate::{ImageBackend, RasterBackend};
use anyhow::{Context, Result, bail};
use mbmerge_core::{Blob, MergeError, MergeErrorContext, TileFormat};

pub struct TileCompositor<B: ImageBackend = RasterBackend> {
	backend: B,
	format: TileFormat,
}

impl TileCompositor<RasterBackend> {
	/// Compositor that writes merged tiles as `format`, using the `image` crate.
	pub fn new(format: TileFormat) -> Self {
		TileCompositor::with_backend(RasterBackend, format)
	}
}

impl<B: ImageBackend> TileCompositor<B> {
	pub fn with_backend(backend: B, format: TileFormat) -> Self {
		TileCompositor { backend, format }
	}

	/// The encoding of merged tiles.
	pub fn format(&self) -> TileFormat {
		self.format
	}

	/// Composites `stack` (base first) into one encoded tile.
	///
	/// # Errors
	/// Fails if the stack is empty, the base layer cannot be decoded, or encoding fails.
	pub fn compose(&self, stack: &[Blob]) -> Result<Blob> {
		let (base, overlays) = match stack {
			[] => bail!("cannot compose an empty tile stack"),
			[single] => return Ok(single.clone()),
			[base, overlays @ ..] => (base, overlays),
		};

		let mut image = self
			.backend
			.decode(base)
			.merge_context(|| MergeError::TileDecode(format!("base layer ({} bytes)", base.len())))?;

		for (index, layer) in overlays.iter().enumerate() {
			if layer.is_empty() {
				log::trace!("skipping empty overlay layer {}", index + 1);
				continue;
			}
			if let Err(err) = self.draw_layer(&mut image, layer) {
				log::warn!("error in overlay layer {}, ignoring it: {err:#}", index + 1);
			}
		}

		self
			.backend
			.encode(image, self.format)
			.with_context(|| format!("encoding merged tile as {}", self.format))
	}

	fn draw_layer(&self, image: &mut B::Image, layer: &Blob) -> Result<()> {
		let top = self
			.backend
			.decode(layer)
			.merge_context(|| MergeError::TileDecode(format!("overlay layer {layer:?}")))?;
		self.backend.composite_over(image, &top)
	}
}
