//! The capability interface between the compositor and an image library.
//!
//! [`TileCompositor`](crate::TileCompositor) only decides *which* layers get decoded, blended and
//! encoded; how that happens is up to an [`ImageBackend`]. [`RasterBackend`] implements it on top
//! of the `image` crate.

use crate::{format, traits::DynamicImageTraitOperation};
use anyhow::Result;
use image::DynamicImage;
use mbmerge_core::{Blob, TileFormat};

pub trait ImageBackend {
	type Image;

	/// Decodes an encoded tile into a 4-channel (RGB + alpha) image.
	fn decode(&self, blob: &Blob) -> Result<Self::Image>;

	/// Draws `top` over `bottom` in place. On error `bottom` must be unchanged.
	fn composite_over(&self, bottom: &mut Self::Image, top: &Self::Image) -> Result<()>;

	/// Flattens the image to opaque RGB and encodes it.
	fn encode(&self, image: Self::Image, format: TileFormat) -> Result<Blob>;
}

/// [`ImageBackend`] on top of the `image` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct RasterBackend;

impl ImageBackend for RasterBackend {
	type Image = DynamicImage;

	fn decode(&self, blob: &Blob) -> Result<DynamicImage> {
		Ok(format::decode_any(blob)?.into_rgba())
	}

	fn composite_over(&self, bottom: &mut DynamicImage, top: &DynamicImage) -> Result<()> {
		bottom.composite_over(top)
	}

	fn encode(&self, image: DynamicImage, format: TileFormat) -> Result<Blob> {
		format::encode(&image.into_no_alpha()?, format)
	}
}
