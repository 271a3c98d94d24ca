//! PNG encoder for merged tiles.

use crate::traits::DynamicImageTraitInfo;
use anyhow::{Context, Result, bail};
use image::{
	DynamicImage, ImageEncoder,
	codecs::png::{CompressionType, FilterType, PngEncoder},
};
use mbmerge_core::Blob;

/// Encode a `DynamicImage` into a lossless PNG [`Blob`].
pub fn encode(image: &DynamicImage) -> Result<Blob> {
	if image.bits_per_value() != 8 {
		bail!("PNG only supports 8-bit images");
	}

	let mut buffer: Vec<u8> = Vec::new();
	PngEncoder::new_with_quality(&mut buffer, CompressionType::Default, FilterType::Adaptive)
		.write_image(
			image.as_bytes(),
			image.width(),
			image.height(),
			image.extended_color_type(),
		)
		.with_context(|| format!("encoding {}x{} image as PNG", image.width(), image.height()))?;

	Ok(Blob::from(buffer))
}
