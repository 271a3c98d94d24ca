//! JPEG encoder for merged tiles.
//!
//! JPEG has no transparency: only 8-bit Grey and RGB images are accepted, so composited tiles
//! have to be flattened before they get here.

use crate::traits::DynamicImageTraitInfo;
use anyhow::{Context, Result, bail};
use image::{DynamicImage, ImageEncoder, codecs::jpeg::JpegEncoder};
use mbmerge_core::Blob;

/// Encode a `DynamicImage` into a JPEG [`Blob`].
///
/// * `quality`: 0..=99, defaults to **95**.
/// * Returns an error if the image is not 8-bit, has an alpha channel, or if `quality >= 100`.
pub fn encode(image: &DynamicImage, quality: Option<u8>) -> Result<Blob> {
	if image.bits_per_value() != 8 {
		bail!("JPEG only supports 8-bit images");
	}

	let quality = quality.unwrap_or(95);
	if quality >= 100 {
		bail!("JPEG does not support lossless compression, use a quality < 100");
	}

	if !matches!(image.channel_count(), 1 | 3) {
		bail!("JPEG only supports Grey or RGB images without alpha channel");
	}

	let mut buffer: Vec<u8> = Vec::new();
	JpegEncoder::new_with_quality(&mut buffer, quality)
		.write_image(
			image.as_bytes(),
			image.width(),
			image.height(),
			image.extended_color_type(),
		)
		.with_context(|| format!("encoding {}x{} image as JPEG", image.width(), image.height()))?;

	Ok(Blob::from(buffer))
}
