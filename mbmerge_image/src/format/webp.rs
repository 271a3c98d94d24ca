//! WebP encoder for merged tiles.
//!
//! Encoding uses the lossless encoder of the `image` crate.

use crate::traits::DynamicImageTraitInfo;
use anyhow::{Context, Result, bail};
use image::{DynamicImage, ImageEncoder, codecs::webp::WebPEncoder};
use mbmerge_core::Blob;

/// Encode a `DynamicImage` into a lossless WebP [`Blob`].
pub fn encode(image: &DynamicImage) -> Result<Blob> {
	if image.bits_per_value() != 8 {
		bail!("WebP only supports 8-bit images");
	}

	let mut buffer: Vec<u8> = Vec::new();
	WebPEncoder::new_lossless(&mut buffer)
		.write_image(
			image.as_bytes(),
			image.width(),
			image.height(),
			image.extended_color_type(),
		)
		.with_context(|| format!("encoding {}x{} image as WebP", image.width(), image.height()))?;

	Ok(Blob::from(buffer))
}
