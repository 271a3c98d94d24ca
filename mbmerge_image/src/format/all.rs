use super::{jpeg, png, webp};
use anyhow::{Result, anyhow};
use image::{DynamicImage, ImageFormat, guess_format, load_from_memory};
use mbmerge_core::{Blob, TileFormat};

/// Encodes `image` in the given format. JPEG uses the default quality.
pub fn encode(image: &DynamicImage, format: TileFormat) -> Result<Blob> {
	match format {
		TileFormat::JPG => jpeg::encode(image, None),
		TileFormat::PNG => png::encode(image),
		TileFormat::WEBP => webp::encode(image),
	}
}

/// Decodes a tile of unknown format. Layers of one stack may come in different encodings.
pub fn decode_any(blob: &Blob) -> Result<DynamicImage> {
	load_from_memory(blob.as_slice()).map_err(|e| anyhow!("Failed to decode image ({} bytes): {e}", blob.len()))
}

/// Determines the encoding of a tile from its magic bytes.
///
/// Returns `None` for unknown data and for image formats tiles cannot be written in.
pub fn detect_format(blob: &Blob) -> Option<TileFormat> {
	match guess_format(blob.as_slice()).ok()? {
		ImageFormat::Jpeg => Some(TileFormat::JPG),
		ImageFormat::Png => Some(TileFormat::PNG),
		ImageFormat::WebP => Some(TileFormat::WEBP),
		_ => None,
	}
}
