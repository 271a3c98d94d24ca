//! Compositing operations on `DynamicImage`.
//!
//! Layers are normalised to `Rgba8`, blended with the Porter-Duff "over" operator and finally
//! flattened to `Rgb8` by dropping the alpha channel.

use super::info::DynamicImageTraitInfo;
use anyhow::{Result, bail};
use image::{DynamicImage, Rgba};

pub trait DynamicImageTraitOperation: DynamicImageTraitInfo {
	/// Converts any color type into `Rgba8`. `Rgba8` images are passed through.
	fn into_rgba(self) -> DynamicImage;

	/// Draws `top` over `self` in place, using the "over" operator per pixel.
	///
	/// Both images must be `Rgba8` and of identical size; otherwise `self` is left untouched
	/// and an error is returned.
	fn composite_over(&mut self, top: &DynamicImage) -> Result<()>;

	/// Unconditionally removes the alpha channel: `Rgba8` → `Rgb8`, `La8` → `L8`.
	///
	/// Color values are kept as they are, they are not blended against a background.
	fn into_no_alpha(self) -> Result<DynamicImage>;
}

impl DynamicImageTraitOperation for DynamicImage {
	fn into_rgba(self) -> DynamicImage {
		match self {
			DynamicImage::ImageRgba8(_) => self,
			other => DynamicImage::ImageRgba8(other.into_rgba8()),
		}
	}

	fn composite_over(&mut self, top: &DynamicImage) -> Result<()> {
		self.ensure_same_size(top)?;
		let (top_color, bottom_color) = (top.color(), self.color());
		let (DynamicImage::ImageRgba8(bottom), DynamicImage::ImageRgba8(top)) = (self, top) else {
			bail!("compositing needs two Rgba8 images, got {top_color:?} over {bottom_color:?}");
		};
		for (b, t) in bottom.pixels_mut().zip(top.pixels()) {
			*b = blend_over(*b, *t);
		}
		Ok(())
	}

	fn into_no_alpha(self) -> Result<DynamicImage> {
		Ok(match self {
			DynamicImage::ImageRgba8(_) => DynamicImage::from(self.into_rgb8()),
			DynamicImage::ImageLumaA8(_) => DynamicImage::from(self.into_luma8()),
			DynamicImage::ImageRgb8(_) | DynamicImage::ImageLuma8(_) => self,
			_ => bail!("Unsupported image type for removing alpha: {:?}", self.color()),
		})
	}
}

/// Porter-Duff "over": `top` drawn onto `bottom`, in integer arithmetic with rounding.
///
/// An opaque `top` replaces `bottom` exactly, a fully transparent `top` leaves it unchanged.
#[must_use]
pub fn blend_over(bottom: Rgba<u8>, top: Rgba<u8>) -> Rgba<u8> {
	let ta = u32::from(top[3]);
	match ta {
		255 => return top,
		0 => return bottom,
		_ => {}
	}

	let ba = u32::from(bottom[3]);
	let inv = 255 - ta;
	// resulting alpha, scaled by 255
	let alpha = ta * 255 + ba * inv;
	if alpha == 0 {
		return Rgba([0, 0, 0, 0]);
	}

	let channel = |i: usize| -> u8 {
		let value = u32::from(top[i]) * ta * 255 + u32::from(bottom[i]) * ba * inv;
		((value + alpha / 2) / alpha) as u8
	};

	Rgba([channel(0), channel(1), channel(2), ((alpha + 127) / 255) as u8])
}
