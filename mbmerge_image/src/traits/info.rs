//! Image metadata and comparison utilities for `DynamicImage`.
use anyhow::{Result, ensure};
use image::{DynamicImage, ExtendedColorType};

pub trait DynamicImageTraitInfo {
	/// Returns the number of **bits per single channel value** (e.g. `8` for `Rgb8`, `La8`).
	fn bits_per_value(&self) -> u8;

	/// Returns the number of **channels** in the image (1, 2, 3 or 4 for 8-bit variants).
	fn channel_count(&self) -> u8;

	/// Computes a **per-channel difference score** against `other`.
	///
	/// The score for channel *i* is `ceil(10 * SSE_i / N) / 10`, where `SSE_i` is the sum of
	/// squared per-pixel differences for that channel and `N = width * height`.
	///
	/// Errors if the images differ in size or color model.
	fn diff(&self, other: &DynamicImage) -> Result<Vec<f64>>;

	/// Ensures both images share the **same dimensions**.
	fn ensure_same_size(&self, other: &DynamicImage) -> Result<()>;

	fn extended_color_type(&self) -> ExtendedColorType;

	/// `true` when the image has no alpha channel or all alpha values are `255`.
	fn is_opaque(&self) -> bool;
}

impl DynamicImageTraitInfo for DynamicImage {
	fn bits_per_value(&self) -> u8 {
		(self.color().bits_per_pixel() / u16::from(self.color().channel_count())) as u8
	}

	fn channel_count(&self) -> u8 {
		self.color().channel_count()
	}

	fn diff(&self, other: &DynamicImage) -> Result<Vec<f64>> {
		self.ensure_same_size(other)?;
		ensure!(
			self.color() == other.color(),
			"Pixel value type mismatch: self has {:?}, but the other image has {:?}",
			self.color(),
			other.color()
		);

		let channels = self.color().channel_count() as usize;
		let mut sqr_sum = vec![0u64; channels];

		for (p1, p2) in self.as_bytes().chunks_exact(channels).zip(other.as_bytes().chunks_exact(channels)) {
			for i in 0..channels {
				let d = i64::from(p1[i]) - i64::from(p2[i]);
				sqr_sum[i] += (d * d) as u64;
			}
		}

		let n = f64::from(self.width() * self.height());
		Ok(sqr_sum.iter().map(|v| (10.0 * (*v as f64) / n).ceil() / 10.0).collect())
	}

	fn ensure_same_size(&self, other: &DynamicImage) -> Result<()> {
		ensure!(
			self.width() == other.width() && self.height() == other.height(),
			"Image size mismatch: {}x{} vs {}x{}",
			self.width(),
			self.height(),
			other.width(),
			other.height()
		);
		Ok(())
	}

	fn extended_color_type(&self) -> ExtendedColorType {
		self.color().into()
	}

	fn is_opaque(&self) -> bool {
		match self {
			DynamicImage::ImageRgba8(img) => img.pixels().all(|p| p[3] == 255),
			DynamicImage::ImageLumaA8(img) => img.pixels().all(|p| p[1] == 255),
			_ => !self.color().has_alpha(),
		}
	}
}
