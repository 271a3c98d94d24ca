//! This module defines the `TileFormat` enum, the raster encodings a merged tile can be written in.
//!
//! The string forms match the values of the MBTiles `format` metadata entry.
//!
//! # Examples
//!
//! ```rust
//! use mbmerge_core::TileFormat;
//!
//! assert_eq!(TileFormat::PNG.as_str(), "png");
//! assert_eq!(TileFormat::JPG.to_string(), "jpg");
//! ```

#[cfg(feature = "cli")]
use clap::ValueEnum;
use std::fmt::{Display, Formatter};

/// Raster tile encodings.
#[allow(clippy::upper_case_acronyms)]
#[cfg_attr(feature = "cli", derive(ValueEnum))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TileFormat {
	JPG,
	PNG,
	WEBP,
}

impl TileFormat {
	/// Lowercase identifier, as stored in the MBTiles `format` metadata entry.
	pub fn as_str(&self) -> &'static str {
		match self {
			TileFormat::JPG => "jpg",
			TileFormat::PNG => "png",
			TileFormat::WEBP => "webp",
		}
	}
}

impl Display for TileFormat {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}
