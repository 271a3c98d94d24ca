//! Raster side of mbmerge: decoding tiles, alpha-compositing layers and encoding the result.
//!
//! - [`format`]: per-format encoders/decoders and format detection from magic bytes.
//! - [`traits`]: extensions of [`DynamicImage`] used while compositing.
//! - [`ImageBackend`]: the capability interface the compositor is written against.
//! - [`TileCompositor`]: stacks the layers of one coordinate into a single tile.

mod backend;
mod compositor;
pub mod format;
pub mod traits;

pub use backend::*;
pub use compositor::*;
pub use format::{decode_any, detect_format, encode};
pub use image::{DynamicImage, GenericImageView, ImageBuffer, Rgba, RgbaImage};
