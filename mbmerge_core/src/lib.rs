//! Shared types of the mbmerge workspace: tile coordinates, per-zoom extents, image formats,
//! byte blobs and the error taxonomy used to tell recoverable from fatal merge failures.

pub mod error;
pub mod types;

pub use error::*;
pub use types::*;
