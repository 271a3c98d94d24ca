//! This module provides the [`Blob`] struct, a wrapper around [`Vec<u8>`] holding the raw,
//! still encoded bytes of one tile as they are stored in a `tile_data` column.
//!
//! # Examples
//!
//! ```rust
//! use mbmerge_core::Blob;
//!
//! let blob = Blob::from(vec![0x89, 0x50, 0x4E, 0x47]);
//! assert_eq!(blob.len(), 4);
//! assert_eq!(blob.as_slice(), &[0x89, 0x50, 0x4E, 0x47]);
//! assert!(!blob.is_empty());
//! ```

use std::fmt::Debug;

/// Raw bytes of a single encoded tile.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Blob(Vec<u8>);

impl Blob {
	/// Creates an empty `Blob`.
	#[must_use]
	pub fn new_empty() -> Blob {
		Blob(Vec::new())
	}

	/// Returns the contents as a byte slice.
	#[must_use]
	pub fn as_slice(&self) -> &[u8] {
		&self.0
	}

	/// Consumes the `Blob` and returns the underlying vector.
	#[must_use]
	pub fn into_vec(self) -> Vec<u8> {
		self.0
	}

	/// Number of bytes.
	#[must_use]
	pub fn len(&self) -> u64 {
		self.0.len() as u64
	}

	/// A zero-length blob is what an empty `tile_data` cell reads as.
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Lowercase hex dump of the first `max_bytes` bytes, used in log output.
	#[must_use]
	pub fn as_hex_prefix(&self, max_bytes: usize) -> String {
		self.0
			.iter()
			.take(max_bytes)
			.map(|b| format!("{b:02x}"))
			.collect::<Vec<_>>()
			.join(" ")
	}
}

impl From<Vec<u8>> for Blob {
	fn from(item: Vec<u8>) -> Self {
		Blob(item)
	}
}

impl From<&[u8]> for Blob {
	fn from(item: &[u8]) -> Self {
		Blob(item.to_vec())
	}
}

impl<const N: usize> From<&[u8; N]> for Blob {
	fn from(item: &[u8; N]) -> Self {
		Blob(item.to_vec())
	}
}

impl Debug for Blob {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		if self.0.len() > 8 {
			write!(f, "Blob({}: {} ...)", self.0.len(), self.as_hex_prefix(8))
		} else {
			write!(f, "Blob({}: {})", self.0.len(), self.as_hex_prefix(8))
		}
	}
}
