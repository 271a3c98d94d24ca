//! Error taxonomy of a merge run.
//!
//! Errors travel as [`anyhow::Error`]. Where it matters whether a failure is recoverable, a
//! [`MergeError`] is attached as context, so the caller can classify the error with
//! [`MergeError::classify`] while the full cause chain stays intact:
//!
//! ```
//! use anyhow::{Result, anyhow};
//! use mbmerge_core::{MergeError, MergeErrorContext};
//!
//! let result: Result<()> = Err(anyhow!("disk I/O error"))
//!     .merge_context(|| MergeError::Store("reading 'base.mbtiles'".into()));
//! let err = result.unwrap_err();
//! assert!(matches!(MergeError::classify(&err), Some(MergeError::Store(_))));
//! assert!(!MergeError::classify(&err).unwrap().is_recoverable());
//! ```

use anyhow::Result;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
	/// Destination exists, a source is missing or no source was given. Nothing has been written.
	#[error("precondition failed: {0}")]
	Precondition(String),

	/// The base source has no zoom levels, or no tile of a determinable format.
	#[error("empty base source: {0}")]
	EmptySource(String),

	/// Connection or query failure against a store.
	#[error("store error: {0}")]
	Store(String),

	/// A tile buffer could not be decoded as an image.
	#[error("tile decode error: {0}")]
	TileDecode(String),

	/// Insert of a coordinate that already exists in the destination.
	#[error("integrity violation: {0}")]
	IntegrityViolation(String),
}

impl MergeError {
	/// Finds the `MergeError` attached anywhere in the context chain of `err`.
	pub fn classify(err: &anyhow::Error) -> Option<&MergeError> {
		err.downcast_ref::<MergeError>()
	}

	/// Only decode failures are contained locally; everything else ends the run.
	pub fn is_recoverable(&self) -> bool {
		matches!(self, MergeError::TileDecode(_))
	}
}

/// Attaches a [`MergeError`] to the error of a `Result`.
pub trait MergeErrorContext<T> {
	fn merge_context<F>(self, f: F) -> Result<T>
	where
		F: FnOnce() -> MergeError;
}

impl<T, E> MergeErrorContext<T> for std::result::Result<T, E>
where
	E: Into<anyhow::Error>,
{
	fn merge_context<F>(self, f: F) -> Result<T>
	where
		F: FnOnce() -> MergeError,
	{
		self.map_err(|e| {
			let err: anyhow::Error = e.into();
			err.context(f())
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use anyhow::{Context, anyhow, bail};

	#[test]
	fn classify_direct_error() {
		fn fail() -> Result<()> {
			bail!(MergeError::Precondition("destination exists".into()))
		}
		let err = fail().unwrap_err();
		assert_eq!(
			MergeError::classify(&err),
			Some(&MergeError::Precondition("destination exists".into()))
		);
		assert_eq!(err.to_string(), "precondition failed: destination exists");
	}

	#[test]
	fn classify_through_context_layers() {
		let err = Err::<(), _>(anyhow!("not a jpeg"))
			.merge_context(|| MergeError::TileDecode("overlay 1".into()))
			.context("merging tile 5/10/7")
			.unwrap_err();
		let kind = MergeError::classify(&err).unwrap();
		assert!(kind.is_recoverable());
		assert_eq!(
			err.chain().map(|e| e.to_string()).collect::<Vec<_>>(),
			vec!["merging tile 5/10/7", "tile decode error: overlay 1", "not a jpeg"]
		);
	}

	#[test]
	fn unclassified_error() {
		let err = anyhow!("something else");
		assert!(MergeError::classify(&err).is_none());
	}

	#[test]
	fn only_decode_errors_are_recoverable() {
		assert!(!MergeError::Store(String::new()).is_recoverable());
		assert!(!MergeError::EmptySource(String::new()).is_recoverable());
		assert!(!MergeError::IntegrityViolation(String::new()).is_recoverable());
		assert!(!MergeError::Precondition(String::new()).is_recoverable());
	}
}
