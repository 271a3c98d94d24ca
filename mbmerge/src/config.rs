use anyhow::{Result, bail};
use mbmerge_core::{CoveragePolicy, MergeError};
use std::path::{Path, PathBuf};

/// Number of merged tiles inserted per batch, unless configured otherwise.
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Everything a merge run needs to know, fixed before it starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergeConfig {
	/// Authoritative for zoom levels, format and (with [`CoveragePolicy::Base`]) coverage.
	pub base_path: PathBuf,
	/// Drawn over the base in this order, the last one on top.
	pub overlay_paths: Vec<PathBuf>,
	pub destination_path: PathBuf,
	pub batch_size: usize,
	pub coverage: CoveragePolicy,
}

impl MergeConfig {
	pub fn new(base_path: &Path, destination_path: &Path) -> MergeConfig {
		MergeConfig {
			base_path: base_path.to_path_buf(),
			overlay_paths: Vec::new(),
			destination_path: destination_path.to_path_buf(),
			batch_size: DEFAULT_BATCH_SIZE,
			coverage: CoveragePolicy::default(),
		}
	}

	/// Builds a config from the destination and the sources in argument order.
	///
	/// # Errors
	/// A [`MergeError::Precondition`] if `sources` is empty.
	pub fn from_paths(destination: &Path, sources: &[PathBuf]) -> Result<MergeConfig> {
		let Some((base, overlays)) = sources.split_first() else {
			bail!(MergeError::Precondition("at least one source is needed".to_string()));
		};
		let mut config = MergeConfig::new(base, destination);
		config.overlay_paths = overlays.to_vec();
		Ok(config)
	}

	pub fn with_overlay(mut self, path: &Path) -> MergeConfig {
		self.overlay_paths.push(path.to_path_buf());
		self
	}

	pub fn with_batch_size(mut self, batch_size: usize) -> MergeConfig {
		self.batch_size = batch_size;
		self
	}

	pub fn with_coverage(mut self, coverage: CoveragePolicy) -> MergeConfig {
		self.coverage = coverage;
		self
	}

	/// Base first, then the overlays.
	pub fn source_paths(&self) -> impl Iterator<Item = &Path> {
		std::iter::once(self.base_path.as_path()).chain(self.overlay_paths.iter().map(PathBuf::as_path))
	}

	/// Checks everything that can be checked without touching a store.
	///
	/// # Errors
	/// A [`MergeError::Precondition`] if the destination exists, a source is missing or the batch
	/// size is zero.
	pub fn validate(&self) -> Result<()> {
		if self.batch_size == 0 {
			bail!(MergeError::Precondition("batch size must be at least 1".to_string()));
		}
		if self.destination_path.exists() {
			bail!(MergeError::Precondition(format!(
				"destination {:?} already exists",
				self.destination_path
			)));
		}
		for path in self.source_paths() {
			if !path.exists() {
				bail!(MergeError::Precondition(format!("source {path:?} does not exist")));
			}
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use assert_fs::TempDir;
	use pretty_assertions::assert_eq;
	use rstest::rstest;

	#[test]
	fn from_paths_splits_base_and_overlays() -> Result<()> {
		let sources = [PathBuf::from("a.mbtiles"), PathBuf::from("b.mbtiles"), PathBuf::from("c.mbtiles")];
		let config = MergeConfig::from_paths(Path::new("out.mbtiles"), &sources)?
			.with_batch_size(5)
			.with_coverage(CoveragePolicy::Union);

		assert_eq!(
			config,
			MergeConfig {
				base_path: PathBuf::from("a.mbtiles"),
				overlay_paths: vec![PathBuf::from("b.mbtiles"), PathBuf::from("c.mbtiles")],
				destination_path: PathBuf::from("out.mbtiles"),
				batch_size: 5,
				coverage: CoveragePolicy::Union,
			}
		);
		assert_eq!(config.source_paths().collect::<Vec<_>>(), sources.iter().map(PathBuf::as_path).collect::<Vec<_>>());
		Ok(())
	}

	#[test]
	fn defaults() {
		let config = MergeConfig::new(Path::new("base.mbtiles"), Path::new("out.mbtiles"));
		assert_eq!(config.batch_size, 10);
		assert_eq!(config.coverage, CoveragePolicy::Base);
		assert!(config.overlay_paths.is_empty());
	}

	#[test]
	fn no_sources() {
		let err = MergeConfig::from_paths(Path::new("out.mbtiles"), &[]).unwrap_err();
		assert!(matches!(MergeError::classify(&err), Some(MergeError::Precondition(_))));
	}

	#[rstest]
	#[case::destination_exists("base.mbtiles", "existing.mbtiles", 10, "already exists")]
	#[case::missing_base("missing.mbtiles", "out.mbtiles", 10, "does not exist")]
	#[case::zero_batch_size("base.mbtiles", "out.mbtiles", 0, "at least 1")]
	fn validation_fails(
		#[case] base: &str,
		#[case] destination: &str,
		#[case] batch_size: usize,
		#[case] message: &str,
	) -> Result<()> {
		let dir = TempDir::new()?;
		std::fs::write(dir.path().join("base.mbtiles"), "")?;
		std::fs::write(dir.path().join("existing.mbtiles"), "")?;

		let config =
			MergeConfig::new(&dir.path().join(base), &dir.path().join(destination)).with_batch_size(batch_size);
		let err = config.validate().unwrap_err();
		assert!(matches!(MergeError::classify(&err), Some(MergeError::Precondition(_))));
		assert!(err.to_string().contains(message), "{err}");
		Ok(())
	}

	#[test]
	fn missing_overlay() -> Result<()> {
		let dir = TempDir::new()?;
		std::fs::write(dir.path().join("base.mbtiles"), "")?;
		let config = MergeConfig::new(&dir.path().join("base.mbtiles"), &dir.path().join("out.mbtiles"))
			.with_overlay(&dir.path().join("overlay.mbtiles"));
		assert!(config.validate().is_err());
		std::fs::write(dir.path().join("overlay.mbtiles"), "")?;
		config.validate()
	}
}
