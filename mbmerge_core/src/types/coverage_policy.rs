//! Which sources decide the set of coordinates that get merged.

#[cfg(feature = "cli")]
use clap::ValueEnum;
use std::fmt::{Display, Formatter};

#[cfg_attr(feature = "cli", derive(ValueEnum))]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum CoveragePolicy {
	/// Zoom levels and extents come from the base source only. Overlays are drawn where the
	/// base source has a tile and nowhere else.
	#[default]
	Base,
	/// Zoom levels and extents are the union over all sources. Any source can contribute the
	/// bottom layer of a coordinate.
	Union,
}

impl Display for CoveragePolicy {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(match self {
			CoveragePolicy::Base => "base",
			CoveragePolicy::Union => "union",
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_is_base() {
		assert_eq!(CoveragePolicy::default(), CoveragePolicy::Base);
		assert_eq!(CoveragePolicy::Union.to_string(), "union");
	}
}
