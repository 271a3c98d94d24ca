//! Trait extensions of [`image::DynamicImage`] used by the compositor:
//!
//! - [`DynamicImageTraitInfo`]: pixel layout introspection and comparison helpers.
//! - [`DynamicImageTraitOperation`]: channel normalisation and alpha compositing.

mod info;
mod operation;

pub use info::*;
pub use operation::*;
#[cfg(test)]
pub use test::*;
