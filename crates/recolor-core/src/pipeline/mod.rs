//! Recolor processing pipeline
//!
//! A pure, synchronous pass over a raster image:
//! - `stats`: dominant color sampling (strided, cost-bounded)
//! - `stages`: per-pixel hue/chroma remap, lightness lift, finish, vibrance
//! - `tone`: global S-curve contrast on lightness
//! - `clarity`: local-contrast enhancement via separable box blur
//! - `process`: orchestration and sRGB compositing

mod clarity;
mod helpers;
mod process;
mod stages;
mod stats;
mod tone;

#[cfg(test)]
mod tests;

/// Minimum number of pixels to trigger parallel processing
pub(crate) const PARALLEL_THRESHOLD: usize = 30_000;

pub use process::process;
pub use stats::{sample_dominant, DominantStats};

pub(crate) use helpers::smoothstep;
