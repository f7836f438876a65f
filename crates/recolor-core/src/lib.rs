//! Recolor Core Library
//!
//! Core functionality for remapping an image's dominant color toward a
//! target color in CIE Lab space, with white protection and stylistic
//! finishing passes.

pub mod color;
pub mod config;
pub mod decoders;
pub mod exporters;
pub mod models;
pub mod pipeline;
pub mod presets;
pub mod raster;

// Re-export commonly used types
pub use color::Lab;
pub use models::{Finish, RecolorParams};
pub use pipeline::{process, sample_dominant, DominantStats};
pub use raster::RasterBuffer;
