//! Color management and transformations
//!
//! Provides the sRGB transfer functions and the sRGB <-> CIE LAB
//! conversions used by the recolor pipeline (sRGB working space,
//! D65 illuminant).

mod lab;
mod srgb;


// Re-export primary types
pub use lab::Lab;

// Re-export LAB functions
pub use lab::{chroma, hex_to_lab, hue_angle, lab_to_rgb, rgb_to_lab};

// Re-export transfer functions
pub use srgb::{linear_to_srgb, srgb_to_linear};
