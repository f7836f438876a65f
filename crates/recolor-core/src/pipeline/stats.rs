//! Dominant color sampling
//!
//! Estimates the representative lightness, chroma, and hue of an image
//! with a strided scan, so the cost stays bounded for arbitrarily large
//! inputs.

use serde::Serialize;

use crate::color::{chroma, hue_angle, rgb_to_lab};
use crate::raster::RasterBuffer;

/// Cap on the number of pixels examined per scan.
const MAX_SAMPLES: f32 = 50_000.0;

/// Alpha below which a pixel is considered transparent and skipped.
const ALPHA_CUTOFF: u8 = 8;

/// Dominant color statistics of an image.
///
/// Hue is a circular mean computed from summed cosine/sine components;
/// a naive average would break at the +-pi wrap-around.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DominantStats {
    /// Mean lightness of the qualifying samples (L units, 0-100)
    pub mean_l: f32,

    /// Mean chroma of the qualifying samples
    pub mean_chroma: f32,

    /// Circular mean hue in radians
    pub hue: f32,
}

impl Default for DominantStats {
    /// Fallback statistics for images with no qualifying sample
    /// (flat gray, fully transparent, all near-white). These keep the
    /// remap well-defined instead of dividing by zero.
    fn default() -> Self {
        Self {
            mean_l: 50.0,
            mean_chroma: 20.0,
            hue: 0.0,
        }
    }
}

/// Sample the dominant lightness/chroma/hue of an image.
///
/// Pixels that are transparent, near-white near-gray (presumed paper or
/// background), or too desaturated to carry hue information are skipped.
pub fn sample_dominant(image: &RasterBuffer) -> DominantStats {
    let src = &image.data;
    let pixel_count = image.pixel_count();

    let stride = ((pixel_count as f32 / MAX_SAMPLES).sqrt().floor() as usize).max(1);

    let mut sum_l = 0.0f32;
    let mut sum_c = 0.0f32;
    let mut sum_cos = 0.0f32;
    let mut sum_sin = 0.0f32;
    let mut n = 0u32;

    for i in (0..src.len()).step_by(4 * stride) {
        if src[i + 3] < ALPHA_CUTOFF {
            continue;
        }

        let lab = rgb_to_lab(
            src[i] as f32 / 255.0,
            src[i + 1] as f32 / 255.0,
            src[i + 2] as f32 / 255.0,
        );
        let c = chroma(lab.a, lab.b);

        // Presumed paper/background, not content color
        if lab.l > 96.0 && c < 8.0 {
            continue;
        }
        // Too low-saturation to inform hue
        if c < 5.0 {
            continue;
        }

        sum_l += lab.l;
        sum_c += c;
        let h = hue_angle(lab.a, lab.b);
        sum_cos += h.cos();
        sum_sin += h.sin();
        n += 1;
    }

    if n == 0 {
        return DominantStats::default();
    }

    DominantStats {
        mean_l: sum_l / n as f32,
        mean_chroma: sum_c / n as f32,
        hue: sum_sin.atan2(sum_cos),
    }
}
