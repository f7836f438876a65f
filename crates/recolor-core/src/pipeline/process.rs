//! Pipeline orchestration
//!
//! Runs the full recolor pass: dominant sampling, per-pixel remap into
//! planar Lab, the global tone and clarity passes, then compositing back
//! to sRGB bytes with the strength blend.

use rayon::prelude::*;

use crate::color::{lab_to_rgb, Lab};
use crate::models::RecolorParams;
use crate::raster::RasterBuffer;
use crate::verbose_println;

use super::clarity::apply_clarity;
use super::stages::{remap_row, RemapPlan};
use super::stats::sample_dominant;
use super::tone::apply_depth;
use super::PARALLEL_THRESHOLD;

/// Recolor an image toward the target color described by `params`.
///
/// The input buffer is never modified; the returned buffer has the same
/// dimensions, with alpha carried over byte for byte. Parameters are
/// sanitized before use, so out-of-range values clamp rather than fail.
pub fn process(image: &RasterBuffer, params: &RecolorParams) -> Result<RasterBuffer, String> {
    let mut params = params.clone();
    params.sanitize();

    let width = image.width as usize;
    let height = image.height as usize;
    let px = image.pixel_count();

    let stats = sample_dominant(image);
    verbose_println!(
        "[RECOLOR] dominant: L={:.2} C={:.2} hue={:.1}deg",
        stats.mean_l,
        stats.mean_chroma,
        stats.hue.to_degrees()
    );

    let plan = RemapPlan::new(&params, &stats);

    let mut l_plane = vec![0.0f32; px];
    let mut a_plane = vec![0.0f32; px];
    let mut b_plane = vec![0.0f32; px];
    let mut protected = vec![false; px];

    if px >= PARALLEL_THRESHOLD {
        l_plane
            .par_chunks_exact_mut(width)
            .zip(a_plane.par_chunks_exact_mut(width))
            .zip(b_plane.par_chunks_exact_mut(width))
            .zip(protected.par_chunks_exact_mut(width))
            .enumerate()
            .for_each(|(y, (((l_row, a_row), b_row), p_row))| {
                remap_row(y, width, &image.data, &plan, l_row, a_row, b_row, p_row);
            });
    } else {
        for y in 0..height {
            let lo = y * width;
            let hi = lo + width;
            remap_row(
                y,
                width,
                &image.data,
                &plan,
                &mut l_plane[lo..hi],
                &mut a_plane[lo..hi],
                &mut b_plane[lo..hi],
                &mut protected[lo..hi],
            );
        }
    }

    if crate::config::is_verbose() {
        let n = protected.iter().filter(|&&p| p).count();
        verbose_println!("[RECOLOR] protected pixels: {}/{}", n, px);
    }

    apply_depth(&mut l_plane, &protected, params.depth / 100.0);
    apply_clarity(&mut l_plane, width, height, params.clarity / 100.0);

    let mut out = vec![0u8; image.data.len()];
    composite(
        &image.data,
        &l_plane,
        &a_plane,
        &b_plane,
        &mut out,
        params.strength / 100.0,
    );

    RasterBuffer::new(image.width, image.height, out)
}

/// Convert the processed Lab planes back to sRGB and blend each pixel
/// between the original and the processed value by `strength`. Alpha
/// always comes from the source.
fn composite(src: &[u8], l: &[f32], a: &[f32], b: &[f32], dst: &mut [u8], strength: f32) {
    let run = |(i, out_px): (usize, &mut [u8])| {
        let s = &src[i * 4..i * 4 + 4];
        let alpha = s[3];

        if alpha == 0 {
            out_px.copy_from_slice(s);
            return;
        }

        let (r, g, bl) = lab_to_rgb(Lab {
            l: l[i],
            a: a[i],
            b: b[i],
        });
        let new = [r * 255.0, g * 255.0, bl * 255.0];
        for ch in 0..3 {
            let orig = s[ch] as f32;
            let blended = orig + (new[ch] - orig) * strength;
            out_px[ch] = blended.round().clamp(0.0, 255.0) as u8;
        }
        out_px[3] = alpha;
    };

    if l.len() >= PARALLEL_THRESHOLD {
        dst.par_chunks_exact_mut(4).enumerate().for_each(run);
    } else {
        dst.chunks_exact_mut(4).enumerate().for_each(run);
    }
}
