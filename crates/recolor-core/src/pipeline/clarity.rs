//! Local-contrast enhancement on the lightness plane.
//!
//! A classic unsharp mask: separable box blur (radius 2, edge-clamped),
//! then add back the high-pass residual. Separability keeps the cost at
//! O(W*H*radius) per axis.

use rayon::prelude::*;

use super::PARALLEL_THRESHOLD;

const RADIUS: i64 = 2;
const WINDOW: f32 = (2 * RADIUS + 1) as f32;

/// Apply the clarity pass in place. No-op for `clarity <= 0`.
///
/// The blur runs over the full plane, protected pixels included: their
/// frozen lightness feeds neighboring averages and they receive the
/// high-pass themselves, which keeps edges around protected highlight
/// regions continuous.
pub(crate) fn apply_clarity(l_plane: &mut [f32], width: usize, height: usize, clarity: f32) {
    if clarity <= 0.0 || l_plane.is_empty() {
        return;
    }

    let mut tmp = vec![0.0f32; l_plane.len()];
    let mut blur = vec![0.0f32; l_plane.len()];

    blur_horizontal(l_plane, &mut tmp, width);
    blur_vertical(&tmp, &mut blur, width, height);

    let amount = 0.9 * clarity;
    if l_plane.len() >= PARALLEL_THRESHOLD {
        l_plane
            .par_iter_mut()
            .zip(blur.par_iter())
            .for_each(|(l, &b)| {
                let hp = *l - b;
                *l = (*l + amount * hp).clamp(0.0, 100.0);
            });
    } else {
        for (l, &b) in l_plane.iter_mut().zip(blur.iter()) {
            let hp = *l - b;
            *l = (*l + amount * hp).clamp(0.0, 100.0);
        }
    }
}

/// Horizontal box blur with edge-clamped sampling.
fn blur_horizontal(src: &[f32], dst: &mut [f32], width: usize) {
    let run = |(src_row, dst_row): (&[f32], &mut [f32])| {
        for x in 0..width {
            let mut sum = 0.0f32;
            for k in -RADIUS..=RADIUS {
                let xx = (x as i64 + k).clamp(0, width as i64 - 1) as usize;
                sum += src_row[xx];
            }
            dst_row[x] = sum / WINDOW;
        }
    };

    if src.len() >= PARALLEL_THRESHOLD {
        src.par_chunks_exact(width)
            .zip(dst.par_chunks_exact_mut(width))
            .for_each(run);
    } else {
        src.chunks_exact(width)
            .zip(dst.chunks_exact_mut(width))
            .for_each(run);
    }
}

/// Vertical box blur of the horizontal result, edge-clamped.
fn blur_vertical(src: &[f32], dst: &mut [f32], width: usize, height: usize) {
    let run = |(y, dst_row): (usize, &mut [f32])| {
        for (x, out) in dst_row.iter_mut().enumerate() {
            let mut sum = 0.0f32;
            for k in -RADIUS..=RADIUS {
                let yy = (y as i64 + k).clamp(0, height as i64 - 1) as usize;
                sum += src[yy * width + x];
            }
            *out = sum / WINDOW;
        }
    };

    if src.len() >= PARALLEL_THRESHOLD {
        dst.par_chunks_exact_mut(width).enumerate().for_each(run);
    } else {
        dst.chunks_exact_mut(width).enumerate().for_each(run);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_plane_is_unchanged() {
        // Blur of a constant plane equals the plane, so the high-pass
        // residual is zero everywhere.
        let mut l = vec![60.0f32; 5 * 4];
        apply_clarity(&mut l, 5, 4, 1.0);
        for v in &l {
            assert!((v - 60.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_zero_clarity_is_noop() {
        let mut l: Vec<f32> = (0..20).map(|i| i as f32 * 5.0).collect();
        let before = l.clone();
        apply_clarity(&mut l, 5, 4, 0.0);
        assert_eq!(l, before);
    }

    #[test]
    fn test_step_edge_contrast_increases() {
        // Dark half / bright half: clarity should push values at the
        // edge apart (darker dark, brighter bright).
        let width = 10;
        let height = 4;
        let mut l = Vec::with_capacity(width * height);
        for _ in 0..height {
            for x in 0..width {
                l.push(if x < width / 2 { 30.0 } else { 70.0 });
            }
        }
        let before = l.clone();
        apply_clarity(&mut l, width, height, 1.0);

        // Last dark column and first bright column sit inside the blur
        // radius of the edge.
        let dark_edge = width / 2 - 1;
        let bright_edge = width / 2;
        assert!(l[dark_edge] < before[dark_edge]);
        assert!(l[bright_edge] > before[bright_edge]);
    }

    #[test]
    fn test_output_stays_in_range() {
        let width = 8;
        let height = 2;
        let mut l = Vec::with_capacity(width * height);
        for _ in 0..height {
            for x in 0..width {
                l.push(if x % 2 == 0 { 0.0 } else { 100.0 });
            }
        }
        apply_clarity(&mut l, width, height, 1.0);
        for v in &l {
            assert!((0.0..=100.0).contains(v), "value out of range: {}", v);
        }
    }

    #[test]
    fn test_single_pixel_image() {
        let mut l = vec![42.0];
        apply_clarity(&mut l, 1, 1, 1.0);
        assert!((l[0] - 42.0).abs() < 1e-4);
    }
}
