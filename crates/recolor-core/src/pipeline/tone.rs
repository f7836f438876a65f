//! Global tonal depth: a fixed S-curve on the lightness plane.

use rayon::prelude::*;

use super::PARALLEL_THRESHOLD;

/// Apply the depth S-curve to every non-protected lightness value.
///
/// `t = L/100 - 0.5`, `out = L/100 + depth * (t - t^3)`. The midpoint
/// L=50 is a fixed point; shadows darken and highlights lighten
/// monotonically as `depth` grows. No-op for `depth <= 0`.
pub(crate) fn apply_depth(l_plane: &mut [f32], protected: &[bool], depth: f32) {
    if depth <= 0.0 {
        return;
    }

    let curve = |l: &mut f32| {
        let ln = *l / 100.0;
        let t = ln - 0.5;
        *l = ((ln + depth * (t - t * t * t)) * 100.0).clamp(0.0, 100.0);
    };

    if l_plane.len() >= PARALLEL_THRESHOLD {
        l_plane
            .par_iter_mut()
            .zip(protected.par_iter())
            .for_each(|(l, &skip)| {
                if !skip {
                    curve(l);
                }
            });
    } else {
        for (l, &skip) in l_plane.iter_mut().zip(protected.iter()) {
            if !skip {
                curve(l);
            }
        }
    }
}
