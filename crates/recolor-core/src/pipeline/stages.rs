//! Per-pixel pipeline stages
//!
//! White protection, hue/chroma remap, lightness lift, finish, and
//! vibrance all run in a single pass per pixel; the plan below is
//! computed once per `process` call from the target color and the
//! dominant statistics.

use crate::color::{chroma, hex_to_lab, hue_angle, rgb_to_lab, Lab};
use crate::models::{Finish, RecolorParams};

use super::smoothstep;
use super::stats::DominantStats;

/// Warm/cool bias at the extremes of the -50..50 input range, in degrees.
const WARM_BIAS_DEGREES: f32 = 12.0;

/// Chroma below which a near-white pixel counts as protected paper.
const PROTECT_CHROMA: f32 = 12.0;

/// Precomputed per-invocation remap parameters.
pub(crate) struct RemapPlan {
    cos_h: f32,
    sin_h: f32,
    chroma_scale: f32,
    lift: f32,
    white_cut: f32,
    pastel: f32,
    finish: Finish,
    finish_amount: f32,
    vibrance: f32,
}

impl RemapPlan {
    pub(crate) fn new(params: &RecolorParams, stats: &DominantStats) -> Self {
        let target = hex_to_lab(&params.target_color);
        let target_hue = hue_angle(target.a, target.b);
        let target_chroma = chroma(target.a, target.b);

        let warm_bias = (params.warm / 50.0) * WARM_BIAS_DEGREES.to_radians();
        let d_hue = target_hue - stats.hue + warm_bias;

        // Identity when either side is achromatic; scaling toward or from
        // a zero-chroma color would blow up or collapse every pixel.
        let chroma_scale = if target_chroma > 1e-3 && stats.mean_chroma > 1e-3 {
            (target_chroma / stats.mean_chroma).powf(0.9)
        } else {
            1.0
        };

        Self {
            cos_h: d_hue.cos(),
            sin_h: d_hue.sin(),
            chroma_scale,
            lift: (target.l - stats.mean_l).max(0.0),
            white_cut: params.white_protect,
            pastel: (target.l / 100.0).clamp(0.0, 1.0),
            finish: params.finish,
            finish_amount: params.finish_strength / 100.0,
            vibrance: params.vibrance / 100.0,
        }
    }
}

/// Fill one row of the Lab planes from the source RGBA bytes, applying
/// the per-pixel stages. `protected` marks pixels that pass through the
/// remap, lift, finish, vibrance, and depth stages unmodified.
pub(crate) fn remap_row(
    y: usize,
    width: usize,
    src: &[u8],
    plan: &RemapPlan,
    l_row: &mut [f32],
    a_row: &mut [f32],
    b_row: &mut [f32],
    protected_row: &mut [bool],
) {
    let row_base = y * width * 4;

    for x in 0..width {
        let i = row_base + x * 4;
        let alpha = src[i + 3];

        // Fully transparent pixels carry no color; leave them zeroed.
        if alpha == 0 {
            l_row[x] = 0.0;
            a_row[x] = 0.0;
            b_row[x] = 0.0;
            protected_row[x] = false;
            continue;
        }

        let lab = rgb_to_lab(
            src[i] as f32 / 255.0,
            src[i + 1] as f32 / 255.0,
            src[i + 2] as f32 / 255.0,
        );
        let c0 = chroma(lab.a, lab.b);

        // Paper protection: near-white near-gray passes through untouched.
        if lab.l >= plan.white_cut && c0 < PROTECT_CHROMA {
            l_row[x] = lab.l;
            a_row[x] = lab.a;
            b_row[x] = lab.b;
            protected_row[x] = true;
            continue;
        }

        let x_norm = if width > 1 {
            x as f32 / (width - 1) as f32
        } else {
            0.0
        };

        let out = remap_pixel(lab, x_norm, plan);
        l_row[x] = out.l;
        a_row[x] = out.a;
        b_row[x] = out.b;
        protected_row[x] = false;
    }
}

/// Apply the remap, lift, finish, and vibrance stages to one
/// non-protected pixel. `x_norm` is the pixel's normalized column
/// position, used by the glossy sheen direction term.
fn remap_pixel(lab: Lab, x_norm: f32, plan: &RemapPlan) -> Lab {
    // Hue rotate + chroma scale toward the target. A zero-chroma pixel
    // is invariant here: gray content never acquires color.
    let mut a = lab.a * plan.cos_h - lab.b * plan.sin_h;
    let mut b = lab.a * plan.sin_h + lab.b * plan.cos_h;
    if plan.chroma_scale != 1.0 {
        a *= plan.chroma_scale;
        b *= plan.chroma_scale;
    }

    // Lift toward the target lightness, rolled off near the protection
    // threshold so no seam appears against protected highlights.
    let roll_off = 1.0 - smoothstep(plan.white_cut - 8.0, 100.0, lab.l);
    let mut l = (lab.l + 0.85 * plan.lift * roll_off).clamp(0.0, 100.0);

    match plan.finish {
        Finish::Glossy if plan.finish_amount > 0.0 => {
            (l, a, b) = apply_glossy(l, a, b, x_norm, plan);
        }
        Finish::Matte if plan.finish_amount > 0.0 => {
            (l, a, b) = apply_matte(l, a, b, plan.finish_amount);
        }
        _ => {}
    }

    if plan.vibrance > 0.0 {
        (a, b) = apply_vibrance(l, a, b, plan);
    }

    Lab { l, a, b }
}

/// Glossy finish: specular sheen strongest in bright regions and toward
/// the right edge, with a pastel-weighted chroma boost.
fn apply_glossy(l: f32, a: f32, b: f32, x_norm: f32, plan: &RemapPlan) -> (f32, f32, f32) {
    let amount = plan.finish_amount;
    let bright = smoothstep(0.60, 0.98, l / 100.0);
    let dir = smoothstep(0.58, 1.00, x_norm).powf(1.1);
    let sheen = ((bright * 0.85 + dir * 0.35) * amount).clamp(0.0, 1.0);

    let l_out = (l + 28.0 * sheen).clamp(0.0, 100.0);

    // Replace the chroma magnitude, preserve the hue angle.
    let c_now = chroma(a, b);
    let c_boost = c_now * (1.0 + 0.55 * sheen) * (1.0 + 0.50 * sheen * plan.pastel) + 6.0 * sheen;
    let h = hue_angle(a, b);
    (l_out, c_boost * h.cos(), c_boost * h.sin())
}

/// Matte finish: lift shadows, roll off highlights, damp chroma.
fn apply_matte(l: f32, a: f32, b: f32, amount: f32) -> (f32, f32, f32) {
    let ln = l / 100.0;
    let lift_dn = ln + 0.18 * amount * (1.0 - ln);
    let roll_hi = lift_dn - 0.14 * amount * (lift_dn - 0.75).max(0.0);

    let damp = 1.0 - 0.35 * amount;
    ((roll_hi * 100.0).clamp(0.0, 100.0), a * damp, b * damp)
}

/// Vibrance: boost chroma in a midtone lightness window, preserving hue.
fn apply_vibrance(l: f32, a: f32, b: f32, plan: &RemapPlan) -> (f32, f32) {
    let ln = l / 100.0;
    let mid = smoothstep(0.12, 0.88, ln) * (1.0 - smoothstep(0.65, 0.97, ln));
    let extra = 0.6 * plan.pastel;
    let mult = 1.0 + plan.vibrance * (0.7 + extra) * mid;

    let c = chroma(a, b);
    let h = b.atan2(a);
    let c_new = c * mult;
    (c_new * h.cos(), c_new * h.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neutral_plan(target: &str) -> RemapPlan {
        RemapPlan::new(
            &RecolorParams::neutral(target),
            &DominantStats::default(),
        )
    }

    #[test]
    fn test_zero_chroma_pixel_is_remap_invariant() {
        let plan = neutral_plan("#FF0000");
        let gray = Lab {
            l: 40.0,
            a: 0.0,
            b: 0.0,
        };
        let out = remap_pixel(gray, 0.5, &plan);
        assert!(out.a.abs() < 1e-6);
        assert!(out.b.abs() < 1e-6);
    }

    #[test]
    fn test_achromatic_target_disables_chroma_scaling() {
        let plan = neutral_plan("#000000");
        assert!((plan.chroma_scale - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_warm_bias_rotates_hue() {
        let mut warm = RecolorParams::neutral("#FF0000");
        warm.warm = 50.0;
        let stats = DominantStats::default();

        let base = RemapPlan::new(&RecolorParams::neutral("#FF0000"), &stats);
        let biased = RemapPlan::new(&warm, &stats);

        let d_base = base.sin_h.atan2(base.cos_h);
        let d_biased = biased.sin_h.atan2(biased.cos_h);
        let twelve_deg = 12.0f32.to_radians();
        assert!((d_biased - d_base - twelve_deg).abs() < 1e-4);
    }

    #[test]
    fn test_matte_lifts_shadows_and_damps_chroma() {
        let (l, a, b) = apply_matte(10.0, 30.0, -20.0, 1.0);
        assert!(l > 10.0, "matte should lift shadows, got {}", l);
        assert!((a - 30.0 * 0.65).abs() < 1e-4);
        assert!((b - -20.0 * 0.65).abs() < 1e-4);
    }

    #[test]
    fn test_matte_rolls_off_highlights() {
        // Above the 0.75 knee, the roll-off pulls the lifted value back down.
        let (l_hi, _, _) = apply_matte(95.0, 0.0, 0.0, 1.0);
        let lifted = 0.95 + 0.18 * (1.0 - 0.95);
        assert!(l_hi < lifted * 100.0);
    }

    #[test]
    fn test_vibrance_preserves_hue() {
        let plan = RemapPlan::new(
            &RecolorParams {
                vibrance: 80.0,
                ..RecolorParams::neutral("#FF8080")
            },
            &DominantStats::default(),
        );
        let (a, b) = apply_vibrance(50.0, 12.0, 9.0, &plan);

        let h_before = 9.0f32.atan2(12.0);
        let h_after = b.atan2(a);
        assert!((h_before - h_after).abs() < 1e-5);
        assert!(chroma(a, b) > chroma(12.0, 9.0));
    }

    #[test]
    fn test_vibrance_window_is_zero_at_extremes() {
        let plan = RemapPlan::new(
            &RecolorParams {
                vibrance: 100.0,
                ..RecolorParams::neutral("#FF8080")
            },
            &DominantStats::default(),
        );

        for l in [2.0, 99.5] {
            let (a, b) = apply_vibrance(l, 10.0, 5.0, &plan);
            assert!((chroma(a, b) - chroma(10.0, 5.0)).abs() < 1e-3);
        }
    }

    #[test]
    fn test_glossy_single_column_has_no_nan() {
        let plan = RemapPlan::new(&RecolorParams::default(), &DominantStats::default());
        let (l, a, b) = apply_glossy(80.0, 5.0, 5.0, 0.0, &plan);
        assert!(l.is_finite() && a.is_finite() && b.is_finite());
    }
}
