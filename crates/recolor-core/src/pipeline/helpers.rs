//! Small numeric helpers shared by the pipeline stages.

/// Hermite smoothstep: 0 at `e0`, 1 at `e1`, smooth in between.
#[inline]
pub(crate) fn smoothstep(e0: f32, e1: f32, x: f32) -> f32 {
    let t = ((x - e0) / (e1 - e0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smoothstep_endpoints() {
        assert!(smoothstep(0.0, 1.0, -0.5).abs() < f32::EPSILON);
        assert!(smoothstep(0.0, 1.0, 0.0).abs() < f32::EPSILON);
        assert!((smoothstep(0.0, 1.0, 1.0) - 1.0).abs() < f32::EPSILON);
        assert!((smoothstep(0.0, 1.0, 2.0) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_smoothstep_midpoint_and_monotonicity() {
        assert!((smoothstep(0.0, 1.0, 0.5) - 0.5).abs() < 1e-6);

        let mut prev = 0.0;
        for i in 0..=100 {
            let v = smoothstep(0.2, 0.8, i as f32 / 100.0);
            assert!(v >= prev, "smoothstep not monotonic at step {}", i);
            prev = v;
        }
    }
}
