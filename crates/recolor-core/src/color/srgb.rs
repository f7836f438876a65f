//! sRGB transfer functions (IEC 61966-2-1)

/// Decode a gamma-encoded sRGB component to linear light.
///
/// Input and output are in the 0.0-1.0 range.
#[inline]
pub fn srgb_to_linear(u: f32) -> f32 {
    if u <= 0.04045 {
        u / 12.92
    } else {
        ((u + 0.055) / 1.055).powf(2.4)
    }
}

/// Encode a linear-light component back to gamma-encoded sRGB.
///
/// Input and output are in the 0.0-1.0 range.
#[inline]
pub fn linear_to_srgb(u: f32) -> f32 {
    if u <= 0.0031308 {
        12.92 * u
    } else {
        1.055 * u.powf(1.0 / 2.4) - 0.055
    }
}
