//! LAB (CIE L*a*b*) color space conversions and utilities

use super::srgb::{linear_to_srgb, srgb_to_linear};

/// LAB color representation (CIE L*a*b*)
/// - l: 0.0-100.0 (lightness)
/// - a: approximately -128 to +128 (green-red axis)
/// - b: approximately -128 to +128 (blue-yellow axis)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lab {
    pub l: f32,
    pub a: f32,
    pub b: f32,
}

/// D65 standard illuminant reference white point
pub(crate) const D65_X: f32 = 0.95047;
pub(crate) const D65_Y: f32 = 1.00000;
pub(crate) const D65_Z: f32 = 1.08883;

/// sRGB to XYZ matrix (D65)
pub(crate) const SRGB_TO_XYZ: [[f32; 3]; 3] = [
    [0.4124564, 0.3575761, 0.1804375],
    [0.2126729, 0.7151522, 0.0721750],
    [0.0193339, 0.119_192, 0.9503041],
];

/// XYZ to sRGB matrix (D65)
pub(crate) const XYZ_TO_SRGB: [[f32; 3]; 3] = [
    [3.2404542, -1.5371385, -0.4985314],
    [-0.969_266, 1.8760108, 0.0415560],
    [0.0556434, -0.2040259, 1.0572252],
];

/// LAB f(t) function (CIE approximation constants)
#[inline]
fn lab_f(t: f32) -> f32 {
    if t > 0.008856 {
        t.cbrt()
    } else {
        7.787 * t + 16.0 / 116.0
    }
}

/// LAB f^-1(t) inverse function
#[inline]
fn lab_f_inv(t: f32) -> f32 {
    let t3 = t * t * t;
    if t3 > 0.008856 {
        t3
    } else {
        (t - 16.0 / 116.0) / 7.787
    }
}

/// Convert gamma-encoded sRGB to CIE LAB (D65 illuminant)
///
/// Input: sRGB values in range 0.0-1.0 (gamma-encoded, as stored in
/// 8-bit image data). The transfer function is applied internally.
/// Output: LAB where L is 0-100, a and b are approximately -128 to +128
#[inline]
pub fn rgb_to_lab(r: f32, g: f32, b: f32) -> Lab {
    let r = srgb_to_linear(r);
    let g = srgb_to_linear(g);
    let b = srgb_to_linear(b);

    let x = SRGB_TO_XYZ[0][0] * r + SRGB_TO_XYZ[0][1] * g + SRGB_TO_XYZ[0][2] * b;
    let y = SRGB_TO_XYZ[1][0] * r + SRGB_TO_XYZ[1][1] * g + SRGB_TO_XYZ[1][2] * b;
    let z = SRGB_TO_XYZ[2][0] * r + SRGB_TO_XYZ[2][1] * g + SRGB_TO_XYZ[2][2] * b;

    // Normalize by reference white
    let fx = lab_f(x / D65_X);
    let fy = lab_f(y / D65_Y);
    let fz = lab_f(z / D65_Z);

    Lab {
        l: 116.0 * fy - 16.0,
        a: 500.0 * (fx - fy),
        b: 200.0 * (fy - fz),
    }
}

/// Convert CIE LAB back to gamma-encoded sRGB (D65 illuminant)
///
/// Output components are clamped to the 0.0-1.0 range, so out-of-gamut
/// LAB values resolve to the nearest representable sRGB color.
#[inline]
pub fn lab_to_rgb(lab: Lab) -> (f32, f32, f32) {
    let Lab { l, a, b } = lab;

    let fy = (l + 16.0) / 116.0;
    let fx = fy + a / 500.0;
    let fz = fy - b / 200.0;

    let x = D65_X * lab_f_inv(fx);
    let y = D65_Y * lab_f_inv(fy);
    let z = D65_Z * lab_f_inv(fz);

    let rl = XYZ_TO_SRGB[0][0] * x + XYZ_TO_SRGB[0][1] * y + XYZ_TO_SRGB[0][2] * z;
    let gl = XYZ_TO_SRGB[1][0] * x + XYZ_TO_SRGB[1][1] * y + XYZ_TO_SRGB[1][2] * z;
    let bl = XYZ_TO_SRGB[2][0] * x + XYZ_TO_SRGB[2][1] * y + XYZ_TO_SRGB[2][2] * z;

    (
        linear_to_srgb(rl).clamp(0.0, 1.0),
        linear_to_srgb(gl).clamp(0.0, 1.0),
        linear_to_srgb(bl).clamp(0.0, 1.0),
    )
}

/// Chroma magnitude of an (a, b) pair.
#[inline]
pub fn chroma(a: f32, b: f32) -> f32 {
    a.hypot(b)
}

/// Hue angle of an (a, b) pair in radians.
#[inline]
pub fn hue_angle(a: f32, b: f32) -> f32 {
    b.atan2(a)
}

/// Parse a 6-hex-digit RGB literal ("#RRGGBB" or "RRGGBB") into LAB.
///
/// Malformed input resolves to black rather than failing; a bad color
/// choice must never abort the pipeline.
pub fn hex_to_lab(hex: &str) -> Lab {
    let digits = hex.strip_prefix('#').unwrap_or(hex);

    let (r, g, b) = if digits.len() == 6 && digits.bytes().all(|c| c.is_ascii_hexdigit()) {
        (
            u8::from_str_radix(&digits[0..2], 16).unwrap_or(0),
            u8::from_str_radix(&digits[2..4], 16).unwrap_or(0),
            u8::from_str_radix(&digits[4..6], 16).unwrap_or(0),
        )
    } else {
        (0, 0, 0)
    };

    rgb_to_lab(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
}
