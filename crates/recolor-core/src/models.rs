//! Data models for the recolor engine
//!
//! The parameter struct is fully resolved at construction: every field
//! has a documented default and range, and `sanitize` clamps anything
//! out of range before the pipeline sees it.

use serde::{Deserialize, Serialize};

/// Stylistic finishing pass applied after the hue/chroma remap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Finish {
    /// No finish pass
    None,

    /// Specular sheen plus chroma boost toward the highlights
    #[default]
    Glossy,

    /// Shadow lift, highlight roll-off, and chroma damping
    Matte,
}

/// Recolor parameters
///
/// Every invocation of the pipeline receives a complete value; there are
/// no partial/patch semantics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecolorParams {
    /// Target color as a 6-hex-digit RGB literal; malformed values
    /// resolve to black inside the pipeline
    #[serde(default = "default_target_color")]
    pub target_color: String,

    /// Final blend ratio toward the fully processed pixel (0-100)
    #[serde(default = "default_strength")]
    pub strength: f32,

    /// Lightness threshold above which near-gray pixels pass through
    /// untouched (88-99, L units)
    #[serde(default = "default_white_protect")]
    pub white_protect: f32,

    /// Finish mode
    #[serde(default)]
    pub finish: Finish,

    /// Intensity of the finish effect (0-100)
    #[serde(default = "default_finish_strength")]
    pub finish_strength: f32,

    /// Midtone chroma boost intensity (0-100)
    #[serde(default = "default_vibrance")]
    pub vibrance: f32,

    /// S-curve contrast intensity (0-100)
    #[serde(default = "default_depth")]
    pub depth: f32,

    /// Local-contrast intensity (0-100)
    #[serde(default = "default_clarity")]
    pub clarity: f32,

    /// Hue bias in the -50..50 range, mapping to +-12 degrees at the extremes
    #[serde(default)]
    pub warm: f32,
}

fn default_target_color() -> String {
    "#FE8F8D".to_string()
}

fn default_strength() -> f32 {
    100.0
}

fn default_white_protect() -> f32 {
    94.0
}

fn default_finish_strength() -> f32 {
    65.0
}

fn default_vibrance() -> f32 {
    45.0
}

fn default_depth() -> f32 {
    30.0
}

fn default_clarity() -> f32 {
    25.0
}

impl Default for RecolorParams {
    fn default() -> Self {
        Self {
            target_color: default_target_color(),
            strength: default_strength(),
            white_protect: default_white_protect(),
            finish: Finish::default(),
            finish_strength: default_finish_strength(),
            vibrance: default_vibrance(),
            depth: default_depth(),
            clarity: default_clarity(),
            warm: 0.0,
        }
    }
}

impl RecolorParams {
    /// Neutral parameters: full-strength remap with every stylization
    /// pass disabled.
    pub fn neutral(target_color: &str) -> Self {
        Self {
            target_color: target_color.to_string(),
            strength: 100.0,
            white_protect: default_white_protect(),
            finish: Finish::None,
            finish_strength: 0.0,
            vibrance: 0.0,
            depth: 0.0,
            clarity: 0.0,
            warm: 0.0,
        }
    }

    /// Clamp all fields to their documented ranges. Non-finite values
    /// fall back to the field default instead of propagating NaN into
    /// the pipeline.
    pub fn sanitize(&mut self) {
        self.strength = sanitize_field(self.strength, default_strength()).clamp(0.0, 100.0);
        self.white_protect =
            sanitize_field(self.white_protect, default_white_protect()).clamp(88.0, 99.0);
        self.finish_strength =
            sanitize_field(self.finish_strength, default_finish_strength()).clamp(0.0, 100.0);
        self.vibrance = sanitize_field(self.vibrance, default_vibrance()).clamp(0.0, 100.0);
        self.depth = sanitize_field(self.depth, default_depth()).clamp(0.0, 100.0);
        self.clarity = sanitize_field(self.clarity, default_clarity()).clamp(0.0, 100.0);
        self.warm = sanitize_field(self.warm, 0.0).clamp(-50.0, 50.0);
    }
}

fn sanitize_field(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}
