//! Configuration type definitions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::draw::clip::DEFAULT_CLIP_STACK_DEPTH;
use crate::draw::matrix::DEFAULT_MATRIX_STACK_DEPTH;
use crate::draw::{AntialiasMode, DriverOptions};
use crate::theme::BoxStyle;

/// Graphics driver settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DriverConfig {
    /// Antialiasing for curves and diagonal lines: "default", "on" or "off".
    /// Axis-aligned primitives are always drawn aliased.
    #[serde(default)]
    pub antialias: AntialiasMode,

    /// Maximum nesting of push_matrix (valid range: 4 - 256)
    #[serde(default = "default_matrix_stack_depth")]
    pub matrix_stack_depth: usize,

    /// Maximum nesting of push_clip (valid range: 4 - 256)
    #[serde(default = "default_clip_stack_depth")]
    pub clip_stack_depth: usize,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            antialias: AntialiasMode::default(),
            matrix_stack_depth: default_matrix_stack_depth(),
            clip_stack_depth: default_clip_stack_depth(),
        }
    }
}

impl From<&DriverConfig> for DriverOptions {
    fn from(config: &DriverConfig) -> Self {
        DriverOptions {
            antialias: config.antialias,
            matrix_stack_depth: config.matrix_stack_depth,
            clip_stack_depth: config.clip_stack_depth,
        }
    }
}

/// Box theme and palette settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ThemeConfig {
    /// Box theme: "Cairo" or "Vector"
    #[serde(default = "default_theme_name")]
    pub name: String,

    /// Color scheme: Black, Darker, Dark, Gray, "Washed out", Beige, Muted or Light
    #[serde(default = "default_scheme")]
    pub scheme: String,

    /// How much of a widget's color survives blending with the background
    /// in the Cairo theme (valid range: 0.0 - 1.0)
    #[serde(default = "default_box_saturation")]
    pub box_saturation: f32,

    /// Fill Cairo theme boxes with a vertical gradient
    #[serde(default = "default_gradients")]
    pub gradients: bool,

    /// Outline boxes in red to check their bounds
    #[serde(default)]
    pub debug_boxes: bool,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: default_theme_name(),
            scheme: default_scheme(),
            box_saturation: default_box_saturation(),
            gradients: default_gradients(),
            debug_boxes: false,
        }
    }
}

impl ThemeConfig {
    pub fn box_style(&self) -> BoxStyle {
        BoxStyle {
            saturation: self.box_saturation,
            gradients: self.gradients,
            debug: self.debug_boxes,
            ..BoxStyle::default()
        }
    }
}

fn default_matrix_stack_depth() -> usize {
    DEFAULT_MATRIX_STACK_DEPTH
}

fn default_clip_stack_depth() -> usize {
    DEFAULT_CLIP_STACK_DEPTH
}

fn default_theme_name() -> String {
    "Cairo".to_string()
}

fn default_scheme() -> String {
    "Gray".to_string()
}

fn default_box_saturation() -> f32 {
    0.6
}

fn default_gradients() -> bool {
    true
}
