//! Keeps renderer state in line with raster-driver conventions: pixel-center
//! snapping for axis-aligned geometry, line style resolution, and scoped
//! antialiasing overrides.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Offsets added to axis-aligned geometry so 1px strokes land on pixel
/// centers instead of straddling two rows or columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelOffsets {
    /// Applied to both endpoints of horizontal lines.
    pub hline: (f64, f64),
    /// Applied to both endpoints of vertical lines.
    pub vline: (f64, f64),
    /// Applied to rectangle corners and staircase (xy/yx) lines.
    pub corner: (f64, f64),
}

pub const PIXEL_CENTER: PixelOffsets = PixelOffsets {
    hline: (0.0, 0.5),
    vline: (0.5, 0.0),
    corner: (0.5, 0.5),
};

pub fn snap_hline(x1: f64, x2: f64, y: f64) -> [(f64, f64); 2] {
    let (dx, dy) = PIXEL_CENTER.hline;
    [(x1 + dx, y + dy), (x2 + dx, y + dy)]
}

pub fn snap_vline(x: f64, y1: f64, y2: f64) -> [(f64, f64); 2] {
    let (dx, dy) = PIXEL_CENTER.vline;
    [(x + dx, y1 + dy), (x + dx, y2 + dy)]
}

/// Snaps a two-point segment. Horizontal and vertical segments move to pixel
/// centers; diagonals are returned untouched for antialiased rendering.
pub fn snap_segment(x1: f64, y1: f64, x2: f64, y2: f64) -> [(f64, f64); 2] {
    if y1 == y2 {
        snap_hline(x1, x2, y1)
    } else if x1 == x2 {
        snap_vline(x1, y1, y2)
    } else {
        [(x1, y1), (x2, y2)]
    }
}

/// Whether a segment gets snapped (and drawn without antialiasing).
pub fn is_axis_aligned(x1: f64, y1: f64, x2: f64, y2: f64) -> bool {
    x1 == x2 || y1 == y2
}

/// Path rectangle for a stroked outline of `w`×`h` pixels at `(x, y)`.
///
/// The path is inset by half the line width on every side, so the stroke
/// covers exactly the pixels a fill of the same bounds would cover at its
/// border and never strays outside it.
pub fn stroke_rect_path(x: i32, y: i32, w: i32, h: i32, line_width: f64) -> (f64, f64, f64, f64) {
    let o = line_width / 2.0;
    (
        x as f64 + o,
        y as f64 + o,
        (w as f64 - line_width).max(0.0),
        (h as f64 - line_width).max(0.0),
    )
}

/// Whether an outline of `w`×`h` pixels leaves no interior, so the inset
/// stroke path would collapse and the outline has to be filled instead.
pub fn outline_fills_rect(w: i32, h: i32, line_width: f64) -> bool {
    w as f64 <= line_width || h as f64 <= line_width
}

/// Dash family of a line style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DashKind {
    #[default]
    Solid,
    Dash,
    Dot,
    DashDot,
    DashDotDot,
}

/// Line style as requested by widget code.
///
/// A `width` of 0 or 1 means "one device pixel"; larger values are used
/// literally. A non-empty `dashes` pattern overrides `dash`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineStyle {
    pub dash: DashKind,
    pub cap: Option<cairo::LineCap>,
    pub join: Option<cairo::LineJoin>,
    pub width: i32,
    pub dashes: Vec<f64>,
}

impl LineStyle {
    pub fn solid(width: i32) -> Self {
        Self {
            width,
            ..Self::default()
        }
    }

    pub fn with_dash(dash: DashKind, width: i32) -> Self {
        Self {
            dash,
            width,
            ..Self::default()
        }
    }

    /// Resolves the stroke width in user units for the given context.
    ///
    /// Thin lines convert a unit device vector through the inverse transform
    /// so they stay one pixel wide under any scale.
    pub fn resolved_width(&self, ctx: &cairo::Context) -> f64 {
        if self.width > 1 {
            return self.width as f64;
        }
        ctx.device_to_user_distance(1.0, 0.0)
            .map(|(dx, dy)| dx.hypot(dy))
            .ok()
            .filter(|w| w.is_finite() && *w > 0.0)
            .unwrap_or(1.0)
    }

    /// On/off segment lengths for a resolved width `w`.
    pub fn dash_pattern(&self, w: f64) -> Vec<f64> {
        if !self.dashes.is_empty() {
            return self.dashes.clone();
        }
        match self.dash {
            DashKind::Solid => Vec::new(),
            DashKind::Dash => vec![w, w],
            // zero-length dashes render as round dots one width across
            DashKind::Dot => vec![0.0, 2.0 * w],
            DashKind::DashDot => vec![3.0 * w, w, w, w],
            DashKind::DashDotDot => vec![3.0 * w, w, w, w, w, w],
        }
    }

    pub fn effective_cap(&self) -> cairo::LineCap {
        match (self.dash, self.cap) {
            (DashKind::Dot, _) => cairo::LineCap::Round,
            (_, Some(cap)) => cap,
            (_, None) => cairo::LineCap::Butt,
        }
    }

    /// Writes width, dashes, cap and join onto `ctx`.
    pub fn apply(&self, ctx: &cairo::Context) {
        let w = self.resolved_width(ctx);
        ctx.set_line_width(w);
        ctx.set_dash(&self.dash_pattern(w), 0.0);
        ctx.set_line_cap(self.effective_cap());
        ctx.set_line_join(self.join.unwrap_or(cairo::LineJoin::Miter));
    }
}

/// User-selectable antialiasing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum AntialiasMode {
    /// Renderer default.
    #[default]
    Default,
    /// Grayscale antialiasing.
    On,
    /// No antialiasing.
    Off,
}

impl AntialiasMode {
    pub fn to_cairo(self) -> cairo::Antialias {
        match self {
            AntialiasMode::Default => cairo::Antialias::Default,
            AntialiasMode::On => cairo::Antialias::Gray,
            AntialiasMode::Off => cairo::Antialias::None,
        }
    }
}

impl FromStr for AntialiasMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "default" => Ok(AntialiasMode::Default),
            "on" => Ok(AntialiasMode::On),
            "off" => Ok(AntialiasMode::Off),
            other => Err(format!("unknown antialias mode '{other}' (default, on, off)")),
        }
    }
}

impl fmt::Display for AntialiasMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AntialiasMode::Default => "default",
            AntialiasMode::On => "on",
            AntialiasMode::Off => "off",
        };
        f.write_str(name)
    }
}

/// Forces antialiasing off on a context until dropped, then restores the
/// configured mode.
#[must_use = "antialiasing is restored as soon as the guard is dropped"]
pub struct AntialiasOverride {
    ctx: cairo::Context,
    restore: AntialiasMode,
}

impl AntialiasOverride {
    pub fn force_off(ctx: &cairo::Context, configured: AntialiasMode) -> Self {
        ctx.set_antialias(cairo::Antialias::None);
        Self {
            ctx: ctx.clone(),
            restore: configured,
        }
    }
}

impl Drop for AntialiasOverride {
    fn drop(&mut self) {
        self.ctx.set_antialias(self.restore.to_cairo());
    }
}
