//! Box themes and color schemes.
//!
//! A [`Theme`] maps [`BoxType`]s to drawing functions plus the insets that
//! tell widgets how much room the box decoration takes. Box types a theme
//! does not cover fall back to the flat built-in drawing below. A
//! [`ColorScheme`] rewrites the palette's base colors.

mod cairo_theme;
mod scheme;
mod vector_theme;

use std::collections::HashMap;

use log::{debug, info};

use crate::draw::{Color, Drawable, Palette};
use crate::error::ThemeError;
use crate::util::Rect;

pub use scheme::ColorScheme;

/// Widget box decorations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoxType {
    NoBox,
    FlatBox,
    UpBox,
    DownBox,
    ThinUpBox,
    ThinDownBox,
    UpFrame,
    DownFrame,
    RoundUpBox,
    RoundDownBox,
    BorderBox,
    RoundedBox,
    RShadowBox,
}

impl BoxType {
    /// The pressed counterpart of a raised box.
    pub fn down(self) -> BoxType {
        match self {
            BoxType::UpBox => BoxType::DownBox,
            BoxType::ThinUpBox => BoxType::ThinDownBox,
            BoxType::UpFrame => BoxType::DownFrame,
            BoxType::RoundUpBox => BoxType::RoundDownBox,
            other => other,
        }
    }

    pub fn is_down(self) -> bool {
        matches!(
            self,
            BoxType::DownBox | BoxType::ThinDownBox | BoxType::DownFrame | BoxType::RoundDownBox
        )
    }
}

/// Global knobs every box function reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxStyle {
    /// Draw boxes for an active widget; inactive boxes are washed out.
    pub active: bool,
    /// How much of the requested color survives blending with the background.
    pub saturation: f32,
    pub gradients: bool,
    /// Outline every box in red.
    pub debug: bool,
}

impl Default for BoxStyle {
    fn default() -> Self {
        Self {
            active: true,
            saturation: 0.6,
            gradients: true,
            debug: false,
        }
    }
}

impl BoxStyle {
    fn visible_color(&self, palette: &Palette, c: Color) -> Color {
        if self.active { c } else { palette.inactive(c) }
    }
}

pub type BoxDrawFn = fn(&mut dyn Drawable, &BoxStyle, Rect, Color);

/// A drawing function plus the space the decoration occupies.
#[derive(Clone, Copy)]
pub struct BoxDef {
    pub draw: BoxDrawFn,
    pub dx: i32,
    pub dy: i32,
    pub dw: i32,
    pub dh: i32,
}

impl BoxDef {
    pub const fn new(draw: BoxDrawFn, dx: i32, dy: i32, dw: i32, dh: i32) -> Self {
        Self { draw, dx, dy, dw, dh }
    }

    /// A uniform inset of `d` on every side.
    pub const fn uniform(draw: BoxDrawFn, d: i32) -> Self {
        Self::new(draw, d, d, d * 2, d * 2)
    }
}

impl std::fmt::Debug for BoxDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxDef")
            .field("dx", &self.dx)
            .field("dy", &self.dy)
            .field("dw", &self.dw)
            .field("dh", &self.dh)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub description: String,
    pub author: String,
    boxes: HashMap<BoxType, BoxDef>,
}

impl Theme {
    pub fn new(name: &str, description: &str, author: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            author: author.to_string(),
            boxes: HashMap::new(),
        }
    }

    pub fn with_box(mut self, kind: BoxType, def: BoxDef) -> Self {
        self.boxes.insert(kind, def);
        self
    }

    pub fn box_def(&self, kind: BoxType) -> Option<&BoxDef> {
        self.boxes.get(&kind)
    }

    pub fn covers(&self, kind: BoxType) -> bool {
        self.boxes.contains_key(&kind)
    }
}

/// Known themes and schemes plus the current selection.
#[derive(Debug, Default)]
pub struct ThemeRegistry {
    themes: Vec<Theme>,
    schemes: Vec<ColorScheme>,
    current: Option<usize>,
    style: BoxStyle,
    defaults_registered: bool,
}

impl ThemeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_defaults();
        registry
    }

    /// Registers the built-in themes and schemes. Calling it again is a
    /// no-op.
    pub fn register_defaults(&mut self) {
        if self.defaults_registered {
            return;
        }
        self.defaults_registered = true;
        self.add(cairo_theme::theme());
        self.add(vector_theme::theme());
        for scheme in scheme::builtin() {
            self.add_scheme(scheme);
        }
        debug!(
            "registered {} themes and {} color schemes",
            self.themes.len(),
            self.schemes.len()
        );
    }

    /// Adds a theme, replacing one with the same name.
    pub fn add(&mut self, theme: Theme) {
        match self.position(&theme.name) {
            Some(i) => self.themes[i] = theme,
            None => self.themes.push(theme),
        }
    }

    pub fn add_scheme(&mut self, scheme: ColorScheme) {
        match self
            .schemes
            .iter()
            .position(|s| s.name.eq_ignore_ascii_case(&scheme.name))
        {
            Some(i) => self.schemes[i] = scheme,
            None => self.schemes.push(scheme),
        }
    }

    pub fn themes(&self) -> &[Theme] {
        &self.themes
    }

    pub fn schemes(&self) -> &[ColorScheme] {
        &self.schemes
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.themes
            .iter()
            .position(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// Looks a theme up by name, ignoring case.
    pub fn find(&self, name: &str) -> Option<&Theme> {
        self.position(name).map(|i| &self.themes[i])
    }

    pub fn find_scheme(&self, name: &str) -> Option<&ColorScheme> {
        self.schemes
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
    }

    pub fn current(&self) -> Option<&Theme> {
        self.current.map(|i| &self.themes[i])
    }

    pub fn set_theme(&mut self, name: &str) -> Result<(), ThemeError> {
        let index = self
            .position(name)
            .ok_or_else(|| ThemeError::UnknownTheme(name.to_string()))?;
        self.current = Some(index);
        info!("theme set to {}", self.themes[index].name);
        Ok(())
    }

    /// Applies the named scheme to `palette`.
    pub fn apply_scheme(&self, name: &str, palette: &mut Palette) -> Result<(), ThemeError> {
        let scheme = self
            .find_scheme(name)
            .ok_or_else(|| ThemeError::UnknownScheme(name.to_string()))?;
        scheme.apply(palette);
        info!("color scheme set to {}", scheme.name);
        Ok(())
    }

    pub fn style(&self) -> &BoxStyle {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut BoxStyle {
        &mut self.style
    }

    fn box_def(&self, kind: BoxType) -> BoxDef {
        self.current()
            .and_then(|t| t.box_def(kind))
            .copied()
            .unwrap_or_else(|| fallback(kind))
    }

    /// Draws a box of `kind` filling `x, y, w, h` in `color`.
    ///
    /// Renderer state the box function changes (line width, source, the
    /// current color) is restored afterwards.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_box(
        &self,
        d: &mut dyn Drawable,
        kind: BoxType,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        color: Color,
    ) {
        if kind == BoxType::NoBox || w <= 0 || h <= 0 {
            return;
        }
        let def = self.box_def(kind);
        let previous = d.color();
        let cr = d.cairo().cloned();
        if let Some(cr) = &cr {
            cr.save().ok();
        }
        (def.draw)(d, &self.style, Rect::new(x, y, w, h), color);
        if let Some(cr) = &cr {
            cr.restore().ok();
        }
        d.set_color(previous);
    }

    pub fn box_dx(&self, kind: BoxType) -> i32 {
        self.box_def(kind).dx
    }

    pub fn box_dy(&self, kind: BoxType) -> i32 {
        self.box_def(kind).dy
    }

    pub fn box_dw(&self, kind: BoxType) -> i32 {
        self.box_def(kind).dw
    }

    pub fn box_dh(&self, kind: BoxType) -> i32 {
        self.box_def(kind).dh
    }

    /// The area inside the decoration of a `kind` box at `r`.
    pub fn interior(&self, kind: BoxType, r: Rect) -> Rect {
        let def = self.box_def(kind);
        r.inset(def.dx, def.dy, def.dw, def.dh)
    }
}

/// Adds a rounded rectangle as a new sub-path. The radius is clamped to half
/// the shorter side.
pub(crate) fn rounded_rect(cr: &cairo::Context, x: f64, y: f64, w: f64, h: f64, radius: f64) {
    use std::f64::consts::FRAC_PI_2;

    if w <= 0.0 || h <= 0.0 {
        return;
    }
    let r = radius.min(w / 2.0).min(h / 2.0).max(0.0);
    cr.new_sub_path();
    cr.arc(x + w - r, y + r, r, -FRAC_PI_2, 0.0);
    cr.arc(x + w - r, y + h - r, r, 0.0, FRAC_PI_2);
    cr.arc(x + r, y + h - r, r, FRAC_PI_2, 2.0 * FRAC_PI_2);
    cr.arc(x + r, y + r, r, 2.0 * FRAC_PI_2, 3.0 * FRAC_PI_2);
    cr.close_path();
}

fn fallback(kind: BoxType) -> BoxDef {
    match kind {
        BoxType::NoBox => BoxDef::uniform(no_box, 0),
        BoxType::FlatBox => BoxDef::uniform(flat_box, 0),
        BoxType::BorderBox => BoxDef::uniform(border_box, 1),
        BoxType::ThinUpBox => BoxDef::uniform(raised_box, 1),
        BoxType::ThinDownBox => BoxDef::uniform(sunken_box, 1),
        BoxType::UpFrame => BoxDef::uniform(raised_frame, 2),
        BoxType::DownFrame => BoxDef::uniform(sunken_frame, 2),
        kind if kind.is_down() => BoxDef::uniform(sunken_box, 2),
        _ => BoxDef::uniform(raised_box, 2),
    }
}

fn no_box(_: &mut dyn Drawable, _: &BoxStyle, _: Rect, _: Color) {}

fn flat_box(d: &mut dyn Drawable, style: &BoxStyle, r: Rect, c: Color) {
    let c = style.visible_color(d.palette(), c);
    d.rectf_color(r.x, r.y, r.w, r.h, c);
}

fn border_box(d: &mut dyn Drawable, style: &BoxStyle, r: Rect, c: Color) {
    flat_box(d, style, r, c);
    d.set_color(Color::FOREGROUND);
    d.rect(r.x, r.y, r.w, r.h);
}

/// One pixel bevel: `top_left` on the top and left edges, `bottom_right`
/// on the others.
fn bevel(d: &mut dyn Drawable, r: Rect, top_left: Color, bottom_right: Color) {
    let (right, bottom) = (r.x + r.w - 1, r.y + r.h - 1);
    d.set_color(top_left);
    d.xyline(r.x, r.y, right);
    d.yxline(r.x, r.y, bottom);
    d.set_color(bottom_right);
    d.xyline(r.x, bottom, right);
    d.yxline(right, r.y, bottom);
}

fn shades(d: &dyn Drawable, style: &BoxStyle, c: Color) -> (Color, Color, Color) {
    let p = d.palette();
    let fill = style.visible_color(p, c);
    (fill, p.lighter(fill), p.darker(fill))
}

fn raised_frame(d: &mut dyn Drawable, style: &BoxStyle, r: Rect, c: Color) {
    let (_, light, dark) = shades(d, style, c);
    bevel(d, r, light, dark);
}

fn sunken_frame(d: &mut dyn Drawable, style: &BoxStyle, r: Rect, c: Color) {
    let (_, light, dark) = shades(d, style, c);
    bevel(d, r, dark, light);
}

fn raised_box(d: &mut dyn Drawable, style: &BoxStyle, r: Rect, c: Color) {
    let (fill, light, dark) = shades(d, style, c);
    d.rectf_color(r.x, r.y, r.w, r.h, fill);
    bevel(d, r, light, dark);
}

fn sunken_box(d: &mut dyn Drawable, style: &BoxStyle, r: Rect, c: Color) {
    let (fill, light, dark) = shades(d, style, c);
    d.rectf_color(r.x, r.y, r.w, r.h, fill);
    bevel(d, r, dark, light);
}

#[cfg(test)]
mod tests;
