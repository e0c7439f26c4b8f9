//! Rotary knob.

use std::f64::consts::PI;

use super::Widget;
use crate::draw::{Color, Damage, Drawable, LineStyle};
use crate::theme::{BoxType, ThemeRegistry};
use crate::util::Rect;

const MAX_SCALE_TICKS: i32 = 31;
/// Half the cursor's sweep, in degrees.
const CURSOR_HALF_SWEEP: f64 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialStyle {
    /// Value shown as a thick arc over a darker track.
    Arc,
    #[default]
    Plastic,
    /// Plastic knob with a brushed-metal cap.
    Burnished,
}

#[derive(Debug, Clone)]
pub struct Dial {
    bounds: Rect,
    minimum: f64,
    maximum: f64,
    value: f64,
    angle1: f64,
    angle2: f64,
    style: DialStyle,
    scale_ticks: i32,
    box_type: BoxType,
    color: Color,
    selection_color: Color,
    active: bool,
    damage: Damage,
}

impl Dial {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self {
            bounds: Rect::new(x, y, w, h),
            minimum: 0.0,
            maximum: 1.0,
            value: 0.0,
            angle1: 45.0,
            angle2: 315.0,
            style: DialStyle::default(),
            scale_ticks: 12,
            box_type: BoxType::NoBox,
            color: Color::BACKGROUND,
            selection_color: Color::SELECTION,
            active: true,
            damage: Damage::ALL,
        }
    }

    pub fn with_style(mut self, style: DialStyle) -> Self {
        self.style = style;
        self
    }

    pub fn style(&self) -> DialStyle {
        self.style
    }

    pub fn set_style(&mut self, style: DialStyle) {
        self.style = style;
        self.damage |= Damage::ALL;
    }

    pub fn set_range(&mut self, minimum: f64, maximum: f64) {
        self.minimum = minimum;
        self.maximum = maximum;
        self.value = self.clamp(self.value);
        self.damage |= Damage::ALL;
    }

    pub fn minimum(&self) -> f64 {
        self.minimum
    }

    pub fn maximum(&self) -> f64 {
        self.maximum
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Sets the value, clamped into the range. Returns whether it changed.
    pub fn set_value(&mut self, v: f64) -> bool {
        let v = self.clamp(v);
        if v == self.value {
            return false;
        }
        self.value = v;
        self.damage |= Damage::EXPOSE;
        true
    }

    /// Clamps `v` into the range, whichever way round it is.
    pub fn clamp(&self, v: f64) -> f64 {
        let (lo, hi) = if self.minimum <= self.maximum {
            (self.minimum, self.maximum)
        } else {
            (self.maximum, self.minimum)
        };
        v.clamp(lo, hi)
    }

    pub fn angles(&self) -> (f64, f64) {
        (self.angle1, self.angle2)
    }

    pub fn set_angles(&mut self, angle1: f64, angle2: f64) {
        self.angle1 = angle1;
        self.angle2 = angle2;
        self.damage |= Damage::ALL;
    }

    pub fn scale_ticks(&self) -> i32 {
        self.scale_ticks
    }

    pub fn set_scale_ticks(&mut self, ticks: i32) {
        self.scale_ticks = ticks.clamp(0, MAX_SCALE_TICKS);
        self.damage |= Damage::ALL;
    }

    pub fn set_box(&mut self, box_type: BoxType) {
        self.box_type = box_type;
        self.damage |= Damage::ALL;
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
        self.damage |= Damage::ALL;
    }

    pub fn set_selection_color(&mut self, color: Color) {
        self.selection_color = color;
        self.damage |= Damage::ALL;
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
        self.damage |= Damage::ALL;
    }

    /// The largest square centered in the bounds: `(x, y, side)`.
    pub fn knob_dimensions(&self) -> (i32, i32, i32) {
        let Rect { x, y, w, h } = self.bounds;
        if w > h {
            (x + (w - h) / 2, y, h)
        } else {
            (x, y + (h - w) / 2, w)
        }
    }

    /// Angle in degrees that the current value maps to.
    pub fn angle_for_value(&self) -> f64 {
        let span = self.maximum - self.minimum;
        if span == 0.0 {
            return self.angle1;
        }
        (self.angle2 - self.angle1) * (self.value - self.minimum) / span + self.angle1
    }

    /// Applies a mouse wheel step. The control modifier makes steps finer.
    /// Returns whether the wheel was consumed.
    pub fn wheel(&mut self, dy: i32, ctrl: bool) -> bool {
        if dy == 0 {
            return false;
        }
        let steps = if ctrl { 128.0 } else { 16.0 };
        let step = (self.maximum - self.minimum).abs() / steps;
        // wheel up raises the value
        let dy = if self.maximum > self.minimum { -dy } else { dy };
        self.set_value(self.value + step * dy as f64);
        true
    }

    fn draw_arc_style(&self, d: &mut dyn Drawable, themes: &ThemeRegistry) {
        let (x, y, side) = self.knob_dimensions();
        themes.draw_box(d, self.box_type, x, y, side, side, self.color);

        let (x, y) = (x + side / 16, y + side / 16);
        let side = side - side / 8;
        let track = d.palette().darker(self.color);
        let end = self.angle_for_value();

        d.line_style(LineStyle::solid(side / 6));
        d.set_color(track);
        d.arc(x, y, side, side, 270.0 - self.angle1, 270.0 - self.angle2);
        d.set_color(self.selection_color);
        d.arc(x, y, side, side, 270.0 - self.angle1, 270.0 - end);
        d.line_style(LineStyle::default());
    }

    fn draw_knob(&self, d: &mut dyn Drawable) {
        let (ox, oy, side) = self.knob_dimensions();
        d.push_clip(ox, oy, side, side);

        let o = (side as f64 * 0.15) as i32;
        if self.damage.contains(Damage::ALL) {
            let scale = d.palette().average(self.color, Color::BACKGROUND2, 0.6);
            d.set_color(scale);
            d.pie(ox + 1, oy + 3, side - 2, side - 12, 0.0, 360.0);
            self.draw_scale(d, ox, oy, side);
        }

        let cap = if self.active {
            d.palette().average(Color::BACKGROUND, Color::WHITE, 0.7)
        } else {
            Color::INACTIVE
        };
        let (kx, ky, ks) = (ox + o, oy + o, side - o * 2);
        if self.style == DialStyle::Burnished {
            burnished_oval(d, kx, ky, ks, ks, cap);
        } else {
            let (shadow, face) = {
                let p = d.palette();
                (
                    p.average(Color::BACKGROUND, Color::BLACK, 0.8),
                    p.average(Color::BACKGROUND, Color::WHITE, 0.6),
                )
            };
            d.set_color(Color::BACKGROUND);
            d.pie(kx, ky, ks, ks, 0.0, 360.0);
            d.set_color(shadow);
            d.pie(kx + 2, ky + 3, ks, ks, 0.0, 360.0);
            d.set_color(cap);
            d.arc(kx, ky, ks, ks, 0.0, 360.0);
            d.set_color(face);
            d.pie(kx, ky, ks, ks, 0.0, 360.0);
        }
        d.pop_clip();
    }

    fn draw_scale(&self, d: &mut dyn Drawable, ox: i32, oy: i32, side: i32) {
        if self.scale_ticks == 0 {
            return;
        }
        let radius = (side / 2) as f64;
        let (cx, cy) = ((ox + side / 2) as f64, (oy + side / 2) as f64);
        let step = (10.0 * PI / 6.0) / self.scale_ticks as f64;
        let origin = -PI / 3.0;
        d.set_color(Color::BACKGROUND);
        for tick in 0..=self.scale_ticks {
            let (sin, cos) = (origin + tick as f64 * step).sin_cos();
            d.line(
                (cx + radius * cos) as i32,
                (cy - radius * sin) as i32,
                (cx + (radius - 6.0) * cos) as i32,
                (cy - (radius - 6.0) * sin) as i32,
            );
        }
    }

    fn draw_cursor(&self, d: &mut dyn Drawable) {
        let (ox, oy, side) = self.knob_dimensions();
        let color = d.palette().contrast(self.selection_color, Color::BACKGROUND);
        let angle = self
            .angle_for_value()
            .max(self.angle1 + CURSOR_HALF_SWEEP)
            .min(self.angle2 - CURSOR_HALF_SWEEP);

        let inset = side as f64 * 0.15;
        let x = (ox as f64 + inset) as i32;
        let y = (oy as f64 + inset) as i32;
        let s = (side as f64 - inset * 2.0) as i32;

        d.set_color(color);
        d.line_style(LineStyle::solid(side / 8));
        d.arc(
            x,
            y,
            s,
            s,
            270.0 - (angle - CURSOR_HALF_SWEEP),
            270.0 - (angle + CURSOR_HALF_SWEEP),
        );
        d.line_style(LineStyle::default());
    }
}

impl Widget for Dial {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn damage(&self) -> Damage {
        self.damage
    }

    fn draw(&mut self, d: &mut dyn Drawable, themes: &ThemeRegistry) {
        match self.style {
            DialStyle::Arc => self.draw_arc_style(d, themes),
            DialStyle::Plastic | DialStyle::Burnished => {
                self.draw_knob(d);
                self.draw_cursor(d);
            }
        }
        self.damage = Damage::NONE;
    }
}

/// Knob cap with a shadowed rim and glare wedges, like brushed aluminium.
fn burnished_oval(d: &mut dyn Drawable, x: i32, y: i32, w: i32, h: i32, c: Color) {
    let p = d.palette().clone();

    d.set_color(p.darker(c));
    d.pie(x, y, w, h, 0.0, 360.0);
    d.set_color(p.darker(p.darker(c)));
    d.pie(x, y, w, h, 180.0 + 215.0, 180.0 + 45.0);

    let (x, y, w, h) = (x + 4, y + 4, w - 7, h - 7);
    d.set_color(c);
    d.pie(x, y, w, h, 0.0, 360.0);

    const A1: f64 = 10.0;
    const A2: f64 = 90.0;
    let q = ((A2 - A1) / 2.0 / 2.0).floor();
    d.set_color(p.average(Color::WHITE, c, 0.15));
    d.pie(x, y, w, h, A1, A2);
    d.pie(x, y, w, h, 180.0 + A1, 180.0 + A2);
    d.set_color(p.average(Color::WHITE, c, 0.25));
    d.pie(x, y, w, h, A1 + q, A2 - q);
    d.pie(x, y, w, h, 180.0 + A1 + q, 180.0 + A2 - q);
}
