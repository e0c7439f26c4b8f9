//! Two-axis scroll overview with a draggable viewport cursor and a zoom
//! level.

use super::Widget;
use crate::draw::{Color, Damage, Drawable, add_alpha};
use crate::theme::{BoxType, ThemeRegistry};
use crate::util::Rect;

const MIN_CURSOR: i32 = 12;
/// Wheel scroll distance in widget pixels per notch.
const WHEEL_PIXELS: f64 = 5.0;

/// One axis: the scrollable extent and the visible window into it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Axis {
    pub first: f64,
    pub total: f64,
    pub pos: f64,
    pub size: f64,
}

impl Axis {
    fn set_range(&mut self, pos: i32, size: i32, first: i32, total: i32) -> bool {
        let total = if pos + size > first + total {
            pos + size - first
        } else {
            total
        };
        let next = Axis {
            first: first as f64,
            total: total as f64,
            pos: pos as f64,
            size: size as f64,
        };
        if next == *self {
            return false;
        }
        *self = next;
        true
    }

    fn set_pos(&mut self, v: f64) -> bool {
        if v == self.pos {
            return false;
        }
        self.pos = if v < self.first {
            self.first
        } else if v > self.total - self.size {
            self.total - self.size
        } else {
            v
        };
        true
    }

    /// Cursor position as a fraction of the extent; centered when the
    /// extent is empty.
    fn fraction(&self) -> f64 {
        if self.first == self.total {
            0.5
        } else {
            ((self.pos - self.first) / (self.total - self.first)).clamp(0.0, 1.0)
        }
    }
}

#[derive(Debug, Clone)]
pub struct Panzoomer {
    bounds: Rect,
    box_type: BoxType,
    color: Color,
    x: Axis,
    y: Axis,
    zoom: i32,
    zoom_min: i32,
    zoom_max: i32,
    drag_offset: Option<(i32, i32)>,
    damage: Damage,
}

impl Panzoomer {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self {
            bounds: Rect::new(x, y, w, h),
            box_type: BoxType::FlatBox,
            color: Color::BACKGROUND2,
            x: Axis::default(),
            y: Axis::default(),
            zoom: 1,
            zoom_min: 0,
            zoom_max: 4,
            drag_offset: None,
            damage: Damage::ALL,
        }
    }

    pub fn set_box(&mut self, box_type: BoxType) {
        self.box_type = box_type;
        self.damage |= Damage::ALL;
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
        self.damage |= Damage::ALL;
    }

    pub fn x_axis(&self) -> &Axis {
        &self.x
    }

    pub fn y_axis(&self) -> &Axis {
        &self.y
    }

    /// Sets the horizontal extent and window. `total` grows to fit the
    /// window when it would overhang.
    pub fn set_x_range(&mut self, pos: i32, size: i32, first: i32, total: i32) -> i32 {
        if self.x.set_range(pos, size, first, total) {
            self.damage |= Damage::USER1;
        }
        pos
    }

    pub fn set_y_range(&mut self, pos: i32, size: i32, first: i32, total: i32) -> i32 {
        if self.y.set_range(pos, size, first, total) {
            self.damage |= Damage::USER1;
        }
        pos
    }

    /// Moves the window, clamped so it stays inside the extent.
    pub fn set_x_pos(&mut self, v: f64) {
        if self.x.set_pos(v) {
            self.damage |= Damage::USER1;
        }
    }

    pub fn set_y_pos(&mut self, v: f64) {
        if self.y.set_pos(v) {
            self.damage |= Damage::USER1;
        }
    }

    pub fn zoom(&self) -> i32 {
        self.zoom
    }

    pub fn zoom_range(&self) -> (i32, i32) {
        (self.zoom_min, self.zoom_max)
    }

    pub fn set_zoom_range(&mut self, min: i32, max: i32) {
        self.zoom_min = min;
        self.zoom_max = max.max(min);
        self.set_zoom(self.zoom);
    }

    /// Sets the zoom level clamped to the zoom range. Returns whether it
    /// changed.
    pub fn set_zoom(&mut self, v: i32) -> bool {
        let z = v.clamp(self.zoom_min, self.zoom_max);
        if z == self.zoom {
            return false;
        }
        self.zoom = z;
        self.damage |= Damage::USER1;
        true
    }

    /// The area inside the box decoration.
    pub fn interior(&self, themes: &ThemeRegistry) -> Rect {
        themes.interior(self.box_type, self.bounds)
    }

    /// Where the viewport cursor sits inside `area`. Never smaller than
    /// 12×12.
    pub fn cursor_bounds(&self, area: Rect) -> Rect {
        let cx = area.x + (self.x.fraction() * area.w as f64 + 0.5) as i32;
        let has_y = self.y.total != 0.0;
        let cy = if has_y {
            area.y + (self.y.fraction() * area.h as f64 + 0.5) as i32
        } else {
            area.y
        };
        let cw = if self.x.total != 0.0 {
            (area.w as f64 * (self.x.size / self.x.total)) as i32
        } else {
            area.w
        };
        let ch = if has_y {
            (area.h as f64 * (self.y.size / self.y.total)) as i32
        } else {
            area.h
        };
        Rect::new(cx, cy, cw.max(MIN_CURSOR), ch.max(MIN_CURSOR))
    }

    /// Starts a drag at `(ex, ey)`. Grabbing the cursor keeps the grab point
    /// under the pointer; clicking elsewhere centers the cursor on it.
    pub fn press(&mut self, themes: &ThemeRegistry, ex: i32, ey: i32) {
        let cursor = self.cursor_bounds(self.interior(themes));
        let offset = if cursor.contains(ex, ey) {
            (ex - cursor.x, ey - cursor.y)
        } else {
            (cursor.w / 2, cursor.h / 2)
        };
        self.drag_offset = Some(offset);
        self.drag_to(themes, ex, ey);
    }

    /// Moves the cursor with the pointer. Ignored unless a drag is active.
    pub fn drag_to(&mut self, themes: &ThemeRegistry, ex: i32, ey: i32) -> bool {
        let Some((xoff, yoff)) = self.drag_offset else {
            return false;
        };
        let area = self.interior(themes);
        if area.is_empty() {
            return false;
        }
        let before = (self.x.pos, self.y.pos);
        self.set_x_pos((ex - area.x - xoff) as f64 / area.w as f64 * self.x.total);
        self.set_y_pos((ey - area.y - yoff) as f64 / area.h as f64 * self.y.total);
        self.damage |= Damage::USER1;
        before != (self.x.pos, self.y.pos)
    }

    pub fn release(&mut self) -> bool {
        self.drag_offset.take().is_some()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_offset.is_some()
    }

    /// Mouse wheel: with control it zooms, otherwise it scrolls.
    pub fn scroll(&mut self, themes: &ThemeRegistry, dx: i32, dy: i32, ctrl: bool) -> bool {
        if dy != 0 && ctrl {
            return self.set_zoom(self.zoom + dy);
        }
        let area = self.interior(themes);
        if area.is_empty() {
            return false;
        }
        if dy != 0 {
            self.set_y_pos(self.y.pos + dy as f64 * WHEEL_PIXELS / area.h as f64 * self.y.total);
        }
        if dx != 0 {
            self.set_x_pos(self.x.pos + dx as f64 * WHEEL_PIXELS / area.w as f64 * self.x.total);
        }
        dx != 0 || dy != 0
    }

    /// Arrow-key nudge by a fiftieth of the window size per step.
    pub fn nudge(&mut self, dx: i32, dy: i32) {
        let xs = (self.x.size / 50.0).trunc();
        let ys = (self.y.size / 50.0).trunc();
        self.set_x_pos(self.x.pos + dx as f64 * xs);
        self.set_y_pos(self.y.pos + dy as f64 * ys);
    }

    fn draw_cursor(&self, d: &mut dyn Drawable, area: Rect) {
        let c = self.cursor_bounds(area);
        let white = Color::WHITE.to_packed();
        let fill = Color::from_packed(add_alpha(d.palette(), white, 40));
        let edge = add_alpha(d.palette(), white, 200);
        d.rectf_color(c.x, c.y, c.w, c.h, fill);
        d.set_packed(edge);
        d.rect(c.x, c.y, c.w, c.h);
    }
}

impl Widget for Panzoomer {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn damage(&self) -> Damage {
        self.damage
    }

    fn draw(&mut self, d: &mut dyn Drawable, themes: &ThemeRegistry) {
        let b = self.bounds;
        themes.draw_box(d, self.box_type, b.x, b.y, b.w, b.h, self.color);
        let area = self.interior(themes);
        d.push_clip(area.x, area.y, area.w, area.h);
        self.draw_cursor(d, area);
        d.pop_clip();
        self.damage = Damage::NONE;
    }
}
