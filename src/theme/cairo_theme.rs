//! "Cairo": gradient-filled rounded boxes with soft outlines.

use std::f64::consts::PI;

use cairo::{Context, LinearGradient};

use super::{BoxDef, BoxStyle, BoxType, Theme, rounded_rect};
use crate::draw::{Color, Drawable, Rgba};
use crate::util::Rect;

const DX: i32 = 1;
const RADIUS: f64 = 2.0;

pub(super) fn theme() -> Theme {
    Theme::new("Cairo", "Pure Cairo Theme", "Jonathan Moore Liles")
        .with_box(BoxType::RShadowBox, BoxDef::new(round_shadow_box, 5, 5, 10, 10))
        .with_box(BoxType::RoundedBox, BoxDef::new(round_box, 4, 4, 8, 8))
        .with_box(BoxType::UpBox, BoxDef::uniform(up_box, DX))
        .with_box(BoxType::DownBox, BoxDef::uniform(down_box, DX))
        .with_box(BoxType::ThinUpBox, BoxDef::uniform(up_box, DX))
        .with_box(BoxType::ThinDownBox, BoxDef::uniform(down_box, DX))
        .with_box(BoxType::UpFrame, BoxDef::uniform(frame, DX))
        .with_box(BoxType::DownFrame, BoxDef::uniform(frame, DX))
        .with_box(BoxType::RoundUpBox, BoxDef::uniform(up_box, DX))
        .with_box(BoxType::RoundDownBox, BoxDef::uniform(down_box, DX))
}

/// The color actually painted for `c`: blended toward the background by the
/// saturation setting, washed out when inactive.
fn box_color(d: &dyn Drawable, style: &BoxStyle, c: Color) -> Rgba {
    let p = d.palette();
    let c = p.average(c, Color::BACKGROUND, style.saturation);
    p.resolve(style.visible_color(p, c))
}

fn set_rgb(cr: &Context, c: Rgba) {
    let (r, g, b, _) = c.to_unit();
    cr.set_source_rgb(r, g, b);
}

fn rect_path(cr: &Context, r: Rect, radius: f64) {
    let r = r.inset(DX, DX, DX * 2, DX * 2);
    rounded_rect(cr, r.x as f64, r.y as f64, r.w as f64, r.h as f64, radius);
}

fn outline(d: &dyn Drawable, style: &BoxStyle, r: Rect, c: Color, radius: f64) {
    let Some(cr) = d.cairo() else {
        return;
    };
    rect_path(cr, r, radius);
    set_rgb(cr, box_color(d, style, c));
    cr.set_line_width(1.0);
    let _ = cr.stroke_preserve();
    cr.set_source_rgba(0.0, 0.0, 0.0, 0.1);
    cr.set_line_width(DX as f64);
    let _ = cr.stroke();
}

fn filled(d: &dyn Drawable, style: &BoxStyle, r: Rect, c: Color, radius: f64) {
    let Some(cr) = d.cairo() else {
        return;
    };
    rect_path(cr, r, radius);
    let (red, green, blue, _) = box_color(d, style, c).to_unit();
    if style.gradients {
        let grad = LinearGradient::new(r.x as f64, r.y as f64, r.x as f64, (r.y + r.h) as f64);
        grad.add_color_stop_rgb(0.0, red, green, blue);
        grad.add_color_stop_rgb(0.4, red, green, blue);
        grad.add_color_stop_rgb(
            1.0,
            (red + 0.1).min(1.0),
            (green + 0.1).min(1.0),
            (blue + 0.1).min(1.0),
        );
        let _ = cr.set_source(&grad);
    } else {
        cr.set_source_rgb(red, green, blue);
    }
    let _ = cr.fill_preserve();
    cr.set_source_rgba(0.0, 0.0, 0.0, 0.3);
    cr.set_line_width(DX as f64 + 0.5);
    let _ = cr.stroke();
}

fn up_box(d: &mut dyn Drawable, style: &BoxStyle, r: Rect, c: Color) {
    filled(d, style, r, c, RADIUS);
    let highlight = d.palette().average(c, Color::WHITE, 0.25);
    outline(d, style, Rect::new(r.x + 1, r.y + 1, r.w - 3, r.h - 3), highlight, RADIUS);
    if style.debug {
        d.set_color(Color::RED);
        d.rect(r.x, r.y, r.w, r.h);
    }
}

fn down_box(d: &mut dyn Drawable, style: &BoxStyle, r: Rect, c: Color) {
    filled(d, style, Rect::new(r.x + 1, r.y, r.w - 2, r.h), c, RADIUS);
    let shade = {
        let p = d.palette();
        p.darker(p.darker(c))
    };
    outline(d, style, Rect::new(r.x, r.y, r.w - 1, r.h - 1), shade, RADIUS);
}

fn frame(d: &mut dyn Drawable, style: &BoxStyle, r: Rect, c: Color) {
    let shade = d.palette().darker(c);
    outline(d, style, Rect::new(r.x, r.y, r.w - 1, r.h - 1), shade, RADIUS);
}

fn round_box(d: &mut dyn Drawable, style: &BoxStyle, r: Rect, c: Color) {
    if r.w > 20 && r.h > 20 {
        filled(d, style, r, c, 20.0);
        return;
    }
    if r.w > 10 && r.h > 10 {
        filled(d, style, r, c, 10.0);
        return;
    }
    let Some(cr) = d.cairo() else {
        return;
    };
    cr.save().ok();
    cr.translate(r.x as f64 + r.w as f64 / 2.0, r.y as f64 + r.h as f64 / 2.0);
    cr.scale(r.w as f64, r.h as f64);
    cr.arc(0.0, 0.0, 0.5, 0.0, 2.0 * PI);
    cr.restore().ok();
    set_rgb(cr, box_color(d, style, c));
    let _ = cr.fill_preserve();
    cr.set_source_rgb(0.0, 0.0, 0.0);
    cr.set_line_width(1.0);
    let _ = cr.stroke();
}

fn round_shadow_box(d: &mut dyn Drawable, style: &BoxStyle, r: Rect, c: Color) {
    if let Some(cr) = d.cairo() {
        rect_path(cr, Rect::new(r.x + 5, r.y + 5, r.w, r.h), 10.0);
        cr.set_source_rgba(0.0, 0.0, 0.0, 0.5);
        let _ = cr.fill();
    }
    filled(d, style, r, c, 10.0);
}
