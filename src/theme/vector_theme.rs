//! "Vector": flat rounded boxes with a two-tone border.

use cairo::Context;

use super::{BoxDef, BoxStyle, BoxType, Theme, rounded_rect};
use crate::draw::{Color, Drawable, Palette};
use crate::util::Rect;

const DX: i32 = 2;
const RADIUS: f64 = 3.0;

pub(super) fn theme() -> Theme {
    Theme::new("Vector", "Simple vector theme based on Cairo", "Jonathan Moore Liles")
        .with_box(BoxType::UpBox, BoxDef::uniform(up_box, DX))
        .with_box(BoxType::DownBox, BoxDef::uniform(down_box, DX))
        .with_box(BoxType::ThinUpBox, BoxDef::uniform(up_box, DX))
        .with_box(BoxType::ThinDownBox, BoxDef::uniform(down_box, DX))
        .with_box(BoxType::UpFrame, BoxDef::uniform(up_frame, DX))
        .with_box(BoxType::DownFrame, BoxDef::uniform(down_frame, DX))
        .with_box(BoxType::RoundUpBox, BoxDef::uniform(up_box, DX))
        .with_box(BoxType::RoundDownBox, BoxDef::uniform(down_box, DX))
        .with_box(BoxType::BorderBox, BoxDef::uniform(border_box, 1))
}

fn border_color(p: &Palette, c: Color) -> Color {
    p.average(Color::FOREGROUND, c, 0.25)
}

fn interior_color(p: &Palette, c: Color) -> Color {
    p.average(Color::BACKGROUND, c, 0.25)
}

fn outer_border_color(p: &Palette, c: Color) -> Color {
    p.average(c, Color::BACKGROUND, 0.25)
}

fn set_source(d: &dyn Drawable, cr: &Context, style: &BoxStyle, c: Color) {
    let p = d.palette();
    let (r, g, b, _) = p.resolve(style.visible_color(p, c)).to_unit();
    cr.set_source_rgb(r, g, b);
}

/// Rounded outline through the centers of the edge pixels.
fn rect_path(cr: &Context, r: Rect) {
    rounded_rect(
        cr,
        r.x as f64 + 0.5,
        r.y as f64 + 0.5,
        r.w as f64 - 1.0,
        r.h as f64 - 1.0,
        RADIUS,
    );
}

fn stroke(d: &dyn Drawable, style: &BoxStyle, r: Rect, c: Color) {
    if let Some(cr) = d.cairo() {
        rect_path(cr, r);
        set_source(d, cr, style, c);
        cr.set_line_width(1.0);
        let _ = cr.stroke();
    }
}

fn fill(d: &dyn Drawable, style: &BoxStyle, r: Rect, c: Color) {
    if let Some(cr) = d.cairo() {
        rect_path(cr, r);
        set_source(d, cr, style, c);
        let _ = cr.fill();
    }
}

fn inner(r: Rect) -> Rect {
    r.inset(1, 1, 2, 2)
}

fn up_box(d: &mut dyn Drawable, style: &BoxStyle, r: Rect, c: Color) {
    let p = d.palette().clone();
    fill(d, style, r, interior_color(&p, c));
    stroke(d, style, inner(r), border_color(&p, c));
    stroke(d, style, r, outer_border_color(&p, c));
}

fn up_frame(d: &mut dyn Drawable, style: &BoxStyle, r: Rect, c: Color) {
    let p = d.palette().clone();
    stroke(d, style, inner(r), border_color(&p, c));
    stroke(d, style, r, outer_border_color(&p, c));
}

fn down_frame(d: &mut dyn Drawable, style: &BoxStyle, r: Rect, c: Color) {
    let outer = outer_border_color(d.palette(), c);
    stroke(d, style, inner(r), c);
    stroke(d, style, r, outer);
}

fn down_box(d: &mut dyn Drawable, style: &BoxStyle, r: Rect, c: Color) {
    let p = d.palette().clone();
    let interior = if c == Color::BACKGROUND || c == Color::BACKGROUND2 {
        p.darker(interior_color(&p, c))
    } else {
        interior_color(&p, c)
    };
    fill(d, style, r, interior);
    stroke(d, style, inner(r), c);
    stroke(d, style, r, outer_border_color(&p, c));
}

/// Square-cornered variant drawn with the plain primitives.
fn border_box(d: &mut dyn Drawable, style: &BoxStyle, r: Rect, c: Color) {
    let (interior, border, outer) = {
        let p = d.palette();
        (
            style.visible_color(p, interior_color(p, c)),
            style.visible_color(p, border_color(p, c)),
            style.visible_color(p, outer_border_color(p, c)),
        )
    };
    d.rectf_color(r.x, r.y, r.w, r.h, interior);
    d.set_color(border);
    let r1 = inner(r);
    d.rect(r1.x, r1.y, r1.w, r1.h);
    d.set_color(outer);
    d.rect(r.x, r.y, r.w, r.h);
}
