//! Cairo path construction for the driver's primitives.
//!
//! Everything here works on device coordinates with an identity CTM; the
//! driver has already applied the matrix stack where it matters.

use std::f64::consts::PI;

use cairo::Context;

use crate::draw::path::{AccumulatedShape, Outline, ShapeKind};
use crate::draw::sync::{self, AntialiasMode, AntialiasOverride, PIXEL_CENTER};

type Point = (f64, f64);
type DrawResult = Result<(), cairo::Error>;

/// Two-point line. Axis-aligned segments are snapped and drawn aliased.
pub(super) fn segment(cr: &Context, aa: AntialiasMode, x: i32, y: i32, x1: i32, y1: i32) -> DrawResult {
    let (x, y, x1, y1) = (x as f64, y as f64, x1 as f64, y1 as f64);
    let [a, b] = sync::snap_segment(x, y, x1, y1);
    let _guard = sync::is_axis_aligned(x, y, x1, y1).then(|| AntialiasOverride::force_off(cr, aa));
    polyline(cr, &[a, b])
}

/// Open contour from a vertex shape. Two-point contours follow the same
/// snapping and aliasing rules as [`segment`].
fn open_outline(cr: &Context, aa: AntialiasMode, points: &[Point]) -> DrawResult {
    if let &[(x, y), (x1, y1)] = points {
        let [a, b] = sync::snap_segment(x, y, x1, y1);
        let _guard = sync::is_axis_aligned(x, y, x1, y1).then(|| AntialiasOverride::force_off(cr, aa));
        return polyline(cr, &[a, b]);
    }
    polyline(cr, points)
}

/// Strokes an open polyline.
pub(super) fn polyline(cr: &Context, points: &[Point]) -> DrawResult {
    let Some((&(x, y), rest)) = points.split_first() else {
        return Ok(());
    };
    cr.new_path();
    cr.move_to(x, y);
    for &(x, y) in rest {
        cr.line_to(x, y);
    }
    cr.stroke()
}

/// Alternating horizontal and vertical segments, all on pixel centers.
pub(super) fn staircase(cr: &Context, aa: AntialiasMode, points: &[(i32, i32)]) -> DrawResult {
    if let &[(x, y), (x1, y1)] = points {
        return segment(cr, aa, x, y, x1, y1);
    }
    let (dx, dy) = PIXEL_CENTER.corner;
    let snapped: Vec<Point> = points
        .iter()
        .map(|&(x, y)| (x as f64 + dx, y as f64 + dy))
        .collect();
    let _guard = AntialiasOverride::force_off(cr, aa);
    polyline(cr, &snapped)
}

pub(super) fn pixel(cr: &Context, aa: AntialiasMode, x: f64, y: f64) -> DrawResult {
    let _guard = AntialiasOverride::force_off(cr, aa);
    cr.new_path();
    cr.rectangle(x.floor(), y.floor(), 1.0, 1.0);
    cr.fill()
}

pub(super) fn stroke_rect(cr: &Context, aa: AntialiasMode, x: i32, y: i32, w: i32, h: i32) -> DrawResult {
    if w <= 0 || h <= 0 {
        return Ok(());
    }
    let _guard = AntialiasOverride::force_off(cr, aa);
    let line_width = cr.line_width();
    cr.new_path();
    if sync::outline_fills_rect(w, h, line_width) {
        cr.rectangle(x as f64, y as f64, w as f64, h as f64);
        return cr.fill();
    }
    let (rx, ry, rw, rh) = sync::stroke_rect_path(x, y, w, h, line_width);
    cr.rectangle(rx, ry, rw, rh);
    cr.stroke()
}

pub(super) fn fill_rect(cr: &Context, aa: AntialiasMode, x: i32, y: i32, w: i32, h: i32) -> DrawResult {
    if w <= 0 || h <= 0 {
        return Ok(());
    }
    let _guard = AntialiasOverride::force_off(cr, aa);
    cr.new_path();
    cr.rectangle(x as f64, y as f64, w as f64, h as f64);
    cr.fill()
}

/// Adds the elliptical arc inscribed in the box to the path.
///
/// The renderer's y axis points down, so angles are negated and the sweep
/// direction picked from the argument order to keep the same region.
#[allow(clippy::too_many_arguments)]
fn add_arc(cr: &Context, x: i32, y: i32, w: i32, h: i32, a1: f64, a2: f64) -> DrawResult {
    let cx = x as f64 + 0.5 * w as f64;
    let cy = y as f64 + 0.5 * h as f64;
    let to_rad = -PI / 180.0;
    cr.save()?;
    cr.translate(cx, cy);
    cr.scale(w as f64, h as f64);
    if a1 > a2 {
        cr.arc(0.0, 0.0, 0.5, a1 * to_rad, a2 * to_rad);
    } else {
        cr.arc_negative(0.0, 0.0, 0.5, a1 * to_rad, a2 * to_rad);
    }
    cr.restore()
}

#[allow(clippy::too_many_arguments)]
pub(super) fn arc(cr: &Context, x: i32, y: i32, w: i32, h: i32, a1: f64, a2: f64) -> DrawResult {
    if w <= 0 || h <= 0 {
        return Ok(());
    }
    cr.new_path();
    add_arc(cr, x, y, w, h, a1, a2)?;
    cr.stroke()
}

#[allow(clippy::too_many_arguments)]
pub(super) fn pie(cr: &Context, x: i32, y: i32, w: i32, h: i32, a1: f64, a2: f64) -> DrawResult {
    if w <= 0 || h <= 0 {
        return Ok(());
    }
    cr.new_path();
    add_arc(cr, x, y, w, h, a1, a2)?;
    cr.line_to(x as f64 + 0.5 * w as f64, y as f64 + 0.5 * h as f64);
    cr.close_path();
    cr.fill()
}

fn trace_closed(cr: &Context, points: &[Point]) {
    let Some((&(x, y), rest)) = points.split_first() else {
        return;
    };
    cr.move_to(x, y);
    for &(x, y) in rest {
        cr.line_to(x, y);
    }
    cr.close_path();
}

/// Closed outline, filled or stroked.
pub(super) fn closed(cr: &Context, points: &[Point], fill: bool) -> DrawResult {
    cr.new_path();
    trace_closed(cr, points);
    if fill { cr.fill() } else { cr.stroke() }
}

/// Renders a finished vertex shape.
pub(super) fn shape(cr: &Context, aa: AntialiasMode, shape: AccumulatedShape) -> DrawResult {
    let kind = shape.kind;
    if kind == ShapeKind::Points {
        let _guard = AntialiasOverride::force_off(cr, aa);
        cr.new_path();
        for (x, y) in shape.points() {
            cr.rectangle(x.floor(), y.floor(), 1.0, 1.0);
        }
        return cr.fill();
    }

    let mut fills = Vec::new();
    for outline in shape.outlines() {
        match outline {
            Outline::Nothing => {}
            Outline::Dot((x, y)) => pixel(cr, aa, x, y)?,
            Outline::Open(points) => open_outline(cr, aa, &points)?,
            Outline::Closed(points) if kind == ShapeKind::Loop => closed(cr, &points, false)?,
            Outline::Closed(points) => fills.push(points),
        }
    }
    if fills.is_empty() {
        return Ok(());
    }

    cr.new_path();
    for contour in &fills {
        trace_closed(cr, contour);
    }
    if kind == ShapeKind::ComplexPolygon {
        cr.set_fill_rule(cairo::FillRule::EvenOdd);
    }
    let result = cr.fill();
    cr.set_fill_rule(cairo::FillRule::Winding);
    result
}

pub(super) fn circle(cr: &Context, cx: f64, cy: f64, r: f64, fill: bool) -> DrawResult {
    cr.new_path();
    cr.arc(cx, cy, r, 0.0, 2.0 * PI);
    if fill { cr.fill() } else { cr.stroke() }
}

/// Continues the pending path through `points`.
pub(super) fn extend_path(cr: &Context, points: &[Point]) -> DrawResult {
    let mut started = cr.has_current_point()?;
    for &(x, y) in points {
        if started {
            cr.line_to(x, y);
        } else {
            cr.move_to(x, y);
            started = true;
        }
    }
    Ok(())
}

pub(super) fn curve(cr: &Context, p0: Point, p1: Point, p2: Point, p3: Point) {
    cr.move_to(p0.0, p0.1);
    cr.curve_to(p1.0, p1.1, p2.0, p2.1, p3.0, p3.1);
}
