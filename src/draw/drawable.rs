//! The primitive drawing API widget and theme code programs against.

use super::color::{Color, Palette};
use super::image::Image;
use super::matrix::TransformMatrix;
use super::path::ShapeKind;
use super::sync::{AntialiasMode, LineStyle};
use crate::util::Rect;

/// Stroke, fill, clip and transform operations on "the current context".
///
/// Integer primitives take device pixels. The `vertex` family, `circle`,
/// `arc_path` and `curve` take user coordinates and go through the matrix
/// stack. Every call is a no-op when no context is current.
pub trait Drawable {
    fn palette(&self) -> &Palette;
    fn palette_mut(&mut self) -> &mut Palette;

    /// The color most recently selected.
    fn color(&self) -> Color;
    fn set_color(&mut self, color: Color);

    fn set_rgb(&mut self, r: u8, g: u8, b: u8) {
        self.set_color(Color::rgb(r, g, b));
    }

    fn set_rgba(&mut self, r: u8, g: u8, b: u8, a: u8) {
        self.set_color(Color::rgba(r, g, b, a));
    }

    /// Selects a color given in the packed boundary encoding.
    fn set_packed(&mut self, packed: u32) {
        self.set_color(Color::from_packed(packed));
    }

    fn line_style(&mut self, style: LineStyle);
    fn antialias(&self) -> AntialiasMode;
    fn set_antialias(&mut self, mode: AntialiasMode);

    /// Narrows the clip to a device rectangle until the matching pop.
    ///
    /// Pushes and pops must balance within one draw pass.
    fn push_clip(&mut self, x: i32, y: i32, w: i32, h: i32);
    fn push_no_clip(&mut self);
    fn pop_clip(&mut self);
    /// Part of the rectangle left visible by the current clip.
    fn clip_box(&self, x: i32, y: i32, w: i32, h: i32) -> Option<Rect>;

    fn not_clipped(&self, x: i32, y: i32, w: i32, h: i32) -> bool {
        self.clip_box(x, y, w, h).is_some()
    }

    fn point(&mut self, x: i32, y: i32);
    fn line(&mut self, x: i32, y: i32, x1: i32, y1: i32);
    fn line3(&mut self, x: i32, y: i32, x1: i32, y1: i32, x2: i32, y2: i32);
    /// Polyline whose segments alternate between horizontal and vertical.
    fn staircase(&mut self, points: &[(i32, i32)]);

    fn xyline(&mut self, x: i32, y: i32, x1: i32) {
        self.staircase(&[(x, y), (x1, y)]);
    }

    fn xyline2(&mut self, x: i32, y: i32, x1: i32, y2: i32) {
        self.staircase(&[(x, y), (x1, y), (x1, y2)]);
    }

    fn xyline3(&mut self, x: i32, y: i32, x1: i32, y2: i32, x3: i32) {
        self.staircase(&[(x, y), (x1, y), (x1, y2), (x3, y2)]);
    }

    fn yxline(&mut self, x: i32, y: i32, y1: i32) {
        self.staircase(&[(x, y), (x, y1)]);
    }

    fn yxline2(&mut self, x: i32, y: i32, y1: i32, x2: i32) {
        self.staircase(&[(x, y), (x, y1), (x2, y1)]);
    }

    fn yxline3(&mut self, x: i32, y: i32, y1: i32, x2: i32, y3: i32) {
        self.staircase(&[(x, y), (x, y1), (x2, y1), (x2, y3)]);
    }

    fn rect(&mut self, x: i32, y: i32, w: i32, h: i32);
    fn rectf(&mut self, x: i32, y: i32, w: i32, h: i32);

    fn rectf_color(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        self.set_color(color);
        self.rectf(x, y, w, h);
    }

    /// Strokes part of the ellipse inscribed in the box. Angles are degrees,
    /// 0 pointing right, counter-clockwise on screen.
    fn arc(&mut self, x: i32, y: i32, w: i32, h: i32, a1: f64, a2: f64);
    /// Fills the wedge between the arc and the ellipse center.
    fn pie(&mut self, x: i32, y: i32, w: i32, h: i32, a1: f64, a2: f64);

    fn polygon3(&mut self, x: i32, y: i32, x1: i32, y1: i32, x2: i32, y2: i32);
    #[allow(clippy::too_many_arguments)]
    fn polygon4(&mut self, x: i32, y: i32, x1: i32, y1: i32, x2: i32, y2: i32, x3: i32, y3: i32);
    fn loop3(&mut self, x: i32, y: i32, x1: i32, y1: i32, x2: i32, y2: i32);
    #[allow(clippy::too_many_arguments)]
    fn loop4(&mut self, x: i32, y: i32, x1: i32, y1: i32, x2: i32, y2: i32, x3: i32, y3: i32);

    fn begin_shape(&mut self, kind: ShapeKind);
    fn vertex(&mut self, x: f64, y: f64);
    /// Starts a new contour of the current shape.
    fn gap(&mut self);
    /// Renders and clears the shape. Closed shapes with fewer than three
    /// vertices are drawn as an open line instead.
    fn end_shape(&mut self);

    fn begin_points(&mut self) {
        self.begin_shape(ShapeKind::Points);
    }

    fn begin_line(&mut self) {
        self.begin_shape(ShapeKind::Line);
    }

    fn begin_loop(&mut self) {
        self.begin_shape(ShapeKind::Loop);
    }

    fn begin_polygon(&mut self) {
        self.begin_shape(ShapeKind::Polygon);
    }

    fn begin_complex_polygon(&mut self) {
        self.begin_shape(ShapeKind::ComplexPolygon);
    }

    fn end_points(&mut self) {
        self.end_shape();
    }

    fn end_line(&mut self) {
        self.end_shape();
    }

    fn end_loop(&mut self) {
        self.end_shape();
    }

    fn end_polygon(&mut self) {
        self.end_shape();
    }

    fn end_complex_polygon(&mut self) {
        self.end_shape();
    }

    /// Full circle in user coordinates; filled inside a polygon, stroked
    /// otherwise.
    fn circle(&mut self, x: f64, y: f64, r: f64);
    /// Appends arc vertices to the current shape, or to the pending path
    /// when no shape is open.
    fn arc_path(&mut self, x: f64, y: f64, r: f64, start: f64, end: f64);
    /// Appends a cubic Bézier to the pending path without painting it.
    #[allow(clippy::too_many_arguments)]
    fn curve(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64);
    fn stroke_path(&mut self);
    fn fill_path(&mut self);

    /// Blits `w`×`h` pixels of `image` starting at `(srcx, srcy)` to `(x, y)`.
    #[allow(clippy::too_many_arguments)]
    fn draw_image(&mut self, image: &Image, x: i32, y: i32, w: i32, h: i32, srcx: i32, srcy: i32);

    fn push_matrix(&mut self);
    fn pop_matrix(&mut self);
    fn mult_matrix(&mut self, m: &TransformMatrix);
    fn translate(&mut self, x: f64, y: f64);
    fn scale(&mut self, sx: f64, sy: f64);
    fn rotate(&mut self, degrees: f64);
    fn load_identity(&mut self);
    fn transform_point(&self, x: f64, y: f64) -> (f64, f64);

    /// Escape hatch to the current Cairo context.
    fn cairo(&self) -> Option<&cairo::Context>;
}
