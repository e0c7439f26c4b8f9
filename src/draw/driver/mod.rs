//! The Cairo graphics driver.
//!
//! [`Driver`] is the one [`Drawable`] implementation. It owns the
//! [`RenderState`] every primitive consults: the current context, the
//! antialiasing mode, the matrix and clip stacks, the line style, the current
//! color, the vertex accumulator and the palette.

mod blit;
mod primitives;
#[cfg(test)]
mod tests;

use std::ops::{Deref, DerefMut};
use std::rc::Rc;

use log::{debug, error, warn};

use super::clip::{ClipChange, ClipRegion, ClipStack, DEFAULT_CLIP_STACK_DEPTH};
use super::color::{Color, Palette};
use super::compositor::Window;
use super::context::{HeadlessSurfaces, OffscreenBuffer, RenderContext, SurfaceFactory};
use super::drawable::Drawable;
use super::image::Image;
use super::matrix::{DEFAULT_MATRIX_STACK_DEPTH, MatrixStack, TransformMatrix};
use super::path::{self, PathAccumulator, ShapeKind};
use super::sync::{AntialiasMode, LineStyle};
use crate::error::DriverError;
use crate::util::Rect;

/// Construction-time driver settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverOptions {
    pub antialias: AntialiasMode,
    pub matrix_stack_depth: usize,
    pub clip_stack_depth: usize,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            antialias: AntialiasMode::Default,
            matrix_stack_depth: DEFAULT_MATRIX_STACK_DEPTH,
            clip_stack_depth: DEFAULT_CLIP_STACK_DEPTH,
        }
    }
}

/// Mutable rendering state shared by all primitives.
#[derive(Debug)]
pub struct RenderState {
    current: Option<RenderContext>,
    antialias: AntialiasMode,
    matrices: MatrixStack,
    clips: ClipStack,
    line_style: LineStyle,
    color: Color,
    path: PathAccumulator,
    palette: Palette,
    stack_errors: usize,
}

impl RenderState {
    fn new(options: &DriverOptions) -> Self {
        Self {
            current: None,
            antialias: options.antialias,
            matrices: MatrixStack::with_limit(options.matrix_stack_depth),
            clips: ClipStack::with_limit(options.clip_stack_depth),
            line_style: LineStyle::default(),
            color: Color::FOREGROUND,
            path: PathAccumulator::new(),
            palette: Palette::default(),
            stack_errors: 0,
        }
    }

    pub fn current(&self) -> Option<&RenderContext> {
        self.current.as_ref()
    }

    pub fn matrices(&self) -> &MatrixStack {
        &self.matrices
    }

    pub fn clips(&self) -> &ClipStack {
        &self.clips
    }

    pub fn line_style(&self) -> &LineStyle {
        &self.line_style
    }

    /// Matrix stack overflows and underflows reported so far.
    pub fn stack_errors(&self) -> usize {
        self.stack_errors
    }

    fn report(&mut self, op: &str, e: DriverError) {
        self.stack_errors += 1;
        error!("{op}: {e}");
    }
}

pub struct Driver {
    factory: Rc<dyn SurfaceFactory>,
    state: RenderState,
}

impl Driver {
    pub fn new(factory: Rc<dyn SurfaceFactory>, options: DriverOptions) -> Self {
        debug!("driver created with {options:?}");
        Self {
            factory,
            state: RenderState::new(&options),
        }
    }

    /// A driver backed by in-memory surfaces, plus a handle to inspect them.
    pub fn headless(options: DriverOptions) -> (Self, HeadlessSurfaces) {
        let surfaces = HeadlessSurfaces::new();
        let driver = Self::new(Rc::new(surfaces.clone()), options);
        (driver, surfaces)
    }

    pub fn factory(&self) -> &dyn SurfaceFactory {
        self.factory.as_ref()
    }

    pub(crate) fn factory_rc(&self) -> Rc<dyn SurfaceFactory> {
        Rc::clone(&self.factory)
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    pub fn current(&self) -> Option<&RenderContext> {
        self.state.current.as_ref()
    }

    /// Makes the window's context current, creating or rebinding it as
    /// needed. On failure the previously current context stays active.
    pub fn make_current(&mut self, window: &mut Window) -> Result<RenderContext, DriverError> {
        let (handle, width, height) = (window.handle(), window.width(), window.height());
        let factory = self.factory_rc();
        let ctx = RenderContext::bind_window(
            window.context_slot(&factory),
            factory.as_ref(),
            handle,
            width,
            height,
        )?;
        self.set_current(Some(ctx.clone()));
        Ok(ctx)
    }

    /// Makes an off-screen buffer's context current.
    pub fn make_current_offscreen(
        &mut self,
        buffer: &OffscreenBuffer,
    ) -> Result<RenderContext, DriverError> {
        let ctx = buffer.context().clone();
        ctx.cairo().status()?;
        self.set_current(Some(ctx.clone()));
        Ok(ctx)
    }

    /// Replaces the current context, returning the previous one.
    pub fn set_current(&mut self, ctx: Option<RenderContext>) -> Option<RenderContext> {
        let previous = std::mem::replace(&mut self.state.current, ctx);
        self.sync_context();
        previous
    }

    /// Clears the current context if it is `ctx`, so nothing draws into a
    /// context that is being torn down.
    pub fn forget(&mut self, ctx: &RenderContext) {
        if self.state.current.as_ref().is_some_and(|c| c.same_context(ctx)) {
            self.state.current = None;
        }
    }

    /// Redirects drawing into `buffer` until the returned scope is dropped.
    ///
    /// The scope starts with clipping disabled and restores the previous
    /// context and clip on drop.
    pub fn begin_offscreen(
        &mut self,
        buffer: &OffscreenBuffer,
    ) -> Result<OffscreenScope<'_>, DriverError> {
        let previous = self.state.current.clone();
        self.make_current_offscreen(buffer)?;
        self.push_no_clip();
        Ok(OffscreenScope {
            driver: self,
            previous,
        })
    }

    pub fn with_offscreen<R>(
        &mut self,
        buffer: &OffscreenBuffer,
        draw: impl FnOnce(&mut Driver) -> R,
    ) -> Result<R, DriverError> {
        let mut scope = self.begin_offscreen(buffer)?;
        Ok(draw(&mut *scope))
    }

    /// Copies part of an off-screen buffer into the current context.
    #[allow(clippy::too_many_arguments)]
    pub fn copy_offscreen(
        &mut self,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        buffer: &OffscreenBuffer,
        srcx: i32,
        srcy: i32,
    ) {
        self.paint("copy_offscreen", |cr| {
            blit::offscreen(cr, buffer, x, y, w, h, srcx, srcy)
        });
    }

    /// Copies `buffer` onto the current context with source-copy blending,
    /// restricted to `region` (the whole context when `None`).
    pub fn composite(&mut self, buffer: &OffscreenBuffer, region: Option<Rect>) {
        self.paint("composite", |cr| blit::composite(cr, buffer, region));
    }

    /// Writes color, line style and antialiasing onto the current context.
    fn sync_context(&self) {
        let Some(ctx) = &self.state.current else {
            return;
        };
        let cr = ctx.cairo();
        self.apply_color(cr);
        self.state.line_style.apply(cr);
        cr.set_antialias(self.state.antialias.to_cairo());
    }

    fn apply_color(&self, cr: &cairo::Context) {
        let (r, g, b, a) = self.state.palette.resolve(self.state.color).to_unit();
        cr.set_source_rgba(r, g, b, a);
    }

    fn cr(&self) -> Option<&cairo::Context> {
        self.state.current.as_ref().map(RenderContext::cairo)
    }

    /// Runs a drawing operation on the current context. Without one this is
    /// a no-op; renderer errors are logged and drawing continues.
    fn paint(&self, op: &str, f: impl FnOnce(&cairo::Context) -> Result<(), cairo::Error>) {
        if let Some(cr) = self.cr() {
            if let Err(e) = f(cr) {
                warn!("{op} failed: {e}");
            }
        }
    }

    fn apply_clip(&self, region: ClipRegion) {
        self.paint("push_clip", |cr| {
            cr.save()?;
            cr.new_path();
            match region {
                ClipRegion::NoClip => cr.reset_clip(),
                ClipRegion::Rect(r) => {
                    cr.rectangle(r.x as f64, r.y as f64, r.w.max(0) as f64, r.h.max(0) as f64);
                    cr.clip();
                }
            }
            Ok(())
        });
    }

    fn device_radius(&self, r: f64) -> f64 {
        let m = self.state.matrices.current();
        path::device_radius(r, |dx, dy| m.transform_distance(dx, dy))
    }
}

impl Drawable for Driver {
    fn palette(&self) -> &Palette {
        &self.state.palette
    }

    fn palette_mut(&mut self) -> &mut Palette {
        &mut self.state.palette
    }

    fn color(&self) -> Color {
        self.state.color
    }

    fn set_color(&mut self, color: Color) {
        self.state.color = color;
        if let Some(cr) = self.cr() {
            self.apply_color(cr);
        }
    }

    fn line_style(&mut self, style: LineStyle) {
        self.state.line_style = style;
        if let Some(cr) = self.cr() {
            self.state.line_style.apply(cr);
        }
    }

    fn antialias(&self) -> AntialiasMode {
        self.state.antialias
    }

    fn set_antialias(&mut self, mode: AntialiasMode) {
        self.state.antialias = mode;
        if let Some(cr) = self.cr() {
            cr.set_antialias(mode.to_cairo());
        }
    }

    fn push_clip(&mut self, x: i32, y: i32, w: i32, h: i32) {
        match self.state.clips.push_rect(Rect::new(x, y, w, h)) {
            ClipChange::Applied(region) => self.apply_clip(region),
            _ => warn!(
                "clip stack overflow (limit {}), ignoring push",
                self.state.clips.limit()
            ),
        }
    }

    fn push_no_clip(&mut self) {
        match self.state.clips.push_no_clip() {
            ClipChange::Applied(region) => self.apply_clip(region),
            _ => warn!(
                "clip stack overflow (limit {}), ignoring push",
                self.state.clips.limit()
            ),
        }
    }

    fn pop_clip(&mut self) {
        match self.state.clips.pop() {
            ClipChange::Applied(_) => {
                self.paint("pop_clip", |cr| cr.restore());
                self.sync_context();
            }
            ClipChange::ExcessReleased => {}
            ClipChange::Underflow | ClipChange::Overflow => {
                warn!("pop_clip without a matching push")
            }
        }
    }

    fn clip_box(&self, x: i32, y: i32, w: i32, h: i32) -> Option<Rect> {
        self.state.clips.clip_box(Rect::new(x, y, w, h))
    }

    fn point(&mut self, x: i32, y: i32) {
        let aa = self.state.antialias;
        self.paint("point", |cr| primitives::pixel(cr, aa, x as f64, y as f64));
    }

    fn line(&mut self, x: i32, y: i32, x1: i32, y1: i32) {
        let aa = self.state.antialias;
        self.paint("line", |cr| primitives::segment(cr, aa, x, y, x1, y1));
    }

    fn line3(&mut self, x: i32, y: i32, x1: i32, y1: i32, x2: i32, y2: i32) {
        let points = [
            (x as f64, y as f64),
            (x1 as f64, y1 as f64),
            (x2 as f64, y2 as f64),
        ];
        self.paint("line", |cr| primitives::polyline(cr, &points));
    }

    fn staircase(&mut self, points: &[(i32, i32)]) {
        if points.len() < 2 {
            return;
        }
        let aa = self.state.antialias;
        self.paint("staircase", |cr| primitives::staircase(cr, aa, points));
    }

    fn rect(&mut self, x: i32, y: i32, w: i32, h: i32) {
        let aa = self.state.antialias;
        self.paint("rect", |cr| primitives::stroke_rect(cr, aa, x, y, w, h));
    }

    fn rectf(&mut self, x: i32, y: i32, w: i32, h: i32) {
        let aa = self.state.antialias;
        self.paint("rectf", |cr| primitives::fill_rect(cr, aa, x, y, w, h));
    }

    fn arc(&mut self, x: i32, y: i32, w: i32, h: i32, a1: f64, a2: f64) {
        self.paint("arc", |cr| primitives::arc(cr, x, y, w, h, a1, a2));
    }

    fn pie(&mut self, x: i32, y: i32, w: i32, h: i32, a1: f64, a2: f64) {
        self.paint("pie", |cr| primitives::pie(cr, x, y, w, h, a1, a2));
    }

    fn polygon3(&mut self, x: i32, y: i32, x1: i32, y1: i32, x2: i32, y2: i32) {
        let points = int_points(&[(x, y), (x1, y1), (x2, y2)]);
        self.paint("polygon", |cr| primitives::closed(cr, &points, true));
    }

    fn polygon4(&mut self, x: i32, y: i32, x1: i32, y1: i32, x2: i32, y2: i32, x3: i32, y3: i32) {
        let points = int_points(&[(x, y), (x1, y1), (x2, y2), (x3, y3)]);
        self.paint("polygon", |cr| primitives::closed(cr, &points, true));
    }

    fn loop3(&mut self, x: i32, y: i32, x1: i32, y1: i32, x2: i32, y2: i32) {
        let points = int_points(&[(x, y), (x1, y1), (x2, y2)]);
        self.paint("loop", |cr| primitives::closed(cr, &points, false));
    }

    fn loop4(&mut self, x: i32, y: i32, x1: i32, y1: i32, x2: i32, y2: i32, x3: i32, y3: i32) {
        let points = int_points(&[(x, y), (x1, y1), (x2, y2), (x3, y3)]);
        self.paint("loop", |cr| primitives::closed(cr, &points, false));
    }

    fn begin_shape(&mut self, kind: ShapeKind) {
        self.state.path.begin(kind);
    }

    fn vertex(&mut self, x: f64, y: f64) {
        let (dx, dy) = self.state.matrices.current().transform_point(x, y);
        self.state.path.vertex(dx, dy);
    }

    fn gap(&mut self) {
        self.state.path.gap();
    }

    fn end_shape(&mut self) {
        let Some(shape) = self.state.path.take() else {
            return;
        };
        let aa = self.state.antialias;
        self.paint("end_shape", |cr| primitives::shape(cr, aa, shape));
    }

    fn circle(&mut self, x: f64, y: f64, r: f64) {
        let (cx, cy) = self.transform_point(x, y);
        let radius = self.device_radius(r);
        let fill = matches!(
            self.state.path.kind(),
            Some(ShapeKind::Polygon | ShapeKind::ComplexPolygon)
        );
        self.paint("circle", |cr| primitives::circle(cr, cx, cy, radius, fill));
    }

    fn arc_path(&mut self, x: f64, y: f64, r: f64, start: f64, end: f64) {
        let m = *self.state.matrices.current();
        let points: Vec<(f64, f64)> = path::arc_points(x, y, r, start, end, self.device_radius(r))
            .into_iter()
            .map(|(px, py)| m.transform_point(px, py))
            .collect();
        if self.state.path.is_active() {
            for (px, py) in points {
                self.state.path.vertex(px, py);
            }
        } else {
            self.paint("arc_path", |cr| primitives::extend_path(cr, &points));
        }
    }

    fn curve(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64) {
        let m = *self.state.matrices.current();
        let (p0, p1) = (m.transform_point(x0, y0), m.transform_point(x1, y1));
        let (p2, p3) = (m.transform_point(x2, y2), m.transform_point(x3, y3));
        self.paint("curve", |cr| {
            primitives::curve(cr, p0, p1, p2, p3);
            Ok(())
        });
    }

    fn stroke_path(&mut self) {
        self.paint("stroke", |cr| cr.stroke());
    }

    fn fill_path(&mut self) {
        self.paint("fill", |cr| cr.fill());
    }

    fn draw_image(&mut self, image: &Image, x: i32, y: i32, w: i32, h: i32, srcx: i32, srcy: i32) {
        self.paint("draw_image", |cr| blit::image(cr, image, x, y, w, h, srcx, srcy));
    }

    fn push_matrix(&mut self) {
        if let Err(e) = self.state.matrices.push() {
            self.state.report("push_matrix", e);
        }
    }

    fn pop_matrix(&mut self) {
        if let Err(e) = self.state.matrices.pop() {
            self.state.report("pop_matrix", e);
        }
    }

    fn mult_matrix(&mut self, m: &TransformMatrix) {
        self.state.matrices.mult(m);
    }

    fn translate(&mut self, x: f64, y: f64) {
        self.state.matrices.translate(x, y);
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.state.matrices.scale(sx, sy);
    }

    fn rotate(&mut self, degrees: f64) {
        self.state.matrices.rotate(degrees);
    }

    fn load_identity(&mut self) {
        self.state.matrices.load_identity();
    }

    fn transform_point(&self, x: f64, y: f64) -> (f64, f64) {
        self.state.matrices.current().transform_point(x, y)
    }

    fn cairo(&self) -> Option<&cairo::Context> {
        self.cr()
    }
}

fn int_points(points: &[(i32, i32)]) -> Vec<(f64, f64)> {
    points.iter().map(|&(x, y)| (x as f64, y as f64)).collect()
}

/// Drawing redirected into an off-screen buffer; see
/// [`Driver::begin_offscreen`].
pub struct OffscreenScope<'a> {
    driver: &'a mut Driver,
    previous: Option<RenderContext>,
}

impl Deref for OffscreenScope<'_> {
    type Target = Driver;

    fn deref(&self) -> &Driver {
        self.driver
    }
}

impl DerefMut for OffscreenScope<'_> {
    fn deref_mut(&mut self) -> &mut Driver {
        self.driver
    }
}

impl Drop for OffscreenScope<'_> {
    fn drop(&mut self) {
        self.driver.pop_clip();
        if let Some(cr) = self.driver.cr() {
            cr.target().flush();
        }
        let previous = self.previous.take();
        self.driver.set_current(previous);
    }
}
