//! Surfaces and the rendering contexts bound to them.
//!
//! A [`RenderContext`] pairs one Cairo surface with one Cairo context. Window
//! contexts get their surface from a [`SurfaceFactory`]; off-screen buffers
//! own an image surface. Platform windowing stays behind the factory trait.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use log::debug;

use crate::error::DriverError;

/// Opaque native drawable identifier. Zero means "not realized".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DrawableHandle(pub u64);

impl DrawableHandle {
    pub const NONE: DrawableHandle = DrawableHandle(0);

    pub fn is_none(self) -> bool {
        self.0 == 0
    }
}

/// Platform surface creation, the only contract the driver needs from the
/// windowing system.
pub trait SurfaceFactory {
    /// Binds a surface to a native drawable of the given size.
    fn create_for_drawable(
        &self,
        handle: DrawableHandle,
        width: i32,
        height: i32,
    ) -> Result<cairo::Surface, DriverError>;

    /// Creates an in-memory ARGB buffer.
    fn create_for_image(&self, width: i32, height: i32) -> Result<cairo::ImageSurface, DriverError> {
        if width <= 0 || height <= 0 {
            return Err(DriverError::surface(
                "image buffer",
                format!("invalid size {width}x{height}"),
            ));
        }
        cairo::ImageSurface::create(cairo::Format::ARgb32, width, height)
            .map_err(|e| DriverError::surface("image buffer", e.to_string()))
    }

    /// Releases a surface once no context refers to it any more.
    fn destroy(&self, surface: &cairo::Surface) {
        surface.finish();
    }
}

/// In-memory stand-in for a windowing system: every drawable handle maps to
/// an ARGB image that plays the part of the visible window.
///
/// Clones share the same set of images.
#[derive(Debug, Clone, Default)]
pub struct HeadlessSurfaces {
    visible: Rc<RefCell<HashMap<DrawableHandle, cairo::ImageSurface>>>,
}

impl HeadlessSurfaces {
    pub fn new() -> Self {
        Self::default()
    }

    /// The visible image currently bound to `handle`.
    pub fn visible(&self, handle: DrawableHandle) -> Option<cairo::ImageSurface> {
        self.visible.borrow().get(&handle).cloned()
    }
}

impl SurfaceFactory for HeadlessSurfaces {
    fn create_for_drawable(
        &self,
        handle: DrawableHandle,
        width: i32,
        height: i32,
    ) -> Result<cairo::Surface, DriverError> {
        let target = format!("drawable {:#x}", handle.0);
        if handle.is_none() {
            return Err(DriverError::surface(target, "window is not realized"));
        }
        if width <= 0 || height <= 0 {
            return Err(DriverError::surface(
                target,
                format!("invalid size {width}x{height}"),
            ));
        }

        let mut visible = self.visible.borrow_mut();
        if let Some(existing) = visible.get(&handle) {
            if existing.width() == width && existing.height() == height {
                return Ok((**existing).clone());
            }
        }
        let image = cairo::ImageSurface::create(cairo::Format::ARgb32, width, height)
            .map_err(|e| DriverError::surface(target, e.to_string()))?;
        let surface = (*image).clone();
        visible.insert(handle, image);
        Ok(surface)
    }

    fn destroy(&self, surface: &cairo::Surface) {
        // visible images outlive their contexts; only flush pending drawing
        surface.flush();
    }
}

/// What a context draws into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextTarget {
    Window(DrawableHandle),
    Offscreen,
}

/// Stable identity of a logical context across surface rebinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(u64);

static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);

impl ContextId {
    fn next() -> Self {
        ContextId(NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A surface plus the Cairo context drawing into it.
///
/// Cloning yields another handle to the same context.
#[derive(Debug, Clone)]
pub struct RenderContext {
    id: ContextId,
    target: ContextTarget,
    width: i32,
    height: i32,
    cr: cairo::Context,
    surface: cairo::Surface,
}

impl RenderContext {
    fn new(
        id: ContextId,
        target: ContextTarget,
        surface: cairo::Surface,
        width: i32,
        height: i32,
    ) -> Result<Self, DriverError> {
        let cr = cairo::Context::new(&surface)?;
        Ok(Self {
            id,
            target,
            width,
            height,
            cr,
            surface,
        })
    }

    /// Creates a context for a native window.
    pub fn for_window(
        factory: &dyn SurfaceFactory,
        handle: DrawableHandle,
        width: i32,
        height: i32,
    ) -> Result<Self, DriverError> {
        let surface = factory.create_for_drawable(handle, width, height)?;
        let ctx = Self::new(
            ContextId::next(),
            ContextTarget::Window(handle),
            surface,
            width,
            height,
        )?;
        debug!("context {:?} created for {:?} ({width}x{height})", ctx.id, handle);
        Ok(ctx)
    }

    /// Returns the context for a window slot, creating it on first use and
    /// rebinding it to a new surface when the handle or size changed.
    ///
    /// The slot is left untouched when surface creation fails.
    pub fn bind_window(
        slot: &mut Option<RenderContext>,
        factory: &dyn SurfaceFactory,
        handle: DrawableHandle,
        width: i32,
        height: i32,
    ) -> Result<RenderContext, DriverError> {
        match slot {
            Some(ctx) if ctx.is_bound_to(handle, width, height) => {}
            Some(ctx) => {
                let surface = factory.create_for_drawable(handle, width, height)?;
                let rebound = Self::new(
                    ctx.id,
                    ContextTarget::Window(handle),
                    surface,
                    width,
                    height,
                )?;
                debug!(
                    "context {:?} rebound from {:?} to {:?} ({width}x{height})",
                    ctx.id, ctx.target, handle
                );
                let previous = std::mem::replace(ctx, rebound);
                previous.release(factory);
            }
            None => {
                *slot = Some(Self::for_window(factory, handle, width, height)?);
            }
        }
        slot.clone()
            .ok_or_else(|| DriverError::surface("window", "context slot is empty"))
    }

    fn is_bound_to(&self, handle: DrawableHandle, width: i32, height: i32) -> bool {
        self.target == ContextTarget::Window(handle) && self.width == width && self.height == height
    }

    pub fn id(&self) -> ContextId {
        self.id
    }

    pub fn target(&self) -> ContextTarget {
        self.target
    }

    pub fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    pub fn cairo(&self) -> &cairo::Context {
        &self.cr
    }

    pub fn surface(&self) -> &cairo::Surface {
        &self.surface
    }

    /// Whether both handles point at the same Cairo context.
    pub fn same_context(&self, other: &RenderContext) -> bool {
        self.cr.to_raw_none() == other.cr.to_raw_none()
    }

    /// Drops the Cairo context first, then hands the surface back to the
    /// factory.
    fn release(self, factory: &dyn SurfaceFactory) {
        let RenderContext { id, cr, surface, .. } = self;
        drop(cr);
        factory.destroy(&surface);
        debug!("context {id:?} released");
    }

    /// Destroys a window context.
    pub fn destroy(self, factory: &dyn SurfaceFactory) {
        self.release(factory);
    }
}

/// An in-memory pixel buffer with its own context.
#[derive(Debug)]
pub struct OffscreenBuffer {
    image: cairo::ImageSurface,
    context: RenderContext,
}

impl OffscreenBuffer {
    pub fn new(factory: &dyn SurfaceFactory, width: i32, height: i32) -> Result<Self, DriverError> {
        let image = factory.create_for_image(width, height)?;
        let context = RenderContext::new(
            ContextId::next(),
            ContextTarget::Offscreen,
            (*image).clone(),
            width,
            height,
        )?;
        debug!("offscreen buffer {:?} allocated ({width}x{height})", context.id);
        Ok(Self { image, context })
    }

    pub fn width(&self) -> i32 {
        self.context.width
    }

    pub fn height(&self) -> i32 {
        self.context.height
    }

    pub fn size(&self) -> (i32, i32) {
        self.context.size()
    }

    pub fn image(&self) -> &cairo::ImageSurface {
        &self.image
    }

    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    /// Destroys the buffer: context first, then its surface.
    pub fn destroy(self, factory: &dyn SurfaceFactory) {
        let OffscreenBuffer { image, context } = self;
        let id = context.id;
        drop(context.cr);
        image.flush();
        factory.destroy(&context.surface);
        debug!("offscreen buffer {id:?} destroyed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingFactory;

    impl SurfaceFactory for FailingFactory {
        fn create_for_drawable(
            &self,
            handle: DrawableHandle,
            _width: i32,
            _height: i32,
        ) -> Result<cairo::Surface, DriverError> {
            Err(DriverError::surface(format!("{handle:?}"), "no display"))
        }
    }

    #[test]
    fn binding_twice_reuses_the_context() {
        let factory = HeadlessSurfaces::new();
        let mut slot = None;
        let first = RenderContext::bind_window(&mut slot, &factory, DrawableHandle(7), 40, 30).unwrap();
        let second = RenderContext::bind_window(&mut slot, &factory, DrawableHandle(7), 40, 30).unwrap();
        assert!(first.same_context(&second));
        assert_eq!(first.id(), second.id());
    }

    #[test]
    fn new_handle_rebinds_and_keeps_identity() {
        let factory = HeadlessSurfaces::new();
        let mut slot = None;
        let first = RenderContext::bind_window(&mut slot, &factory, DrawableHandle(1), 10, 10).unwrap();
        let moved = RenderContext::bind_window(&mut slot, &factory, DrawableHandle(2), 10, 10).unwrap();
        assert_eq!(first.id(), moved.id());
        assert!(!first.same_context(&moved));
        assert_eq!(moved.target(), ContextTarget::Window(DrawableHandle(2)));
        assert!(factory.visible(DrawableHandle(2)).is_some());
    }

    #[test]
    fn failed_rebind_keeps_previous_context() {
        let factory = HeadlessSurfaces::new();
        let mut slot = None;
        let first = RenderContext::bind_window(&mut slot, &factory, DrawableHandle(1), 10, 10).unwrap();
        let err = RenderContext::bind_window(&mut slot, &FailingFactory, DrawableHandle(3), 10, 10);
        assert!(matches!(err, Err(DriverError::SurfaceCreation { .. })));
        assert!(slot.unwrap().same_context(&first));
    }

    #[test]
    fn unrealized_window_cannot_get_a_surface() {
        let factory = HeadlessSurfaces::new();
        let mut slot = None;
        let err = RenderContext::bind_window(&mut slot, &factory, DrawableHandle::NONE, 10, 10);
        assert!(err.is_err());
        assert!(slot.is_none());
    }

    #[test]
    fn offscreen_buffer_has_requested_size() {
        let factory = HeadlessSurfaces::new();
        let buffer = OffscreenBuffer::new(&factory, 300, 150).unwrap();
        assert_eq!(buffer.size(), (300, 150));
        assert_eq!(buffer.image().width(), 300);
        assert_eq!(buffer.context().target(), ContextTarget::Offscreen);
        buffer.destroy(&factory);
        assert!(OffscreenBuffer::new(&factory, 0, 10).is_err());
    }
}
