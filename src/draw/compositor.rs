//! Per-window double buffering.
//!
//! A shown [`Window`] draws into an [`OffscreenBuffer`] and copies it to its
//! visible surface on every flush. The buffer is allocated lazily, dropped
//! when the window size changes and rebuilt on the next flush.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::rc::Rc;

use log::debug;

use super::context::{DrawableHandle, OffscreenBuffer, RenderContext, SurfaceFactory};
use super::driver::Driver;
use super::drawable::Drawable;
use crate::error::DriverError;
use crate::util::Rect;

/// Why a window needs redrawing.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct Damage(u8);

impl Damage {
    pub const NONE: Damage = Damage(0);
    pub const CHILD: Damage = Damage(0x01);
    /// Only uncovered; the buffer contents are still valid.
    pub const EXPOSE: Damage = Damage(0x02);
    pub const SCROLL: Damage = Damage(0x04);
    pub const OVERLAY: Damage = Damage(0x08);
    pub const USER1: Damage = Damage(0x10);
    pub const USER2: Damage = Damage(0x20);
    pub const ALL: Damage = Damage(0x80);

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, other: Damage) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Damage) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Damage) {
        self.0 &= !other.0;
    }

    /// Whether anything besides an expose is pending, i.e. the buffer has
    /// to be redrawn before it is copied.
    pub fn needs_redraw(self) -> bool {
        self.0 & !Damage::EXPOSE.0 != 0
    }
}

impl BitOr for Damage {
    type Output = Damage;

    fn bitor(self, rhs: Damage) -> Damage {
        Damage(self.0 | rhs.0)
    }
}

impl BitOrAssign for Damage {
    fn bitor_assign(&mut self, rhs: Damage) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for Damage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Damage({:#04x})", self.0)
    }
}

/// Back buffer lifecycle.
#[derive(Debug)]
pub enum BufferState {
    NoBuffer,
    Buffering(OffscreenBuffer),
    /// The buffer was dropped by a resize and is rebuilt on the next flush.
    Stale,
}

pub struct Window {
    handle: DrawableHandle,
    width: i32,
    height: i32,
    shown: bool,
    damage: Damage,
    region: Option<Rect>,
    context: Option<RenderContext>,
    buffer: BufferState,
    factory: Option<Rc<dyn SurfaceFactory>>,
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("handle", &self.handle)
            .field("size", &(self.width, self.height))
            .field("shown", &self.shown)
            .field("damage", &self.damage)
            .field("region", &self.region)
            .field("buffer", &self.buffer)
            .finish()
    }
}

impl Window {
    pub fn new(handle: DrawableHandle, width: i32, height: i32) -> Self {
        Self {
            handle,
            width,
            height,
            shown: false,
            damage: Damage::NONE,
            region: None,
            context: None,
            buffer: BufferState::NoBuffer,
            factory: None,
        }
    }

    pub fn handle(&self) -> DrawableHandle {
        self.handle
    }

    /// Moves the window to another native drawable (reparenting). The
    /// context follows on the next flush.
    pub fn set_handle(&mut self, handle: DrawableHandle) {
        if handle != self.handle {
            self.handle = handle;
            self.damage |= Damage::ALL;
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn is_shown(&self) -> bool {
        self.shown
    }

    pub fn damage(&self) -> Damage {
        self.damage
    }

    /// Area limiting the next flush; `None` means the whole window.
    pub fn expose_region(&self) -> Option<Rect> {
        self.region
    }

    pub fn buffer_state(&self) -> &BufferState {
        &self.buffer
    }

    pub fn buffer(&self) -> Option<&OffscreenBuffer> {
        match &self.buffer {
            BufferState::Buffering(buffer) => Some(buffer),
            _ => None,
        }
    }

    pub fn context(&self) -> Option<&RenderContext> {
        self.context.as_ref()
    }

    pub fn show(&mut self) {
        self.shown = true;
        self.damage |= Damage::ALL;
    }

    pub fn redraw(&mut self) {
        self.add_damage(Damage::ALL);
    }

    pub fn redraw_overlay(&mut self) {
        self.add_damage(Damage::OVERLAY);
    }

    pub fn add_damage(&mut self, damage: Damage) {
        self.damage |= damage;
    }

    /// Marks part of the window as uncovered. Regions accumulate until the
    /// next flush.
    pub fn expose(&mut self, area: Rect) {
        self.damage |= Damage::EXPOSE;
        self.region = Some(match self.region {
            Some(region) => region.merge(&area),
            None => area,
        });
    }

    /// Changes the window size. A live buffer of the old size is destroyed
    /// right away and the window goes stale until the next flush.
    pub fn resize(&mut self, width: i32, height: i32) {
        if (width, height) == (self.width, self.height) {
            return;
        }
        debug!(
            "window {:?} resized {}x{} -> {width}x{height}",
            self.handle, self.width, self.height
        );
        if matches!(self.buffer, BufferState::Buffering(_)) {
            self.destroy_buffer(BufferState::Stale);
        }
        self.width = width;
        self.height = height;
        self.damage |= Damage::ALL;
    }

    /// Hides the window, releasing its buffer and on-screen context.
    pub fn hide(&mut self, driver: &mut Driver) {
        if let Some(ctx) = &self.context {
            driver.forget(ctx);
        }
        self.teardown();
        self.shown = false;
    }

    pub(crate) fn context_slot(
        &mut self,
        factory: &Rc<dyn SurfaceFactory>,
    ) -> &mut Option<RenderContext> {
        self.factory.get_or_insert_with(|| Rc::clone(factory));
        &mut self.context
    }

    /// Takes the buffer out of the window before destroying it, so nothing
    /// can reach a half-destroyed buffer through the window.
    fn destroy_buffer(&mut self, next: BufferState) {
        let previous = std::mem::replace(&mut self.buffer, next);
        if let BufferState::Buffering(buffer) = previous {
            match &self.factory {
                Some(factory) => buffer.destroy(factory.as_ref()),
                None => drop(buffer),
            }
        }
    }

    fn teardown(&mut self) {
        self.destroy_buffer(BufferState::NoBuffer);
        if let Some(ctx) = self.context.take() {
            match &self.factory {
                Some(factory) => ctx.destroy(factory.as_ref()),
                None => drop(ctx),
            }
        }
    }

    /// Redraws the buffer if needed and copies it to the window.
    pub fn flush(
        &mut self,
        driver: &mut Driver,
        draw: impl FnOnce(&mut Driver),
    ) -> Result<(), DriverError> {
        self.flush_buffer(driver, false, draw)
    }

    /// Like [`Window::flush`], then draws the overlay straight onto the
    /// window. A changed overlay makes the copy cover the whole window so the
    /// old overlay is erased.
    pub fn flush_with_overlay(
        &mut self,
        driver: &mut Driver,
        draw: impl FnOnce(&mut Driver),
        draw_overlay: impl FnOnce(&mut Driver),
    ) -> Result<(), DriverError> {
        let erase_overlay = self.damage.contains(Damage::OVERLAY);
        self.damage.remove(Damage::OVERLAY);
        self.flush_buffer(driver, erase_overlay, draw)?;
        if self.shown {
            draw_overlay(driver);
            if let Some(cr) = driver.cairo() {
                cr.target().flush();
            }
        }
        Ok(())
    }

    fn flush_buffer(
        &mut self,
        driver: &mut Driver,
        erase_overlay: bool,
        draw: impl FnOnce(&mut Driver),
    ) -> Result<(), DriverError> {
        if !self.shown {
            return Ok(());
        }
        if !matches!(self.buffer, BufferState::Buffering(_)) {
            let buffer = OffscreenBuffer::new(driver.factory(), self.width, self.height)?;
            self.factory.get_or_insert_with(|| driver.factory_rc());
            self.buffer = BufferState::Buffering(buffer);
            self.damage |= Damage::ALL;
        }
        driver.make_current(self)?;

        let BufferState::Buffering(buffer) = &self.buffer else {
            return Ok(());
        };
        let region = self.region;
        let full = self.damage.contains(Damage::ALL);
        if self.damage.needs_redraw() {
            driver.with_offscreen(buffer, |d| match region {
                Some(r) if !full => {
                    d.push_clip(r.x, r.y, r.w, r.h);
                    draw(d);
                    d.pop_clip();
                }
                _ => draw(d),
            })?;
        }

        let copy_region = if erase_overlay { None } else { region };
        driver.composite(buffer, copy_region);
        self.damage = Damage::NONE;
        self.region = None;
        Ok(())
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        self.teardown();
    }
}
