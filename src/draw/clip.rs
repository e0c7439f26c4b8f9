//! Device-space clip region stack.
//!
//! The stack records effective regions only; the driver mirrors every
//! effective push and pop onto the renderer with a save/clip and restore pair.

use crate::util::Rect;

/// Default number of nested clip regions.
pub const DEFAULT_CLIP_STACK_DEPTH: usize = 32;

/// Effective clip for subsequent drawing, in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipRegion {
    /// Whole surface.
    NoClip,
    /// Rectangle already intersected with the enclosing region.
    Rect(Rect),
}

/// Outcome of a push or pop, telling the driver whether to touch the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipChange {
    Applied(ClipRegion),
    /// The stack was full; the push is recorded as excess and ignored.
    Overflow,
    /// A pop matched an excess push; nothing to restore.
    ExcessReleased,
    /// Pop on an empty stack.
    Underflow,
}

/// Stack of clip regions, bounded by `limit`.
///
/// Pushes and pops must be balanced within a draw pass. Excess pushes beyond
/// the bound are counted so the matching pops stay balanced.
#[derive(Debug, Clone)]
pub struct ClipStack {
    regions: Vec<ClipRegion>,
    excess: usize,
    limit: usize,
}

impl Default for ClipStack {
    fn default() -> Self {
        Self::with_limit(DEFAULT_CLIP_STACK_DEPTH)
    }
}

impl ClipStack {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            regions: Vec::with_capacity(limit),
            excess: 0,
            limit,
        }
    }

    pub fn current(&self) -> ClipRegion {
        self.regions.last().copied().unwrap_or(ClipRegion::NoClip)
    }

    pub fn depth(&self) -> usize {
        self.regions.len()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Narrows the clip to `rect` intersected with the current region.
    pub fn push_rect(&mut self, rect: Rect) -> ClipChange {
        let region = match self.current() {
            ClipRegion::NoClip => rect,
            ClipRegion::Rect(current) => current.intersect(&rect),
        };
        self.push(ClipRegion::Rect(region))
    }

    /// Removes clipping until the matching pop.
    pub fn push_no_clip(&mut self) -> ClipChange {
        self.push(ClipRegion::NoClip)
    }

    fn push(&mut self, region: ClipRegion) -> ClipChange {
        if self.excess > 0 || self.regions.len() >= self.limit {
            self.excess += 1;
            return ClipChange::Overflow;
        }
        self.regions.push(region);
        ClipChange::Applied(region)
    }

    pub fn pop(&mut self) -> ClipChange {
        if self.excess > 0 {
            self.excess -= 1;
            return ClipChange::ExcessReleased;
        }
        match self.regions.pop() {
            Some(_) => ClipChange::Applied(self.current()),
            None => ClipChange::Underflow,
        }
    }

    /// Intersects `rect` with the current clip. `None` when nothing is visible.
    pub fn clip_box(&self, rect: Rect) -> Option<Rect> {
        let visible = match self.current() {
            ClipRegion::NoClip => rect,
            ClipRegion::Rect(clip) => clip.intersect(&rect),
        };
        (!visible.is_empty()).then_some(visible)
    }

    /// Whether any part of `rect` survives the current clip.
    pub fn not_clipped(&self, rect: Rect) -> bool {
        self.clip_box(rect).is_some()
    }
}
