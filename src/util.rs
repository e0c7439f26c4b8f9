//! Integer rectangle helpers shared by the clip stack, compositor and themes.

/// Axis-aligned integer rectangle in device pixels.
///
/// A rectangle with a non-positive width or height is empty. Empty rectangles
/// are still valid values: intersections may produce them and callers decide
/// whether to draw. Edge arithmetic saturates at the `i32` range, so huge
/// sizes behave as "to the end of the coordinate space".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

/// Placement of a child rectangle inside a parent, see [`Rect::aligned_in`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Align {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl Align {
    pub const CENTER: Align = Align {
        left: false,
        right: false,
        top: false,
        bottom: false,
    };
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Builds a rectangle from min/max bounds (inclusive min, exclusive max).
    pub fn from_min_max(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
        Self::new(
            min_x,
            min_y,
            max_x.saturating_sub(min_x),
            max_y.saturating_sub(min_y),
        )
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.w)
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.h)
    }

    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Returns the overlap of both rectangles.
    ///
    /// Disjoint inputs yield a rectangle with a negative or zero size, which
    /// [`Rect::is_empty`] reports as empty.
    pub fn intersect(&self, other: &Rect) -> Rect {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let r = self.right().min(other.right());
        let b = self.bottom().min(other.bottom());
        Rect::from_min_max(x, y, r, b)
    }

    /// Returns the rectangle surrounding both inputs. An empty side is ignored
    /// rather than contributing its degenerate origin.
    pub fn merge(&self, other: &Rect) -> Rect {
        if other.is_empty() {
            return *self;
        }
        if self.is_empty() {
            return *other;
        }
        Rect::from_min_max(
            self.x.min(other.x),
            self.y.min(other.y),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }

    /// Shrinks the rectangle by a box inset (`dx`/`dy` move the origin,
    /// `dw`/`dh` reduce the size).
    pub fn inset(&self, dx: i32, dy: i32, dw: i32, dh: i32) -> Rect {
        Rect::new(
            self.x.saturating_add(dx),
            self.y.saturating_add(dy),
            self.w.saturating_sub(dw),
            self.h.saturating_sub(dh),
        )
    }

    /// Places a `w`×`h` rectangle inside `outer`.
    ///
    /// Without a horizontal flag the child is centered, rounding up and left
    /// when the size difference is odd. The result may start before `outer`
    /// when the child is larger; it stays centered in that case.
    pub fn aligned_in(outer: &Rect, w: i32, h: i32, align: Align) -> Rect {
        let x = if align.left {
            if align.right && w > outer.w {
                outer.right().saturating_sub(w)
            } else {
                outer.x
            }
        } else if align.right {
            outer.right().saturating_sub(w)
        } else {
            outer.x.saturating_add(outer.w.saturating_sub(w) >> 1)
        };
        let y = if align.top {
            if align.bottom && h > outer.h {
                outer.bottom().saturating_sub(h)
            } else {
                outer.y
            }
        } else if align.bottom {
            outer.bottom().saturating_sub(h)
        } else {
            outer.y.saturating_add(outer.h.saturating_sub(h) >> 1)
        };
        Rect::new(x, y, w, h)
    }
}
