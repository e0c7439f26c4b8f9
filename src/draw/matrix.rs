//! Affine transforms and the bounded matrix stack.

use crate::error::DriverError;

/// Default number of saved matrices the stack can hold.
pub const DEFAULT_MATRIX_STACK_DEPTH: usize = 32;

/// A 2D affine transform.
///
/// Maps `(x, y)` to `(x*a + y*c + x0, x*b + y*d + y0)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformMatrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub x: f64,
    pub y: f64,
}

impl Default for TransformMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl TransformMatrix {
    pub const IDENTITY: TransformMatrix = TransformMatrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        x: 0.0,
        y: 0.0,
    };

    pub const fn new(a: f64, b: f64, c: f64, d: f64, x: f64, y: f64) -> Self {
        Self { a, b, c, d, x, y }
    }

    /// Applies `m` before this transform (`m` operates in the local space).
    pub fn multiply(&self, m: &TransformMatrix) -> TransformMatrix {
        TransformMatrix {
            a: m.a * self.a + m.b * self.c,
            b: m.a * self.b + m.b * self.d,
            c: m.c * self.a + m.d * self.c,
            d: m.c * self.b + m.d * self.d,
            x: m.x * self.a + m.y * self.c + self.x,
            y: m.x * self.b + m.y * self.d + self.y,
        }
    }

    pub fn translate(&self, x: f64, y: f64) -> TransformMatrix {
        self.multiply(&TransformMatrix::new(1.0, 0.0, 0.0, 1.0, x, y))
    }

    pub fn scale(&self, sx: f64, sy: f64) -> TransformMatrix {
        self.multiply(&TransformMatrix::new(sx, 0.0, 0.0, sy, 0.0, 0.0))
    }

    /// Rotates counter-clockwise on screen by `degrees`. Quarter turns are
    /// exact so axis-aligned geometry stays on integer coordinates.
    pub fn rotate(&self, degrees: f64) -> TransformMatrix {
        let (s, c) = match degrees {
            d if d == 0.0 => return *self,
            d if d == 90.0 || d == -270.0 => (1.0, 0.0),
            d if d == 180.0 || d == -180.0 => (0.0, -1.0),
            d if d == 270.0 || d == -90.0 => (-1.0, 0.0),
            d => {
                let r = d.to_radians();
                (r.sin(), r.cos())
            }
        };
        self.multiply(&TransformMatrix::new(c, -s, s, c, 0.0, 0.0))
    }

    pub fn transform_point(&self, x: f64, y: f64) -> (f64, f64) {
        (
            x * self.a + y * self.c + self.x,
            x * self.b + y * self.d + self.y,
        )
    }

    /// Transforms a distance vector (ignores translation).
    pub fn transform_distance(&self, dx: f64, dy: f64) -> (f64, f64) {
        (dx * self.a + dy * self.c, dx * self.b + dy * self.d)
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

/// The current transform plus a bounded stack of saved ones.
///
/// Failed pushes and pops leave the current matrix untouched. Pushes past the
/// bound are counted so their pops stay paired with them: the pop closing the
/// outermost excess level restores the matrix that level started from.
#[derive(Debug, Clone)]
pub struct MatrixStack {
    current: TransformMatrix,
    saved: Vec<TransformMatrix>,
    limit: usize,
    excess: usize,
    excess_base: TransformMatrix,
}

impl Default for MatrixStack {
    fn default() -> Self {
        Self::with_limit(DEFAULT_MATRIX_STACK_DEPTH)
    }
}

impl MatrixStack {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            current: TransformMatrix::IDENTITY,
            saved: Vec::with_capacity(limit),
            limit,
            excess: 0,
            excess_base: TransformMatrix::IDENTITY,
        }
    }

    pub fn current(&self) -> &TransformMatrix {
        &self.current
    }

    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Pushes beyond the bound currently absorbed by the stack.
    pub fn excess(&self) -> usize {
        self.excess
    }

    pub fn push(&mut self) -> Result<(), DriverError> {
        if self.excess > 0 || self.saved.len() >= self.limit {
            if self.excess == 0 {
                self.excess_base = self.current;
            }
            self.excess += 1;
            return Err(DriverError::MatrixStackOverflow { limit: self.limit });
        }
        self.saved.push(self.current);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<&TransformMatrix, DriverError> {
        if self.excess > 0 {
            self.excess -= 1;
            if self.excess == 0 {
                self.current = self.excess_base;
            }
            return Ok(&self.current);
        }
        let restored = self.saved.pop().ok_or(DriverError::MatrixStackUnderflow)?;
        self.current = restored;
        Ok(&self.current)
    }

    pub fn mult(&mut self, m: &TransformMatrix) {
        self.current = self.current.multiply(m);
    }

    pub fn translate(&mut self, x: f64, y: f64) {
        self.current = self.current.translate(x, y);
    }

    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.current = self.current.scale(sx, sy);
    }

    pub fn rotate(&mut self, degrees: f64) {
        self.current = self.current.rotate(degrees);
    }

    /// Replaces the current matrix with the identity, keeping saved entries.
    pub fn load_identity(&mut self) {
        self.current = TransformMatrix::IDENTITY;
    }
}
