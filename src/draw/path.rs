//! Vertex accumulation for the `begin_*`/`vertex`/`end_*` shape family.
//!
//! Vertices arrive already transformed to device space. A shape is consumed
//! in one piece by [`PathAccumulator::take`]; nothing outlives the draw call
//! that built it.

/// What the accumulated vertices become when the shape ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Points,
    Line,
    Loop,
    Polygon,
    /// Polygon with several contours separated by gaps, filled even-odd.
    ComplexPolygon,
}

impl ShapeKind {
    fn is_closed(self) -> bool {
        matches!(
            self,
            ShapeKind::Loop | ShapeKind::Polygon | ShapeKind::ComplexPolygon
        )
    }
}

type Point = (f64, f64);

/// How one contour of a finished shape has to be rendered.
#[derive(Debug, Clone, PartialEq)]
pub enum Outline {
    Nothing,
    Dot(Point),
    Open(Vec<Point>),
    Closed(Vec<Point>),
}

impl Outline {
    /// Classifies a contour. Closed kinds with fewer than three vertices fall
    /// back to an open polyline, or a single dot.
    pub fn classify(points: Vec<Point>, closed: bool) -> Outline {
        match points.len() {
            0 => Outline::Nothing,
            1 => Outline::Dot(points[0]),
            n if closed && n >= 3 => Outline::Closed(points),
            _ => Outline::Open(points),
        }
    }
}

/// A finished shape as handed to the driver.
#[derive(Debug, Clone, PartialEq)]
pub struct AccumulatedShape {
    pub kind: ShapeKind,
    pub contours: Vec<Vec<Point>>,
}

impl AccumulatedShape {
    pub fn vertex_count(&self) -> usize {
        self.contours.iter().map(Vec::len).sum()
    }

    /// Every vertex in order, ignoring contour breaks.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.contours.iter().flatten().copied()
    }

    /// Per-contour rendering decision, with degenerate closed contours
    /// already turned into open ones.
    pub fn outlines(self) -> Vec<Outline> {
        let closed = self.kind.is_closed();
        self.contours
            .into_iter()
            .filter(|c| !c.is_empty())
            .map(|c| Outline::classify(c, closed))
            .collect()
    }
}

#[derive(Debug, Default)]
pub struct PathAccumulator {
    kind: Option<ShapeKind>,
    contours: Vec<Vec<Point>>,
}

impl PathAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new shape, discarding anything left from an unfinished one.
    pub fn begin(&mut self, kind: ShapeKind) {
        if self.kind.is_some() {
            log::debug!("shape {:?} abandoned by begin({kind:?})", self.kind);
        }
        self.kind = Some(kind);
        self.contours.clear();
        self.contours.push(Vec::new());
    }

    pub fn kind(&self) -> Option<ShapeKind> {
        self.kind
    }

    pub fn is_active(&self) -> bool {
        self.kind.is_some()
    }

    /// Appends a device-space vertex. Consecutive duplicates are dropped.
    pub fn vertex(&mut self, x: f64, y: f64) {
        if self.kind.is_none() {
            return;
        }
        if let Some(contour) = self.contours.last_mut() {
            if contour.last() != Some(&(x, y)) {
                contour.push((x, y));
            }
        }
    }

    /// Ends the current contour and starts another.
    pub fn gap(&mut self) {
        let Some(kind) = self.kind else {
            return;
        };
        if let Some(contour) = self.contours.last_mut() {
            if kind.is_closed() {
                fixloop(contour);
            }
            if contour.is_empty() {
                return;
            }
        }
        self.contours.push(Vec::new());
    }

    /// Consumes the shape and clears the accumulator.
    pub fn take(&mut self) -> Option<AccumulatedShape> {
        let kind = self.kind.take()?;
        let mut contours = std::mem::take(&mut self.contours);
        if kind.is_closed() {
            contours.iter_mut().for_each(fixloop);
        }
        contours.retain(|c| !c.is_empty());
        Some(AccumulatedShape { kind, contours })
    }
}

/// Drops trailing vertices that repeat the first one, so a loop that was
/// closed by hand is not closed twice.
pub fn fixloop(points: &mut Vec<Point>) {
    while points.len() > 2 && points.last() == points.first() {
        points.pop();
    }
}

/// Vertices of an arc of radius `r` around `(cx, cy)` from `start` to `end`
/// degrees, counter-clockwise on screen.
///
/// `device_radius` is the radius after transformation and sets the chord
/// count so the polygonal error stays below an eighth of a pixel.
pub fn arc_points(cx: f64, cy: f64, r: f64, start: f64, end: f64, device_radius: f64) -> Vec<Point> {
    let a = start.to_radians();
    let e = end.to_radians();
    let rd = device_radius.max(2.0);
    let epsilon = 2.0 * (1.0 - 0.125 / rd).acos();
    let steps = ((e - a) / epsilon).abs() as usize;
    let point = |angle: f64| (cx + angle.cos() * r, cy - angle.sin() * r);

    let mut points = Vec::with_capacity(steps + 1);
    if steps > 0 {
        let step = (e - a) / steps as f64;
        points.extend((0..steps).map(|i| point(a + step * i as f64)));
    }
    points.push(point(e));
    points
}

/// Full circle vertices, first point at angle 0.
pub fn circle_points(cx: f64, cy: f64, r: f64, device_radius: f64) -> Vec<Point> {
    let mut points = arc_points(cx, cy, r, 0.0, 360.0, device_radius);
    // the closing vertex only differs from the first by rounding
    if points.len() > 1 {
        points.pop();
    }
    points
}

/// Radius of a user-space circle after a transform, averaged over both axes.
pub fn device_radius(r: f64, transform_distance: impl Fn(f64, f64) -> (f64, f64)) -> f64 {
    let (x1, y1) = transform_distance(r, 0.0);
    let (x2, y2) = transform_distance(0.0, r);
    (x1.hypot(y1) + x2.hypot(y2)) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(kind: ShapeKind, points: &[Point]) -> AccumulatedShape {
        let mut acc = PathAccumulator::new();
        acc.begin(kind);
        for &(x, y) in points {
            acc.vertex(x, y);
        }
        acc.take().unwrap()
    }

    #[test]
    fn polygon_with_two_vertices_becomes_open_line() {
        let shape = collect(ShapeKind::Polygon, &[(0.0, 0.0), (10.0, 10.0)]);
        assert_eq!(
            shape.outlines(),
            vec![Outline::Open(vec![(0.0, 0.0), (10.0, 10.0)])]
        );
    }

    #[test]
    fn single_vertex_becomes_dot() {
        let shape = collect(ShapeKind::Loop, &[(3.0, 4.0)]);
        assert_eq!(shape.outlines(), vec![Outline::Dot((3.0, 4.0))]);
    }

    #[test]
    fn hand_closed_loop_is_not_closed_twice() {
        let shape = collect(
            ShapeKind::Loop,
            &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 0.0)],
        );
        assert_eq!(shape.vertex_count(), 3);
        assert!(matches!(shape.outlines()[0], Outline::Closed(_)));
    }

    #[test]
    fn consecutive_duplicates_are_dropped() {
        let shape = collect(ShapeKind::Line, &[(1.0, 1.0), (1.0, 1.0), (2.0, 2.0)]);
        assert_eq!(shape.vertex_count(), 2);
    }

    #[test]
    fn gaps_split_contours() {
        let mut acc = PathAccumulator::new();
        acc.begin(ShapeKind::ComplexPolygon);
        for p in [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)] {
            acc.vertex(p.0, p.1);
        }
        acc.gap();
        acc.gap();
        for p in [(2.0, 2.0), (4.0, 2.0), (4.0, 4.0)] {
            acc.vertex(p.0, p.1);
        }
        let shape = acc.take().unwrap();
        assert_eq!(shape.contours.len(), 2);
        assert!(!acc.is_active());
        assert!(acc.take().is_none());
    }

    #[test]
    fn vertices_outside_a_shape_are_ignored() {
        let mut acc = PathAccumulator::new();
        acc.vertex(1.0, 1.0);
        assert!(acc.take().is_none());
    }

    #[test]
    fn arc_points_run_counter_clockwise_on_screen() {
        let points = arc_points(0.0, 0.0, 10.0, 0.0, 90.0, 10.0);
        let first = points[0];
        let last = *points.last().unwrap();
        assert!((first.0 - 10.0).abs() < 1e-9 && first.1.abs() < 1e-9);
        assert!(last.0.abs() < 1e-9 && (last.1 + 10.0).abs() < 1e-9);
        assert!(points.len() > 4);
    }

    #[test]
    fn circle_has_no_duplicate_closing_vertex() {
        let points = circle_points(5.0, 5.0, 4.0, 4.0);
        let first = points[0];
        let last = *points.last().unwrap();
        assert!((first.0 - last.0).abs() > 1e-6 || (first.1 - last.1).abs() > 1e-6);
        assert_eq!(device_radius(3.0, |x, y| (x * 2.0, y * 2.0)), 6.0);
    }
}
