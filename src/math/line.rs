use super::{unit, ParametricCurve2d, Point2d, Vector2d};
use crate::util::Interval;
use cgmath::prelude::*;

/// A straight line segment, parameterised by distance from its start.
#[derive(Clone, Copy, Debug)]
pub struct LineSegment2d {
    start: Point2d,
    dir: Vector2d,
    length: f64,
}

impl LineSegment2d {
    /// Creates a line segment between two points.
    /// A degenerate segment keeps the `fallback` direction.
    pub fn from_ends(start: Point2d, end: Point2d, fallback: Vector2d) -> Self {
        let delta = end - start;
        Self {
            start,
            dir: unit(delta).unwrap_or(fallback),
            length: delta.magnitude(),
        }
    }

    /// The length of the segment.
    pub fn length(&self) -> f64 {
        self.length
    }
}

impl ParametricCurve2d for LineSegment2d {
    fn sample(&self, t: f64) -> Point2d {
        self.start + self.dir * t
    }

    fn bounds(&self) -> Interval<f64> {
        Interval::new(0.0, self.length)
    }

    fn sample_dt(&self, _t: f64) -> Vector2d {
        self.dir
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn samples_by_distance() {
        let line = LineSegment2d::from_ends(
            Point2d::new(1.0, 1.0),
            Point2d::new(4.0, 5.0),
            Vector2d::unit_x(),
        );
        assert_approx_eq!(line.length(), 5.0);
        let p = line.sample(2.5);
        assert_approx_eq!(p.x, 2.5);
        assert_approx_eq!(p.y, 3.0);
    }

    #[test]
    fn degenerate_segment_uses_fallback() {
        let p = Point2d::new(2.0, 2.0);
        let line = LineSegment2d::from_ends(p, p, Vector2d::unit_y());
        assert_eq!(line.length(), 0.0);
        assert_eq!(line.sample_dt(0.0), Vector2d::unit_y());
    }
}
