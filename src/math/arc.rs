use super::{angle, ParametricCurve2d, Point2d, Vector2d};
use crate::util::Interval;
use cgmath::prelude::*;

/// A turn around a fixed centre, parameterised by distance travelled.
///
/// When the start and end points are not equidistant from the centre the
/// radius is blended linearly along the sweep, so the curve always meets
/// both end points. The nominal length is the arc length at the start
/// radius.
#[derive(Clone, Copy, Debug)]
pub struct ArcCurve2d {
    center: Point2d,
    start_angle: f64,
    sweep: f64,
    r_start: f64,
    r_end: f64,
    length: f64,
}

impl ArcCurve2d {
    /// Creates an arc around `center` from `start` to `end`.
    ///
    /// # Parameters
    /// * `clockwise` - Whether the arc turns clockwise (to the right).
    pub fn new(center: Point2d, start: Point2d, end: Point2d, clockwise: bool) -> Self {
        let (r0, r1) = (start - center, end - center);
        let mut sweep = super::cross(r0, r1).atan2(r0.dot(r1));
        if clockwise && sweep > 0.0 {
            sweep -= std::f64::consts::TAU;
        } else if !clockwise && sweep < 0.0 {
            sweep += std::f64::consts::TAU;
        }
        let r_start = r0.magnitude();
        Self {
            center,
            start_angle: angle(r0),
            sweep,
            r_start,
            r_end: r1.magnitude(),
            length: r_start * sweep.abs(),
        }
    }

    /// The centre of the turn.
    pub fn center(&self) -> Point2d {
        self.center
    }

    /// The vector from the centre to the start of the arc.
    pub fn radius(&self) -> Vector2d {
        let (sin, cos) = self.start_angle.sin_cos();
        self.r_start * Vector2d::new(cos, sin)
    }

    /// The signed angle swept by the arc, positive when anticlockwise.
    pub fn sweep(&self) -> f64 {
        self.sweep
    }

    /// The arc length.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Converts a distance along the arc to a fraction of the sweep.
    fn fraction(&self, t: f64) -> f64 {
        if self.length > 0.0 {
            self.bounds().clamp(t) / self.length
        } else {
            0.0
        }
    }

    /// The distance from the centre at fraction `f` of the sweep.
    fn radius_at(&self, f: f64) -> f64 {
        self.r_start + f * (self.r_end - self.r_start)
    }
}

impl ParametricCurve2d for ArcCurve2d {
    fn sample(&self, t: f64) -> Point2d {
        let f = self.fraction(t);
        let (sin, cos) = (self.start_angle + self.sweep * f).sin_cos();
        self.center + self.radius_at(f) * Vector2d::new(cos, sin)
    }

    fn bounds(&self) -> Interval<f64> {
        Interval::new(0.0, self.length)
    }

    fn sample_dt(&self, t: f64) -> Vector2d {
        let f = self.fraction(t);
        let (sin, cos) = (self.start_angle + self.sweep * f).sin_cos();
        let radial = Vector2d::new(cos, sin);
        let tangent = Vector2d::new(-sin, cos);
        let dr = self.r_end - self.r_start;
        let d = dr * radial + self.radius_at(f) * self.sweep * tangent;
        if self.length > 0.0 {
            d / self.length
        } else {
            d
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn quarter_turn_left() {
        let arc = ArcCurve2d::new(
            Point2d::new(0.0, 0.0),
            Point2d::new(10.0, 0.0),
            Point2d::new(0.0, 10.0),
            false,
        );
        assert_approx_eq!(arc.sweep(), FRAC_PI_2);
        assert_approx_eq!(arc.length(), 10.0 * FRAC_PI_2);
        let mid = arc.sample(0.5 * arc.length());
        assert_approx_eq!(mid.x, 10.0 * (PI / 4.0).cos());
        assert_approx_eq!(mid.y, 10.0 * (PI / 4.0).sin());
        let end = arc.sample(arc.length());
        assert_approx_eq!(end.x, 0.0);
        assert_approx_eq!(end.y, 10.0);
        // Unit speed along a circular arc
        assert_approx_eq!(arc.sample_dt(1.0).magnitude(), 1.0);
    }

    #[test]
    fn clockwise_sweep_is_negative() {
        let arc = ArcCurve2d::new(
            Point2d::new(0.0, 0.0),
            Point2d::new(0.0, 5.0),
            Point2d::new(5.0, 0.0),
            true,
        );
        assert_approx_eq!(arc.sweep(), -FRAC_PI_2);
        let dir = arc.sample_dt(0.0);
        assert_approx_eq!(dir.x, 1.0);
        assert_approx_eq!(dir.y, 0.0);
    }

    #[test]
    fn half_turn_goes_anticlockwise() {
        let arc = ArcCurve2d::new(
            Point2d::new(0.0, 0.0),
            Point2d::new(0.0, -3.0),
            Point2d::new(0.0, 3.0),
            false,
        );
        assert_approx_eq!(arc.sweep(), PI);
        // Passes the right-hand side of the centre
        assert!(arc.sample(0.5 * arc.length()).x > 2.9);
    }

    #[test]
    fn unequal_radii_meet_both_ends() {
        let end = Point2d::new(0.0, 6.0);
        let arc = ArcCurve2d::new(Point2d::new(0.0, 0.0), Point2d::new(4.0, 0.0), end, false);
        let p = arc.sample(arc.length());
        assert_approx_eq!(p.x, end.x);
        assert_approx_eq!(p.y, end.y);
        assert_approx_eq!(arc.radius().magnitude(), 4.0);
        assert_approx_eq!(arc.length(), 4.0 * FRAC_PI_2);
        // Halfway round, halfway between the two radii
        let mid = arc.sample(0.5 * arc.length()) - arc.center();
        assert_approx_eq!(mid.magnitude(), 5.0);
    }

    #[test]
    fn start_radius_may_be_the_larger() {
        let start = Point2d::new(6.0, 0.0);
        let arc = ArcCurve2d::new(Point2d::new(0.0, 0.0), start, Point2d::new(0.0, 4.0), false);
        assert_approx_eq!(arc.radius().x, start.x);
        assert_approx_eq!(arc.radius().y, start.y);
        assert_approx_eq!(arc.length(), 6.0 * FRAC_PI_2);
    }
}
