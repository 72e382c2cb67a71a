use super::Vector2d;
use cgmath::prelude::*;

/// Vectors shorter than this have no meaningful direction.
const MIN_MAGNITUDE: f64 = 1e-9;

/// Rotates a vector 90 degrees clockwise, giving the direction
/// to the right of a traveller heading along `vec`.
pub fn perpendicular(vec: Vector2d) -> Vector2d {
    Vector2d::new(vec.y, -vec.x)
}

/// The z-component of the cross product of two vectors.
/// Positive when `b` points to the left of `a`.
pub fn cross(a: Vector2d, b: Vector2d) -> f64 {
    a.x * b.y - a.y * b.x
}

/// The angle of a vector in radians, measured anticlockwise from the x-axis.
pub fn angle(vec: Vector2d) -> f64 {
    vec.y.atan2(vec.x)
}

/// Rotates a vector anticlockwise by `theta` radians.
pub fn rotate(vec: Vector2d, theta: f64) -> Vector2d {
    let (sin, cos) = theta.sin_cos();
    Vector2d::new(cos * vec.x - sin * vec.y, sin * vec.x + cos * vec.y)
}

/// Normalises a vector, or returns `None` if it has no direction.
pub fn unit(vec: Vector2d) -> Option<Vector2d> {
    let mag = vec.magnitude();
    (mag > MIN_MAGNITUDE).then(|| vec / mag)
}
