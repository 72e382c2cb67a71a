//! Mathematical structs and functions.

use cgmath::{Point2, Vector2};
pub use arc::ArcCurve2d;
pub use curve::ParametricCurve2d;
pub use line::LineSegment2d;
pub use util::*;

mod arc;
mod curve;
mod line;
mod util;

/// A 2D point
pub type Point2d = Point2<f64>;

/// A 2D vector
pub type Vector2d = Vector2<f64>;
