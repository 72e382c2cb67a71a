use crate::math::{cross, Vector2d};
use cgmath::InnerSpace;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Cosine beyond which two directions count as parallel.
const PARALLEL_COS: f64 = 0.99;

/// The turn made when moving from one direction of travel to another.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RouteRole {
    Straight,
    Right,
    Left,
    UTurn,
}

impl RouteRole {
    /// Classifies the turn from unit vector `v0` to unit vector `v1`.
    pub fn from_unit_vectors(v0: Vector2d, v1: Vector2d) -> Self {
        let cos = v0.dot(v1);
        let sin = cross(v0, v1);
        if cos > PARALLEL_COS {
            RouteRole::Straight
        } else if cos < -PARALLEL_COS {
            RouteRole::UTurn
        } else if sin < 0.0 {
            RouteRole::Right
        } else {
            RouteRole::Left
        }
    }

    /// The rank of this role when picking a default successor; lower is preferred.
    pub(crate) fn preference(self) -> u8 {
        match self {
            RouteRole::Straight => 0,
            RouteRole::Right => 1,
            RouteRole::Left => 2,
            RouteRole::UTurn => 3,
        }
    }

    /// Whether the turn sweeps clockwise.
    pub(crate) fn is_clockwise(self) -> bool {
        self == RouteRole::Right
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::math::rotate;

    #[test]
    fn classify_turns() {
        let east = Vector2d::new(1.0, 0.0);
        let role = |v1| RouteRole::from_unit_vectors(east, v1);
        assert_eq!(role(east), RouteRole::Straight);
        assert_eq!(role(rotate(east, 0.1)), RouteRole::Straight);
        assert_eq!(role(Vector2d::new(0.0, -1.0)), RouteRole::Right);
        assert_eq!(role(Vector2d::new(0.0, 1.0)), RouteRole::Left);
        assert_eq!(role(Vector2d::new(-1.0, 0.0)), RouteRole::UTurn);
        assert_eq!(role(rotate(east, 3.0)), RouteRole::Left);
        assert_eq!(role(rotate(east, -2.0)), RouteRole::Right);
    }

    #[test]
    fn straight_is_preferred() {
        let mut roles = [RouteRole::UTurn, RouteRole::Left, RouteRole::Straight, RouteRole::Right];
        roles.sort_by_key(|r| r.preference());
        assert_eq!(
            roles,
            [RouteRole::Straight, RouteRole::Right, RouteRole::Left, RouteRole::UTurn]
        );
    }
}
